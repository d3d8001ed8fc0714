use std::time::{Duration, Instant};
use tracing::info;

use crate::context::Context;

/// Request logging middleware.
///
/// Runs the rest of the chain, then emits one `info` event with the final
/// status, method, path and latency. Requests that never reach a route
/// (404s) run no middleware and so are not logged here.
pub fn logger() -> impl Fn(&mut Context<'_>) + Send + Sync + 'static {
    |ctx: &mut Context<'_>| {
        let start = Instant::now();
        ctx.next();
        info!(
            status = ctx.status_code().map_or(200, |code| code.as_u16()),
            method = %ctx.method(),
            path = %ctx.path(),
            latency_us = latency_micros(start.elapsed()),
            "Request completed"
        );
    }
}

/// Whole microseconds, saturating at `u64::MAX`
fn latency_micros(latency: Duration) -> u64 {
    u64::try_from(latency.as_micros()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_micros_saturates() {
        assert_eq!(latency_micros(Duration::from_millis(3)), 3_000);
        assert_eq!(latency_micros(Duration::MAX), u64::MAX);
    }
}
