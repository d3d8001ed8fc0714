use http::StatusCode;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::context::Context;

/// Middleware for collecting Prometheus-compatible metrics
///
/// Tracks request counts, latency, and error responses by status class.
/// All counters use atomic operations for thread-safe updates without locks.
///
/// Only requests that matched a route are counted: unmatched requests run no
/// middleware.
#[derive(Debug, Default)]
pub struct MetricsMiddleware {
    request_count: AtomicUsize,
    total_latency_ns: AtomicU64,
    client_errors: AtomicUsize,
    server_errors: AtomicUsize,
}

impl MetricsMiddleware {
    /// Create a new metrics middleware with all counters initialized to zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Middleware closure recording into this instance.
    ///
    /// ```rust
    /// use segrouter::middleware::MetricsMiddleware;
    /// use segrouter::Engine;
    /// use std::sync::Arc;
    ///
    /// let metrics = Arc::new(MetricsMiddleware::new());
    /// let mut engine = Engine::new();
    /// engine.use_middleware(metrics.handler());
    /// ```
    pub fn handler(self: &Arc<Self>) -> impl Fn(&mut Context<'_>) + Send + Sync + 'static {
        let metrics = Arc::clone(self);
        move |ctx: &mut Context<'_>| {
            let start = Instant::now();
            ctx.next();
            metrics.record(ctx.status_code().unwrap_or(StatusCode::OK), start.elapsed());
        }
    }

    /// Record one completed request
    pub fn record(&self, status: StatusCode, latency: Duration) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ns.fetch_add(
            u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX),
            Ordering::Relaxed,
        );
        if status.is_client_error() {
            self.client_errors.fetch_add(1, Ordering::Relaxed);
        } else if status.is_server_error() {
            self.server_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get the total number of requests processed
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Responses with a 4xx status
    pub fn client_errors(&self) -> usize {
        self.client_errors.load(Ordering::Relaxed)
    }

    /// Responses with a 5xx status
    pub fn server_errors(&self) -> usize {
        self.server_errors.load(Ordering::Relaxed)
    }

    /// Calculate the average request latency
    ///
    /// Returns zero duration if no requests have been processed yet.
    pub fn average_latency(&self) -> Duration {
        let count = self.request_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }

    /// Render the counters in Prometheus text exposition format
    pub fn render_prometheus(&self) -> String {
        format!(
            "# HELP segrouter_requests_total Total number of routed requests\n\
             # TYPE segrouter_requests_total counter\n\
             segrouter_requests_total {}\n\
             # HELP segrouter_request_latency_seconds Average request latency in seconds\n\
             # TYPE segrouter_request_latency_seconds gauge\n\
             segrouter_request_latency_seconds {}\n\
             # HELP segrouter_error_responses_total Error responses by status class\n\
             # TYPE segrouter_error_responses_total counter\n\
             segrouter_error_responses_total{{class=\"4xx\"}} {}\n\
             segrouter_error_responses_total{{class=\"5xx\"}} {}\n",
            self.request_count(),
            self.average_latency().as_secs_f64(),
            self.client_errors(),
            self.server_errors(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_classifies_status() {
        let metrics = MetricsMiddleware::new();
        metrics.record(StatusCode::OK, Duration::from_millis(2));
        metrics.record(StatusCode::NOT_FOUND, Duration::from_millis(4));
        metrics.record(StatusCode::BAD_GATEWAY, Duration::from_millis(6));

        assert_eq!(metrics.request_count(), 3);
        assert_eq!(metrics.client_errors(), 1);
        assert_eq!(metrics.server_errors(), 1);
        assert_eq!(metrics.average_latency(), Duration::from_millis(4));
    }

    #[test]
    fn test_average_latency_without_requests() {
        assert_eq!(MetricsMiddleware::new().average_latency(), Duration::ZERO);
    }

    #[test]
    fn test_render_prometheus() {
        let metrics = MetricsMiddleware::new();
        metrics.record(StatusCode::INTERNAL_SERVER_ERROR, Duration::from_millis(1));
        let text = metrics.render_prometheus();
        assert!(text.contains("segrouter_requests_total 1\n"));
        assert!(text.contains("segrouter_error_responses_total{class=\"5xx\"} 1\n"));
        assert!(text.contains("segrouter_error_responses_total{class=\"4xx\"} 0\n"));
    }
}
