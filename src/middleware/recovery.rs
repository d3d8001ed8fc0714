use http::StatusCode;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::error;

use crate::context::Context;

/// Middleware that turns a panic further down the chain into a `500`.
///
/// Install it first (or early) so the handlers it should guard come after
/// it. On a panic the rest of the chain is aborted and the client gets
/// `{"message": "Internal Server Error"}`. Without it a handler panic
/// unwinds out of [`Engine::handle`](crate::Engine::handle).
pub fn recovery() -> impl Fn(&mut Context<'_>) + Send + Sync + 'static {
    |ctx: &mut Context<'_>| {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| ctx.next())) {
            error!(
                method = %ctx.method(),
                path = %ctx.path(),
                panic = %panic_message(payload.as_ref()),
                "Handler panicked"
            );
            ctx.abort(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
