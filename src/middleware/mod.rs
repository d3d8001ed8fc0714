//! # Middleware Module
//!
//! Ready-made middleware. Middleware here is an ordinary handler: it is
//! attached with `use_middleware` and controls the rest of the chain through
//! [`Context::next`](crate::Context::next) and
//! [`Context::abort`](crate::Context::abort).
//!
//! | Middleware | Behavior |
//! |---|---|
//! | [`logger`] | logs status, method, path and latency after the chain |
//! | [`recovery`] | converts a panic later in the chain into a `500` |
//! | [`MetricsMiddleware`] | request and error counters, Prometheus text output |
//!
//! ```rust
//! use segrouter::{middleware, Engine};
//!
//! let mut engine = Engine::new();
//! engine
//!     .use_middleware(middleware::recovery())
//!     .use_middleware(middleware::logger());
//! ```

mod logger;
mod metrics;
mod recovery;

pub use logger::logger;
pub use metrics::MetricsMiddleware;
pub use recovery::recovery;
