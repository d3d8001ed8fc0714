//! # segrouter
//!
//! **segrouter** is a small, segment-trie based HTTP router with route groups
//! and a loop-driven middleware chain.
//!
//! ## Overview
//!
//! Routes are registered per HTTP method as slash-delimited patterns made of
//! literal segments, `:name` parameters and a trailing `*name` wildcard.
//! Handlers and middleware share a single type and run over a per-request
//! [`Context`]; middleware attached to a group applies to every request whose
//! path starts with that group's prefix.
//!
//! ## Architecture
//!
//! - **[`router`]** - Segment trie and the per-method route registry
//! - **[`context`]** - Per-request state, the chain cursor and response writers
//! - **[`dispatcher`]** - [`Engine`], route groups and request dispatch
//! - **[`server`]** - The [`ResponseSink`] boundary a transport implements
//! - **[`middleware`]** - Logging, panic recovery and metrics middleware
//! - **[`logging`]** - `tracing-subscriber` setup for embedding binaries
//! - **[`runtime_config`]** - Environment-driven registration settings
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant T as Transport
//!     participant E as Engine
//!     participant R as Router
//!     participant C as Context
//!     participant H as Handlers
//!
//!     T->>E: handle(request, sink)
//!     E->>R: resolve(method, path)
//!     alt no match
//!         R-->>E: None
//!         E-->>T: 404 NOT FOUND: {path}
//!     else match
//!         R-->>E: RouteMatch { pattern, params }
//!         E->>E: middleware_for(path) + route handler
//!         E->>C: next()
//!         loop until cursor passes the chain
//!             C->>H: handler(ctx)
//!         end
//!         C-->>T: status, headers, body via sink
//!     end
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use http::{Request, StatusCode};
//! use segrouter::{middleware, Engine};
//!
//! let mut engine = Engine::new();
//! engine.use_middleware(middleware::recovery());
//!
//! let mut api = engine.group("/api");
//! api.get("/hello/:name", |ctx| {
//!     let name = ctx.param("name").unwrap_or_default().to_string();
//!     ctx.string(StatusCode::OK, &format!("hello {name}"));
//! });
//!
//! let request = Request::get("/api/hello/gopher").body(Vec::new()).unwrap();
//! let response = engine.serve(request).unwrap();
//! assert_eq!(response.status(), StatusCode::OK);
//! assert_eq!(response.body().as_slice(), b"hello gopher");
//! ```
//!
//! ## Runtime Considerations
//!
//! The engine performs no I/O and spawns nothing. Register every route and
//! middleware first; after that the engine is only read, so it can be put in
//! an `Arc` and shared by any number of request threads without locking.
//! Each request gets its own [`Context`], and a handler chain runs entirely
//! on the calling thread.

pub mod context;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod router;
pub mod runtime_config;
pub mod server;

pub use context::{Context, HandlerFunc};
pub use dispatcher::{Engine, Group, GroupId, RouterGroup};
pub use error::RouterError;
pub use router::{Params, RouteMatch, Router};
pub use server::{BufferedResponse, ResponseSink};
