//! # Router Module
//!
//! The router module maps an (HTTP method, URL path) pair to a registered
//! handler and binds the path parameters along the way.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Keeping one segment trie per HTTP method
//! - Recording the handler registered under each (method, pattern) key
//! - Resolving incoming request paths to a generalized pattern
//! - Extracting `:name` and `*name` parameters from the matched path
//!
//! ## Pattern Syntax
//!
//! | Segment | Matches | Binds |
//! |---|---|---|
//! | `users` | exactly `users` | nothing |
//! | `:id` | any single segment | `id` → the segment |
//! | `*filepath` | every remaining segment | `filepath` → rest joined with `/` |
//! | `*` | every remaining segment | nothing |
//!
//! ## Example
//!
//! ```rust
//! use segrouter::router::Router;
//! use http::Method;
//! use std::sync::Arc;
//!
//! let mut router = Router::new();
//! router.add_route(Method::GET, "/p/:lang/doc", Arc::new(|_ctx: &mut segrouter::Context<'_>| {}));
//!
//! let matched = router.resolve(&Method::GET, "/p/go/doc").unwrap();
//! assert_eq!(matched.pattern, "/p/:lang/doc");
//! assert_eq!(matched.params.get("lang"), Some("go"));
//! assert!(router.resolve(&Method::POST, "/p/go/doc").is_none());
//! ```
//!
//! ## Matching Order
//!
//! There is no specificity ranking between literal and parameter siblings.
//! Children are tried in registration order and the first one whose subtree
//! matches wins, so when two registered patterns could both match a path the
//! earlier registration takes precedence. Routes registered below a wildcard
//! segment can be inserted but are never reached: the wildcard ends matching.

mod core;
mod trie;

pub use core::{Params, RouteMatch, Router, MAX_INLINE_PARAMS};
pub use trie::parse_pattern;
