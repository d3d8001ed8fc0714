//! # Dispatcher Module
//!
//! The [`Engine`] ties the route registry to the group tree and drives each
//! request through its handler chain.
//!
//! ## Groups
//!
//! Every engine starts with a root group whose prefix is `""`. Groups created
//! from it (or from each other) store their full prefix, so `/api` then
//! `/v1` yields a group with prefix `/api/v1`. Routes registered through a
//! group are stored under the group prefix followed by the route pattern.
//!
//! ## Request Flow
//!
//! 1. Resolve `(method, path)` in the registry
//! 2. No match: write `404 NOT FOUND: {path}` as plain text and stop
//! 3. Collect the middleware of every group whose prefix starts the path,
//!    in group creation order (the root group first)
//! 4. Append the route handler and run the chain from a new [`Context`]
//!
//! Middleware membership is decided by a plain string prefix test on the
//! request path, so a group `/v1` also covers `/v10/status`.
//!
//! [`Context`]: crate::context::Context

mod core;
mod group;

pub use core::Engine;
pub use group::{Group, GroupId, RouterGroup};
