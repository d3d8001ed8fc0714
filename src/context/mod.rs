//! # Context Module
//!
//! Per-request state and the execution cursor that drives a request's
//! handler chain.
//!
//! ## Lifecycle
//!
//! ```text
//! Initialized ──next()──▶ Running ──handler returns──▶ Advancing ──▶ Running ...
//!   cursor: None          cursor: i                    cursor: i+1
//!                                   │
//!                                   └──abort()──▶ Completed (cursor ≥ chain length)
//! ```
//!
//! The cursor is an index into the chain that only moves forward, so each
//! handler runs at most once per request. See [`Context`] for how nested
//! `next()` calls give middleware before/after hooks, and how
//! [`Context::abort`] cuts the chain short.
//!
//! ## Response Writers
//!
//! | Method | Content-Type |
//! |---|---|
//! | [`Context::string`] | `text/plain` |
//! | [`Context::html`] | `text/html` |
//! | [`Context::json`] | `application/json` |
//! | [`Context::data`] | none |
//!
//! Each writer sets headers, then the status, then the body. Writing twice is
//! not prevented; the outcome depends on the
//! [`ResponseSink`](crate::server::ResponseSink) in use.

mod core;

pub use core::{Context, HandlerFunc};
