//! Transport boundary.
//!
//! The engine performs no I/O of its own. A transport calls
//! [`Engine::handle`](crate::dispatcher::Engine::handle) with the inbound
//! `http::Request<Vec<u8>>` and a [`ResponseSink`]; anything that speaks the
//! `http` crate's types can drive it. [`BufferedResponse`] collects the
//! output into an `http::Response<Vec<u8>>` for transports that want a value
//! back rather than a streaming writer.

pub mod request;
pub mod response;

pub use request::{decode_path, first_value, is_form_encoded, parse_query_params};
pub use response::{BufferedResponse, ResponseSink};
