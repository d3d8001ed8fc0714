//! Context core module - per-request state and the handler cursor.

use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{Method, Request, StatusCode};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, warn};

use crate::error::Result;
use crate::router::Params;
use crate::server::{decode_path, first_value, is_form_encoded, parse_query_params, ResponseSink};

/// A request handler or middleware.
///
/// Handlers and middleware share one type: middleware is simply a handler
/// placed before the route handler in the chain.
pub type HandlerFunc = Arc<dyn Fn(&mut Context<'_>) + Send + Sync>;

const TEXT_PLAIN: &str = "text/plain";
const TEXT_HTML: &str = "text/html";
const APPLICATION_JSON: &str = "application/json";

/// Per-request state handed to every handler in the chain.
///
/// Created fresh by the engine for each request and dropped once the
/// response has been written; never shared between requests.
///
/// # Execution model
///
/// The chain runs from a loop owned by [`Context::next`], not from the
/// handlers themselves. A handler that returns without calling `next` does
/// not stop the chain: the loop that invoked it moves on to the following
/// handler. A handler that does call `next` runs the remainder of the chain
/// to completion before its own code after the call resumes, which is how
/// before/after middleware is written:
///
/// ```rust
/// use segrouter::Context;
/// use std::time::Instant;
///
/// fn timing(ctx: &mut Context<'_>) {
///     let start = Instant::now();
///     ctx.next();
///     let _elapsed = start.elapsed();
/// }
/// ```
pub struct Context<'a> {
    request: &'a Request<Vec<u8>>,
    writer: &'a mut dyn ResponseSink,
    /// Percent-decoded request path
    path: Cow<'a, str>,
    params: Params,
    status_code: Option<StatusCode>,
    handlers: Vec<HandlerFunc>,
    /// `None` until the first call to `next`; only ever moves forward
    cursor: Option<usize>,
}

impl<'a> Context<'a> {
    /// Create a context with an empty handler chain
    pub fn new(request: &'a Request<Vec<u8>>, writer: &'a mut dyn ResponseSink) -> Self {
        Self {
            request,
            writer,
            path: decode_path(request.uri().path()),
            params: Params::new(),
            status_code: None,
            handlers: Vec::new(),
            cursor: None,
        }
    }

    pub(crate) fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    pub(crate) fn extend_handlers(&mut self, handlers: impl IntoIterator<Item = HandlerFunc>) {
        self.handlers.extend(handlers);
    }

    /// Run the remaining handlers in order.
    ///
    /// Advances the cursor and invokes the handler under it, repeating until
    /// the cursor passes the end of the chain. Calling this from inside a
    /// handler drives the rest of the chain from a nested loop; when it
    /// returns, every later handler has already run.
    pub fn next(&mut self) {
        let mut index = self.advance_cursor();
        while let Some(handler) = self.handlers.get(index).map(Arc::clone) {
            handler(self);
            index = self.advance_cursor();
        }
    }

    fn advance_cursor(&mut self) -> usize {
        let next = self.cursor.map_or(0, |cursor| cursor + 1);
        self.cursor = Some(next);
        next
    }

    /// Stop the chain and write a `{"message": ...}` JSON failure body.
    ///
    /// The cursor is forced to the end of the chain, so no further handler
    /// body runs. Handlers already on the call stack still finish the code
    /// that follows their own `next()` call.
    pub fn abort(&mut self, code: StatusCode, message: &str) {
        let end = self.handlers.len();
        self.cursor = Some(self.cursor.map_or(end, |cursor| cursor.max(end)));
        self.json(code, &serde_json::json!({ "message": message }));
    }

    /// Current cursor position; `None` before the chain has started
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Whether the cursor has moved past the last handler
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.cursor
            .is_some_and(|cursor| cursor >= self.handlers.len())
    }

    /// Number of handlers in this request's chain
    #[must_use]
    pub fn chain_len(&self) -> usize {
        self.handlers.len()
    }

    // ------------------------------------------------------------------
    // request accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn request(&self) -> &Request<Vec<u8>> {
        self.request
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        self.request.method()
    }

    /// Percent-decoded request path, without the query string
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path parameter bound by the matched route
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// First value of a query string parameter
    #[must_use]
    pub fn query(&self, key: &str) -> Option<String> {
        self.request
            .uri()
            .query()
            .and_then(|query| first_value(query.as_bytes(), key))
    }

    /// All query string parameters
    #[must_use]
    pub fn query_params(&self) -> HashMap<String, String> {
        parse_query_params(self.request.uri().query())
    }

    /// Form value from a URL-encoded body, falling back to the query string
    #[must_use]
    pub fn form(&self, key: &str) -> Option<String> {
        if is_form_encoded(self.request) {
            if let Some(value) = first_value(self.request.body(), key) {
                return Some(value);
            }
        }
        self.query(key)
    }

    /// Request header as a string; `None` if absent or not visible ASCII
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        self.request.body()
    }

    /// Last status code written to the response
    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        self.status_code
    }

    // ------------------------------------------------------------------
    // response writers
    // ------------------------------------------------------------------

    /// Write the response status
    pub fn status(&mut self, code: StatusCode) {
        self.status_code = Some(code);
        self.writer.set_status(code);
    }

    /// Set a response header.
    ///
    /// Names or values the `http` crate cannot represent are dropped with a
    /// warning.
    pub fn set_header(&mut self, name: &str, value: &str) {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => self.writer.set_header(name, value),
            _ => warn!(header = %name, "Dropping invalid response header"),
        }
    }

    /// Plain text response
    pub fn string(&mut self, code: StatusCode, body: &str) {
        self.write_typed(code, TEXT_PLAIN, body.as_bytes());
    }

    /// HTML response
    pub fn html(&mut self, code: StatusCode, html: &str) {
        self.write_typed(code, TEXT_HTML, html.as_bytes());
    }

    /// Raw bytes with no content type
    pub fn data(&mut self, code: StatusCode, bytes: &[u8]) {
        self.status(code);
        self.writer.write_body(bytes);
    }

    /// JSON response.
    ///
    /// The value is encoded before anything is written; if encoding fails the
    /// response becomes a `500` carrying the encoder's message as plain text.
    pub fn json<T: Serialize + ?Sized>(&mut self, code: StatusCode, value: &T) {
        match encode_json(value) {
            Ok(body) => self.write_typed(code, APPLICATION_JSON, &body),
            Err(err) => {
                error!(path = %self.path(), error = %err, "Response serialization failed");
                let message = err.to_string();
                self.write_typed(StatusCode::INTERNAL_SERVER_ERROR, TEXT_PLAIN, message.as_bytes());
            }
        }
    }

    fn write_typed(&mut self, code: StatusCode, content_type: &'static str, body: &[u8]) {
        self.writer
            .set_header(CONTENT_TYPE, HeaderValue::from_static(content_type));
        self.status(code);
        self.writer.write_body(body);
    }
}

/// Encode `value` as a newline-terminated JSON body
fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut body = serde_json::to_vec(value)?;
    body.push(b'\n');
    Ok(body)
}
