use std::borrow::Cow;

use http::{HeaderMap, HeaderName, HeaderValue, Response, StatusCode};
use tracing::warn;

/// Response sink a transport hands to the engine for one request.
///
/// The core calls these in the order headers → status → body for every
/// response it writes. Nothing enforces a single write per response;
/// what a second status or late header means is up to the sink.
pub trait ResponseSink {
    fn set_status(&mut self, status: StatusCode);
    fn set_header(&mut self, name: HeaderName, value: HeaderValue);
    fn write_body(&mut self, bytes: &[u8]);
}

/// In-memory sink that collects a response into `http` types.
///
/// Behaves like a conventional HTTP response writer: the first status
/// commits the head, so later status codes and headers are ignored (and
/// logged), and writing a body without a status implies `200 OK`.
#[derive(Debug, Default)]
pub struct BufferedResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl BufferedResponse {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed status, if one has been written
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body decoded as UTF-8, lossily
    #[must_use]
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Finish the response; an unwritten status becomes `200 OK`.
    #[must_use]
    pub fn into_response(self) -> Response<Vec<u8>> {
        let mut response = Response::new(self.body);
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseSink for BufferedResponse {
    fn set_status(&mut self, status: StatusCode) {
        match self.status {
            None => self.status = Some(status),
            Some(committed) => warn!(
                committed = committed.as_u16(),
                ignored = status.as_u16(),
                "Superfluous status write ignored"
            ),
        }
    }

    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        if self.status.is_some() {
            warn!(header = %name, "Header written after status ignored");
            return;
        }
        self.headers.insert(name, value);
    }

    fn write_body(&mut self, bytes: &[u8]) {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.body.extend_from_slice(bytes);
    }
}
