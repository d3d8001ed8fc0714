use http::header::CONTENT_TYPE;
use http::Request;
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::collections::HashMap;

/// Percent-decode a request path.
///
/// Matching, parameter binding and the 404 body all see the decoded form,
/// so `/p/hello%20world` binds `hello world`. Invalid UTF-8 after decoding
/// is replaced rather than rejected. A `+` is left as is; it only means a
/// space in query strings and form bodies.
pub fn decode_path(path: &str) -> Cow<'_, str> {
    percent_decode_str(path).decode_utf8_lossy()
}

/// Parse query string parameters from a raw query
///
/// URL-decodes parameter names and values. When a name repeats, the last
/// occurrence is kept.
///
/// # Arguments
///
/// * `query` - The query portion of a URI, without the leading `?` (e.g., `limit=10&offset=20`)
pub fn parse_query_params(query: Option<&str>) -> HashMap<String, String> {
    query
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
        .unwrap_or_default()
}

/// First value for `key` in a URL-encoded byte string
pub fn first_value(encoded: &[u8], key: &str) -> Option<String> {
    url::form_urlencoded::parse(encoded)
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Whether the request body is `application/x-www-form-urlencoded`
pub fn is_form_encoded<B>(request: &Request<B>) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| {
            mime.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}
