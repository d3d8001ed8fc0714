use std::fmt;

use http::Method;

/// Errors surfaced by the router core.
///
/// Client-facing outcomes (unmatched routes, short circuits, encoding
/// failures) are written to the response before [`Engine::handle`] returns
/// and never show up here as `Err`. Only an internal consistency fault
/// escapes a request.
///
/// [`Engine::handle`]: crate::dispatcher::Engine::handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// A trie node matched but no handler is registered under its pattern.
    ///
    /// This cannot be caused by client input; it means the registry's
    /// trie and handler table disagree.
    HandlerMissing {
        /// Method of the tree that produced the match
        method: Method,
        /// Generalized pattern recorded on the matched node
        pattern: String,
    },
    /// A structured response body could not be encoded.
    Serialization(String),
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::HandlerMissing { method, pattern } => {
                write!(
                    f,
                    "route registry inconsistency: {method} {pattern} matched in the trie \
                    but has no registered handler"
                )
            }
            RouterError::Serialization(message) => {
                write!(f, "failed to serialize response body: {message}")
            }
        }
    }
}

impl std::error::Error for RouterError {}

impl From<serde_json::Error> for RouterError {
    fn from(err: serde_json::Error) -> Self {
        RouterError::Serialization(err.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, RouterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_missing_display_names_route() {
        let err = RouterError::HandlerMissing {
            method: Method::GET,
            pattern: "/v1/hello/:name".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("GET"));
        assert!(text.contains("/v1/hello/:name"));
    }

    #[test]
    fn test_serialization_from_serde_error() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = RouterError::from(serde_err);
        assert!(matches!(err, RouterError::Serialization(_)));
        assert!(err.to_string().starts_with("failed to serialize response body"));
    }
}
