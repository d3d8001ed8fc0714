//! Router core module - route registry and the resolve hot path.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]

use http::Method;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::trie::{bind_params, parse_pattern, TrieNode};
use crate::context::HandlerFunc;
use crate::error::{Result, RouterError};
use crate::runtime_config::RuntimeConfig;

/// Maximum number of path parameters before heap allocation.
/// Most routes have ≤4 parameters (e.g., `/users/:id/posts/:post_id`).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Path parameters bound during route resolution.
///
/// Stored as an ordered list of `(name, value)` pairs in pattern order, kept
/// inline for up to [`MAX_INLINE_PARAMS`] entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    inner: SmallVec<[(String, String); MAX_INLINE_PARAMS]>,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, name: &str, value: impl Into<String>) {
        self.inner.push((name.to_string(), value.into()));
    }

    /// Get a parameter by name
    ///
    /// Uses "last write wins" semantics: if a pattern repeats a parameter
    /// name (e.g., `/org/:id/user/:id`), returns the last occurrence.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .rfind(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Convert to a `HashMap`
    /// Note: This allocates - use get() in hot paths instead
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, String> {
        self.inner.iter().cloned().collect()
    }
}

/// Result of successfully matching a request path to a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Generalized pattern of the matched route (e.g., `/p/:lang/doc`)
    pub pattern: String,
    /// Parameters bound from the request path (e.g., `{"lang": "go"}`)
    pub params: Params,
}

/// Route registry: one segment trie per HTTP method plus the handler table.
///
/// Routes are registered once at startup; afterwards the registry is only
/// read, so it can be shared across request threads without locking.
/// Adding routes while serving requires the caller to wrap the registry in a
/// lock of its own.
pub struct Router {
    /// Trie root per method; trees never share nodes
    trees: HashMap<Method, TrieNode>,
    /// Handler per (method, generalized pattern)
    handlers: HashMap<Method, HashMap<String, HandlerFunc>>,
    log_routes: bool,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Create an empty registry with the default runtime configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&RuntimeConfig::default())
    }

    #[must_use]
    pub fn with_config(config: &RuntimeConfig) -> Self {
        Self {
            trees: HashMap::new(),
            handlers: HashMap::new(),
            log_routes: config.log_routes,
        }
    }

    /// Register `handler` for `method` and `pattern`.
    ///
    /// Re-registering the same (method, pattern) replaces the previous handler.
    pub fn add_route(&mut self, method: Method, pattern: &str, handler: HandlerFunc) {
        let parts = parse_pattern(pattern);
        self.trees
            .entry(method.clone())
            .or_default()
            .insert(pattern, &parts, 0);

        if self.log_routes {
            info!(method = %method, pattern = %pattern, "Route registered");
        }

        let replaced = self
            .handlers
            .entry(method.clone())
            .or_default()
            .insert(pattern.to_string(), handler)
            .is_some();
        if replaced {
            warn!(
                method = %method,
                pattern = %pattern,
                "Replaced existing route handler"
            );
        }
    }

    /// Insert a pattern into the trie without registering a handler
    #[cfg(test)]
    pub(crate) fn insert_pattern_only(&mut self, method: Method, pattern: &str) {
        let parts = parse_pattern(pattern);
        self.trees.entry(method).or_default().insert(pattern, &parts, 0);
    }

    /// Match a request path against the tree for `method`.
    ///
    /// Returns `None` when the method has no tree or no node matches. A match
    /// on a route without placeholders carries empty [`Params`].
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        let parts = parse_pattern(path);
        let root = self.trees.get(method)?;
        let pattern = root.search(&parts, 0)?.pattern()?;

        debug!(method = %method, path = %path, pattern = %pattern, "Route matched");

        Some(RouteMatch {
            pattern: pattern.to_string(),
            params: bind_params(pattern, &parts),
        })
    }

    /// Look up the handler registered under an exact generalized pattern.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::HandlerMissing`] if nothing is registered under
    /// the key. For a pattern returned by [`Router::resolve`] this indicates
    /// that the registry's invariants have been broken.
    pub fn handler_for(&self, method: &Method, pattern: &str) -> Result<HandlerFunc> {
        self.handlers
            .get(method)
            .and_then(|by_pattern| by_pattern.get(pattern))
            .map(Arc::clone)
            .ok_or_else(|| RouterError::HandlerMissing {
                method: method.clone(),
                pattern: pattern.to_string(),
            })
    }

    /// Registered (method, pattern) keys, sorted by method then pattern
    #[must_use]
    pub fn routes(&self) -> Vec<(Method, String)> {
        let mut routes: Vec<(Method, String)> = self
            .handlers
            .iter()
            .flat_map(|(method, by_pattern)| {
                by_pattern
                    .keys()
                    .map(move |pattern| (method.clone(), pattern.clone()))
            })
            .collect();
        routes.sort_by(|a, b| (a.0.as_str(), &a.1).cmp(&(b.0.as_str(), &b.1)));
        routes
    }

    /// Number of registered (method, pattern) keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.values().map(HashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Emit every registered route as a tracing event.
    ///
    /// Useful for verifying that routes are loaded correctly.
    pub fn dump_routes(&self) {
        let routes = self.routes();
        info!(routes_count = routes.len(), "Routing table");
        for (method, pattern) in routes {
            info!(method = %method, pattern = %pattern, "Route");
        }
    }
}
