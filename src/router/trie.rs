//! Segment trie for route matching
//!
//! Each HTTP method owns one tree. A node stands for one slash-delimited
//! segment of a registered pattern and is either:
//! - **literal** (`users`) - matched by exact string equality
//! - **parameter** (`:id`) - matches any single segment
//! - **wildcard** (`*filepath`) - matches and consumes every remaining segment
//!
//! Siblings are kept in insertion order and there is no specificity ranking:
//! when more than one child can match a segment, the one registered first is
//! tried first, and search backtracks into the next candidate on failure.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut root = TrieNode::default();
//! let parts = parse_pattern("/p/:lang/doc");
//! root.insert("/p/:lang/doc", &parts, 0);
//!
//! let path = parse_pattern("/p/go/doc");
//! let node = root.search(&path, 0).unwrap();
//! assert_eq!(node.pattern(), Some("/p/:lang/doc"));
//! ```

use super::core::Params;

/// Split a route pattern or request path into segments.
///
/// Empty segments are dropped, so leading, trailing and repeated slashes
/// normalize away: `"///a//b/"` and `"a/b"` both yield `["a", "b"]`.
/// Parsing stops after the first segment starting with `*`.
#[must_use]
pub fn parse_pattern(pattern: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    for part in pattern.split('/').filter(|part| !part.is_empty()) {
        parts.push(part);
        if part.starts_with('*') {
            break;
        }
    }
    parts
}

/// Node in a per-method segment trie
#[derive(Debug, Clone, Default)]
pub(crate) struct TrieNode {
    /// Full pattern terminating at this node; `None` if this is not a route endpoint
    pattern: Option<String>,
    /// Literal text of this segment, or the raw `:name` / `*name` placeholder
    segment: String,
    /// Children in insertion order
    children: Vec<TrieNode>,
    /// False for parameter and wildcard segments
    is_literal: bool,
}

impl TrieNode {
    fn new(segment: &str) -> Self {
        Self {
            pattern: None,
            segment: segment.to_string(),
            children: Vec::new(),
            is_literal: !segment.starts_with(':') && !segment.starts_with('*'),
        }
    }

    /// Pattern recorded on this node, if it terminates a route
    pub(crate) fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    fn is_wildcard(&self) -> bool {
        self.segment.starts_with('*')
    }

    /// Non-literal children accept any segment value.
    fn matches(&self, part: &str) -> bool {
        !self.is_literal || self.segment == part
    }

    /// Insert `pattern`, whose parsed segments are `parts`, below this node.
    ///
    /// The first child that matches the segment is reused - including a
    /// parameter child for a literal segment - otherwise a new child is
    /// appended. Re-inserting a pattern overwrites the terminal record.
    pub(crate) fn insert(&mut self, pattern: &str, parts: &[&str], depth: usize) {
        let Some(part) = parts.get(depth) else {
            self.pattern = Some(pattern.to_string());
            return;
        };

        let index = match self.children.iter().position(|child| child.matches(part)) {
            Some(index) => index,
            None => {
                self.children.push(TrieNode::new(part));
                self.children.len() - 1
            }
        };
        self.children[index].insert(pattern, parts, depth + 1);
    }

    /// Depth-first search with backtracking; the first successful child wins.
    ///
    /// Matching terminates at a node once the input is exhausted or the node
    /// is a wildcard, and succeeds only if that node records a pattern.
    pub(crate) fn search(&self, parts: &[&str], depth: usize) -> Option<&TrieNode> {
        if depth == parts.len() || self.is_wildcard() {
            return self.pattern.as_ref().map(|_| self);
        }

        let part = parts[depth];
        self.children
            .iter()
            .filter(|child| child.matches(part))
            .find_map(|child| child.search(parts, depth + 1))
    }
}

/// Bind path parameters by lining up a matched pattern with the request segments.
///
/// `:name` binds the segment at the same position. `*name` binds the rest of
/// the path rejoined with `/` and ends binding; a bare `*` binds nothing.
pub(crate) fn bind_params(pattern: &str, parts: &[&str]) -> Params {
    let mut params = Params::new();
    for (index, segment) in parse_pattern(pattern).into_iter().enumerate() {
        if let Some(name) = segment.strip_prefix(':') {
            if let Some(value) = parts.get(index) {
                params.push(name, *value);
            }
        } else if let Some(name) = segment.strip_prefix('*') {
            if !name.is_empty() {
                let rest = parts.get(index..).unwrap_or_default();
                params.push(name, rest.join("/"));
            }
            break;
        }
    }
    params
}
