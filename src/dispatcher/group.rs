//! Route groups: prefix-scoped middleware and registration handles.

use http::Method;
use std::sync::Arc;

use super::core::Engine;
use crate::context::{Context, HandlerFunc};

/// Index of a group within its [`Engine`].
///
/// Ids are handed out in creation order; the root group is always
/// [`GroupId::ROOT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub(crate) usize);

impl GroupId {
    pub const ROOT: GroupId = GroupId(0);

    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node in the group tree.
///
/// `prefix` is the full prefix, with every ancestor's prefix already folded
/// in when the group was created.
pub struct RouterGroup {
    prefix: String,
    middlewares: Vec<HandlerFunc>,
    parent: Option<GroupId>,
}

impl RouterGroup {
    pub(crate) fn new(prefix: String, parent: Option<GroupId>) -> Self {
        Self {
            prefix,
            middlewares: Vec::new(),
            parent,
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `None` only for the root group
    #[must_use]
    pub fn parent(&self) -> Option<GroupId> {
        self.parent
    }

    /// Middleware attached directly to this group, in attach order
    #[must_use]
    pub fn middlewares(&self) -> &[HandlerFunc] {
        &self.middlewares
    }

    pub(crate) fn push_middleware(&mut self, middleware: HandlerFunc) {
        self.middlewares.push(middleware);
    }

    /// Whether requests to `path` pick up this group's middleware
    #[must_use]
    pub fn covers(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

impl std::fmt::Debug for RouterGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterGroup")
            .field("prefix", &self.prefix)
            .field("middlewares", &self.middlewares.len())
            .field("parent", &self.parent)
            .finish()
    }
}

/// Registration handle for one group of an [`Engine`].
///
/// Borrowing the engine mutably keeps registration strictly before serving:
/// no request can be dispatched while a `Group` is alive.
///
/// ```rust
/// use http::StatusCode;
/// use segrouter::Engine;
///
/// let mut engine = Engine::new();
/// let mut v1 = engine.group("/v1");
/// v1.use_middleware(|ctx| ctx.next());
/// v1.get("/hello", |ctx| ctx.string(StatusCode::OK, "hi"));
/// assert_eq!(v1.prefix(), "/v1");
/// ```
pub struct Group<'e> {
    engine: &'e mut Engine,
    id: GroupId,
}

impl<'e> Group<'e> {
    pub(crate) fn new(engine: &'e mut Engine, id: GroupId) -> Self {
        Self { engine, id }
    }

    #[must_use]
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Full prefix of this group
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.engine.group_prefix(self.id)
    }

    /// Create a child group whose prefix is this group's prefix followed by
    /// `prefix`.
    pub fn group(&mut self, prefix: &str) -> Group<'_> {
        let id = self.engine.create_group(self.id, prefix);
        Group {
            engine: &mut *self.engine,
            id,
        }
    }

    /// Attach middleware to this group.
    ///
    /// It runs for every request whose path starts with the group prefix,
    /// after the middleware of groups created earlier.
    pub fn use_middleware<F>(&mut self, middleware: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.engine.attach_middleware(self.id, Arc::new(middleware));
        self
    }

    /// Register `handler` for `method` at the group prefix followed by
    /// `pattern`.
    pub fn add_route<F>(&mut self, method: Method, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        let full = format!("{}{}", self.prefix(), pattern);
        self.engine.register(method, &full, Arc::new(handler));
        self
    }

    pub fn get<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::GET, pattern, handler)
    }

    pub fn post<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::POST, pattern, handler)
    }

    pub fn put<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::PUT, pattern, handler)
    }

    pub fn delete<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::DELETE, pattern, handler)
    }

    pub fn patch<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::PATCH, pattern, handler)
    }

    pub fn head<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::HEAD, pattern, handler)
    }

    pub fn options<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::OPTIONS, pattern, handler)
    }
}
