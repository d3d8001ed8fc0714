//! Dispatcher core module - the engine and the per-request hot path.

use http::{Method, Request, Response, StatusCode};
use std::sync::Arc;
use tracing::{debug, error};

use super::group::{Group, GroupId, RouterGroup};
use crate::context::{Context, HandlerFunc};
use crate::error::Result;
use crate::router::Router;
use crate::runtime_config::RuntimeConfig;
use crate::server::{BufferedResponse, ResponseSink};

/// Owns the route registry and the group tree, and dispatches requests.
///
/// Build it up with the registration methods (which take `&mut self`), then
/// share it by reference or `Arc` across request threads; dispatching only
/// needs `&self` and takes no locks.
pub struct Engine {
    router: Router,
    groups: Vec<RouterGroup>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine holding only the root group (prefix `""`)
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::from_env())
    }

    #[must_use]
    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            router: Router::with_config(&config),
            groups: vec![RouterGroup::new(String::new(), None)],
        }
    }

    // ------------------------------------------------------------------
    // registration
    // ------------------------------------------------------------------

    /// Create a top-level group
    pub fn group(&mut self, prefix: &str) -> Group<'_> {
        let id = self.create_group(GroupId::ROOT, prefix);
        Group::new(self, id)
    }

    /// Handle on the root group
    pub fn root(&mut self) -> Group<'_> {
        Group::new(self, GroupId::ROOT)
    }

    /// Re-open a group created earlier; `None` if `id` is not from this engine
    pub fn group_mut(&mut self, id: GroupId) -> Option<Group<'_>> {
        if id.0 < self.groups.len() {
            Some(Group::new(self, id))
        } else {
            None
        }
    }

    /// Attach middleware to the root group, which covers every path
    pub fn use_middleware<F>(&mut self, middleware: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.root().use_middleware(middleware);
        self
    }

    pub fn add_route<F>(&mut self, method: Method, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.root().add_route(method, pattern, handler);
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

    pub(crate) fn create_group(&mut self, parent: GroupId, prefix: &str) -> GroupId {
        let full = format!("{}{}", self.group_prefix(parent), prefix);
        let id = GroupId(self.groups.len());
        debug!(prefix = %full, parent = parent.0, id = id.0, "Group created");
        self.groups.push(RouterGroup::new(full, Some(parent)));
        id
    }

    pub(crate) fn group_prefix(&self, id: GroupId) -> &str {
        self.groups.get(id.0).map_or("", RouterGroup::prefix)
    }

    pub(crate) fn attach_middleware(&mut self, id: GroupId, middleware: HandlerFunc) {
        if let Some(group) = self.groups.get_mut(id.0) {
            group.push_middleware(middleware);
        }
    }

    pub(crate) fn register(&mut self, method: Method, pattern: &str, handler: HandlerFunc) {
        self.router.add_route(method, pattern, handler);
    }

    #[cfg(test)]
    pub(crate) fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    // ------------------------------------------------------------------
    // inspection
    // ------------------------------------------------------------------

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Every group in creation order, root first
    #[must_use]
    pub fn groups(&self) -> &[RouterGroup] {
        &self.groups
    }

    /// Middleware that applies to `path`: each covering group's own
    /// middleware, concatenated in group creation order.
    #[must_use]
    pub fn middleware_for(&self, path: &str) -> Vec<HandlerFunc> {
        self.groups
            .iter()
            .filter(|group| group.covers(path))
            .flat_map(|group| group.middlewares().iter().map(Arc::clone))
            .collect()
    }

    // ------------------------------------------------------------------
    // dispatch
    // ------------------------------------------------------------------

    /// Dispatch one request, writing the response to `writer`.
    ///
    /// Unmatched requests get a plain-text `404` and run no middleware. For a
    /// match, the chain is the covering groups' middleware followed by the
    /// route handler, driven from a fresh [`Context`].
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::HandlerMissing`](crate::RouterError::HandlerMissing)
    /// if the trie matched a pattern with no registered handler. Nothing is
    /// written to `writer` in that case.
    pub fn handle(
        &self,
        request: &Request<Vec<u8>>,
        writer: &mut dyn ResponseSink,
    ) -> Result<()> {
        let method = request.method();
        let mut ctx = Context::new(request, writer);

        let Some(route) = self.router.resolve(method, ctx.path()) else {
            let body = format!("404 NOT FOUND: {}\n", ctx.path());
            ctx.string(StatusCode::NOT_FOUND, &body);
            return Ok(());
        };

        let handler = self
            .router
            .handler_for(method, &route.pattern)
            .inspect_err(|err| {
                error!(
                    method = %method,
                    path = %ctx.path(),
                    pattern = %route.pattern,
                    error = %err,
                    "Matched route has no handler"
                );
            })?;

        let middlewares = self.middleware_for(ctx.path());
        debug!(
            method = %method,
            path = %ctx.path(),
            pattern = %route.pattern,
            middlewares = middlewares.len(),
            "Dispatching request"
        );

        ctx.set_params(route.params);
        ctx.extend_handlers(middlewares);
        ctx.extend_handlers(std::iter::once(handler));
        ctx.next();
        Ok(())
    }

    /// Dispatch into a [`BufferedResponse`] and return the finished response.
    ///
    /// # Errors
    ///
    /// Same as [`Engine::handle`].
    pub fn serve(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        let mut response = BufferedResponse::new();
        self.handle(&request, &mut response)?;
        Ok(response.into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouterError;

    fn quiet() -> Engine {
        Engine::with_config(RuntimeConfig { log_routes: false })
    }

    fn noop(_ctx: &mut Context<'_>) {}

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }

    #[test]
    fn test_root_group_exists() {
        let engine = quiet();
        assert_eq!(engine.groups().len(), 1);
        assert_eq!(engine.groups()[0].prefix(), "");
        assert_eq!(engine.groups()[0].parent(), None);
    }

    #[test]
    fn test_nested_prefix_is_folded_in() {
        let mut engine = quiet();
        let (v1, v2) = {
            let mut v1 = engine.group("/api");
            let v2 = v1.group("/v2").id();
            (v1.id(), v2)
        };
        assert_eq!(engine.groups()[v1.index()].prefix(), "/api");
        assert_eq!(engine.groups()[v2.index()].prefix(), "/api/v2");
        assert_eq!(engine.groups()[v2.index()].parent(), Some(v1));
    }

    #[test]
    fn test_group_routes_carry_prefix() {
        let mut engine = quiet();
        engine.group("/v1").get("/users/:id", noop);
        let routes = engine.router().routes();
        assert_eq!(routes, vec![(Method::GET, "/v1/users/:id".to_string())]);
    }

    #[test]
    fn test_middleware_for_uses_creation_order() {
        let mut engine = quiet();
        engine.use_middleware(noop);
        engine.group("/v1").use_middleware(noop).use_middleware(noop);
        engine.group("/v2").use_middleware(noop);

        assert_eq!(engine.middleware_for("/v1/x").len(), 3);
        assert_eq!(engine.middleware_for("/v2/x").len(), 2);
        assert_eq!(engine.middleware_for("/other").len(), 1);
    }

    #[test]
    fn test_trie_match_without_handler_is_an_error() {
        let mut engine = quiet();
        engine.use_middleware(|ctx: &mut Context<'_>| ctx.string(StatusCode::OK, "ran"));
        engine.router_mut().insert_pattern_only(Method::GET, "/orphan/:id");

        let request = Request::get("/orphan/7").body(Vec::new()).unwrap();
        let mut sink = BufferedResponse::new();
        let err = engine.handle(&request, &mut sink).unwrap_err();

        assert_eq!(
            err,
            RouterError::HandlerMissing {
                method: Method::GET,
                pattern: "/orphan/:id".to_string(),
            }
        );
        assert_eq!(sink.status(), None);
        assert!(sink.body().is_empty());
    }

    #[test]
    fn test_group_mut_reopens_group() {
        let mut engine = quiet();
        let id = engine.group("/admin").id();
        engine.group_mut(id).unwrap().use_middleware(noop);
        assert_eq!(engine.groups()[id.index()].middlewares().len(), 1);
        assert!(engine.group_mut(GroupId(42)).is_none());
    }
}
