#![allow(dead_code)]

//! Shared helpers for the integration tests.

use http::header::CONTENT_TYPE;
use http::{Method, Request, Response, StatusCode};
use segrouter::runtime_config::RuntimeConfig;
use segrouter::{Context, Engine};
use std::sync::{Arc, Mutex};

/// Names of handlers in the order they ran
pub type Trace = Arc<Mutex<Vec<&'static str>>>;

pub fn trace() -> Trace {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(trace: &Trace) -> Vec<&'static str> {
    trace.lock().unwrap().clone()
}

/// Engine that does not log each registration
pub fn quiet_engine() -> Engine {
    Engine::with_config(RuntimeConfig { log_routes: false })
}

pub fn request(method: Method, uri: &str) -> Request<Vec<u8>> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Vec::new())
        .unwrap()
}

pub fn get(uri: &str) -> Request<Vec<u8>> {
    request(Method::GET, uri)
}

pub fn form_post(uri: &str, body: &str) -> Request<Vec<u8>> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.as_bytes().to_vec())
        .unwrap()
}

/// Middleware that records `name` and lets the loop continue
pub fn recorder(trace: &Trace, name: &'static str) -> impl Fn(&mut Context<'_>) + Send + Sync + 'static {
    let trace = Arc::clone(trace);
    move |_ctx: &mut Context<'_>| trace.lock().unwrap().push(name)
}

/// Route handler that records `name` and answers `200` with it as the body
pub fn endpoint(trace: &Trace, name: &'static str) -> impl Fn(&mut Context<'_>) + Send + Sync + 'static {
    let trace = Arc::clone(trace);
    move |ctx: &mut Context<'_>| {
        trace.lock().unwrap().push(name);
        ctx.string(StatusCode::OK, name);
    }
}

pub fn body_text(response: &Response<Vec<u8>>) -> String {
    String::from_utf8_lossy(response.body()).into_owned()
}

pub fn body_json(response: &Response<Vec<u8>>) -> serde_json::Value {
    serde_json::from_slice(response.body()).unwrap()
}

pub fn content_type(response: &Response<Vec<u8>>) -> Option<&str> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
}
