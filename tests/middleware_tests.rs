mod common;
mod tracing_util;

use common::{body_json, body_text, endpoint, entries, get, quiet_engine, trace};
use http::StatusCode;
use segrouter::middleware::{self, MetricsMiddleware};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing_util::TestTracing;

#[test]
fn test_recovery_turns_panic_into_500() {
    let calls = trace();
    let mut engine = quiet_engine();
    engine.use_middleware(middleware::recovery());
    engine.get("/boom", |_ctx| panic!("handler exploded"));
    engine.get("/fine", endpoint(&calls, "fine"));

    let response = engine.serve(get("/boom")).unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(&response),
        serde_json::json!({ "message": "Internal Server Error" })
    );

    // the engine keeps serving after a recovered panic
    let response = engine.serve(get("/fine")).unwrap();
    assert_eq!(body_text(&response), "fine");
    assert_eq!(entries(&calls), vec!["fine"]);
}

#[test]
fn test_recovery_logs_panic_payload() {
    let tracing = TestTracing::init();
    let mut engine = quiet_engine();
    engine.use_middleware(middleware::recovery());
    engine.get("/boom", |_ctx| panic!("disk on fire"));

    engine.serve(get("/boom")).unwrap();
    let logs = tracing.logs.contents();
    assert!(logs.contains("Handler panicked"));
    assert!(logs.contains("disk on fire"));
}

#[test]
fn test_panic_without_recovery_unwinds_out_of_engine() {
    let mut engine = quiet_engine();
    engine.get("/boom", |_ctx| panic!("unguarded"));

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| engine.serve(get("/boom"))));
    assert!(outcome.is_err());
}

#[test]
fn test_logger_reports_final_status() {
    let tracing = TestTracing::init();
    let calls = trace();
    let mut engine = quiet_engine();
    engine.use_middleware(middleware::logger());
    engine.get("/teapot", |ctx| ctx.string(StatusCode::IM_A_TEAPOT, "short and stout"));
    engine.get("/ok", endpoint(&calls, "ok"));

    engine.serve(get("/teapot")).unwrap();
    let logs = tracing.logs.contents();
    assert!(logs.contains("Request completed"));
    assert!(logs.contains("status=418"));
    assert!(logs.contains("path=/teapot"));
}

#[test]
fn test_metrics_count_routed_requests_only() {
    let metrics = Arc::new(MetricsMiddleware::new());
    let calls = trace();
    let mut engine = quiet_engine();
    engine.use_middleware(metrics.handler());
    engine.get("/ok", endpoint(&calls, "ok"));
    engine.get("/gone", |ctx| ctx.string(StatusCode::GONE, "gone"));

    engine.serve(get("/ok")).unwrap();
    engine.serve(get("/gone")).unwrap();
    engine.serve(get("/not-registered")).unwrap();

    assert_eq!(metrics.request_count(), 2);
    assert_eq!(metrics.client_errors(), 1);
    assert_eq!(metrics.server_errors(), 0);
    assert!(metrics
        .render_prometheus()
        .contains("segrouter_requests_total 2\n"));
}

#[test]
fn test_metrics_see_recovered_panics_as_server_errors() {
    let metrics = Arc::new(MetricsMiddleware::new());
    let mut engine = quiet_engine();
    engine
        .use_middleware(metrics.handler())
        .use_middleware(middleware::recovery());
    engine.get("/boom", |_ctx| panic!("boom"));

    let response = engine.serve(get("/boom")).unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(metrics.request_count(), 1);
    assert_eq!(metrics.server_errors(), 1);
}
