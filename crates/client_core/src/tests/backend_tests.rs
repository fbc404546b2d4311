use super::*;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct ServerState {
    status: StatusCode,
    body: Arc<String>,
    received: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
}

async fn record(
    route: &'static str,
    state: ServerState,
    headers: HeaderMap,
    payload: Value,
) -> impl IntoResponse {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state
        .received
        .lock()
        .await
        .push((route.to_string(), content_type, payload));
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.as_str().to_string(),
    )
}

async fn handle_schedule(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    record("/schedule", state, headers, payload).await
}

async fn handle_event(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    record("/event", state, headers, payload).await
}

/// Serves a fixed answer on both routes and records every request.
async fn spawn_scheduling_server(
    status: StatusCode,
    body: impl Into<String>,
) -> (Url, Arc<Mutex<Vec<(String, Option<String>, Value)>>>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = ServerState {
        status,
        body: Arc::new(body.into()),
        received: received.clone(),
    };
    let app = Router::new()
        .route("/schedule", post(handle_schedule))
        .route("/event", post(handle_event))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let url = Url::parse(&format!("http://{addr}/")).expect("server url");
    (url, received)
}

fn sample_request() -> SchedulingRequest {
    SchedulingRequest::parse("2", "1", "15", "3").expect("valid")
}

#[test]
fn routes_replace_any_base_path() {
    let base = Url::parse("http://scheduler.local:5000/ui/index.html").expect("url");
    let backend = HttpSchedulingBackend::new(&base).expect("backend");
    assert_eq!(
        backend.schedule_url().as_str(),
        "http://scheduler.local:5000/schedule"
    );
    assert_eq!(
        backend.event_url().as_str(),
        "http://scheduler.local:5000/event"
    );
}

#[tokio::test]
async fn schedule_request_posts_json_and_decodes_rows() {
    let (url, received) = spawn_scheduling_server(
        StatusCode::OK,
        r#"{"employee_schedule":{"emp_1":["Tue PM"],"emp_0":[["mon","morning"],"Wed AM"]}}"#,
    )
    .await;
    let backend = HttpSchedulingBackend::new(&url).expect("backend");

    let reply = backend
        .request_schedule(&sample_request())
        .await
        .expect("reply");
    let result = match reply {
        ServerReply::Schedule(result) => result,
        other => panic!("expected a schedule, got {other:?}"),
    };
    let rows: Vec<(String, Vec<String>)> = result
        .employee_schedule
        .iter()
        .map(|(key, shifts)| {
            (
                key.to_string(),
                shifts.iter().map(ToString::to_string).collect(),
            )
        })
        .collect();
    assert_eq!(
        rows,
        [
            ("emp_1".to_string(), vec!["Tue PM".to_string()]),
            (
                "emp_0".to_string(),
                vec!["mon,morning".to_string(), "Wed AM".to_string()]
            ),
        ]
    );

    let received = received.lock().await;
    assert_eq!(received.len(), 1);
    let (route, content_type, payload) = &received[0];
    assert_eq!(route, "/schedule");
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(
        payload,
        &json!({
            "num_full_time": 2,
            "num_part_time": 1,
            "min_wage": 15.0,
            "increase_rate": 3.0
        })
    );
}

#[tokio::test]
async fn error_body_with_bad_request_status_is_a_server_reply() {
    let body = json!({ "error": "Invalid input values" }).to_string();
    let (url, _received) = spawn_scheduling_server(StatusCode::BAD_REQUEST, body).await;
    let backend = HttpSchedulingBackend::new(&url).expect("backend");

    let reply = backend
        .request_schedule(&sample_request())
        .await
        .expect("error bodies are replies, not failures");
    assert_eq!(reply, ServerReply::Error("Invalid input values".to_string()));

    let event = EventRequest::new("Alice is out").expect("valid");
    let reply = backend.analyze_event(&event).await.expect("reply");
    assert_eq!(reply, ServerReply::Error("Invalid input values".to_string()));
}

#[tokio::test]
async fn event_request_reads_nested_schedule() {
    let (url, received) = spawn_scheduling_server(
        StatusCode::OK,
        r#"{"schedule":{"employee_schedule":{"emp_0":["Mon AM"]}}}"#,
    )
    .await;
    let backend = HttpSchedulingBackend::new(&url).expect("backend");

    let event = EventRequest::new("Bob swaps with Alice on Monday").expect("valid");
    let reply = backend.analyze_event(&event).await.expect("reply");
    let result = match reply {
        ServerReply::Schedule(result) => result,
        other => panic!("expected a schedule, got {other:?}"),
    };
    assert_eq!(
        result
            .employee_schedule
            .shifts("emp_0")
            .map(|s| s.len()),
        Some(1)
    );

    let received = received.lock().await;
    assert_eq!(received[0].0, "/event");
    assert_eq!(
        received[0].2,
        json!({ "event_description": "Bob swaps with Alice on Monday" })
    );
}

#[tokio::test]
async fn empty_error_field_does_not_mask_schedule() {
    let (url, _received) = spawn_scheduling_server(
        StatusCode::OK,
        r#"{"error":"","employee_schedule":{"emp_0":[]}}"#,
    )
    .await;
    let backend = HttpSchedulingBackend::new(&url).expect("backend");

    let reply = backend
        .request_schedule(&sample_request())
        .await
        .expect("reply");
    assert!(matches!(reply, ServerReply::Schedule(_)), "{reply:?}");
}

#[tokio::test]
async fn non_json_body_is_a_decode_failure() {
    let (url, _received) =
        spawn_scheduling_server(StatusCode::INTERNAL_SERVER_ERROR, "<h1>Internal Server Error</h1>")
            .await;
    let backend = HttpSchedulingBackend::new(&url).expect("backend");

    let err = backend
        .request_schedule(&sample_request())
        .await
        .expect_err("decode failure");
    assert!(
        matches!(err, BackendError::Decode { status: 500, .. }),
        "{err}"
    );
}

#[tokio::test]
async fn body_without_schedule_or_error_is_rejected() {
    let (url, _received) = spawn_scheduling_server(StatusCode::OK, "{}").await;
    let backend = HttpSchedulingBackend::new(&url).expect("backend");

    let event = EventRequest::new("Storm warning").expect("valid");
    let err = backend
        .analyze_event(&event)
        .await
        .expect_err("missing schedule");
    assert!(
        matches!(err, BackendError::MissingSchedule { status: 200, .. }),
        "{err}"
    );
}

#[tokio::test]
async fn unreachable_server_is_an_http_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let url = Url::parse(&format!("http://{addr}/")).expect("url");
    let backend = HttpSchedulingBackend::new(&url).expect("backend");
    let err = backend
        .request_schedule(&sample_request())
        .await
        .expect_err("connection refused");
    assert!(matches!(err, BackendError::Http { .. }), "{err}");
}
