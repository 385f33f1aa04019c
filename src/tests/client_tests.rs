use super::*;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Router,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Captured {
    calls: Arc<AtomicUsize>,
    fields: Arc<Mutex<Vec<(String, Option<String>, usize)>>>,
}

async fn spawn_server(status: StatusCode, body: &'static str) -> (String, Captured) {
    let captured = Captured::default();
    let handler = move |State(captured): State<Captured>, mut multipart: Multipart| async move {
        captured.calls.fetch_add(1, Ordering::SeqCst);
        while let Some(field) = multipart.next_field().await.expect("field") {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let data = field.bytes().await.expect("bytes");
            captured
                .fields
                .lock()
                .expect("lock")
                .push((name, file_name, data.len()));
        }
        (status, body).into_response()
    };
    let app = Router::new()
        .route("/detect", post(handler))
        .with_state(captured.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (format!("http://{addr}"), captured)
}

fn cat_file() -> SelectedFile {
    SelectedFile::new("cat.png", b"\x89PNG\r\n\x1a\nrest-of-file".to_vec())
}

#[tokio::test]
async fn posts_image_field_and_parses_predictions() {
    let (base, captured) = spawn_server(
        StatusCode::OK,
        r#"{"predictions":[{"label":"cat","confidence":97.345},{"label":"lynx","confidence":1.2}]}"#,
    )
    .await;
    let client = HttpDetectClient::new(&base).expect("client");

    let predictions = client.detect(&cat_file()).await.expect("predictions");

    assert_eq!(predictions.len(), 2);
    assert_eq!(predictions[0].label, "cat");
    assert_eq!(predictions[1].label, "lynx");
    assert_eq!(captured.calls.load(Ordering::SeqCst), 1);
    let fields = captured.fields.lock().expect("lock").clone();
    assert_eq!(
        fields,
        vec![("image".to_string(), Some("cat.png".to_string()), cat_file().bytes.len())]
    );
}

#[tokio::test]
async fn server_error_message_is_passed_through() {
    let (base, _) = spawn_server(StatusCode::BAD_REQUEST, r#"{"error":"bad image"}"#).await;
    let client = HttpDetectClient::new(&base).expect("client");

    let err = client.detect(&cat_file()).await.expect_err("error");
    assert_eq!(err, UploadError::Request("bad image".to_string()));
}

#[tokio::test]
async fn server_error_without_message_uses_fallback() {
    let (base, _) = spawn_server(StatusCode::INTERNAL_SERVER_ERROR, "{}").await;
    let client = HttpDetectClient::new(&base).expect("client");

    let err = client.detect(&cat_file()).await.expect_err("error");
    assert_eq!(err, UploadError::Request(PROCESSING_FALLBACK.to_string()));
}

#[tokio::test]
async fn ok_without_predictions_is_an_error() {
    let (base, _) = spawn_server(StatusCode::OK, r#"{"status":"done"}"#).await;
    let client = HttpDetectClient::new(&base).expect("client");

    let err = client.detect(&cat_file()).await.expect_err("error");
    assert_eq!(err, UploadError::Request(PROCESSING_FALLBACK.to_string()));
}

#[tokio::test]
async fn malformed_json_reports_parse_failure() {
    let (base, _) = spawn_server(StatusCode::OK, "<html>oops</html>").await;
    let client = HttpDetectClient::new(&base).expect("client");

    match client.detect(&cat_file()).await {
        Err(UploadError::Request(message)) => {
            assert!(!message.is_empty());
            assert_ne!(message, PROCESSING_FALLBACK);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_reports_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = HttpDetectClient::new(&format!("http://{addr}")).expect("client");
    match client.detect(&cat_file()).await {
        Err(UploadError::Request(message)) => assert!(!message.is_empty()),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn endpoint_is_rooted_at_detect() {
    let client = HttpDetectClient::new("http://localhost:5000/app/").expect("client");
    assert_eq!(client.endpoint().as_str(), "http://localhost:5000/detect");
}

#[test]
fn interpret_prefers_server_message() {
    let response = DetectResponse {
        predictions: None,
        error: Some("No image provided".to_string()),
    };
    assert_eq!(
        interpret(false, response),
        Err(UploadError::Request("No image provided".to_string()))
    );
}
