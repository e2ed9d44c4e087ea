//! Failure logging. Kept in its own test binary because it installs a
//! thread-local subscriber.

mod common;

use axum::http::StatusCode;
use common::{app_with, post_json};
use relay_service::services::providers::mock::MockBehavior;
use serde_json::json;
use std::io;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn internal_error_is_logged_before_response() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let (app, _) = app_with(MockBehavior::Fail("socket closed".to_string()));
    let (status, body) = post_json(app, json!({ "message": "hi" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "API error: socket closed");

    let output = logs.contents();
    assert!(output.contains("ERROR"), "no error line in: {output}");
    assert!(output.contains("Error during AI processing"));
    assert!(output.contains("API error: socket closed"));
}
