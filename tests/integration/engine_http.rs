use confdrift::baseline::BaselineStore;
use confdrift::diff::apply_diff;
use confdrift::engine::{ChangeOutcome, DifferentialEngine, EngineConfig};
use confdrift::error::WatchError;
use confdrift::extensions::AllowedExtensions;
use confdrift::transmit::{HttpTransmitter, TOKEN_HEADER};
use confdrift::types::ChangeRecord;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn collector(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header(TOKEN_HEADER, "2137"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

fn engine_for(server: &MockServer) -> DifferentialEngine {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    DifferentialEngine::new(
        Arc::new(AllowedExtensions::new([".cfg"])),
        Arc::new(BaselineStore::new()),
        Arc::new(HttpTransmitter::new(client, server.uri(), "2137")),
        EngineConfig::default(),
    )
}

async fn received_changes(server: &MockServer) -> Vec<ChangeRecord> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

#[tokio::test]
async fn rewritten_file_is_posted_once() {
    let server = collector(200).await;
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("a.cfg");
    fs::write(&path, "x=1").unwrap();

    let engine = engine_for(&server);
    engine.baseline().seed(&[path.clone()], 100 * 1024).unwrap();

    fs::write(&path, "x=2").unwrap();
    assert!(matches!(
        engine.process(&path).await.unwrap(),
        ChangeOutcome::Sent(_)
    ));
    assert_eq!(
        engine.process(&path).await.unwrap(),
        ChangeOutcome::Unchanged
    );

    let changes = received_changes(&server).await;
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].name, "a.cfg");
    assert!(changes[0].diff.contains("-x=1"));
    assert!(changes[0].diff.contains("+x=2"));
}

#[tokio::test]
async fn server_error_still_advances_baseline() {
    let server = collector(500).await;
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("a.cfg");
    fs::write(&path, "x=1").unwrap();

    let engine = engine_for(&server);
    engine.baseline().seed(&[path.clone()], 100 * 1024).unwrap();

    fs::write(&path, "x=2").unwrap();
    let err = engine.process(&path).await.unwrap_err();

    assert!(matches!(err, WatchError::Status(500)));
    assert_eq!(engine.baseline().get(&path).unwrap().snapshot, b"x=2");
    assert_eq!(received_changes(&server).await.len(), 1);
}

#[tokio::test]
async fn posted_diff_applies_to_previous_content() {
    let server = collector(200).await;
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("hosts.cfg");
    fs::write(&path, "A\nB\n").unwrap();

    let engine = engine_for(&server);
    engine.baseline().seed(&[path.clone()], 100 * 1024).unwrap();

    fs::write(&path, "A\nC\n").unwrap();
    engine.process(&path).await.unwrap();

    let changes = received_changes(&server).await;
    let patched = apply_diff(b"A\nB\n", &changes[0].diff).unwrap();
    assert_eq!(patched, b"A\nC\n".to_vec());
}
