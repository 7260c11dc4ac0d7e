use async_trait::async_trait;
use confdrift::error::{Result, WatchError};
use confdrift::watch::{ChangeHandler, DispatchMode, EventSource, WatcherState};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct RecordingHandler {
    calls: Mutex<Vec<PathBuf>>,
}

#[async_trait]
impl ChangeHandler for RecordingHandler {
    async fn handle_change(&self, path: &Path) -> Result<()> {
        self.calls.lock().push(path.to_path_buf());
        Ok(())
    }
}

/// Fails every call the way an unreadable file does.
#[derive(Default)]
struct FailingHandler {
    calls: Mutex<usize>,
}

#[async_trait]
impl ChangeHandler for FailingHandler {
    async fn handle_change(&self, path: &Path) -> Result<()> {
        *self.calls.lock() += 1;
        Err(WatchError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "vanished"),
        })
    }
}

/// Rewrite `file` until the handler has seen it, then stop the source.
async fn watch_until_called(dispatch: DispatchMode) -> (Vec<PathBuf>, PathBuf) {
    let temp = TempDir::new().unwrap();
    let root = dunce::canonicalize(temp.path()).unwrap();
    let file = root.join("test_file.cfg");
    fs::write(&file, ":octopus:").unwrap();

    let source = Arc::new(EventSource::new(vec![root.clone()]).with_dispatch(dispatch));
    let handler = Arc::new(RecordingHandler::default());
    let shutdown = CancellationToken::new();

    let task = {
        let source = Arc::clone(&source);
        let handler: Arc<dyn ChangeHandler> = handler.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move { source.watch(handler, shutdown).await })
    };

    for _ in 0..100 {
        if !handler.calls.lock().is_empty() {
            break;
        }
        fs::write(&file, ":octopus: - :octopus:").unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(source.state(), WatcherState::Stopped);

    let calls = handler.calls.lock().clone();
    (calls, file)
}

#[tokio::test]
async fn write_events_reach_handler_sequentially() {
    let (calls, file) = watch_until_called(DispatchMode::Sequential).await;
    assert!(!calls.is_empty());
    assert!(calls.iter().all(|p| p == &file));
}

#[tokio::test]
async fn write_events_reach_handler_concurrently() {
    let (calls, file) = watch_until_called(DispatchMode::Concurrent).await;
    assert!(!calls.is_empty());
    assert!(calls.iter().all(|p| p == &file));
}

#[tokio::test]
async fn handler_errors_do_not_stop_the_loop() {
    let temp = TempDir::new().unwrap();
    let root = dunce::canonicalize(temp.path()).unwrap();
    let file = root.join("hosts.cfg");
    fs::write(&file, "x=1\n").unwrap();

    let source = Arc::new(EventSource::new(vec![root.clone()]));
    let handler = Arc::new(FailingHandler::default());
    let shutdown = CancellationToken::new();

    let task = {
        let source = Arc::clone(&source);
        let handler: Arc<dyn ChangeHandler> = handler.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move { source.watch(handler, shutdown).await })
    };

    for i in 0..100 {
        if *handler.calls.lock() >= 2 {
            break;
        }
        fs::write(&file, format!("x={}\n", i)).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    shutdown.cancel();
    let result = tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
    assert!(*handler.calls.lock() >= 2);
    assert_eq!(source.state(), WatcherState::Stopped);
}
