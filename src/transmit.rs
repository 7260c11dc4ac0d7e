//! Diff Transmitter
//!
//! Delivers change records to the remote collector. One attempt per change;
//! callers decide what a failure means.

use crate::error::{Result, WatchError};
use crate::types::ChangeRecord;
use async_trait::async_trait;
use tracing::debug;

/// Header carrying the shared plugin token.
pub const TOKEN_HEADER: &str = "X-Plugin-Token";

/// Sink for detected changes.
#[async_trait]
pub trait DiffTransmitter: Send + Sync {
    async fn send(&self, change: &ChangeRecord) -> Result<()>;
}

/// Posts change records as JSON to an HTTP endpoint.
pub struct HttpTransmitter {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl HttpTransmitter {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DiffTransmitter for HttpTransmitter {
    async fn send(&self, change: &ChangeRecord) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(TOKEN_HEADER, &self.token)
            .json(change)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WatchError::Status(status.as_u16()));
        }
        // Drain the body so the connection can be reused.
        response.bytes().await?;

        debug!(name = %change.name, status = status.as_u16(), "Change delivered");
        Ok(())
    }
}
