//! Overlay retrieval
//!
//! Each overlay is fetched as its own tokio task. Results come back to the
//! UI thread as [`Command::LayerSettled`] over an unbounded channel, in
//! whatever order they finish.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use eudr_core::{Command, OverlayLayer, OverlayRequest};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::DataError;

/// Anything that can turn an overlay location into a layer
#[async_trait]
pub trait OverlaySource: Send + Sync {
    async fn fetch(&self, source: &str) -> Result<OverlayLayer, DataError>;
}

/// Where an overlay document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Remote(String),
    File(PathBuf),
}

/// HTTP(S) via reqwest, everything else from disk
pub struct OverlayFetcher {
    client: reqwest::Client,
    base_dir: PathBuf,
}

impl OverlayFetcher {
    pub fn new(base_dir: impl Into<PathBuf>, timeout: Option<Duration>) -> Result<Self, DataError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_dir: base_dir.into(),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Relative paths resolve against the base directory
    pub fn resolve(&self, source: &str) -> SourceLocation {
        let source = source.trim();
        let lower = source.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return SourceLocation::Remote(source.to_string());
        }

        let path = Path::new(source);
        if path.is_absolute() {
            SourceLocation::File(path.to_path_buf())
        } else {
            SourceLocation::File(self.base_dir.join(path))
        }
    }
}

#[async_trait]
impl OverlaySource for OverlayFetcher {
    async fn fetch(&self, source: &str) -> Result<OverlayLayer, DataError> {
        let text = match self.resolve(source) {
            SourceLocation::Remote(url) => {
                debug!("Fetching overlay {}", url);
                let response = self.client.get(&url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(DataError::Status(status.as_u16()));
                }
                response.text().await?
            }
            SourceLocation::File(path) => {
                debug!("Reading overlay {:?}", path);
                tokio::fs::read_to_string(&path).await?
            }
        };

        Ok(OverlayLayer::parse(&text)?)
    }
}

/// Run one request to completion and wrap the outcome for dispatch
pub async fn retrieve(source: &dyn OverlaySource, request: OverlayRequest) -> Command {
    let result = source.fetch(&request.source).await.map_err(|e| e.to_string());
    Command::LayerSettled {
        cycle: request.cycle,
        id: request.id,
        result,
    }
}

/// Fire every request as an independent task.
///
/// `wake` runs after each result is queued so the UI can repaint.
pub fn spawn_retrievals(
    handle: &Handle,
    source: Arc<dyn OverlaySource>,
    requests: Vec<OverlayRequest>,
    sender: UnboundedSender<Command>,
    wake: Arc<dyn Fn() + Send + Sync>,
) {
    for request in requests {
        let source = Arc::clone(&source);
        let sender = sender.clone();
        let wake = Arc::clone(&wake);

        handle.spawn(async move {
            let command = retrieve(source.as_ref(), request).await;
            if sender.send(command).is_err() {
                warn!("Overlay result dropped: dashboard is gone");
                return;
            }
            wake();
        });
    }
}
