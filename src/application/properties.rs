use crate::{application::session::OperationSender, domain::Operation};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::{Mutex, oneshot};
use tracing::debug;

/// Checksum algorithms the gateway can run remotely.
pub const CHECKSUM_ALGORITHMS: [&str; 4] = ["md5", "sha1", "sha256", "sha512"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Stat,
    Checksum,
    FolderSize,
}

/// File property queries (stat, checksum, folder size). A single slot
/// keyed by "most recent": issuing a new query supersedes an
/// unanswered one, and a response is delivered only if its kind matches
/// the newest request.
#[derive(Clone)]
pub struct PropertyObserver {
    slot: Arc<Mutex<Option<(PropertyKind, oneshot::Sender<Value>)>>>,
    sender: OperationSender,
}

impl PropertyObserver {
    pub(crate) fn new(sender: OperationSender) -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            sender,
        }
    }

    pub async fn stat(&self, path: &str) -> Option<oneshot::Receiver<Value>> {
        self.query(PropertyKind::Stat, Operation::Stat, json!({ "path": path }))
            .await
    }

    pub async fn checksum(&self, path: &str, algorithm: &str) -> Option<oneshot::Receiver<Value>> {
        if !CHECKSUM_ALGORITHMS.contains(&algorithm) {
            debug!("unsupported checksum algorithm {algorithm}");
            return None;
        }
        self.query(
            PropertyKind::Checksum,
            Operation::Checksum,
            json!({ "path": path, "algorithm": algorithm }),
        )
        .await
    }

    pub async fn folder_size(&self, path: &str) -> Option<oneshot::Receiver<Value>> {
        self.query(
            PropertyKind::FolderSize,
            Operation::FolderSize,
            json!({ "path": path }),
        )
        .await
    }

    async fn query(
        &self,
        kind: PropertyKind,
        operation: Operation,
        payload: Value,
    ) -> Option<oneshot::Receiver<Value>> {
        let (tx, rx) = oneshot::channel();
        let mut slot = self.slot.lock().await;
        if !self.sender.send(operation, &payload) {
            return None;
        }
        // Replacing the slot drops any superseded query's sender.
        *slot = Some((kind, tx));
        Some(rx)
    }

    pub(crate) async fn complete(&self, kind: PropertyKind, payload: Option<Value>) {
        let mut slot = self.slot.lock().await;
        match slot.take() {
            Some((expected, tx)) if expected == kind => {
                let _ = tx.send(payload.unwrap_or(Value::Null));
            }
            Some(other) => {
                // Response to a superseded query; the newest one is
                // still outstanding.
                *slot = Some(other);
                debug!("dropping {kind:?} result superseded by a newer query");
            }
            None => debug!("{kind:?} result arrived with no pending query"),
        }
    }

    pub(crate) async fn clear(&self) {
        self.slot.lock().await.take();
    }
}
