use crate::{application::session::OperationSender, domain::Operation};
use serde_json::{Value, json};
use std::{collections::VecDeque, sync::Arc};
use tokio::sync::{Mutex, oneshot};
use tracing::debug;

/// Pending symlink resolutions, matched to responses strictly by
/// arrival order. The wire format carries no correlation id, so this
/// FIFO is only sound because the socket is a single ordered stream.
/// The queue is cleared on disconnect; late responses are dropped.
#[derive(Clone)]
pub struct SymlinkResolver {
    pending: Arc<Mutex<VecDeque<oneshot::Sender<Value>>>>,
    sender: OperationSender,
}

impl SymlinkResolver {
    pub(crate) fn new(sender: OperationSender) -> Self {
        Self {
            pending: Arc::new(Mutex::new(VecDeque::new())),
            sender,
        }
    }

    /// Requests the target of a symlink. Returns `None` when the socket
    /// is down; otherwise the receiver resolves with the gateway's
    /// realpath payload, or errs if the session ends first.
    pub async fn resolve(&self, path: &str) -> Option<oneshot::Receiver<Value>> {
        let (tx, rx) = oneshot::channel();
        let mut pending = self.pending.lock().await;
        pending.push_back(tx);
        if !self
            .sender
            .send(Operation::ResolveSymlink, &json!({ "path": path }))
        {
            pending.pop_back();
            return None;
        }
        Some(rx)
    }

    pub(crate) async fn complete(&self, payload: Option<Value>) {
        match self.pending.lock().await.pop_front() {
            Some(tx) => {
                let _ = tx.send(payload.unwrap_or(Value::Null));
            }
            None => debug!("symlink resolution arrived with no pending request"),
        }
    }

    pub(crate) async fn clear(&self) {
        self.pending.lock().await.clear();
    }
}
