use crate::{
    application::session::state::SessionState,
    domain::{Operation, frame},
};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc::Sender;
use tracing::debug;

/// Cloneable handle for putting operations on the session's socket.
/// Rejects locally while the socket is down; callers re-issue after
/// reconnection instead of relying on a buffer.
#[derive(Clone)]
pub struct OperationSender {
    state: Arc<SessionState>,
    outbound: Sender<Vec<u8>>,
}

impl OperationSender {
    pub(crate) fn new(state: Arc<SessionState>, outbound: Sender<Vec<u8>>) -> Self {
        Self { state, outbound }
    }

    /// Encodes and queues one operation frame. Returns `false` when the
    /// socket is not open or the queue is saturated.
    pub fn send(&self, operation: Operation, payload: &Value) -> bool {
        if !self.state.is_connected() {
            debug!("rejected {operation:?} while disconnected");
            return false;
        }
        self.outbound
            .try_send(frame::encode(operation, payload))
            .is_ok()
    }
}
