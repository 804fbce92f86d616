use crate::{
    application::{Navigator, upload::interface::UploadInterface},
    domain::{MutexChannel, SessionEndpoint, SessionEvent, full_path},
    config::GatewayConfig,
};
use std::path::PathBuf;
use tokio::{sync::mpsc::Sender, time};
use tracing::{info, warn};

const QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct UploadTask {
    pub source: PathBuf,
    pub target_directory: String,
}

/// Serializes uploads through a single slot: at most one transfer is in
/// flight per session, and a failure is reported and skipped rather
/// than retried or allowed to block the rest of the queue.
pub struct UploadQueue<U: UploadInterface> {
    uploader: U,
    endpoint: SessionEndpoint,
    config: GatewayConfig,
    queue: MutexChannel<UploadTask>,
    events: Sender<SessionEvent>,
    navigator: Navigator,
}

impl<U: UploadInterface> UploadQueue<U> {
    pub(crate) fn new(
        uploader: U,
        endpoint: SessionEndpoint,
        config: GatewayConfig,
        events: Sender<SessionEvent>,
        navigator: Navigator,
    ) -> Self {
        Self {
            uploader,
            endpoint,
            config,
            queue: MutexChannel::new(QUEUE_CAPACITY),
            events,
            navigator,
        }
    }

    /// Appends a transfer to the queue. Processing starts as soon as
    /// the worker is idle; ordering is strictly first-in, first-out.
    pub fn queue_upload(&self, source: PathBuf, target_directory: impl Into<String>) -> bool {
        self.queue
            .try_send(UploadTask {
                source,
                target_directory: target_directory.into(),
            })
            .is_ok()
    }

    pub async fn run(&self) {
        while let Some(task) = self.queue.recv().await {
            self.process(task).await;
        }
    }

    async fn process(&self, task: UploadTask) {
        let name = task
            .source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| task.source.to_string_lossy().to_string());
        let remote_path = full_path(&task.target_directory, &name);

        let outcome = time::timeout(
            self.config.upload_timeout(),
            self.uploader
                .upload(&self.endpoint, &task.source, &remote_path, &self.events),
        )
        .await;

        match outcome {
            Ok(Ok(())) => {
                info!("uploaded {name} to {}", task.target_directory);
                let _ = self
                    .events
                    .send(SessionEvent::success(format!("Uploaded {name}")))
                    .await;
                // The gateway pushes no notification for new files; the
                // re-listing is what makes the upload visible.
                self.navigator.refresh().await;
            }
            Ok(Err(err)) => {
                warn!("upload of {name} failed: {err}");
                let _ = self
                    .events
                    .send(SessionEvent::error(format!("Failed to upload {name}: {err}")))
                    .await;
            }
            Err(_) => {
                warn!("upload of {name} timed out");
                let _ = self
                    .events
                    .send(SessionEvent::error(format!("Upload of {name} timed out")))
                    .await;
            }
        }
    }
}
