use crate::{
    application::upload::interface::{UploadError, UploadInterface, UploadResult},
    domain::{SessionEndpoint, SessionEvent},
};
use std::{path::Path, time::Duration};
use tokio::{io::AsyncReadExt, sync::mpsc::Sender};

const CHUNK_SIZE: usize = 64 * 1024;

/// Streams file bodies to the gateway's HTTP upload endpoint, one
/// request per file, reporting byte-level progress as chunks leave the
/// reader.
pub struct HttpUploader {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpUploader {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

impl UploadInterface for HttpUploader {
    async fn upload(
        &self,
        endpoint: &SessionEndpoint,
        source: &Path,
        remote_path: &str,
        events: &Sender<SessionEvent>,
    ) -> UploadResult<()> {
        let mut file = tokio::fs::File::open(source).await?;
        let total = file.metadata().await?.len();
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| source.to_string_lossy().to_string());

        let events = events.clone();
        let progress_name = name.clone();
        let body = async_stream::stream! {
            let mut sent = 0u64;
            let mut buf = vec![0u8; CHUNK_SIZE];
            loop {
                match file.read(&mut buf).await {
                    Ok(0) => break,
                    Ok(n) => {
                        sent += n as u64;
                        let _ = events.try_send(SessionEvent::UploadProgress {
                            name: progress_name.clone(),
                            sent,
                            total,
                        });
                        yield Ok::<Vec<u8>, std::io::Error>(buf[..n].to_vec());
                    }
                    Err(err) => {
                        yield Err(err);
                        break;
                    }
                }
            }
        };

        let response = self
            .client
            .post(endpoint.upload_url())
            .query(&[
                ("sessionId", endpoint.session_id()),
                ("path", remote_path),
                ("sessionToken", endpoint.session_token()),
            ])
            .timeout(self.timeout)
            .body(reqwest::Body::wrap_stream(body))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(UploadError::Failure(if message.is_empty() {
                format!("upload of {name} failed with status {status}")
            } else {
                message
            }));
        }
        Ok(())
    }
}
