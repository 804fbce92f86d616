use crate::domain::{SessionEndpoint, SessionEvent};
use std::{fmt, path::Path};
use tokio::{io, sync::mpsc::Sender};

/// Transfers one local file to the gateway's upload endpoint. Uploads
/// travel over HTTP, not the operation socket; one implementation
/// streams the file body, tests substitute a recorder.
pub trait UploadInterface: Send + Sync + 'static {
    async fn upload(
        &self,
        endpoint: &SessionEndpoint,
        source: &Path,
        remote_path: &str,
        events: &Sender<SessionEvent>,
    ) -> UploadResult<()>;
}

pub type UploadResult<T> = Result<T, UploadError>;

#[derive(Debug)]
pub enum UploadError {
    Failure(String),
    Timeout,
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failure(msg) => write!(f, "{msg}"),
            Self::Timeout => write!(f, "timed out"),
        }
    }
}

impl std::error::Error for UploadError {}

impl From<io::Error> for UploadError {
    fn from(err: io::Error) -> Self {
        Self::Failure(err.to_string())
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Failure(err.to_string())
        }
    }
}
