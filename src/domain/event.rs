use crate::domain::FileEntry;
use serde::Serialize;

/// Everything this layer reports back to its consumer. A UI renders
/// toasts and listings from these; nothing else crosses the boundary.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Ready,
    ListingReplaced {
        path: String,
        entries: Vec<FileEntry>,
    },
    ListingFailed {
        path: String,
        message: String,
    },
    SuggestionsReplaced {
        directories: Vec<String>,
    },
    Toast {
        level: ToastLevel,
        message: String,
    },
    UploadProgress {
        name: String,
        sent: u64,
        total: u64,
    },
    ConnectionLost,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

impl SessionEvent {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Toast {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Toast {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }
}
