use serde::{Deserialize, Serialize};

/// Identifies one authenticated logical connection to a remote host.
/// Owned by the caller's session list; this layer only uses it to
/// address the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionDescriptor {
    pub session_id: String,
    pub session_token: String,
}

/// Resolved gateway addresses for one session: the WebSocket operation
/// channel and the HTTP upload endpoint.
#[derive(Debug, Clone)]
pub struct SessionEndpoint {
    base_url: String,
    descriptor: SessionDescriptor,
}

impl SessionEndpoint {
    pub fn new(base_url: impl Into<String>, descriptor: SessionDescriptor) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            descriptor,
        }
    }

    pub fn descriptor(&self) -> &SessionDescriptor {
        &self.descriptor
    }

    pub fn session_id(&self) -> &str {
        &self.descriptor.session_id
    }

    pub fn session_token(&self) -> &str {
        &self.descriptor.session_token
    }

    /// WebSocket URL carrying the bearer token and session id as query
    /// parameters, scheme derived from the HTTP base.
    pub fn ws_url(&self) -> String {
        let ws_base = if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            format!("ws://{}", self.base_url)
        };
        format!(
            "{ws_base}/api/sessions/files?sessionToken={}&sessionId={}",
            self.descriptor.session_token, self.descriptor.session_id
        )
    }

    /// Upload endpoint without query parameters; the uploader appends
    /// `sessionId`, `path` and `sessionToken` URL-encoded.
    pub fn upload_url(&self) -> String {
        format!("{}/api/sessions/files/upload", self.base_url)
    }
}
