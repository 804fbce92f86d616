use crate::{
    application::session::{OperationSender, SessionState, state::ListingStatus},
    domain::{FileEntry, Operation, SessionEvent, full_path, normalize_path, parent_path},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::mpsc::Sender;
use tracing::{debug, warn};

const LISTING_FAILED: &str = "Failed to load directory";

/// Directory navigation over the gateway: current path, browser-style
/// history and the listing request/response cycle.
#[derive(Clone)]
pub struct Navigator {
    state: Arc<SessionState>,
    sender: OperationSender,
    events: Sender<SessionEvent>,
}

impl Navigator {
    pub(crate) fn new(
        state: Arc<SessionState>,
        sender: OperationSender,
        events: Sender<SessionEvent>,
    ) -> Self {
        Self {
            state,
            sender,
            events,
        }
    }

    /// Visits a path. Navigating to the current path is a no-op, which
    /// guards against redundant round-trips. Returns whether a listing
    /// request actually went out.
    pub async fn navigate(&self, path: &str) -> bool {
        let path = normalize_path(path);
        let mut nav = self.state.nav.write().await;
        if !nav.history.push(path.clone()) {
            return false;
        }
        self.issue_listing(&mut nav, &path)
    }

    /// Moves the cursor back. Re-issues a listing only when the cursor
    /// lands on a different path than the current one.
    pub async fn go_back(&self) -> bool {
        let mut nav = self.state.nav.write().await;
        let before = nav.history.current().to_string();
        if !nav.history.back() {
            return false;
        }
        let target = nav.history.current().to_string();
        if target == before {
            return false;
        }
        self.issue_listing(&mut nav, &target)
    }

    pub async fn go_forward(&self) -> bool {
        let mut nav = self.state.nav.write().await;
        let before = nav.history.current().to_string();
        if !nav.history.forward() {
            return false;
        }
        let target = nav.history.current().to_string();
        if target == before {
            return false;
        }
        self.issue_listing(&mut nav, &target)
    }

    pub async fn go_up(&self) -> bool {
        let parent = {
            let nav = self.state.nav.read().await;
            let current = nav.history.current();
            if current == "/" {
                return false;
            }
            parent_path(current)
        };
        self.navigate(&parent).await
    }

    /// Re-lists the current directory without touching history or the
    /// loading status. Mutation acknowledgements and finished uploads
    /// land here.
    pub async fn refresh(&self) -> bool {
        let mut nav = self.state.nav.write().await;
        let path = nav.history.current().to_string();
        if !self
            .sender
            .send(Operation::ListFiles, &json!({ "path": path }))
        {
            return false;
        }
        nav.issued += 1;
        let id = nav.issued;
        nav.pending.push_back(id);
        true
    }

    pub async fn search_directories(&self, query: &str) -> bool {
        self.sender
            .send(Operation::SearchDirectories, &json!({ "searchPath": query }))
    }

    pub async fn current_path(&self) -> String {
        self.state.current_path().await
    }

    pub async fn listing(&self) -> Vec<FileEntry> {
        self.state.listing().await
    }

    pub async fn status(&self) -> ListingStatus {
        self.state.listing_status().await
    }

    /// Applies an inbound LIST_FILES frame. Responses answer requests in
    /// send order; anything that is not the answer to the newest request
    /// is stale and dropped so rapid navigation never regresses.
    pub(crate) async fn apply_listing(&self, payload: Option<Value>) {
        let event = {
            let mut nav = self.state.nav.write().await;
            if let Some(id) = nav.pending.pop_front() {
                if id != nav.issued {
                    debug!("discarding stale listing response {id} (latest {})", nav.issued);
                    return;
                }
            }

            let path = nav.history.current().to_string();
            let files = payload.as_ref().and_then(|p| p.get("files")).cloned();
            match files.map(serde_json::from_value::<Vec<FileEntry>>) {
                Some(Ok(entries)) => {
                    nav.entries = entries.clone();
                    nav.status = ListingStatus::Idle;
                    SessionEvent::ListingReplaced { path, entries }
                }
                Some(Err(err)) => {
                    warn!("listing for {path} is malformed: {err}");
                    nav.entries.clear();
                    nav.status = ListingStatus::Error(LISTING_FAILED.to_string());
                    SessionEvent::ListingFailed {
                        path,
                        message: LISTING_FAILED.to_string(),
                    }
                }
                None => {
                    let message = payload
                        .as_ref()
                        .and_then(|p| p.get("message"))
                        .and_then(Value::as_str)
                        .unwrap_or(LISTING_FAILED)
                        .to_string();
                    nav.entries.clear();
                    nav.status = ListingStatus::Error(message.clone());
                    SessionEvent::ListingFailed { path, message }
                }
            }
        };
        let _ = self.events.send(event).await;
    }

    pub(crate) async fn apply_suggestions(&self, payload: Option<Value>) {
        let directories: Vec<String> = payload
            .and_then(|p| p.get("directories").cloned())
            .and_then(|d| serde_json::from_value(d).ok())
            .unwrap_or_default();
        self.state.nav.write().await.suggestions = directories.clone();
        let _ = self
            .events
            .send(SessionEvent::SuggestionsReplaced { directories })
            .await;
    }

    /// Full path of an entry inside the current directory.
    pub async fn path_of(&self, name: &str) -> String {
        full_path(&self.state.current_path().await, name)
    }

    fn issue_listing(
        &self,
        nav: &mut crate::application::session::state::NavState,
        path: &str,
    ) -> bool {
        if !self
            .sender
            .send(Operation::ListFiles, &json!({ "path": path }))
        {
            // Rejected while disconnected; the READY after a reconnect
            // re-lists the current path.
            return false;
        }
        nav.status = ListingStatus::Loading;
        nav.issued += 1;
        let id = nav.issued;
        nav.pending.push_back(id);
        true
    }
}
