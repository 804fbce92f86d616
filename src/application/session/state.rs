use crate::domain::{FileEntry, NavigationHistory};
use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};
use tokio::sync::{Notify, RwLock};

const INITIAL_PATH: &str = "/";

pub struct SessionState {
    connected: AtomicBool,
    ready: AtomicBool,
    closing: AtomicBool,
    shutdown: Notify,
    pub(crate) nav: RwLock<NavState>,
}

// `pending` holds the local ids of LIST_FILES requests still awaiting
// a response; the transport is one ordered stream, so responses pop
// ids in order and anything older than `issued` is stale.
pub(crate) struct NavState {
    pub history: NavigationHistory,
    pub status: ListingStatus,
    pub entries: Vec<FileEntry>,
    pub suggestions: Vec<String>,
    pub issued: u64,
    pub pending: VecDeque<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingStatus {
    Idle,
    Loading,
    Error(String),
}

impl SessionState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            connected: AtomicBool::new(false),
            ready: AtomicBool::new(false),
            closing: AtomicBool::new(false),
            shutdown: Notify::new(),
            nav: RwLock::new(NavState {
                history: NavigationHistory::new(INITIAL_PATH),
                status: ListingStatus::Idle,
                entries: Vec::new(),
                suggestions: Vec::new(),
                issued: 0,
                pending: VecDeque::new(),
            }),
        })
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub(crate) fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
        if !connected {
            self.ready.store(false, Ordering::Release);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub(crate) fn set_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    pub fn is_closing(&self) -> bool {
        self.closing.load(Ordering::Acquire)
    }

    pub(crate) fn begin_shutdown(&self) {
        self.closing.store(true, Ordering::Release);
        self.shutdown.notify_waiters();
    }

    pub(crate) async fn shutdown_requested(&self) {
        if self.is_closing() {
            return;
        }
        self.shutdown.notified().await;
    }

    pub async fn current_path(&self) -> String {
        self.nav.read().await.history.current().to_string()
    }

    pub async fn listing(&self) -> Vec<FileEntry> {
        self.nav.read().await.entries.clone()
    }

    pub async fn listing_status(&self) -> ListingStatus {
        self.nav.read().await.status.clone()
    }

    pub async fn suggestions(&self) -> Vec<String> {
        self.nav.read().await.suggestions.clone()
    }

    pub async fn history_position(&self) -> (usize, usize) {
        let nav = self.nav.read().await;
        (nav.history.index(), nav.history.len())
    }
}
