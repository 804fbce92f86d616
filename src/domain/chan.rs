use tokio::sync::{
    Mutex,
    mpsc::{self, Receiver, Sender, error::TrySendError},
};

/// An mpsc channel whose receiving half sits behind a mutex, so a
/// service can consume it from `&self` inside its run loop.
pub struct MutexChannel<K> {
    pub tx: Sender<K>,
    pub rx: Mutex<Receiver<K>>,
}

impl<K> MutexChannel<K> {
    pub fn new(buffer: usize) -> Self {
        let (tx, rx) = mpsc::channel(buffer);
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    pub async fn recv(&self) -> Option<K> {
        self.rx.lock().await.recv().await
    }

    pub fn try_send(&self, value: K) -> Result<(), TrySendError<K>> {
        self.tx.try_send(value)
    }

    /// Discards everything currently queued. Used when a connection is
    /// re-established so frames addressed to a dead socket never reach
    /// the new one.
    pub async fn drain(&self) {
        let mut rx = self.rx.lock().await;
        while rx.try_recv().is_ok() {}
    }
}
