use crate::{
    application::{
        session::interface::{
            TransportConnection, TransportError, TransportEvent, TransportInterface,
            TransportResult,
        },
        upload::interface::{UploadError, UploadInterface, UploadResult},
    },
    config::GatewayConfig,
    domain::{Operation, SessionDescriptor, SessionEndpoint, SessionEvent, frame},
};
use serde_json::Value;
use std::{
    collections::{HashSet, VecDeque},
    path::Path,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::{
    sync::mpsc::{self, Receiver, Sender, UnboundedReceiver, UnboundedSender},
    time,
};

pub fn test_config() -> GatewayConfig {
    GatewayConfig {
        base_url: "http://localhost:0".to_string(),
        reconnect_attempts: 3,
        reconnect_interval_ms: 10,
        upload_timeout_secs: 1,
        event_buffer: 100,
    }
}

pub fn test_descriptor() -> SessionDescriptor {
    SessionDescriptor {
        session_id: "session-1".to_string(),
        session_token: "token-1".to_string(),
    }
}

enum Script {
    Refuse,
    Accept(UnboundedReceiver<TransportEvent>),
}

// Scripted transport; frames sent by the session accumulate in `sent`
// across all connections.
pub struct MockTransport {
    scripts: Mutex<VecDeque<Script>>,
    pub connects: Arc<AtomicUsize>,
    pub sent: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(VecDeque::new()),
            connects: Arc::new(AtomicUsize::new(0)),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn accept(&self) -> UnboundedSender<TransportEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.scripts
            .lock()
            .unwrap()
            .push_back(Script::Accept(rx));
        tx
    }

    pub fn refuse(&self) {
        self.scripts.lock().unwrap().push_back(Script::Refuse);
    }
}

impl TransportInterface for MockTransport {
    type Conn = MockConnection;

    async fn connect(&self, _endpoint: &SessionEndpoint) -> TransportResult<MockConnection> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        match self.scripts.lock().unwrap().pop_front() {
            Some(Script::Accept(rx)) => Ok(MockConnection {
                rx,
                sent: self.sent.clone(),
            }),
            Some(Script::Refuse) | None => Err(TransportError::new("connection refused")),
        }
    }
}

pub struct MockConnection {
    rx: UnboundedReceiver<TransportEvent>,
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl TransportConnection for MockConnection {
    async fn send(&mut self, frame: Vec<u8>) -> TransportResult<()> {
        self.sent.lock().unwrap().push(frame);
        Ok(())
    }

    async fn recv(&mut self) -> TransportResult<TransportEvent> {
        match self.rx.recv().await {
            Some(event) => Ok(event),
            // Feeder dropped: a quiet socket, not a close.
            None => std::future::pending().await,
        }
    }

    async fn close(&mut self) -> TransportResult<()> {
        Ok(())
    }
}

pub struct MockUploader {
    pub active: Arc<AtomicUsize>,
    pub max_active: Arc<AtomicUsize>,
    pub completed: Arc<Mutex<Vec<String>>>,
    pub delay: Duration,
    pub fail: HashSet<String>,
    pub hang: HashSet<String>,
}

impl MockUploader {
    pub fn new(delay: Duration) -> Self {
        Self {
            active: Arc::new(AtomicUsize::new(0)),
            max_active: Arc::new(AtomicUsize::new(0)),
            completed: Arc::new(Mutex::new(Vec::new())),
            delay,
            fail: HashSet::new(),
            hang: HashSet::new(),
        }
    }
}

impl UploadInterface for MockUploader {
    async fn upload(
        &self,
        _endpoint: &SessionEndpoint,
        source: &Path,
        remote_path: &str,
        _events: &Sender<SessionEvent>,
    ) -> UploadResult<()> {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if self.hang.contains(&name) {
            std::future::pending::<()>().await;
        }

        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now_active, Ordering::SeqCst);
        time::sleep(self.delay).await;
        self.active.fetch_sub(1, Ordering::SeqCst);

        if self.fail.contains(&name) {
            return Err(UploadError::Failure("mock failure".to_string()));
        }
        self.completed.lock().unwrap().push(remote_path.to_string());
        Ok(())
    }
}

pub fn frame_of(operation: Operation, payload: Value) -> TransportEvent {
    TransportEvent::Frame(frame::encode(operation, &payload))
}

pub fn ack_of(operation: Operation) -> TransportEvent {
    TransportEvent::Frame(vec![operation.as_byte()])
}

pub fn closed(code: u16) -> TransportEvent {
    TransportEvent::Closed { code }
}

pub fn sent_operations(sent: &Arc<Mutex<Vec<Vec<u8>>>>) -> Vec<Operation> {
    sent.lock()
        .unwrap()
        .iter()
        .filter_map(|bytes| bytes.first().copied().and_then(Operation::from_byte))
        .collect()
}

pub async fn wait_until(predicate: impl Fn() -> bool) {
    for _ in 0..400 {
        if predicate() {
            return;
        }
        time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met in time");
}

// Returns every event seen, matching one last.
pub async fn recv_matching(
    events: &mut Receiver<SessionEvent>,
    predicate: impl Fn(&SessionEvent) -> bool,
) -> Vec<SessionEvent> {
    let mut seen = Vec::new();
    loop {
        let event = time::timeout(Duration::from_secs(2), events.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event channel closed");
        let done = predicate(&event);
        seen.push(event);
        if done {
            return seen;
        }
    }
}
