use crate::domain::SessionEndpoint;
use std::fmt;
use tokio::io;

/// Opens gateway sockets. One implementation speaks WebSocket; tests
/// substitute scripted connections.
pub trait TransportInterface: Send + Sync + 'static {
    type Conn: TransportConnection;

    async fn connect(&self, endpoint: &SessionEndpoint) -> TransportResult<Self::Conn>;
}

/// One live socket. The session manager is the only holder; every other
/// component goes through its operation sender.
pub trait TransportConnection: Send + 'static {
    async fn send(&mut self, frame: Vec<u8>) -> TransportResult<()>;

    async fn recv(&mut self) -> TransportResult<TransportEvent>;

    /// Normal close (code 1000), used for intentional disconnects.
    async fn close(&mut self) -> TransportResult<()>;
}

#[derive(Debug)]
pub enum TransportEvent {
    Frame(Vec<u8>),
    Closed { code: u16 },
}

pub type TransportResult<T> = Result<T, TransportError>;

#[derive(Debug)]
pub enum TransportError {
    Failure(String),
}

impl TransportError {
    pub fn new(msg: &str) -> Self {
        Self::Failure(msg.to_string())
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failure(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<TransportError> for io::Error {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Failure(msg) => io::Error::other(msg),
        }
    }
}

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        Self::Failure(err.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for TransportError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Failure(err.to_string())
    }
}
