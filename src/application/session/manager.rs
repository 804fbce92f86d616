use crate::{
    application::{
        Navigator, PropertyObserver, SymlinkResolver,
        properties::PropertyKind,
        session::{
            SessionState,
            interface::{TransportConnection, TransportEvent, TransportInterface},
        },
    },
    config::GatewayConfig,
    domain::{MutexChannel, Operation, SessionEvent, SessionEndpoint, frame},
};
use serde_json::Value;
use std::sync::Arc;
use tokio::{io, sync::mpsc::Sender, time};
use tracing::{debug, error, info, warn};

/// Why one connection ended.
enum CloseReason {
    /// Gateway or transport closed with a WebSocket code.
    Code(u16),
    /// Socket error mid-stream.
    Error,
    /// Local, intentional disconnect.
    Shutdown,
}

/// Owns the single WebSocket of a session: connection lifecycle,
/// automatic reconnection and the inbound dispatch table. No other
/// component ever holds the raw socket.
pub struct SessionManager<T: TransportInterface> {
    adapter: T,
    endpoint: SessionEndpoint,
    config: GatewayConfig,
    state: Arc<SessionState>,
    outbound: MutexChannel<Vec<u8>>,
    events: Sender<SessionEvent>,
    navigator: Navigator,
    symlinks: SymlinkResolver,
    properties: PropertyObserver,
}

impl<T: TransportInterface> SessionManager<T> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        adapter: T,
        endpoint: SessionEndpoint,
        config: GatewayConfig,
        state: Arc<SessionState>,
        outbound: MutexChannel<Vec<u8>>,
        events: Sender<SessionEvent>,
        navigator: Navigator,
        symlinks: SymlinkResolver,
        properties: PropertyObserver,
    ) -> Self {
        Self {
            adapter,
            endpoint,
            config,
            state,
            outbound,
            events,
            navigator,
            symlinks,
            properties,
        }
    }

    /// Connects and serves the session until it ends: an intentional
    /// disconnect, an application close code, or too many failed
    /// reconnect attempts. Each successful open resets the attempt
    /// counter.
    pub async fn run(&self) -> io::Result<()> {
        let mut attempts: u32 = 0;
        loop {
            if self.state.is_closing() {
                return Ok(());
            }

            match self.adapter.connect(&self.endpoint).await {
                Ok(conn) => {
                    attempts = 0;
                    info!("connected to file gateway for session {}", self.endpoint.session_id());
                    self.state.set_connected(true);
                    let reason = self.pump(conn).await;
                    self.state.set_connected(false);
                    self.abandon_pending().await;

                    match reason {
                        CloseReason::Shutdown => {
                            info!("session {} disconnected", self.endpoint.session_id());
                            return Ok(());
                        }
                        CloseReason::Code(code) if !reconnectable(code) => {
                            info!("gateway closed session with code {code}, not reconnecting");
                            return Ok(());
                        }
                        // The drop itself is not a failed attempt; only
                        // reconnects that fail to open count against the
                        // allowance.
                        CloseReason::Code(code) => {
                            warn!("socket closed with code {code}, reconnecting");
                        }
                        CloseReason::Error => {
                            warn!("socket failed, reconnecting");
                        }
                    }
                }
                Err(err) => {
                    warn!("connect failed: {err}");
                    attempts += 1;
                    if attempts >= self.config.reconnect_attempts {
                        error!("connection lost after {attempts} attempts");
                        let _ = self.events.send(SessionEvent::ConnectionLost).await;
                        return Ok(());
                    }
                }
            }

            time::sleep(self.config.reconnect_interval()).await;
        }
    }

    /// Serves one live connection: outbound frames from the operation
    /// sender, inbound frames into the dispatch table.
    async fn pump(&self, mut conn: T::Conn) -> CloseReason {
        self.outbound.drain().await;
        let mut outbound = self.outbound.rx.lock().await;

        loop {
            tokio::select! {
                _ = self.state.shutdown_requested() => {
                    let _ = conn.close().await;
                    return CloseReason::Shutdown;
                }
                queued = outbound.recv() => {
                    // The sender half lives as long as the session, so
                    // this only yields frames.
                    if let Some(bytes) = queued {
                        if let Err(err) = conn.send(bytes).await {
                            warn!("send failed: {err}");
                            return CloseReason::Error;
                        }
                    }
                }
                event = conn.recv() => match event {
                    Ok(TransportEvent::Frame(bytes)) => self.dispatch(&bytes).await,
                    Ok(TransportEvent::Closed { code }) => return CloseReason::Code(code),
                    Err(err) => {
                        warn!("socket error: {err}");
                        return CloseReason::Error;
                    }
                },
            }
        }
    }

    async fn dispatch(&self, bytes: &[u8]) {
        let frame = match frame::decode(bytes) {
            Ok(frame) => frame,
            Err(err) => {
                debug!("ignoring inbound frame: {err}");
                return;
            }
        };

        match frame.operation {
            Operation::Ready => {
                self.state.set_ready();
                info!("gateway ready");
                let _ = self.events.send(SessionEvent::Ready).await;
                self.navigator.refresh().await;
            }
            Operation::ListFiles => self.navigator.apply_listing(frame.payload).await,
            Operation::Error => {
                let message = frame
                    .payload
                    .as_ref()
                    .and_then(|p| p.get("message"))
                    .and_then(Value::as_str)
                    .unwrap_or("Operation failed")
                    .to_string();
                let _ = self.events.send(SessionEvent::error(message)).await;
            }
            Operation::SearchDirectories => self.navigator.apply_suggestions(frame.payload).await,
            Operation::ResolveSymlink => self.symlinks.complete(frame.payload).await,
            Operation::Stat => {
                self.properties
                    .complete(PropertyKind::Stat, frame.payload)
                    .await;
            }
            Operation::Checksum => {
                self.properties
                    .complete(PropertyKind::Checksum, frame.payload)
                    .await;
            }
            Operation::FolderSize => {
                self.properties
                    .complete(PropertyKind::FolderSize, frame.payload)
                    .await;
            }
            op if op.is_mutation_ack() => {
                self.navigator.refresh().await;
            }
            op => debug!("no handler for {op:?}"),
        }
    }

    /// In-flight continuations do not survive a connection; responses
    /// arriving on a later socket must not match requests from an
    /// earlier one.
    async fn abandon_pending(&self) {
        self.symlinks.clear().await;
        self.properties.clear().await;
    }
}

/// Codes 1000 (normal) and the application range (>= 4000) end the
/// session for good; everything else is worth retrying.
fn reconnectable(code: u16) -> bool {
    code != 1000 && code < 4000
}
