use crate::{
    application::{
        FileOperations, Navigator, PropertyObserver, SymlinkResolver,
        session::{OperationSender, SessionManager, SessionState, interface::TransportInterface},
        upload::{UploadQueue, interface::UploadInterface},
    },
    config::GatewayConfig,
    domain::{MutexChannel, SessionDescriptor, SessionEndpoint, SessionEvent},
    infra::network::{http::HttpUploader, ws::WsAdapter},
};
use std::{path::PathBuf, sync::Arc};
use tokio::{
    io,
    sync::mpsc::{self, Receiver},
};

const OUTBOUND_CAPACITY: usize = 64;

/// One live file-management session: the operation socket, directory
/// navigation, property queries and the upload queue, wired over a
/// shared session state. Consumers read `SessionEvent`s from the
/// receiver handed out at construction.
pub struct GatewaySession<T: TransportInterface, U: UploadInterface> {
    state: Arc<SessionState>,
    manager: SessionManager<T>,
    uploads: UploadQueue<U>,
    navigator: Navigator,
    operations: FileOperations,
    symlinks: SymlinkResolver,
    properties: PropertyObserver,
}

impl GatewaySession<WsAdapter, HttpUploader> {
    /// Session over the production transports.
    pub fn open(
        descriptor: SessionDescriptor,
        config: GatewayConfig,
    ) -> (Self, Receiver<SessionEvent>) {
        let uploader = HttpUploader::new(config.upload_timeout());
        Self::new(WsAdapter, uploader, descriptor, config)
    }
}

impl<T: TransportInterface, U: UploadInterface> GatewaySession<T, U> {
    pub fn new(
        adapter: T,
        uploader: U,
        descriptor: SessionDescriptor,
        config: GatewayConfig,
    ) -> (Self, Receiver<SessionEvent>) {
        let endpoint = SessionEndpoint::new(config.base_url.clone(), descriptor);
        let state = SessionState::new();
        let (events_tx, events_rx) = mpsc::channel(config.event_buffer);
        let outbound = MutexChannel::new(OUTBOUND_CAPACITY);

        let sender = OperationSender::new(state.clone(), outbound.tx.clone());
        let navigator = Navigator::new(state.clone(), sender.clone(), events_tx.clone());
        let symlinks = SymlinkResolver::new(sender.clone());
        let properties = PropertyObserver::new(sender.clone());
        let operations = FileOperations::new(sender);

        let manager = SessionManager::new(
            adapter,
            endpoint.clone(),
            config.clone(),
            state.clone(),
            outbound,
            events_tx.clone(),
            navigator.clone(),
            symlinks.clone(),
            properties.clone(),
        );
        let uploads = UploadQueue::new(uploader, endpoint, config, events_tx, navigator.clone());

        (
            Self {
                state,
                manager,
                uploads,
                navigator,
                operations,
                symlinks,
                properties,
            },
            events_rx,
        )
    }

    /// Serves the session until it ends: intentional disconnect, an
    /// application close code from the gateway, or too many failed
    /// reconnect attempts.
    pub async fn run(&self) -> io::Result<()> {
        tokio::select!(
            res = self.manager.run() => res,
            _ = self.uploads.run() => Ok(()),
        )
    }

    /// Intentional disconnect: closes the socket with a normal code and
    /// disables automatic reconnection. In-flight operations are
    /// abandoned, not cancelled remotely.
    pub fn disconnect(&self) {
        self.state.begin_shutdown();
    }

    /// Enqueues a file for transfer into a remote directory.
    pub fn queue_upload(&self, source: PathBuf, target_directory: impl Into<String>) -> bool {
        self.uploads.queue_upload(source, target_directory)
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn operations(&self) -> &FileOperations {
        &self.operations
    }

    pub fn symlinks(&self) -> &SymlinkResolver {
        &self.symlinks
    }

    pub fn properties(&self) -> &PropertyObserver {
        &self.properties
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }
}
