use crate::{
    application::session::interface::{
        TransportConnection, TransportEvent, TransportInterface, TransportResult,
    },
    domain::SessionEndpoint,
};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{
        Error as WsError, Message,
        protocol::{CloseFrame, frame::coding::CloseCode},
    },
};

// The gateway never sent a close frame; tungstenite reports these as
// stream end / abnormal closure.
const CODE_NO_STATUS: u16 = 1005;
const CODE_ABNORMAL: u16 = 1006;

/// WebSocket transport to the file gateway. Credentials travel as
/// query parameters on the connection URL.
pub struct WsAdapter;

impl TransportInterface for WsAdapter {
    type Conn = WsConnection;

    async fn connect(&self, endpoint: &SessionEndpoint) -> TransportResult<WsConnection> {
        let (stream, _response) = connect_async(endpoint.ws_url()).await?;
        Ok(WsConnection { inner: stream })
    }
}

pub struct WsConnection {
    inner: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TransportConnection for WsConnection {
    async fn send(&mut self, frame: Vec<u8>) -> TransportResult<()> {
        self.inner.send(Message::Binary(frame.into())).await?;
        Ok(())
    }

    async fn recv(&mut self) -> TransportResult<TransportEvent> {
        loop {
            match self.inner.next().await {
                Some(Ok(Message::Binary(bytes))) => {
                    return Ok(TransportEvent::Frame(bytes.to_vec()));
                }
                // Older gateways framed the same bytes as text.
                Some(Ok(Message::Text(text))) => {
                    return Ok(TransportEvent::Frame(text.as_bytes().to_vec()));
                }
                Some(Ok(Message::Close(frame))) => {
                    let code = frame
                        .map(|f| u16::from(f.code))
                        .unwrap_or(CODE_NO_STATUS);
                    return Ok(TransportEvent::Closed { code });
                }
                Some(Ok(_)) => continue,
                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) => {
                    return Ok(TransportEvent::Closed {
                        code: CODE_ABNORMAL,
                    });
                }
                Some(Err(err)) => return Err(err.into()),
                None => {
                    return Ok(TransportEvent::Closed {
                        code: CODE_ABNORMAL,
                    });
                }
            }
        }
    }

    async fn close(&mut self) -> TransportResult<()> {
        let frame = CloseFrame {
            code: CloseCode::Normal,
            reason: "".into(),
        };
        match self.inner.close(Some(frame)).await {
            Ok(()) | Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
