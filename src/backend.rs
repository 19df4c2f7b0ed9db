//! Network backend: runs on its own thread with a Tokio runtime and talks
//! to the UI thread only through crossbeam channels.
//!
//! Wire format is one JSON object per line, `{"event": .., "payload": ..}`,
//! over plain TCP or TLS.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use futures_util::{SinkExt, StreamExt};
use rustls::RootCertStore;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::runtime::Runtime;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use tokio_util::codec::{Framed, LinesCodec, LinesCodecError};

use crate::error::ChannelError;
use crate::protocol::{BackendAction, Frame, GuiEvent, JoinRequest, EVENT_JOIN};

/// Longest line accepted from the server.
pub const MAX_FRAME_LEN: usize = 64 * 1024;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// How long a read may block before we go back to check for UI actions.
const READ_POLL: Duration = Duration::from_millis(50);
const IDLE_POLL: Duration = Duration::from_millis(20);

trait AsyncStream: AsyncRead + AsyncWrite + Unpin + Send {}
impl<T: AsyncRead + AsyncWrite + Unpin + Send> AsyncStream for T {}

type Connection = Framed<Box<dyn AsyncStream>, LinesCodec>;

/// Serialize one frame to its wire line (without the trailing newline).
pub fn encode_frame(event: &str, payload: &Value) -> Result<String, ChannelError> {
    let frame = Frame::new(event, payload.clone());
    Ok(serde_json::to_string(&frame)?)
}

pub fn decode_frame(line: &str) -> Result<Frame, serde_json::Error> {
    serde_json::from_str(line)
}

/// Create a TLS connector with webpki root certificates
pub(crate) fn create_tls_connector() -> TlsConnector {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    TlsConnector::from(Arc::new(config))
}

async fn open_connection(server: &str, port: u16, use_tls: bool) -> Result<Connection, ChannelError> {
    let addr = format!("{server}:{port}");
    let stream = match timeout(CONNECT_TIMEOUT, TcpStream::connect(&addr)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => return Err(ChannelError::Connect(format!("{addr}: {e}"))),
        Err(_) => return Err(ChannelError::Connect(format!("{addr}: timed out"))),
    };
    if let Err(e) = stream.set_nodelay(true) {
        log::debug!("Could not set TCP_NODELAY: {e}");
    }

    let io: Box<dyn AsyncStream> = if use_tls {
        let server_name = rustls::pki_types::ServerName::try_from(server.to_string())
            .map_err(|e| ChannelError::Connect(format!("invalid server name for TLS: {e}")))?;
        let tls_stream = create_tls_connector()
            .connect(server_name, stream)
            .await
            .map_err(|e| ChannelError::Connect(format!("TLS handshake failed: {e}")))?;
        Box::new(tls_stream)
    } else {
        Box::new(stream)
    };

    Ok(Framed::new(io, LinesCodec::new_with_max_length(MAX_FRAME_LEN)))
}

async fn write_frame(conn: &mut Connection, event: &str, payload: &Value) -> Result<(), ChannelError> {
    let line = encode_frame(event, payload)?;
    conn.send(line)
        .await
        .map_err(|e| ChannelError::Transport(e.to_string()))
}

/// Backend thread entry point. Returns once the UI side drops its sender.
pub fn run_backend(action_rx: Receiver<BackendAction>, event_tx: Sender<GuiEvent>) {
    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            let _ = event_tx.send(GuiEvent::Error(format!("Failed to create Tokio runtime: {e}")));
            return;
        }
    };

    rt.block_on(async move {
        let mut connection: Option<Connection> = None;

        loop {
            // Drain actions from the UI
            loop {
                let action = match action_rx.try_recv() {
                    Ok(action) => action,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        log::info!("UI went away; backend shutting down");
                        return;
                    }
                };

                match action {
                    BackendAction::Connect {
                        server,
                        port,
                        use_tls,
                        name,
                        room,
                    } => {
                        connection = None;
                        log::info!(
                            "Connecting to {server}:{port} via {}",
                            if use_tls { "TLS" } else { "TCP" }
                        );

                        let mut conn = match open_connection(&server, port, use_tls).await {
                            Ok(conn) => conn,
                            Err(e) => {
                                log::warn!("{e}");
                                let _ = event_tx.send(GuiEvent::Error(e.to_string()));
                                continue;
                            }
                        };

                        let join = match serde_json::to_value(JoinRequest { name, room }) {
                            Ok(join) => join,
                            Err(e) => {
                                let _ = event_tx.send(GuiEvent::Error(e.to_string()));
                                continue;
                            }
                        };
                        if let Err(e) = write_frame(&mut conn, EVENT_JOIN, &join).await {
                            log::warn!("Failed to send join: {e}");
                            let _ = event_tx.send(GuiEvent::Error(e.to_string()));
                            continue;
                        }

                        log::info!("Connected to {server}:{port}");
                        connection = Some(conn);
                        let _ = event_tx.send(GuiEvent::Connected);
                    }

                    BackendAction::Disconnect => {
                        connection = None;
                        let _ = event_tx.send(GuiEvent::Disconnected("User disconnected".into()));
                    }

                    BackendAction::Emit { event, payload } => {
                        let Some(conn) = connection.as_mut() else {
                            log::debug!("Not connected; dropping outbound `{event}`");
                            continue;
                        };
                        let sent = write_frame(conn, &event, &payload).await;
                        if let Err(e) = sent {
                            log::warn!("Failed to send `{event}`: {e}");
                            connection = None;
                            let _ = event_tx.send(GuiEvent::Error(e.to_string()));
                        }
                    }
                }
            }

            // Read from the network (with short timeout so we can check for actions)
            let Some(conn) = connection.as_mut() else {
                tokio::time::sleep(IDLE_POLL).await;
                continue;
            };

            let next = timeout(READ_POLL, conn.next()).await;
            match next {
                Ok(Some(Ok(line))) => match decode_frame(&line) {
                    Ok(frame) => {
                        let _ = event_tx.send(GuiEvent::Frame(frame));
                    }
                    Err(e) => log::debug!("Skipping unparseable frame ({e}): {line}"),
                },
                Ok(Some(Err(LinesCodecError::MaxLineLengthExceeded))) => {
                    log::warn!("Skipping frame longer than {MAX_FRAME_LEN} bytes");
                }
                Ok(Some(Err(LinesCodecError::Io(e)))) => {
                    log::warn!("Connection error: {e}");
                    connection = None;
                    let _ = event_tx.send(GuiEvent::Error(e.to_string()));
                }
                Ok(None) => {
                    log::info!("Server closed the connection");
                    connection = None;
                    let _ = event_tx.send(GuiEvent::Disconnected(
                        "Server closed the connection".into(),
                    ));
                }
                Err(_) => {}
            }
        }
    });
}
