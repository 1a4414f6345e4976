//! Network infrastructure for the connector client.
//!
//! Owns both halves of a session with the input server and feeds decoded
//! events into the shared [`EventQueue`].
//!
//! Architecture:
//! - `ConnectorClient` opens the TCP control channel, sends the one-line
//!   handshake, and binds the UDP data socket.
//! - A dedicated receive task loops on the data socket; each datagram is
//!   decoded by `omicron-core` and published to the queue.
//! - The consumer never touches the sockets; it drains the queue on its own
//!   tick (see `application::dispatch_events`).
//!
//! The data channel is a raw unreliable telemetry feed: UDP loss and
//! reordering pass through unmodified, and a malformed datagram is dropped
//! without disturbing the stream. There is no reconnect logic here — when
//! the session dies the client parks in `Disconnected` and the caller
//! decides whether to dial again.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use omicron_core::{decode_event_packet, encode_handshake, EventQueue, ProtocolVariant};
use thiserror::Error;
use tokio::{
    io::AsyncWriteExt,
    net::{TcpStream, UdpSocket},
    sync::{watch, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

/// Errors that can occur while establishing a session.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The TCP control channel could not be established.
    #[error("failed to connect to input server at {addr}: {source}")]
    ControlConnect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The local UDP data socket could not be bound.
    #[error("failed to bind data port {port}: {source}")]
    DataBind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// The handshake could not be written on the control channel.
    #[error("failed to send handshake: {0}")]
    Handshake(#[source] std::io::Error),
}

/// Configuration for one session with an input server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorConfig {
    /// Hostname or IP of the input server.
    pub server_host: String,
    /// TCP port of the server's control channel.
    pub control_port: u16,
    /// Local UDP port to bind for the event stream.
    pub data_port: u16,
    /// Protocol variant announced in the handshake.
    pub variant: ProtocolVariant,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            server_host: "localhost".to_string(),
            control_port: omicron_core::CONTROL_PORT_DEFAULT,
            data_port: omicron_core::DATA_PORT_DEFAULT,
            variant: ProtocolVariant::default(),
        }
    }
}

/// Session state as observable by the consumer.
///
/// There is no explicit "stream ended" notification on the data channel:
/// callers that care about silent stream loss poll [`ConnectorClient::state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No session; `connect` may be called.
    Disconnected,
    /// Control channel handshaken and the receive task is running.
    Connected,
}

/// Handles owned by an active session; dropped as a unit on disconnect.
struct Session {
    /// Kept open for the lifetime of the session; the server uses the
    /// control-channel close as the client-gone signal.
    control: TcpStream,
    shutdown_tx: watch::Sender<bool>,
    receive_task: JoinHandle<()>,
}

/// Client for the Omicron input server.
///
/// One `ConnectorClient` manages at most one session at a time, but nothing
/// prevents running several clients against different servers or ports in
/// the same process.
pub struct ConnectorClient {
    config: ConnectorConfig,
    queue: Arc<EventQueue>,
    session: Mutex<Option<Session>>,
    dropped_packets: Arc<AtomicU64>,
    /// Written by the receive task on exit; read by `state()`.
    state_rx: Mutex<Option<watch::Receiver<ConnectionState>>>,
}

impl ConnectorClient {
    /// Creates a disconnected client that will publish into `queue`.
    pub fn new(config: ConnectorConfig, queue: Arc<EventQueue>) -> Self {
        Self {
            config,
            queue,
            session: Mutex::new(None),
            dropped_packets: Arc::new(AtomicU64::new(0)),
            state_rx: Mutex::new(None),
        }
    }

    /// Establishes a session: control connect, data bind, handshake, and
    /// receive-task spawn, in that order.
    ///
    /// On any failure the client is left fully disconnected; in particular a
    /// data-bind failure closes the already-opened control channel before
    /// returning.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] when the control channel is refused or
    /// unreachable, the local data port cannot be bound, or the handshake
    /// write fails.
    pub async fn connect(&self) -> Result<(), ConnectionError> {
        let mut session_guard = self.session.lock().await;
        if session_guard.is_some() {
            debug!("connect called on an already-connected client; ignoring");
            return Ok(());
        }

        let control_addr = format!("{}:{}", self.config.server_host, self.config.control_port);
        info!(addr = %control_addr, "connecting to input server");

        let mut control =
            TcpStream::connect(&control_addr)
                .await
                .map_err(|source| ConnectionError::ControlConnect {
                    addr: control_addr.clone(),
                    source,
                })?;

        // Bind the data socket before the handshake so the server never
        // streams at a port nobody owns. A bind failure closes the control
        // channel by dropping it.
        let bind_addr: SocketAddr = ([0, 0, 0, 0], self.config.data_port).into();
        let data_socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|source| ConnectionError::DataBind {
                port: self.config.data_port,
                source,
            })?;

        let handshake = encode_handshake(self.config.variant, self.config.data_port);
        control
            .write_all(&handshake)
            .await
            .map_err(ConnectionError::Handshake)?;
        info!(
            variant = ?self.config.variant,
            data_port = self.config.data_port,
            "handshake sent"
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connected);

        let receive_task = tokio::spawn(receive_loop(
            data_socket,
            Arc::clone(&self.queue),
            Arc::clone(&self.dropped_packets),
            shutdown_rx,
            state_tx,
        ));

        *session_guard = Some(Session {
            control,
            shutdown_tx,
            receive_task,
        });
        *self.state_rx.lock().await = Some(state_rx);
        Ok(())
    }

    /// Tears down the session: stops the receive task, then closes the data
    /// and control sockets by dropping them.
    ///
    /// Idempotent: calling this on a disconnected client is a no-op.
    pub async fn disconnect(&self) {
        let session = self.session.lock().await.take();
        let Some(session) = session else {
            debug!("disconnect called while already disconnected");
            return;
        };

        // Wake the receive task out of its pending read.
        let _ = session.shutdown_tx.send(true);
        if session.receive_task.await.is_err() {
            warn!("receive task panicked during shutdown");
        }

        // Dropping the control stream closes the TCP connection; the server
        // treats that as the end of the session.
        drop(session.control);
        info!("disconnected from input server");
    }

    /// Current session state.
    ///
    /// Flips to [`ConnectionState::Disconnected`] when the receive task has
    /// exited for any reason, including a socket error underneath a live
    /// session.
    pub async fn state(&self) -> ConnectionState {
        let guard = self.state_rx.lock().await;
        match guard.as_ref() {
            Some(rx) => *rx.borrow(),
            None => ConnectionState::Disconnected,
        }
    }

    /// Number of datagrams dropped because they failed to decode.
    pub fn dropped_packets(&self) -> u64 {
        self.dropped_packets.load(Ordering::Relaxed)
    }

    /// The queue this client publishes into.
    pub fn queue(&self) -> &Arc<EventQueue> {
        &self.queue
    }
}

/// Receives datagrams until shutdown is signalled or the socket dies.
///
/// Runs as its own task so the consumer's cadence never back-pressures the
/// network path. The read has no timeout: the task parks in `recv_from`
/// until a datagram arrives or `shutdown_rx` fires, which abandons the
/// pending read via `select!`.
async fn receive_loop(
    socket: UdpSocket,
    queue: Arc<EventQueue>,
    dropped: Arc<AtomicU64>,
    mut shutdown_rx: watch::Receiver<bool>,
    state_tx: watch::Sender<ConnectionState>,
) {
    // Datagrams longer than a packet are legal; the codec ignores the tail.
    let mut buf = vec![0u8; 2048];
    info!("receive loop started");

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                debug!("receive loop shutdown signalled");
                break;
            }
            result = socket.recv_from(&mut buf) => {
                let len = match result {
                    Ok((len, _peer)) => len,
                    Err(e) => {
                        warn!("data socket error, ending receive loop: {e}");
                        break;
                    }
                };
                match decode_event_packet(&buf[..len]) {
                    Ok(event) => queue.publish(event),
                    Err(e) => {
                        // A single bad datagram must not stop the stream.
                        let total = dropped.fetch_add(1, Ordering::Relaxed) + 1;
                        warn!(total, "dropping undecodable datagram: {e}");
                    }
                }
            }
        }
    }

    let _ = state_tx.send(ConnectionState::Disconnected);
    info!("receive loop ended");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
