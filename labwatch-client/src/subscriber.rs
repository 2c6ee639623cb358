//! Live-log stream subscriber.
//!
//! The dashboard's log viewer is fed by one duplex WebSocket channel per
//! server process. A subscriber names the service it cares about with a
//! single subscribe message, then filters the shared stream: records for
//! other services are discarded silently, malformed frames are logged and
//! dropped, and matching records land in a capacity-bounded buffer.
//!
//! The connection lifecycle is an explicit state machine:
//!
//! ```text
//! Disconnected ──connect──▶ Connecting ──handshake──▶ Open
//!       ▲                        │                      │
//!       └────────────────────────┴──── close / error ───┘
//! ```
//!
//! There is no auto-reconnect: a dropped connection surfaces as
//! `Disconnected` and the owner decides when to re-enable.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use labwatch_types::{BoundedBuffer, ClientMessage, LogRecord, ServerMessage};

/// How many log records the viewer keeps; oldest evicted first.
pub const DEFAULT_LOG_CAPACITY: usize = 100;

/// Connection lifecycle of a log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Open,
}

/// A pausable subscription to the live-log stream of one service.
///
/// The log buffer survives pause/resume cycles, but records pushed while
/// the stream is disabled are never seen: disabling tears the connection
/// down entirely, and resuming performs a fresh connect and a fresh
/// subscribe handshake.
///
/// # Example
///
/// ```rust,no_run
/// use labwatch_client::LogStream;
///
/// # tokio_test::block_on(async {
/// let mut stream = LogStream::connect("ws://localhost:3001/ws", "portainer");
///
/// // ... later, pause and resume the viewer
/// stream.set_enabled(false);
/// stream.set_enabled(true);
///
/// for record in stream.logs() {
///     println!("[{}] {}", record.level, record.message);
/// }
/// # });
/// ```
#[derive(Debug)]
pub struct LogStream {
    url: String,
    service: String,
    buffer: Arc<Mutex<BoundedBuffer<LogRecord>>>,
    conn: Option<Connection>,
    enabled: bool,
}

#[derive(Debug)]
struct Connection {
    stop_tx: watch::Sender<bool>,
    state_rx: watch::Receiver<ConnectionState>,
}

impl LogStream {
    /// Start a subscription with the default buffer capacity.
    pub fn connect(url: impl Into<String>, service: impl Into<String>) -> Self {
        Self::with_capacity(url, service, DEFAULT_LOG_CAPACITY)
    }

    /// Start a subscription with a custom buffer capacity.
    pub fn with_capacity(
        url: impl Into<String>,
        service: impl Into<String>,
        capacity: usize,
    ) -> Self {
        let mut stream = Self {
            url: url.into(),
            service: service.into(),
            buffer: Arc::new(Mutex::new(BoundedBuffer::new(capacity))),
            conn: None,
            enabled: true,
        };
        stream.start_connection();
        stream
    }

    /// The service this stream is subscribed to.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Whether the stream is currently enabled.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.conn
            .as_ref()
            .map(|c| *c.state_rx.borrow())
            .unwrap_or(ConnectionState::Disconnected)
    }

    pub fn is_connected(&self) -> bool {
        self.connection_state() == ConnectionState::Open
    }

    /// Copy of the buffered records, oldest first.
    pub fn logs(&self) -> Vec<LogRecord> {
        self.buffer.lock().to_vec()
    }

    /// Drop all buffered records.
    pub fn clear(&mut self) {
        self.buffer.lock().clear();
    }

    /// Pause or resume the subscription.
    ///
    /// Disabling tears the connection down; resuming reconnects and
    /// re-subscribes from scratch. No replay of missed records.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            self.start_connection();
        } else {
            self.teardown();
        }
    }

    /// Permanently stop the subscription, keeping the buffered records.
    pub fn disconnect(&mut self) {
        self.enabled = false;
        self.teardown();
    }

    fn start_connection(&mut self) {
        self.teardown();

        let (stop_tx, stop_rx) = watch::channel(false);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);

        tokio::spawn(run_connection(
            self.url.clone(),
            self.service.clone(),
            self.buffer.clone(),
            state_tx,
            stop_rx,
        ));

        self.conn = Some(Connection { stop_tx, state_rx });
    }

    fn teardown(&mut self) {
        if let Some(conn) = self.conn.take() {
            let _ = conn.stop_tx.send(true);
        }
    }
}

impl Drop for LogStream {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// One connection attempt: handshake, subscribe, then filter inbound
/// frames until stopped or the peer goes away. Always closes the socket
/// and settles on Disconnected.
async fn run_connection(
    url: String,
    service: String,
    buffer: Arc<Mutex<BoundedBuffer<LogRecord>>>,
    state_tx: watch::Sender<ConnectionState>,
    mut stop_rx: watch::Receiver<bool>,
) {
    let _ = state_tx.send(ConnectionState::Connecting);

    let (mut ws, _) = match connect_async(&url).await {
        Ok(conn) => conn,
        Err(e) => {
            warn!("log stream connect failed: {}", e);
            let _ = state_tx.send(ConnectionState::Disconnected);
            return;
        }
    };

    // Name the service of interest before reading anything
    let subscribe = serde_json::to_string(&ClientMessage::Subscribe { service: service.clone() })
        .unwrap_or_else(|_| "{}".to_string());
    if ws.send(Message::text(subscribe)).await.is_err() {
        let _ = ws.close(None).await;
        let _ = state_tx.send(ConnectionState::Disconnected);
        return;
    }

    info!("log stream subscribed to service: {}", service);
    let _ = state_tx.send(ConnectionState::Open);

    loop {
        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
            }
            frame = ws.next() => match frame {
                Some(Ok(Message::Text(text))) => handle_frame(&service, &buffer, &text),
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("log stream read error: {}", e);
                    break;
                }
            }
        }
    }

    let _ = ws.close(None).await;
    let _ = state_tx.send(ConnectionState::Disconnected);
}

/// Dispatch one inbound frame. Only log records for the subscribed service
/// reach the buffer; everything else is dropped without tearing the
/// connection down.
fn handle_frame(service: &str, buffer: &Mutex<BoundedBuffer<LogRecord>>, text: &str) {
    match serde_json::from_str::<ServerMessage>(text) {
        Ok(ServerMessage::Log(record)) if record.service == service => {
            buffer.lock().push(record);
        }
        Ok(ServerMessage::Log(record)) => {
            // Shared channel: another subscriber's service
            debug!("ignoring log record for service: {}", record.service);
        }
        Ok(ServerMessage::Status { message, .. }) => {
            debug!("log stream status: {}", message);
        }
        Err(e) => {
            warn!("failed to parse stream message: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use futures_util::stream::{SplitSink, SplitStream};
    use labwatch_types::LogLevel;
    use tokio::net::{TcpListener, TcpStream};
    use tokio_tungstenite::WebSocketStream;

    type ServerSink = SplitSink<WebSocketStream<TcpStream>, Message>;
    type ServerSource = SplitStream<WebSocketStream<TcpStream>>;

    fn log_frame(service: &str, message: &str) -> String {
        serde_json::to_string(&ServerMessage::Log(LogRecord {
            service: service.to_string(),
            timestamp: "2024-06-01T12:00:00.000Z".to_string(),
            message: message.to_string(),
            level: LogLevel::Info,
        }))
        .unwrap()
    }

    /// Accept one WebSocket connection, assert the subscribe handshake for
    /// `expected_service`, and hand the sink to `feed`.
    async fn accept_subscriber(
        listener: &TcpListener,
        expected_service: &str,
        subscribes: &AtomicUsize,
    ) -> (ServerSink, ServerSource) {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        let (sink, mut source) = ws.split();

        let first = source.next().await.unwrap().unwrap();
        let msg: ClientMessage = serde_json::from_str(first.to_text().unwrap()).unwrap();
        let ClientMessage::Subscribe { service } = msg;
        assert_eq!(service, expected_service);
        subscribes.fetch_add(1, Ordering::SeqCst);

        (sink, source)
    }

    async fn wait_until(mut condition: impl FnMut() -> bool, what: &str) {
        for _ in 0..500 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("timed out waiting for {}", what);
    }

    #[tokio::test]
    async fn test_subscribe_handshake_and_filtering() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let subscribes = Arc::new(AtomicUsize::new(0));

        let server_subscribes = subscribes.clone();
        let server = tokio::spawn(async move {
            let (mut sink, _source) =
                accept_subscriber(&listener, "portainer", &server_subscribes).await;

            // Matching, foreign, malformed, status, matching
            sink.send(Message::text(log_frame("portainer", "first"))).await.unwrap();
            sink.send(Message::text(log_frame("webmin", "foreign"))).await.unwrap();
            sink.send(Message::text("not json")).await.unwrap();
            sink.send(Message::text(
                r#"{"type":"status","service":"portainer","timestamp":"t","message":"ok"}"#,
            ))
            .await
            .unwrap();
            sink.send(Message::text(log_frame("portainer", "second"))).await.unwrap();

            // Keep the connection open until the client is done
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let stream = LogStream::connect(format!("ws://{}", addr), "portainer");

        wait_until(|| stream.logs().len() == 2, "both matching records").await;
        let messages: Vec<String> = stream.logs().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert!(stream.is_connected());
        assert_eq!(subscribes.load(Ordering::SeqCst), 1);

        server.abort();
    }

    #[tokio::test]
    async fn test_buffer_keeps_last_hundred() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let subscribes = Arc::new(AtomicUsize::new(0));

        let server_subscribes = subscribes.clone();
        let server = tokio::spawn(async move {
            let (mut sink, _source) =
                accept_subscriber(&listener, "ha", &server_subscribes).await;
            for i in 0..105 {
                sink.send(Message::text(log_frame("ha", &i.to_string()))).await.unwrap();
            }
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let stream = LogStream::connect(format!("ws://{}", addr), "ha");

        wait_until(
            || stream.logs().last().is_some_and(|r| r.message == "104"),
            "final record",
        )
        .await;

        let logs = stream.logs();
        assert_eq!(logs.len(), DEFAULT_LOG_CAPACITY);
        assert_eq!(logs.first().unwrap().message, "5");
        assert_eq!(logs.last().unwrap().message, "104");

        server.abort();
    }

    #[tokio::test]
    async fn test_disable_enable_cycle() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let subscribes = Arc::new(AtomicUsize::new(0));

        let server_subscribes = subscribes.clone();
        let server = tokio::spawn(async move {
            // First connection: send one record, then wait for the client
            // to drop it
            let (mut sink, mut source) =
                accept_subscriber(&listener, "cockpit", &server_subscribes).await;
            sink.send(Message::text(log_frame("cockpit", "before"))).await.unwrap();
            while let Some(Ok(_)) = source.next().await {}

            // Second connection after resume: fresh handshake, new record
            let (mut sink, _source) =
                accept_subscriber(&listener, "cockpit", &server_subscribes).await;
            sink.send(Message::text(log_frame("cockpit", "after"))).await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let mut stream = LogStream::connect(format!("ws://{}", addr), "cockpit");
        wait_until(|| !stream.logs().is_empty(), "first record").await;

        stream.set_enabled(false);
        assert!(!stream.enabled());
        wait_until(|| !stream.is_connected(), "teardown").await;

        stream.set_enabled(true);
        wait_until(|| stream.logs().len() == 2, "record after resume").await;

        // Exactly one new handshake, buffer survived the cycle
        assert_eq!(subscribes.load(Ordering::SeqCst), 2);
        let messages: Vec<String> = stream.logs().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["before", "after"]);

        server.abort();
    }

    #[tokio::test]
    async fn test_connect_failure_is_disconnected() {
        // Nothing listens here
        let stream = LogStream::connect("ws://127.0.0.1:1", "portainer");

        wait_until(
            || stream.connection_state() == ConnectionState::Disconnected,
            "failed connect to settle",
        )
        .await;
        assert!(!stream.is_connected());
        assert!(stream.logs().is_empty());
    }

    #[tokio::test]
    async fn test_server_close_surfaces_disconnected_without_reconnect() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let subscribes = Arc::new(AtomicUsize::new(0));

        let server_subscribes = subscribes.clone();
        tokio::spawn(async move {
            let (mut sink, _source) =
                accept_subscriber(&listener, "webmin", &server_subscribes).await;
            sink.send(Message::Close(None)).await.unwrap();
            // Would accept a reconnect, but none must come
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let stream = LogStream::connect(format!("ws://{}", addr), "webmin");
        wait_until(
            || stream.connection_state() == ConnectionState::Disconnected,
            "server close",
        )
        .await;

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(subscribes.load(Ordering::SeqCst), 1, "no auto-reconnect");
    }

    #[tokio::test]
    async fn test_clear_empties_buffer() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let subscribes = Arc::new(AtomicUsize::new(0));

        let server_subscribes = subscribes.clone();
        let server = tokio::spawn(async move {
            let (mut sink, _source) =
                accept_subscriber(&listener, "nas", &server_subscribes).await;
            sink.send(Message::text(log_frame("nas", "entry"))).await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let mut stream = LogStream::connect(format!("ws://{}", addr), "nas");
        wait_until(|| !stream.logs().is_empty(), "record").await;

        stream.clear();
        assert!(stream.logs().is_empty());

        server.abort();
    }
}
