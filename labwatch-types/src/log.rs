//! Log records and the wire messages of the live-log stream.

use serde::{Deserialize, Serialize};

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The wire name of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One log line pushed by the server side of the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// The service this line belongs to - the subscription key.
    pub service: String,
    /// ISO-8601 timestamp as produced by the server.
    pub timestamp: String,
    pub message: String,
    pub level: LogLevel,
}

/// Messages a client sends over the stream, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Name the service of interest. Sent exactly once, immediately after
    /// the connection opens.
    Subscribe { service: String },
}

/// Messages the server pushes, tagged by `type`.
///
/// The channel is shared: records for other subscribers' services arrive
/// here too and are filtered by the subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Log(LogRecord),
    Status {
        service: String,
        timestamp: String,
        message: String,
    },
}

impl ServerMessage {
    /// The service this message concerns.
    pub fn service(&self) -> &str {
        match self {
            ServerMessage::Log(record) => &record.service,
            ServerMessage::Status { service, .. } => service,
        }
    }
}
