//! Error types shared across the client.

use thiserror::Error;

/// Failures while loading or saving persisted settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a configuration directory")]
    NoConfigDir,
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected user-supplied connection parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("server address cannot be empty")]
    EmptyServer,
    #[error("hostname cannot be empty")]
    EmptyHost,
    #[error("invalid port `{0}`")]
    InvalidPort(String),
    #[error("invalid server address format")]
    MalformedAddress,
    #[error("display name cannot be empty")]
    EmptyName,
    #[error("display name too long (max {max} characters)")]
    NameTooLong { max: usize },
    #[error("room name cannot be empty")]
    EmptyRoom,
    #[error("room name must be {max} characters or fewer")]
    RoomTooLong { max: usize },
}

/// Failures on the real-time channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The backend thread is gone; nothing can be transmitted any more.
    #[error("channel is closed")]
    Closed,
    #[error("could not encode payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Top-level error for the client crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Channel(#[from] ChannelError),
}
