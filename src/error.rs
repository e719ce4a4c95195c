//! Error types for the dashboard sync client.

use thiserror::Error;

/// Failure of a single dashboard call.
///
/// The store flattens every variant into one human-readable `last_error`
/// string; the variants stay distinct for logging and tests.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Connection, DNS, TLS or timeout failure below HTTP.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("server returned HTTP {status}")]
    Server { status: u16 },

    /// The body was present but did not match the snapshot shape.
    #[error("decode error: {0}")]
    Decode(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl SyncError {
    pub fn decode(msg: impl Into<String>) -> Self {
        SyncError::Decode(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        SyncError::Config(msg.into())
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, SyncError::Transport(_))
    }

    pub fn is_server(&self) -> bool {
        matches!(self, SyncError::Server { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, SyncError::Decode(_))
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Decode(err.to_string())
    }
}
