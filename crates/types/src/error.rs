//! Unified error type for the plugin-data workspace.

use thiserror::Error;

/// Failure of the transport call itself, before any reply could be trusted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request could not be delivered (connection refused, DNS, TLS …).
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The service answered, but the reply was not a response envelope.
    #[error("malformed reply: {0}")]
    Malformed(String),
}

/// Enumerates every error a plugin-data operation can report.
#[derive(Debug, Error)]
pub enum PluginDataError {
    /// A required host configuration value is absent.
    #[error("environment variable {0} does not exist")]
    MissingConfiguration(&'static str),

    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The transport call failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The service replied successfully but embedded an `error` value.
    #[error("application error: {0}")]
    Application(serde_json::Value),

    /// A value could not be serialized into a stored payload.
    #[error("failed to encode payload: {0}")]
    Encode(#[source] serde_json::Error),

    /// A stored payload is not valid UTF-8.
    #[error("stored payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// A stored payload is not valid JSON.
    #[error("failed to decode payload: {0}")]
    Decode(#[source] serde_json::Error),

    /// A wire scope value that the platform does not expose.
    #[error("unsupported scope kind: {0}")]
    UnsupportedScope(u8),

    /// A wire OAuth type value that the platform does not expose.
    #[error("unsupported oauth type: {0}")]
    UnsupportedOAuthKind(u8),
}

// ── Feature-gated From impls ──────────────────────────────────────────────────

#[cfg(feature = "rquest")]
impl From<rquest::Error> for TransportError {
    fn from(e: rquest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

impl PluginDataError {
    /// Returns `true` if the transport call itself failed.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if the service reported the failure in its reply.
    #[must_use]
    pub fn is_application(&self) -> bool {
        matches!(self, Self::Application(_))
    }

    /// Returns `true` for payload encoding or decoding failures.
    #[must_use]
    pub fn is_codec(&self) -> bool {
        matches!(
            self,
            Self::Encode(_) | Self::InvalidUtf8(_) | Self::Decode(_)
        )
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, PluginDataError>;
