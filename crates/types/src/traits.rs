//! The transport seam shared by the client and its backends.
//!
//! Higher layers depend only on `plugindata-types`; concrete transports
//! (HTTP, in-memory) implement [`PluginDataTransport`] in their own crates.

use crate::{Operation, Request, ResponseEnvelope, TransportError};
use async_trait::async_trait;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, crate::PluginDataError>;

/// Outcome of one transport call.
///
/// Mirrors an error-first `(err, response)` pair: both halves may be set at
/// once, for example a failed status whose body still parsed as an envelope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportReply {
    pub error: Option<TransportError>,
    pub response: Option<ResponseEnvelope>,
}

impl TransportReply {
    /// A delivered reply.
    #[must_use]
    pub fn ok(response: ResponseEnvelope) -> Self {
        Self {
            error: None,
            response: Some(response),
        }
    }

    /// A failed call with no reply.
    #[must_use]
    pub fn failed(error: TransportError) -> Self {
        Self {
            error: Some(error),
            response: None,
        }
    }

    /// A failed call that still produced a reply.
    #[must_use]
    pub fn failed_with(error: TransportError, response: ResponseEnvelope) -> Self {
        Self {
            error: Some(error),
            response: Some(response),
        }
    }
}

/// Performs plugin-data operations against the remote service.
///
/// Implementations perform exactly one remote call per invocation and
/// never retry; error normalisation is the caller's job.
#[async_trait]
pub trait PluginDataTransport: Send + Sync {
    /// Send `request` as `operation` and report what came back.
    async fn call(&self, operation: Operation, request: Request) -> TransportReply;
}
