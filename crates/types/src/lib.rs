//! Core types and traits for the plugin-data workspace.
//!
//! This crate defines the vocabulary shared by every layer of the client:
//! the error taxonomy, storage scopes, OAuth2 credential records, the wire
//! request/response shapes, and the transport trait that the client relays
//! operations through.

pub mod envelope;
pub mod error;
pub mod oauth;
pub mod scope;
pub mod traits;

pub use envelope::{Caller, LocalDataRequest, OAuthRequest, Operation, Request, ResponseEnvelope};
pub use error::{PluginDataError, TransportError};
pub use oauth::{OAUTH_PROVIDER, OAUTH_USER, OAuth2Data, OAuthKind};
pub use scope::{ResolvedScope, SCOPE_PROVIDER, SCOPE_USER, Scope, ScopeKind};
pub use traits::{PluginDataTransport, TransportReply};
