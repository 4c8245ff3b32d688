//! Storage scopes for plugin local data.
//!
//! A scope is either a bare [`ScopeKind`] or a kind qualified by a UUID.
//! Both resolve to the canonical [`ResolvedScope`] that goes on the wire.

use crate::PluginDataError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Partition of the local-data store.
///
/// Wire values: `Provider = 0`, `User = 1`. The platform also reserves
/// `2` (request) and `3` (conversation), which it does not honour, so
/// they are rejected rather than exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ScopeKind {
    /// Shared by every user of the plugin.
    Provider = 0,
    /// Private to the calling user.
    #[default]
    User = 1,
}

/// Wire value of [`ScopeKind::Provider`].
pub const SCOPE_PROVIDER: ScopeKind = ScopeKind::Provider;
/// Wire value of [`ScopeKind::User`].
pub const SCOPE_USER: ScopeKind = ScopeKind::User;

impl From<ScopeKind> for u8 {
    fn from(kind: ScopeKind) -> Self {
        kind as u8
    }
}

impl TryFrom<u8> for ScopeKind {
    type Error = PluginDataError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Provider),
            1 => Ok(Self::User),
            other => Err(PluginDataError::UnsupportedScope(other)),
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider => write!(f, "provider"),
            Self::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for ScopeKind {
    type Err = PluginDataError;

    /// Parses `"provider"` / `"user"` or the numeric wire value.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDataError::Config`] for unknown names and
    /// [`PluginDataError::UnsupportedScope`] for unexposed wire values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "provider" => Ok(Self::Provider),
            "user" => Ok(Self::User),
            other => match other.parse::<u8>() {
                Ok(n) => Self::try_from(n),
                Err(_) => Err(PluginDataError::Config(format!("unknown scope: {s}"))),
            },
        }
    }
}

/// Scope argument accepted by the key/value client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// A bare scope kind.
    Simple(ScopeKind),
    /// A scope kind with an optional UUID qualifier.
    Qualified { kind: ScopeKind, uuid: Option<Uuid> },
}

impl Default for Scope {
    fn default() -> Self {
        Self::Simple(ScopeKind::User)
    }
}

impl From<ScopeKind> for Scope {
    fn from(kind: ScopeKind) -> Self {
        Self::Simple(kind)
    }
}

impl From<ResolvedScope> for Scope {
    fn from(resolved: ResolvedScope) -> Self {
        Self::Qualified {
            kind: resolved.kind,
            uuid: resolved.uuid,
        }
    }
}

impl Scope {
    /// Shorthand for a kind qualified by `uuid`.
    #[must_use]
    pub fn qualified(kind: ScopeKind, uuid: Uuid) -> Self {
        Self::Qualified {
            kind,
            uuid: Some(uuid),
        }
    }

    /// Resolves this scope into its canonical wire form.
    #[must_use]
    pub fn resolve(self) -> ResolvedScope {
        match self {
            Self::Simple(kind) => ResolvedScope { kind, uuid: None },
            Self::Qualified { kind, uuid } => ResolvedScope { kind, uuid },
        }
    }

    /// Resolves an optional scope argument, defaulting to [`ScopeKind::User`].
    #[must_use]
    pub fn resolve_or_default(scope: Option<Self>) -> ResolvedScope {
        scope.unwrap_or_default().resolve()
    }
}

/// Canonical `{kind, uuid}` pair sent as `scope` / `scopeUUID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ResolvedScope {
    pub kind: ScopeKind,
    pub uuid: Option<Uuid>,
}
