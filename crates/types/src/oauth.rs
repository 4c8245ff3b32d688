//! OAuth2 credential records and their type discriminator.

use crate::PluginDataError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Which credential of a plugin a record belongs to.
///
/// Wire values: `User = 0`, `Provider = 1`. Note the ordering is the
/// reverse of [`ScopeKind`](crate::ScopeKind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum OAuthKind {
    /// Credential obtained on behalf of the calling user.
    User = 0,
    /// Credential belonging to the plugin provider itself.
    Provider = 1,
}

/// Wire value of [`OAuthKind::User`].
pub const OAUTH_USER: OAuthKind = OAuthKind::User;
/// Wire value of [`OAuthKind::Provider`].
pub const OAUTH_PROVIDER: OAuthKind = OAuthKind::Provider;

impl From<OAuthKind> for u8 {
    fn from(kind: OAuthKind) -> Self {
        kind as u8
    }
}

impl TryFrom<u8> for OAuthKind {
    type Error = PluginDataError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::User),
            1 => Ok(Self::Provider),
            other => Err(PluginDataError::UnsupportedOAuthKind(other)),
        }
    }
}

impl fmt::Display for OAuthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Provider => write!(f, "provider"),
        }
    }
}

impl std::str::FromStr for OAuthKind {
    type Err = PluginDataError;

    /// Parses `"user"` / `"provider"` or the numeric wire value.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDataError::Config`] for unknown names and
    /// [`PluginDataError::UnsupportedOAuthKind`] for unknown wire values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "provider" => Ok(Self::Provider),
            other => match other.parse::<u8>() {
                Ok(n) => Self::try_from(n),
                Err(_) => Err(PluginDataError::Config(format!("unknown oauth type: {s}"))),
            },
        }
    }
}

/// The credential field set stored for one `(caller, oauthType)` pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuth2Data {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Absolute expiry, seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant_type: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}

impl OAuth2Data {
    /// Create a record with the given access token and `Bearer` type.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            token_type: Some("Bearer".to_string()),
            ..Self::default()
        }
    }

    /// Set the expiry to `expires_in_secs` seconds from now.
    #[must_use]
    pub fn with_expiry(mut self, expires_in_secs: u64) -> Self {
        self.expires_at = Some(now_secs() + expires_in_secs);
        self
    }

    /// Attach a refresh token.
    #[must_use]
    pub fn with_refresh(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    #[must_use]
    pub fn with_grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.grant_type = Some(grant_type.into());
        self
    }

    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Insert one metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Return `true` if the access token expires within 60 seconds.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        let Some(expires_at) = self.expires_at else {
            return false;
        };
        now_secs() + 60 >= expires_at
    }
}
