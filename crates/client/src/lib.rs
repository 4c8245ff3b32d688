//! Client for the plugin-scoped OAuth2 credential and local-data store.
//!
//! [`PluginData`] owns the transport, built once from host configuration,
//! and hands out per-caller façades:
//!
//! - [`OAuthCredentialClient`] for OAuth2 credential records;
//! - [`KeyValueClient`] for scoped JSON values.
//!
//! Every façade method returns a [`Call`], a `'static` future resolving to
//! `Result<T, PluginDataError>`. Callback-style consumers use
//! [`CallbackExt::with_callback`].

pub mod callback;
pub mod codec;
pub mod dispatch;
pub mod http;
pub mod local_data;
pub mod oauth;

pub use callback::CallbackExt;
pub use dispatch::{Call, Dispatcher};
pub use http::HttpTransport;
pub use local_data::KeyValueClient;
pub use oauth::OAuthCredentialClient;
pub use plugindata_types::{
    Caller, OAUTH_PROVIDER, OAUTH_USER, OAuth2Data, OAuthKind, PluginDataError,
    PluginDataTransport, ResponseEnvelope, SCOPE_PROVIDER, SCOPE_USER, Scope, ScopeKind,
};

use plugindata_config::{Config, HOST_ENV_VAR};
use plugindata_types::traits::Result;
use std::sync::Arc;

/// Entry point holding the shared, immutable transport.
#[derive(Clone)]
pub struct PluginData {
    dispatcher: Dispatcher,
}

impl PluginData {
    /// Builds a client over an explicit transport.
    #[must_use]
    pub fn new(transport: Arc<dyn PluginDataTransport>) -> Self {
        Self {
            dispatcher: Dispatcher::new(transport),
        }
    }

    /// Builds an HTTP client for the configured host.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDataError::MissingConfiguration`] if `config.host` is
    /// blank.
    pub fn from_config(config: &Config) -> Result<Self> {
        let host = config.host.trim();
        if host.is_empty() {
            return Err(PluginDataError::MissingConfiguration(HOST_ENV_VAR));
        }
        tracing::info!(%host, "plugin-data client configured");
        Ok(Self::new(Arc::new(HttpTransport::new(host))))
    }

    /// Builds an HTTP client from `CONVERSEAI_PLUGINDATA_HOST`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDataError::MissingConfiguration`] if the variable is
    /// unset, before any client exists.
    pub fn from_env() -> Result<Self> {
        Self::from_config(&Config::from_env()?)
    }

    /// OAuth2 credential operations on behalf of `caller`.
    pub fn oauth(&self, caller: impl Into<Caller>) -> OAuthCredentialClient {
        OAuthCredentialClient::new(self.dispatcher.clone(), caller)
    }

    /// Key/value operations on behalf of `caller`.
    pub fn local_data(&self, caller: impl Into<Caller>) -> KeyValueClient {
        KeyValueClient::new(self.dispatcher.clone(), caller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugindata_store::InMemoryTransport;
    use serde_json::{Value, json};

    #[tokio::test]
    async fn test_facades_share_transport() {
        let transport = Arc::new(InMemoryTransport::new());
        let pd = PluginData::new(transport.clone());
        let caller = json!({"botId": "b-1", "userId": "u-1"});

        pd.local_data(caller.clone())
            .store("k", "v", None)
            .await
            .unwrap();
        let got: Option<Value> = pd.local_data(caller.clone()).fetch("k", None).await.unwrap();
        assert_eq!(got, Some(json!("v")));

        pd.oauth(caller.clone())
            .create(OAUTH_USER, OAuth2Data::new("tok"))
            .await
            .unwrap();
        assert!(pd.oauth(caller).get(OAUTH_USER).await.is_ok());
        assert_eq!(transport.calls(), 4);
    }

    #[test]
    fn test_missing_host_fails_before_any_client() {
        let err = Config::from_yaml("log:\n  level: info\n")
            .and_then(|c| PluginData::from_config(&c))
            .err()
            .unwrap();
        assert!(matches!(err, PluginDataError::MissingConfiguration(_)));
    }

    #[test]
    fn test_from_config_builds_http_client() {
        let pd = PluginData::from_config(&Config::new("http://localhost:9")).unwrap();
        assert_eq!(pd.local_data("c").caller(), &Caller::from("c"));
    }

    #[test]
    fn test_from_config_rejects_blank_host() {
        for host in ["", "   "] {
            let err = PluginData::from_config(&Config::new(host)).err().unwrap();
            assert!(matches!(
                err,
                PluginDataError::MissingConfiguration(HOST_ENV_VAR)
            ));
        }
    }

    #[test]
    fn test_from_env_without_host_fails() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            let err = PluginData::from_env().err().unwrap();
            assert!(matches!(
                err,
                PluginDataError::MissingConfiguration(HOST_ENV_VAR)
            ));
            Ok(())
        });
    }

    #[test]
    fn test_from_env_with_host() {
        figment::Jail::expect_with(|jail| {
            jail.set_env(HOST_ENV_VAR, "http://localhost:9");
            let pd = PluginData::from_env().unwrap();
            assert_eq!(pd.oauth("c").caller(), &Caller::from("c"));
            Ok(())
        });
    }
}
