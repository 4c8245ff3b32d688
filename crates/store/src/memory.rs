//! In-memory emulation of the plugin-data service, backed by `HashMap`s
//! behind `Mutex`es.
//!
//! Answers the six service operations with the same envelope shapes the
//! remote service uses, including application errors for missing or
//! duplicate credential records.

use async_trait::async_trait;
use plugindata_types::{
    LocalDataRequest, OAuth2Data, OAuthKind, OAuthRequest, Operation, PluginDataTransport,
    Request, ResponseEnvelope, ScopeKind, TransportReply,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LocalKey {
    caller: String,
    scope: ScopeKind,
    scope_uuid: Option<Uuid>,
    key: String,
}

impl LocalKey {
    fn of(req: &LocalDataRequest) -> Self {
        Self {
            caller: req.caller.to_string(),
            scope: req.scope,
            scope_uuid: req.scope_uuid,
            key: req.key.clone(),
        }
    }
}

/// An in-memory [`PluginDataTransport`] for testing and ephemeral use.
#[derive(Default)]
pub struct InMemoryTransport {
    /// Credential records keyed by `(caller, oauthType)`.
    oauth: Mutex<HashMap<(String, OAuthKind), OAuth2Data>>,
    /// Stored payloads keyed by `(caller, scope, scopeUUID, key)`.
    local: Mutex<HashMap<LocalKey, Vec<u8>>>,
    calls: AtomicUsize,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn app_error(code: &str, message: impl Into<String>) -> ResponseEnvelope {
    ResponseEnvelope::with_error(json!({ "code": code, "message": message.into() }))
}

impl InMemoryTransport {
    /// Creates a new empty service emulation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of operations received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn oauth_call(&self, operation: Operation, req: OAuthRequest) -> ResponseEnvelope {
        let key = (req.caller.to_string(), req.oauth_type);
        let mut records = lock(&self.oauth);
        match operation {
            Operation::GetPluginOAuth2Info => match records.get(&key) {
                Some(data) => ResponseEnvelope::with_oauth2_data(data.clone()),
                None => app_error(
                    "NOT_FOUND",
                    format!("no {} oauth2 info for caller", req.oauth_type),
                ),
            },
            Operation::CreatePluginOAuth2Info => {
                let Some(data) = req.data else {
                    return app_error("INVALID_ARGUMENT", "oAuth2Data is required");
                };
                if records.contains_key(&key) {
                    return app_error(
                        "ALREADY_EXISTS",
                        format!("{} oauth2 info already exists", req.oauth_type),
                    );
                }
                records.insert(key, data.clone());
                ResponseEnvelope::with_oauth2_data(data)
            }
            Operation::UpdatePluginOAuth2Info => {
                let Some(data) = req.data else {
                    return app_error("INVALID_ARGUMENT", "oAuth2Data is required");
                };
                match records.get_mut(&key) {
                    Some(slot) => {
                        *slot = data.clone();
                        ResponseEnvelope::with_oauth2_data(data)
                    }
                    None => app_error(
                        "NOT_FOUND",
                        format!("no {} oauth2 info for caller", req.oauth_type),
                    ),
                }
            }
            Operation::DeletePluginOAuth2Info => {
                records.remove(&key);
                ResponseEnvelope::default()
            }
            other => app_error(
                "INVALID_ARGUMENT",
                format!("{other} does not accept an oauth2 request"),
            ),
        }
    }

    fn local_call(&self, operation: Operation, req: LocalDataRequest) -> ResponseEnvelope {
        let key = LocalKey::of(&req);
        let mut entries = lock(&self.local);
        match operation {
            Operation::GetPluginLocalData => match entries.get(&key) {
                Some(data) => ResponseEnvelope::with_data(data.clone()),
                None => ResponseEnvelope::default(),
            },
            Operation::StorePluginLocalData => match req.data {
                Some(data) => {
                    entries.insert(key, data.clone());
                    ResponseEnvelope::with_data(data)
                }
                None => {
                    entries.remove(&key);
                    ResponseEnvelope::default()
                }
            },
            other => app_error(
                "INVALID_ARGUMENT",
                format!("{other} does not accept a local-data request"),
            ),
        }
    }
}

#[async_trait]
impl PluginDataTransport for InMemoryTransport {
    async fn call(&self, operation: Operation, request: Request) -> TransportReply {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(%operation, "in-memory plugin-data call");
        let response = match request {
            Request::OAuth(req) => self.oauth_call(operation, req),
            Request::LocalData(req) => self.local_call(operation, req),
        };
        TransportReply::ok(response)
    }
}
