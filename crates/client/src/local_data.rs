//! Scoped key/value storage for one caller.
//!
//! Values are JSON-encoded on write and decoded on read. The service has
//! no delete primitive: [`KeyValueClient::delete`] overwrites the key with
//! an empty object, so a deleted key later fetches as `{}` rather than
//! `None`.

use crate::codec;
use crate::dispatch::{Call, Dispatcher};
use plugindata_types::{Caller, LocalDataRequest, Operation, Request, Scope};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};

/// Fetch, store, and delete values under `(caller, scope, key)`.
///
/// Every method takes an optional [`Scope`]; `None` means
/// [`ScopeKind::User`](plugindata_types::ScopeKind::User).
#[derive(Clone)]
pub struct KeyValueClient {
    dispatcher: Dispatcher,
    caller: Caller,
}

impl KeyValueClient {
    pub fn new(dispatcher: Dispatcher, caller: impl Into<Caller>) -> Self {
        Self {
            dispatcher,
            caller: caller.into(),
        }
    }

    #[must_use]
    pub fn caller(&self) -> &Caller {
        &self.caller
    }

    /// Read the value stored under `key`, or `None` if nothing was stored.
    pub fn fetch<T>(&self, key: impl Into<String>, scope: Option<Scope>) -> Call<Option<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let request = self.request(key.into(), scope, None);
        let dispatcher = self.dispatcher.clone();
        Box::pin(async move {
            dispatcher
                .invoke_with(Operation::GetPluginLocalData, request, |r| codec::decode(&r))
                .await
        })
    }

    /// Write `value` under `key` and return the value the service echoes.
    ///
    /// `value` is encoded before anything is sent; an encoding failure
    /// resolves to [`PluginDataError::Encode`](plugindata_types::PluginDataError::Encode)
    /// without a transport call.
    pub fn store<V>(
        &self,
        key: impl Into<String>,
        value: &V,
        scope: Option<Scope>,
    ) -> Call<Option<Value>>
    where
        V: Serialize + ?Sized,
    {
        match codec::encode(value) {
            Ok(data) => self.write(key.into(), data, scope),
            Err(e) => Box::pin(std::future::ready(Err(e))),
        }
    }

    /// Overwrite `key` with an empty object.
    pub fn delete(&self, key: impl Into<String>, scope: Option<Scope>) -> Call<Option<Value>> {
        self.store(key, &json!({}), scope)
    }

    fn write(&self, key: String, data: Vec<u8>, scope: Option<Scope>) -> Call<Option<Value>> {
        let request = self.request(key, scope, Some(data));
        let dispatcher = self.dispatcher.clone();
        Box::pin(async move {
            dispatcher
                .invoke_with(Operation::StorePluginLocalData, request, |r| {
                    codec::decode(&r)
                })
                .await
        })
    }

    fn request(&self, key: String, scope: Option<Scope>, data: Option<Vec<u8>>) -> Request {
        let resolved = Scope::resolve_or_default(scope);
        Request::LocalData(LocalDataRequest {
            caller: self.caller.clone(),
            scope: resolved.kind,
            scope_uuid: resolved.uuid,
            key,
            data,
        })
    }
}
