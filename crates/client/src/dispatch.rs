//! Shared call path for every façade operation.
//!
//! Sends one request through the injected transport, folds the two error
//! channels into a single [`PluginDataError`], and applies the caller's
//! response decoder.
//!
//! Precedence: a non-null `error` field in the reply wins over a
//! transport-level failure when both are present.

use plugindata_types::{
    Operation, PluginDataError, PluginDataTransport, Request, ResponseEnvelope, TransportReply,
    traits::Result,
};
use std::{future::Future, pin::Pin, sync::Arc};

/// A pending client operation: a boxed, sendable, `'static` future.
pub type Call<T> = Pin<Box<dyn Future<Output = Result<T>> + Send>>;

/// Relays operations to a [`PluginDataTransport`] and normalises replies.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn PluginDataTransport>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(transport: Arc<dyn PluginDataTransport>) -> Self {
        Self { transport }
    }

    /// Invoke `operation` and return the raw response envelope.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDataError::Application`] if the reply carries an
    /// `error` value, otherwise [`PluginDataError::Transport`] if the call
    /// failed.
    pub async fn invoke(&self, operation: Operation, request: Request) -> Result<ResponseEnvelope> {
        self.invoke_with(operation, request, Ok).await
    }

    /// Invoke `operation` and pass a successful reply through `decode`.
    ///
    /// # Errors
    ///
    /// As [`Dispatcher::invoke`], plus whatever `decode` reports.
    pub async fn invoke_with<T, F>(
        &self,
        operation: Operation,
        request: Request,
        decode: F,
    ) -> Result<T>
    where
        F: FnOnce(ResponseEnvelope) -> Result<T>,
    {
        tracing::debug!(%operation, "dispatching plugin-data call");
        let reply = self.transport.call(operation, request).await;
        let response = settle(reply).inspect_err(|e| {
            let channel = if e.is_application() {
                "application"
            } else {
                "transport"
            };
            tracing::warn!(%operation, channel, error = %e, "plugin-data call failed");
        })?;
        decode(response)
    }
}

/// Fold a [`TransportReply`] into one outcome.
///
/// A reply with neither an error nor a response settles to an empty
/// envelope. An `error` field holding JSON `null` counts as absent.
///
/// # Errors
///
/// Returns the reply's application error if present, otherwise its
/// transport error.
pub fn settle(reply: TransportReply) -> Result<ResponseEnvelope> {
    let TransportReply { error, response } = reply;
    if let Some(app_error) = response
        .as_ref()
        .and_then(|r| r.error.clone())
        .filter(|e| !e.is_null())
    {
        return Err(PluginDataError::Application(app_error));
    }
    if let Some(error) = error {
        return Err(PluginDataError::Transport(error));
    }
    Ok(response.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use plugindata_types::{Caller, LocalDataRequest, ScopeKind, TransportError};
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replays a fixed reply and records what it was asked.
    struct Scripted {
        reply: TransportReply,
        calls: AtomicUsize,
        last: Mutex<Option<Operation>>,
    }

    impl Scripted {
        fn new(reply: TransportReply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl PluginDataTransport for Scripted {
        async fn call(&self, operation: Operation, _request: Request) -> TransportReply {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(operation);
            self.reply.clone()
        }
    }

    fn request() -> Request {
        Request::LocalData(LocalDataRequest {
            caller: Caller::from("c"),
            scope: ScopeKind::User,
            scope_uuid: None,
            key: "k".into(),
            data: None,
        })
    }

    fn network() -> TransportError {
        TransportError::Network("connection reset".into())
    }

    #[test]
    fn test_settle_success() {
        let env = ResponseEnvelope::with_data(b"1".to_vec());
        assert_eq!(settle(TransportReply::ok(env.clone())).unwrap(), env);
    }

    #[test]
    fn test_settle_transport_error() {
        let err = settle(TransportReply::failed(network())).unwrap_err();
        assert!(matches!(err, PluginDataError::Transport(TransportError::Network(_))));
    }

    #[test]
    fn test_settle_application_error_on_success() {
        let err = settle(TransportReply::ok(ResponseEnvelope::with_error("denied"))).unwrap_err();
        assert!(matches!(err, PluginDataError::Application(ref v) if v == "denied"));
    }

    #[test]
    fn test_settle_application_error_wins_over_transport_error() {
        let reply = TransportReply::failed_with(
            TransportError::Status {
                status: 500,
                body: "internal".into(),
            },
            ResponseEnvelope::with_error(json!({"code": "QUOTA"})),
        );
        let err = settle(reply).unwrap_err();
        assert!(matches!(err, PluginDataError::Application(ref v) if v["code"] == "QUOTA"));
    }

    #[test]
    fn test_settle_transport_error_with_clean_response() {
        let reply = TransportReply::failed_with(network(), ResponseEnvelope::default());
        assert!(settle(reply).unwrap_err().is_transport());
    }

    #[test]
    fn test_settle_null_error_field_is_success() {
        let env = ResponseEnvelope {
            error: Some(Value::Null),
            data: Some(b"1".to_vec()),
            ..ResponseEnvelope::default()
        };
        let settled = settle(TransportReply::ok(env)).unwrap();
        assert_eq!(settled.payload(), Some(b"1".as_slice()));
    }

    #[test]
    fn test_settle_null_error_field_keeps_transport_error() {
        let reply = TransportReply::failed_with(network(), ResponseEnvelope::with_error(Value::Null));
        let err = settle(reply).unwrap_err();
        assert!(matches!(err, PluginDataError::Transport(TransportError::Network(_))));
    }

    #[test]
    fn test_settle_empty_reply() {
        assert_eq!(
            settle(TransportReply::default()).unwrap(),
            ResponseEnvelope::default()
        );
    }

    #[tokio::test]
    async fn test_invoke_calls_transport_once() {
        let t = Scripted::new(TransportReply::ok(ResponseEnvelope::default()));
        let d = Dispatcher::new(t.clone());
        d.invoke(Operation::GetPluginLocalData, request()).await.unwrap();
        assert_eq!(t.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *t.last.lock().unwrap(),
            Some(Operation::GetPluginLocalData)
        );
    }

    #[tokio::test]
    async fn test_invoke_does_not_retry_on_failure() {
        let t = Scripted::new(TransportReply::failed(network()));
        let d = Dispatcher::new(t.clone());
        assert!(d.invoke(Operation::GetPluginLocalData, request()).await.is_err());
        assert_eq!(t.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invoke_with_applies_decoder() {
        let t = Scripted::new(TransportReply::ok(ResponseEnvelope::with_data(b"abc".to_vec())));
        let d = Dispatcher::new(t);
        let len = d
            .invoke_with(Operation::GetPluginLocalData, request(), |r| {
                Ok(r.data.map_or(0, |d| d.len()))
            })
            .await
            .unwrap();
        assert_eq!(len, 3);
    }

    #[tokio::test]
    async fn test_decoder_skipped_on_error() {
        let t = Scripted::new(TransportReply::ok(ResponseEnvelope::with_error("nope")));
        let d = Dispatcher::new(t);
        let res: Result<()> = d
            .invoke_with(Operation::GetPluginLocalData, request(), |_| {
                panic!("decoder must not run on failure")
            })
            .await;
        assert!(res.unwrap_err().is_application());
    }
}
