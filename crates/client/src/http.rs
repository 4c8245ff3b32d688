//! HTTP transport to the plugin-data service.
//!
//! Each operation is a `POST {host}/{operation}` carrying the JSON request
//! body; the reply body is a JSON response envelope.

use async_trait::async_trait;
use plugindata_types::{
    Operation, PluginDataTransport, Request, ResponseEnvelope, TransportError, TransportReply,
};
use rquest::Client;

/// A [`PluginDataTransport`] speaking JSON over HTTP.
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport for `host` with a default HTTP client.
    ///
    /// A host without a scheme is treated as `http://{host}`.
    pub fn new(host: &str) -> Self {
        Self::with_client(Client::new(), host)
    }

    /// Creates a transport for `host` reusing an existing HTTP client.
    pub fn with_client(http: Client, host: &str) -> Self {
        let host = host.trim().trim_end_matches('/');
        let base_url = if host.contains("://") {
            host.to_string()
        } else {
            format!("http://{host}")
        };
        Self { http, base_url }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL that `operation` is posted to.
    #[must_use]
    pub fn endpoint(&self, operation: Operation) -> String {
        format!("{}/{}", self.base_url, operation.as_str())
    }
}

/// Turn a status code and body into a [`TransportReply`].
///
/// A failed status whose body is still an envelope is reported with both
/// halves, so an embedded application error can take precedence.
fn interpret(status: u16, body: &[u8]) -> TransportReply {
    let parsed = serde_json::from_slice::<ResponseEnvelope>(body);
    if (200..300).contains(&status) {
        match parsed {
            Ok(envelope) => TransportReply::ok(envelope),
            Err(_) if body.iter().all(u8::is_ascii_whitespace) => {
                TransportReply::ok(ResponseEnvelope::default())
            }
            Err(e) => TransportReply::failed(TransportError::Malformed(e.to_string())),
        }
    } else {
        let error = TransportError::Status {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        };
        match parsed {
            Ok(envelope) => TransportReply::failed_with(error, envelope),
            Err(_) => TransportReply::failed(error),
        }
    }
}

#[async_trait]
impl PluginDataTransport for HttpTransport {
    async fn call(&self, operation: Operation, request: Request) -> TransportReply {
        let url = self.endpoint(operation);
        tracing::debug!(%operation, %url, "posting plugin-data request");

        let resp = match self.http.post(&url).json(&request).send().await {
            Ok(resp) => resp,
            Err(e) => return TransportReply::failed(e.into()),
        };
        let status = resp.status().as_u16();
        let body = match resp.bytes().await {
            Ok(body) => body,
            Err(e) => return TransportReply::failed(e.into()),
        };
        tracing::trace!(%operation, status, len = body.len(), "plugin-data reply received");
        interpret(status, &body)
    }
}
