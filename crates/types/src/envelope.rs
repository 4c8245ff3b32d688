//! Wire shapes exchanged with the plugin-data service.

use crate::{OAuth2Data, OAuthKind, ScopeKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Opaque identity of the embedding plugin invocation.
///
/// Attached to every request as-is; its structure is never inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Caller(Value);

impl Caller {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for Caller {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&str> for Caller {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_string()))
    }
}

impl From<String> for Caller {
    fn from(value: String) -> Self {
        Self(Value::String(value))
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Remote operations relayed by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetPluginOAuth2Info,
    CreatePluginOAuth2Info,
    UpdatePluginOAuth2Info,
    DeletePluginOAuth2Info,
    GetPluginLocalData,
    StorePluginLocalData,
}

impl Operation {
    /// Returns the service-side method name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetPluginOAuth2Info => "getPluginOAuth2Info",
            Self::CreatePluginOAuth2Info => "createPluginOAuth2Info",
            Self::UpdatePluginOAuth2Info => "updatePluginOAuth2Info",
            Self::DeletePluginOAuth2Info => "deletePluginOAuth2Info",
            Self::GetPluginLocalData => "getPluginLocalData",
            Self::StorePluginLocalData => "storePluginLocalData",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of the four OAuth2 credential operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthRequest {
    pub caller: Caller,
    #[serde(rename = "oAuthType")]
    pub oauth_type: OAuthKind,
    #[serde(
        rename = "oAuth2Data",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub data: Option<OAuth2Data>,
}

/// Body of the local-data read and write operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalDataRequest {
    pub caller: Caller,
    pub scope: ScopeKind,
    #[serde(rename = "scopeUUID", default, skip_serializing_if = "Option::is_none")]
    pub scope_uuid: Option<Uuid>,
    pub key: String,
    #[serde(default, with = "payload", skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<u8>>,
}

/// A request body for any [`Operation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Request {
    LocalData(LocalDataRequest),
    OAuth(OAuthRequest),
}

impl From<OAuthRequest> for Request {
    fn from(req: OAuthRequest) -> Self {
        Self::OAuth(req)
    }
}

impl From<LocalDataRequest> for Request {
    fn from(req: LocalDataRequest) -> Self {
        Self::LocalData(req)
    }
}

/// A service reply.
///
/// `error` and the result fields are independent: a reply may carry a
/// result, an error, both, or neither. A non-null `error` always marks the
/// operation as failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    /// Opaque stored payload, base64 on the JSON wire.
    #[serde(default, with = "payload", skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<u8>>,
    #[serde(
        rename = "oAuth2Data",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub oauth2_data: Option<OAuth2Data>,
    /// Any further fields the service includes.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResponseEnvelope {
    /// A reply carrying only a stored payload.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    /// A reply carrying only a credential record.
    #[must_use]
    pub fn with_oauth2_data(data: OAuth2Data) -> Self {
        Self {
            oauth2_data: Some(data),
            ..Self::default()
        }
    }

    /// A reply carrying only an application error.
    #[must_use]
    pub fn with_error(error: impl Into<Value>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// The stored payload, or `None` when absent or zero-length.
    #[must_use]
    pub fn payload(&self) -> Option<&[u8]> {
        self.data.as_deref().filter(|d| !d.is_empty())
    }
}

/// Serde adapter for `Option<Vec<u8>>` as a base64 string.
mod payload {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(data: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match data {
            Some(bytes) => s.serialize_str(&STANDARD.encode(bytes)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|s| STANDARD.decode(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::GetPluginOAuth2Info.as_str(), "getPluginOAuth2Info");
        assert_eq!(
            Operation::StorePluginLocalData.to_string(),
            "storePluginLocalData"
        );
    }

    #[test]
    fn test_oauth_request_shape() {
        let req = OAuthRequest {
            caller: Caller::new(json!({"botId": "b1"})),
            oauth_type: OAuthKind::Provider,
            data: Some(OAuth2Data::new("tok")),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["caller"], json!({"botId": "b1"}));
        assert_eq!(v["oAuthType"], 1);
        assert_eq!(v["oAuth2Data"]["accessToken"], "tok");
    }

    #[test]
    fn test_oauth_request_omits_missing_data() {
        let req = OAuthRequest {
            caller: Caller::from("c"),
            oauth_type: OAuthKind::User,
            data: None,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v, json!({"caller": "c", "oAuthType": 0}));
    }

    #[test]
    fn test_local_data_request_shape() {
        let id = Uuid::new_v4();
        let req = LocalDataRequest {
            caller: Caller::from("c"),
            scope: ScopeKind::Provider,
            scope_uuid: Some(id),
            key: "k".into(),
            data: Some(b"{}".to_vec()),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["scope"], 0);
        assert_eq!(v["scopeUUID"], id.to_string());
        assert_eq!(v["key"], "k");
        assert_eq!(v["data"], "e30=");
    }

    #[test]
    fn test_untagged_request_picks_local_data() {
        let raw = json!({"caller": "c", "scope": 1, "key": "k"});
        let req: Request = serde_json::from_value(raw).unwrap();
        assert!(matches!(req, Request::LocalData(_)));

        let raw = json!({"caller": "c", "oAuthType": 0});
        let req: Request = serde_json::from_value(raw).unwrap();
        assert!(matches!(req, Request::OAuth(_)));
    }

    #[test]
    fn test_null_error_is_no_error() {
        let env: ResponseEnvelope = serde_json::from_value(json!({"error": null})).unwrap();
        assert!(env.error.is_none());
    }

    #[test]
    fn test_envelope_keeps_unknown_fields() {
        let env: ResponseEnvelope =
            serde_json::from_value(json!({"data": "MQ==", "requestId": "r-1"})).unwrap();
        assert_eq!(env.data.as_deref(), Some(b"1".as_slice()));
        assert_eq!(env.extra["requestId"], "r-1");
    }

    #[test]
    fn test_payload_filters_empty() {
        assert!(ResponseEnvelope::default().payload().is_none());
        assert!(ResponseEnvelope::with_data(Vec::new()).payload().is_none());
        assert_eq!(
            ResponseEnvelope::with_data(b"1".to_vec()).payload(),
            Some(b"1".as_slice())
        );
    }

    #[test]
    fn test_bad_base64_rejected() {
        let res = serde_json::from_value::<ResponseEnvelope>(json!({"data": "!!!"}));
        assert!(res.is_err());
    }
}
