//! OAuth2 credential records for one caller.

use crate::dispatch::{Call, Dispatcher};
use plugindata_types::{
    Caller, OAuth2Data, OAuthKind, OAuthRequest, Operation, Request, ResponseEnvelope,
};

/// Get, create, update, and delete the credential records of one caller.
///
/// Every method resolves to the raw [`ResponseEnvelope`]; credential
/// records are structured by the service, so no payload decoding applies.
#[derive(Clone)]
pub struct OAuthCredentialClient {
    dispatcher: Dispatcher,
    caller: Caller,
}

impl OAuthCredentialClient {
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

    /// Fetch the record for `oauth_type`.
    pub fn get(&self, oauth_type: OAuthKind) -> Call<ResponseEnvelope> {
        self.send(Operation::GetPluginOAuth2Info, oauth_type, None)
    }

    /// Create the record for `oauth_type` from the full field set in `data`.
    pub fn create(&self, oauth_type: OAuthKind, data: OAuth2Data) -> Call<ResponseEnvelope> {
        self.send(Operation::CreatePluginOAuth2Info, oauth_type, Some(data))
    }

    /// Replace the fields of the record for `oauth_type`.
    pub fn update(&self, oauth_type: OAuthKind, data: OAuth2Data) -> Call<ResponseEnvelope> {
        self.send(Operation::UpdatePluginOAuth2Info, oauth_type, Some(data))
    }

    /// Remove the record for `oauth_type`.
    pub fn delete(&self, oauth_type: OAuthKind) -> Call<ResponseEnvelope> {
        self.send(Operation::DeletePluginOAuth2Info, oauth_type, None)
    }

    fn send(
        &self,
        operation: Operation,
        oauth_type: OAuthKind,
        data: Option<OAuth2Data>,
    ) -> Call<ResponseEnvelope> {
        let dispatcher = self.dispatcher.clone();
        let request = Request::OAuth(OAuthRequest {
            caller: self.caller.clone(),
            oauth_type,
            data,
        });
        Box::pin(async move { dispatcher.invoke(operation, request).await })
    }
}
