use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::entities::{Credential, Session, UserIdentity};
use crate::domain::errors::ClientError;
use crate::domain::ports::AuthApi;
use crate::interface_adapters::clients::response::{decode, ensure_success, transport};
use crate::interface_adapters::protocol::{
    AuthEnvelope, CredentialsRequest, MeEnvelope, MutationEnvelope,
};

// Thin reqwest client for the account endpoints.
#[derive(Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    async fn authenticate(
        &self,
        path: &str,
        username: &str,
        password: &str,
    ) -> Result<Session, ClientError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http
            .post(url)
            .json(&CredentialsRequest { username, password })
            .send()
            .await
            .map_err(transport)?;
        let envelope: AuthEnvelope = decode(response).await?;
        ensure_success(envelope.success, envelope.error)?;

        match (envelope.access_token, envelope.user) {
            (Some(token), Some(user)) => Ok(Session {
                credential: Credential::new(token),
                user: user.into(),
            }),
            _ => Err(ClientError::rejected("auth response is missing the session")),
        }
    }
}

#[async_trait]
impl AuthApi for AuthClient {
    async fn register(&self, username: &str, password: &str) -> Result<Session, ClientError> {
        self.authenticate("/api/auth/register", username, password)
            .await
    }

    async fn login(&self, username: &str, password: &str) -> Result<Session, ClientError> {
        self.authenticate("/api/auth/login", username, password).await
    }

    async fn current_user(&self, credential: &Credential) -> Result<UserIdentity, ClientError> {
        let url = format!("{}/api/users/me", self.base_url);
        let response = self
            .http
            .get(url)
            .bearer_auth(credential.as_str())
            .send()
            .await
            .map_err(transport)?;
        let envelope: MeEnvelope = decode(response).await?;
        ensure_success(envelope.success, envelope.error)?;
        envelope
            .user
            .map(UserIdentity::from)
            .ok_or_else(|| ClientError::rejected("user lookup returned no user"))
    }

    async fn logout(&self, credential: &Credential) -> Result<(), ClientError> {
        let url = format!("{}/api/auth/logout", self.base_url);
        let response = self
            .http
            .post(url)
            .bearer_auth(credential.as_str())
            .send()
            .await
            .map_err(transport)?;
        let envelope: MutationEnvelope = decode(response).await?;
        ensure_success(envelope.success, envelope.error)?;
        debug!("session revoked");
        Ok(())
    }
}
