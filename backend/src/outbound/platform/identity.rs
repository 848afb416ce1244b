//! Identity API adapter (`auth/v1`).

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::json;

use super::client::{PlatformClient, status_message};
use super::dto::IdentityEnvelope;
use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{EmailAddress, SignInCredentials, UserId};

/// Identity provider implemented over the platform's auth endpoints.
#[derive(Clone)]
pub struct PlatformIdentityProvider {
    client: PlatformClient,
}

impl PlatformIdentityProvider {
    /// Build the adapter over a shared platform client.
    pub fn new(client: PlatformClient) -> Self {
        Self { client }
    }

    fn transport(message: impl Into<String>) -> IdentityProviderError {
        IdentityProviderError::transport(message)
    }

    fn decode_user_id(body: &[u8]) -> Result<UserId, IdentityProviderError> {
        let envelope: IdentityEnvelope = serde_json::from_slice(body).map_err(|error| {
            Self::transport(format!("invalid identity payload: {error}"))
        })?;
        envelope
            .user_id()
            .map(UserId::from_uuid)
            .ok_or_else(|| Self::transport("identity payload carried no user id"))
    }
}

/// Classify an identity API rejection from its status and body text.
fn classify_rejection(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    let text = String::from_utf8_lossy(body).to_lowercase();
    if text.contains("already registered") || text.contains("already been registered") {
        return IdentityProviderError::already_registered();
    }
    if text.contains("not confirmed") || text.contains("not verified") {
        return IdentityProviderError::email_not_verified();
    }
    if status == StatusCode::BAD_REQUEST
        || status == StatusCode::UNAUTHORIZED
        || status == StatusCode::UNPROCESSABLE_ENTITY
    {
        return IdentityProviderError::invalid_credentials();
    }
    IdentityProviderError::transport(status_message(status, body))
}

#[async_trait]
impl IdentityProvider for PlatformIdentityProvider {
    async fn sign_up<'a>(
        &self,
        email: &EmailAddress,
        password: &str,
        redirect: Option<&'a str>,
    ) -> Result<UserId, IdentityProviderError> {
        let mut url = self
            .client
            .endpoint("auth/v1/signup")
            .map_err(Self::transport)?;
        if let Some(redirect) = redirect {
            url.query_pairs_mut().append_pair("redirect_to", redirect);
        }

        let response = self
            .client
            .request(Method::POST, url)
            .json(&json!({ "email": email.as_ref(), "password": password }))
            .send()
            .await
            .map_err(|error| Self::transport(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| Self::transport(error.to_string()))?;
        if !status.is_success() {
            return Err(classify_rejection(status, body.as_ref()));
        }
        Self::decode_user_id(body.as_ref())
    }

    async fn sign_in(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<UserId, IdentityProviderError> {
        let mut url = self
            .client
            .endpoint("auth/v1/token")
            .map_err(Self::transport)?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .client
            .request(Method::POST, url)
            .json(&json!({
                "email": credentials.email().as_ref(),
                "password": credentials.password(),
            }))
            .send()
            .await
            .map_err(|error| Self::transport(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| Self::transport(error.to_string()))?;
        if !status.is_success() {
            return Err(classify_rejection(status, body.as_ref()));
        }
        Self::decode_user_id(body.as_ref())
    }

    async fn sign_out(&self, user_id: &UserId) -> Result<(), IdentityProviderError> {
        // Sessions issued by this service are cookie-based and the platform's
        // own tokens are never handed to clients, so there is nothing to
        // revoke platform-side.
        tracing::debug!(%user_id, "sign-out requested; no platform session to revoke");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network identity mapping helpers.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::already_registered(
        StatusCode::BAD_REQUEST,
        br#"{"msg":"User already registered"}"#.as_slice(),
        IdentityProviderError::already_registered()
    )]
    #[case::not_confirmed(
        StatusCode::BAD_REQUEST,
        br#"{"error_description":"Email not confirmed"}"#.as_slice(),
        IdentityProviderError::email_not_verified()
    )]
    #[case::wrong_password(
        StatusCode::BAD_REQUEST,
        br#"{"error_description":"Invalid login credentials"}"#.as_slice(),
        IdentityProviderError::invalid_credentials()
    )]
    fn rejections_classify_by_body_text(
        #[case] status: StatusCode,
        #[case] body: &[u8],
        #[case] expected: IdentityProviderError,
    ) {
        assert_eq!(classify_rejection(status, body), expected);
    }

    #[test]
    fn server_errors_map_to_transport() {
        let error = classify_rejection(StatusCode::INTERNAL_SERVER_ERROR, b"boom");
        assert!(matches!(error, IdentityProviderError::Transport { .. }));
    }

    #[test]
    fn decode_user_id_reads_nested_user_objects() {
        let body = br#"{"access_token":"jwt","user":{"id":"3fa85f64-5717-4562-b3fc-2c963f66afa6"}}"#;
        let id = PlatformIdentityProvider::decode_user_id(body).expect("id decodes");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[test]
    fn decode_user_id_rejects_empty_envelopes() {
        let error =
            PlatformIdentityProvider::decode_user_id(b"{}").expect_err("no id must fail");
        assert!(matches!(error, IdentityProviderError::Transport { .. }));
    }
}
