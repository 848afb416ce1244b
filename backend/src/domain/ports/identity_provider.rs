//! Driven port for the external identity platform.
//!
//! The platform owns credential storage, email verification, and session
//! issuance. This port exposes only the calls the workflows need; the
//! ambient "current session" of the platform SDK is deliberately absent;
//! handlers carry an explicit session context instead.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{EmailAddress, SignInCredentials, UserId};

define_port_error! {
    /// Failures reported by identity platform adapters.
    pub enum IdentityProviderError {
        /// The email already has a registered identity.
        AlreadyRegistered => "email is already registered",
        /// The identity exists but its email is not yet verified.
        EmailNotVerified => "email address is not verified",
        /// Credentials did not match a registered identity.
        InvalidCredentials => "invalid credentials",
        /// The platform call failed for transport-level reasons.
        Transport { message: String } => "identity platform call failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a new identity. `redirect` is the address the verification
    /// email links back to, when the platform supports one.
    async fn sign_up<'a>(
        &self,
        email: &EmailAddress,
        password: &str,
        redirect: Option<&'a str>,
    ) -> Result<UserId, IdentityProviderError>;

    /// Authenticate credentials and return the identity they belong to.
    async fn sign_in(&self, credentials: &SignInCredentials)
    -> Result<UserId, IdentityProviderError>;

    /// End any platform-side session state for the identity.
    async fn sign_out(&self, user_id: &UserId) -> Result<(), IdentityProviderError>;
}
