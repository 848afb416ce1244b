//! Driving port for sign-in and sign-out use-cases.

use async_trait::async_trait;

use crate::domain::{Error, ProfileStatus, SignInCredentials, UserId};

/// Result of a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInOutcome {
    pub user_id: UserId,
    /// Status of the member's profile, when one exists, so the caller can
    /// route pending or rejected members appropriately.
    pub membership_status: Option<ProfileStatus>,
}

/// Domain use-case port for authentication.
#[async_trait]
pub trait AuthenticationService: Send + Sync {
    /// Validate credentials against the identity platform and report the
    /// membership status alongside the authenticated identity.
    async fn sign_in(&self, credentials: &SignInCredentials) -> Result<SignInOutcome, Error>;

    /// End platform-side session state for the identity.
    async fn sign_out(&self, user_id: &UserId) -> Result<(), Error>;
}
