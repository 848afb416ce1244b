//! Driven port for membership profile persistence.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{NewProfile, Profile, ProfileId, ProfileStatus, UserId};

define_port_error! {
    /// Persistence errors raised by profile repository adapters.
    pub enum ProfilePersistenceError {
        /// A profile already exists for the user identity.
        Duplicate => "profile already exists for this identity",
        /// A status update did not apply (for example, no such record).
        Update { message: String } => "profile update failed: {message}",
        /// Query or insert failed during execution.
        Query { message: String } => "profile query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Insert a new profile. Uniqueness on the user identity is enforced by
    /// the store; a violation surfaces as [`ProfilePersistenceError::Duplicate`].
    async fn insert(&self, profile: &NewProfile) -> Result<Profile, ProfilePersistenceError>;

    /// Fetch the profile owned by a user identity.
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Profile>, ProfilePersistenceError>;

    /// List profiles, newest first, optionally filtered by status.
    async fn list(
        &self,
        filter: Option<ProfileStatus>,
    ) -> Result<Vec<Profile>, ProfilePersistenceError>;

    /// Overwrite the status of one profile record.
    async fn update_status(
        &self,
        profile_id: &ProfileId,
        status: ProfileStatus,
    ) -> Result<(), ProfilePersistenceError>;
}
