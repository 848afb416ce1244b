//! Driven port for avatar object storage.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{AvatarUpload, AvatarUrl, UserId};

define_port_error! {
    /// Failures raised by avatar store adapters.
    pub enum AvatarStoreError {
        /// Upload or URL retrieval failed.
        Store { message: String } => "avatar store call failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvatarStore: Send + Sync {
    /// Store the upload under a path scoped to the identity and return a
    /// public URL for the stored object.
    async fn store(
        &self,
        user_id: &UserId,
        upload: &AvatarUpload,
    ) -> Result<AvatarUrl, AvatarStoreError>;
}
