//! Driven port for role grant persistence.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Role, UserId};

define_port_error! {
    /// Persistence errors raised by role repository adapters.
    pub enum RolePersistenceError {
        /// Query or insert failed during execution.
        Query { message: String } => "role query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Record a role grant for the identity. Granting an already-held role
    /// is a no-op for callers; adapters may deduplicate.
    async fn grant(&self, user_id: &UserId, role: Role) -> Result<(), RolePersistenceError>;

    /// Existence check: does the identity hold the role? "Not found" is
    /// `false`, never an error.
    async fn has_role(&self, user_id: &UserId, role: Role) -> Result<bool, RolePersistenceError>;
}
