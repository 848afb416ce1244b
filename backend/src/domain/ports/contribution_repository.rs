//! Driven port for contribution record persistence.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Contribution, NewContribution, UserId};

define_port_error! {
    /// Persistence errors raised by contribution repository adapters.
    pub enum ContributionPersistenceError {
        /// Query or insert failed during execution.
        Query { message: String } => "contribution query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContributionRepository: Send + Sync {
    /// Insert a new contribution record.
    async fn insert(
        &self,
        contribution: &NewContribution,
    ) -> Result<Contribution, ContributionPersistenceError>;

    /// List all contributions for the identity, newest first. Unbounded by
    /// design; the cooperative's scale does not warrant pagination.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Contribution>, ContributionPersistenceError>;
}
