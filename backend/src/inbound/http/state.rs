//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AuthenticationService, ContributionCommand, ContributionQuery, MembershipCommand,
    MembershipQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthenticationService>,
    pub membership: Arc<dyn MembershipCommand>,
    pub membership_query: Arc<dyn MembershipQuery>,
    pub contributions: Arc<dyn ContributionCommand>,
    pub contributions_query: Arc<dyn ContributionQuery>,
}

impl HttpState {
    /// Construct state from port implementations.
    pub fn new(
        auth: Arc<dyn AuthenticationService>,
        membership: Arc<dyn MembershipCommand>,
        membership_query: Arc<dyn MembershipQuery>,
        contributions: Arc<dyn ContributionCommand>,
        contributions_query: Arc<dyn ContributionQuery>,
    ) -> Self {
        Self {
            auth,
            membership,
            membership_query,
            contributions,
            contributions_query,
        }
    }
}
