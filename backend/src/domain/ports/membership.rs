//! Driving ports for the membership workflow.
//!
//! In hexagonal terms these are *driving* ports: inbound adapters call them
//! to run membership use-cases without knowing the backing infrastructure,
//! which keeps handler tests deterministic.

use async_trait::async_trait;

use crate::domain::{AvatarUpload, Error, Profile, ProfileId, ProfileStatus, SignUpApplication, UserId};

/// Administrator decision over a pending application.
///
/// A closed pair rather than [`ProfileStatus`] so a review can never write
/// `Pending` back onto a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    /// The profile status this decision resolves to.
    pub fn status(self) -> ProfileStatus {
        match self {
            Self::Approved => ProfileStatus::Approved,
            Self::Rejected => ProfileStatus::Rejected,
        }
    }
}

/// Input to [`MembershipCommand::review_application`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRequest {
    /// Profile record under review.
    pub profile_id: ProfileId,
    /// Identity owning the profile; receives the `member` grant on approval.
    pub user_id: UserId,
    pub decision: ReviewDecision,
}

/// Result of a completed review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewOutcome {
    pub profile_id: ProfileId,
    pub status: ProfileStatus,
    /// Whether a `member` role grant was written as part of this review.
    pub role_granted: bool,
}

/// Report of repaired approve-without-grant drift.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconciliationReport {
    /// Identities that were approved but missing their `member` grant.
    pub repaired: Vec<UserId>,
}

/// Domain use-case port for membership mutations.
#[async_trait]
pub trait MembershipCommand: Send + Sync {
    /// Register a new member: create the identity, store the avatar when
    /// supplied (failure is non-fatal), and insert a pending profile.
    async fn register_member(
        &self,
        application: SignUpApplication,
        avatar: Option<AvatarUpload>,
    ) -> Result<Profile, Error>;

    /// Apply an administrator decision to a pending application.
    async fn review_application(&self, request: ReviewRequest) -> Result<ReviewOutcome, Error>;

    /// Grant `member` roles missing from approved profiles.
    async fn reconcile_role_grants(&self) -> Result<ReconciliationReport, Error>;
}

/// Domain use-case port for membership queries.
#[async_trait]
pub trait MembershipQuery: Send + Sync {
    /// Profile owned by the identity, if one exists.
    async fn profile_for_user(&self, user_id: &UserId) -> Result<Option<Profile>, Error>;

    /// Applications newest first, optionally filtered by status.
    async fn list_applications(
        &self,
        filter: Option<ProfileStatus>,
    ) -> Result<Vec<Profile>, Error>;

    /// Whether the identity holds the `admin` role.
    async fn is_admin(&self, user_id: &UserId) -> Result<bool, Error>;
}
