//! Driving ports for the contribution workflow.

use async_trait::async_trait;

use crate::domain::{Contribution, Error, PaymentMethod, PhoneNumber, UserId};

/// Input to [`ContributionCommand::submit`].
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitContributionRequest {
    pub user_id: UserId,
    /// Whole currency units.
    pub amount: u64,
    /// Mobile-money number the payment prompt is sent to.
    pub phone_number: PhoneNumber,
}

/// Instruction for the caller after a contribution is recorded: an external
/// payment prompt follows on the member's device. Nothing here confirms or
/// polls the payment itself.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentPrompt {
    pub channel: PaymentMethod,
    pub phone_number: PhoneNumber,
    pub amount: u64,
}

/// Result of a successful contribution submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitContributionOutcome {
    pub contribution: Contribution,
    pub prompt: PaymentPrompt,
}

/// Contribution history plus display aggregates, recomputed per fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ContributionSummary {
    /// Newest first.
    pub contributions: Vec<Contribution>,
    /// Sum over completed records.
    pub total_completed: u64,
}

/// Domain use-case port for recording contributions.
#[async_trait]
pub trait ContributionCommand: Send + Sync {
    /// Record a payment intent for an approved member.
    async fn submit(
        &self,
        request: SubmitContributionRequest,
    ) -> Result<SubmitContributionOutcome, Error>;
}

/// Domain use-case port for reading contribution history.
#[async_trait]
pub trait ContributionQuery: Send + Sync {
    /// History for the identity, newest first, with aggregates.
    async fn list_for_user(&self, user_id: &UserId) -> Result<ContributionSummary, Error>;
}
