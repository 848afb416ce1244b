//! Contribution data model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::member::{MemberValidationError, PhoneNumber, UserId};

/// Minimum accepted contribution, in whole currency units.
pub const MINIMUM_CONTRIBUTION: u64 = 50;

/// Settlement state of a contribution record.
///
/// Records are created `Pending`; an external settlement process advances
/// them to `Completed` or `Rejected`. This service never writes either
/// terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContributionStatus {
    Pending,
    Completed,
    Rejected,
}

impl ContributionStatus {
    /// Wire representation used by the document store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ContributionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContributionStatus {
    type Err = MemberValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "rejected" => Ok(Self::Rejected),
            _ => Err(MemberValidationError::UnknownVariant),
        }
    }
}

/// Payment channel for contributions. A single mobile-money channel is
/// supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaymentMethod {
    #[default]
    Mpesa,
}

impl PaymentMethod {
    /// Wire representation used by the document store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mpesa => "mpesa",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = MemberValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mpesa" => Ok(Self::Mpesa),
            _ => Err(MemberValidationError::UnknownVariant),
        }
    }
}

/// Recorded payment intent for one member.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub id: Uuid,
    pub user_id: UserId,
    /// Whole currency units; at least [`MINIMUM_CONTRIBUTION`] at creation.
    pub amount: u64,
    pub payment_method: PaymentMethod,
    pub phone_number: PhoneNumber,
    pub status: ContributionStatus,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new contribution record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContribution {
    pub user_id: UserId,
    pub amount: u64,
    pub payment_method: PaymentMethod,
    pub phone_number: PhoneNumber,
    pub status: ContributionStatus,
}

/// Sum of amounts over completed contributions.
///
/// Recomputed on every fetch; display-only and never cached.
pub fn total_completed(contributions: &[Contribution]) -> u64 {
    contributions
        .iter()
        .filter(|c| c.status == ContributionStatus::Completed)
        .map(|c| c.amount)
        .sum()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    fn contribution(amount: u64, status: ContributionStatus) -> Contribution {
        Contribution {
            id: Uuid::new_v4(),
            user_id: UserId::random(),
            amount,
            payment_method: PaymentMethod::Mpesa,
            phone_number: PhoneNumber::new("0700123456").expect("fixture phone"),
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn total_completed_ignores_pending_and_rejected() {
        let records = vec![
            contribution(100, ContributionStatus::Completed),
            contribution(50, ContributionStatus::Pending),
            contribution(200, ContributionStatus::Completed),
        ];
        assert_eq!(total_completed(&records), 300);
    }

    #[test]
    fn total_completed_is_zero_for_no_records() {
        assert_eq!(total_completed(&[]), 0);
    }
}
