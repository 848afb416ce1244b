//! Contribution domain service.
//!
//! Records payment intents for approved members. The approval gate is
//! checked before anything else, so an unapproved member is refused the same
//! way regardless of the amount they tried to send.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{
    ContributionCommand, ContributionPersistenceError, ContributionQuery, ContributionRepository,
    ContributionSummary, PaymentPrompt, ProfilePersistenceError, ProfileRepository,
    SubmitContributionOutcome, SubmitContributionRequest,
};
use crate::domain::{
    ContributionStatus, Error, MINIMUM_CONTRIBUTION, NewContribution, PaymentMethod,
    ProfileStatus, UserId, total_completed,
};

/// Contribution service implementing the driving ports.
#[derive(Clone)]
pub struct ContributionService<P, C> {
    profiles: Arc<P>,
    contributions: Arc<C>,
}

impl<P, C> ContributionService<P, C> {
    /// Create a new service over the given adapters.
    pub fn new(profiles: Arc<P>, contributions: Arc<C>) -> Self {
        Self {
            profiles,
            contributions,
        }
    }
}

impl<P, C> ContributionService<P, C>
where
    P: ProfileRepository,
    C: ContributionRepository,
{
    fn map_profile_error(error: ProfilePersistenceError) -> Error {
        Error::internal(format!("profile lookup failed: {error}"))
    }

    fn map_contribution_error(error: ContributionPersistenceError) -> Error {
        match error {
            ContributionPersistenceError::Query { message } => {
                Error::internal(format!("contribution store failed: {message}"))
            }
        }
    }
}

#[async_trait]
impl<P, C> ContributionCommand for ContributionService<P, C>
where
    P: ProfileRepository,
    C: ContributionRepository,
{
    async fn submit(
        &self,
        request: SubmitContributionRequest,
    ) -> Result<SubmitContributionOutcome, Error> {
        let profile = self
            .profiles
            .find_by_user(&request.user_id)
            .await
            .map_err(Self::map_profile_error)?
            .ok_or_else(|| Error::not_found("no membership profile for this identity"))?;

        if profile.status != ProfileStatus::Approved {
            return Err(Error::forbidden(
                "membership must be approved before contributing",
            )
            .with_details(json!({
                "code": "member_not_approved",
                "status": profile.status.as_str(),
            })));
        }

        if request.amount < MINIMUM_CONTRIBUTION {
            return Err(Error::invalid_request(format!(
                "minimum contribution is {MINIMUM_CONTRIBUTION}"
            ))
            .with_details(json!({
                "code": "amount_below_minimum",
                "minimum": MINIMUM_CONTRIBUTION,
            })));
        }

        let new_contribution = NewContribution {
            user_id: request.user_id,
            amount: request.amount,
            payment_method: PaymentMethod::Mpesa,
            phone_number: request.phone_number.clone(),
            status: ContributionStatus::Pending,
        };
        let contribution = self
            .contributions
            .insert(&new_contribution)
            .await
            .map_err(Self::map_contribution_error)?;

        // The record only captures intent; settlement happens on the
        // member's device and is never confirmed or polled here.
        let prompt = PaymentPrompt {
            channel: contribution.payment_method,
            phone_number: contribution.phone_number.clone(),
            amount: contribution.amount,
        };
        Ok(SubmitContributionOutcome {
            contribution,
            prompt,
        })
    }
}

#[async_trait]
impl<P, C> ContributionQuery for ContributionService<P, C>
where
    P: ProfileRepository,
    C: ContributionRepository,
{
    async fn list_for_user(&self, user_id: &UserId) -> Result<ContributionSummary, Error> {
        let contributions = self
            .contributions
            .list_for_user(user_id)
            .await
            .map_err(Self::map_contribution_error)?;
        let total = total_completed(&contributions);
        Ok(ContributionSummary {
            contributions,
            total_completed: total,
        })
    }
}
