//! Wire rows exchanged with the platform document store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    AvatarUrl, Contribution, ContributionStatus, EmailAddress, NewContribution, NewProfile,
    PaymentMethod, PhoneNumber, Profile, ProfileId, ProfileStatus, UserId,
};

/// Row shape of the `profiles` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub phone_number: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl ProfileRow {
    pub(crate) fn into_domain(self) -> Result<Profile, String> {
        let status = self
            .status
            .parse::<ProfileStatus>()
            .map_err(|_| format!("unknown profile status {:?}", self.status))?;
        let phone_number = PhoneNumber::new(&self.phone_number)
            .map_err(|_| format!("invalid stored phone number {:?}", self.phone_number))?;
        let email = EmailAddress::new(&self.email)
            .map_err(|_| format!("invalid stored email {:?}", self.email))?;
        Ok(Profile {
            id: ProfileId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            full_name: self.full_name,
            phone_number,
            email,
            avatar_url: self.avatar_url.map(AvatarUrl::new),
            status,
            created_at: self.created_at,
        })
    }
}

/// Insert payload for the `profiles` collection.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct NewProfileRow<'a> {
    pub user_id: &'a Uuid,
    pub full_name: &'a str,
    pub phone_number: &'a str,
    pub email: &'a str,
    pub avatar_url: Option<&'a str>,
    pub status: &'a str,
}

impl<'a> NewProfileRow<'a> {
    pub(crate) fn from_domain(profile: &'a NewProfile) -> Self {
        Self {
            user_id: profile.user_id.as_uuid(),
            full_name: profile.full_name.as_str(),
            phone_number: profile.phone_number.as_ref(),
            email: profile.email.as_ref(),
            avatar_url: profile.avatar_url.as_ref().map(|url| url.as_ref()),
            status: profile.status.as_str(),
        }
    }
}

/// Row shape of the `contributions` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ContributionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: u64,
    pub payment_method: String,
    pub phone_number: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl ContributionRow {
    pub(crate) fn into_domain(self) -> Result<Contribution, String> {
        let status = self
            .status
            .parse::<ContributionStatus>()
            .map_err(|_| format!("unknown contribution status {:?}", self.status))?;
        let payment_method = self
            .payment_method
            .parse::<PaymentMethod>()
            .map_err(|_| format!("unknown payment method {:?}", self.payment_method))?;
        let phone_number = PhoneNumber::new(&self.phone_number)
            .map_err(|_| format!("invalid stored phone number {:?}", self.phone_number))?;
        Ok(Contribution {
            id: self.id,
            user_id: UserId::from_uuid(self.user_id),
            amount: self.amount,
            payment_method,
            phone_number,
            status,
            created_at: self.created_at,
        })
    }
}

/// Insert payload for the `contributions` collection.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct NewContributionRow<'a> {
    pub user_id: &'a Uuid,
    pub amount: u64,
    pub payment_method: &'a str,
    pub phone_number: &'a str,
    pub status: &'a str,
}

impl<'a> NewContributionRow<'a> {
    pub(crate) fn from_domain(contribution: &'a NewContribution) -> Self {
        Self {
            user_id: contribution.user_id.as_uuid(),
            amount: contribution.amount,
            payment_method: contribution.payment_method.as_str(),
            phone_number: contribution.phone_number.as_ref(),
            status: contribution.status.as_str(),
        }
    }
}

/// Row shape of the `user_roles` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RoleRow {
    pub user_id: Uuid,
    pub role: String,
}

/// Identity payload returned by the identity API. Depending on the call the
/// user object arrives at the top level or nested under `user`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct IdentityEnvelope {
    pub id: Option<Uuid>,
    pub user: Option<IdentityUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct IdentityUser {
    pub id: Uuid,
}

impl IdentityEnvelope {
    pub(crate) fn user_id(&self) -> Option<Uuid> {
        self.id.or_else(|| self.user.as_ref().map(|user| user.id))
    }
}
