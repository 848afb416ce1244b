//! Membership domain service.
//!
//! Implements the driving ports for registration, review, and membership
//! queries over the identity, profile, role, and avatar driven ports. The
//! approval path is two platform calls with no cross-call atomicity; the
//! grant step failing after the status write leaves detectable drift, which
//! `reconcile_role_grants` repairs.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::domain::ports::{
    AuthenticationService, AvatarStore, IdentityProvider, IdentityProviderError,
    MembershipCommand, MembershipQuery, ProfilePersistenceError, ProfileRepository,
    ReconciliationReport, ReviewDecision, ReviewOutcome, ReviewRequest, RolePersistenceError,
    RoleRepository, SignInOutcome,
};
use crate::domain::{
    AvatarUpload, Error, NewProfile, Profile, ProfileStatus, Role, SignInCredentials,
    SignUpApplication, UserId,
};

/// Membership service implementing the driving ports.
#[derive(Clone)]
pub struct MembershipService<I, P, R, A> {
    identity: Arc<I>,
    profiles: Arc<P>,
    roles: Arc<R>,
    avatars: Arc<A>,
    email_redirect: Option<String>,
}

impl<I, P, R, A> MembershipService<I, P, R, A> {
    /// Create a new service over the given adapters.
    pub fn new(identity: Arc<I>, profiles: Arc<P>, roles: Arc<R>, avatars: Arc<A>) -> Self {
        Self {
            identity,
            profiles,
            roles,
            avatars,
            email_redirect: None,
        }
    }

    /// Set the address verification emails link back to.
    pub fn with_email_redirect(mut self, redirect: impl Into<String>) -> Self {
        self.email_redirect = Some(redirect.into());
        self
    }
}

impl<I, P, R, A> MembershipService<I, P, R, A>
where
    I: IdentityProvider,
    P: ProfileRepository,
    R: RoleRepository,
    A: AvatarStore,
{
    fn map_identity_error(error: IdentityProviderError) -> Error {
        match error {
            IdentityProviderError::AlreadyRegistered => {
                Error::conflict("email is already registered")
                    .with_details(json!({ "code": "already_registered" }))
            }
            IdentityProviderError::EmailNotVerified => {
                Error::unauthorized("email address is not verified")
                    .with_details(json!({ "code": "email_not_verified" }))
            }
            IdentityProviderError::InvalidCredentials => Error::unauthorized("invalid credentials"),
            IdentityProviderError::Transport { message } => {
                Error::internal(format!("identity platform call failed: {message}"))
            }
        }
    }

    fn map_profile_error(error: ProfilePersistenceError) -> Error {
        match error {
            ProfilePersistenceError::Duplicate => {
                Error::conflict("a profile already exists for this identity")
                    .with_details(json!({ "code": "duplicate_profile" }))
            }
            ProfilePersistenceError::Update { message } => {
                Error::internal(format!("profile update failed: {message}"))
            }
            ProfilePersistenceError::Query { message } => {
                Error::internal(format!("profile query failed: {message}"))
            }
        }
    }

    fn map_role_error(error: RolePersistenceError) -> Error {
        match error {
            RolePersistenceError::Query { message } => {
                Error::internal(format!("role query failed: {message}"))
            }
        }
    }

    async fn store_avatar(
        &self,
        user_id: &UserId,
        avatar: Option<AvatarUpload>,
    ) -> Option<crate::domain::AvatarUrl> {
        let upload = avatar?;
        match self.avatars.store(user_id, &upload).await {
            Ok(url) => Some(url),
            Err(error) => {
                // Leniency policy: a failed avatar upload must not abort
                // registration; the profile proceeds without a reference.
                warn!(%user_id, %error, "avatar upload failed; continuing without avatar");
                None
            }
        }
    }
}

#[async_trait]
impl<I, P, R, A> MembershipCommand for MembershipService<I, P, R, A>
where
    I: IdentityProvider,
    P: ProfileRepository,
    R: RoleRepository,
    A: AvatarStore,
{
    async fn register_member(
        &self,
        application: SignUpApplication,
        avatar: Option<AvatarUpload>,
    ) -> Result<Profile, Error> {
        let user_id = self
            .identity
            .sign_up(
                application.email(),
                application.password(),
                self.email_redirect.as_deref(),
            )
            .await
            .map_err(Self::map_identity_error)?;

        let avatar_url = self.store_avatar(&user_id, avatar).await;

        let new_profile = NewProfile {
            user_id,
            full_name: application.full_name().to_owned(),
            phone_number: application.phone_number().clone(),
            email: application.email().clone(),
            avatar_url,
            status: ProfileStatus::Pending,
        };
        self.profiles
            .insert(&new_profile)
            .await
            .map_err(Self::map_profile_error)
    }

    async fn review_application(&self, request: ReviewRequest) -> Result<ReviewOutcome, Error> {
        let status = request.decision.status();
        self.profiles
            .update_status(&request.profile_id, status)
            .await
            .map_err(Self::map_profile_error)?;

        let role_granted = match request.decision {
            ReviewDecision::Approved => {
                // The status write has already landed; flag the drift
                // explicitly instead of pretending the review failed whole.
                self.roles
                    .grant(&request.user_id, Role::Member)
                    .await
                    .map_err(|error| {
                        Error::internal(format!("role grant failed after approval: {error}"))
                            .with_details(json!({
                                "code": "role_grant_missing",
                                "userId": request.user_id.to_string(),
                            }))
                    })?;
                true
            }
            ReviewDecision::Rejected => false,
        };

        Ok(ReviewOutcome {
            profile_id: request.profile_id,
            status,
            role_granted,
        })
    }

    async fn reconcile_role_grants(&self) -> Result<ReconciliationReport, Error> {
        let approved = self
            .profiles
            .list(Some(ProfileStatus::Approved))
            .await
            .map_err(Self::map_profile_error)?;

        let mut repaired = Vec::new();
        for profile in approved {
            let granted = self
                .roles
                .has_role(&profile.user_id, Role::Member)
                .await
                .map_err(Self::map_role_error)?;
            if !granted {
                self.roles
                    .grant(&profile.user_id, Role::Member)
                    .await
                    .map_err(Self::map_role_error)?;
                repaired.push(profile.user_id);
            }
        }
        Ok(ReconciliationReport { repaired })
    }
}

#[async_trait]
impl<I, P, R, A> MembershipQuery for MembershipService<I, P, R, A>
where
    I: IdentityProvider,
    P: ProfileRepository,
    R: RoleRepository,
    A: AvatarStore,
{
    async fn profile_for_user(&self, user_id: &UserId) -> Result<Option<Profile>, Error> {
        self.profiles
            .find_by_user(user_id)
            .await
            .map_err(Self::map_profile_error)
    }

    async fn list_applications(
        &self,
        filter: Option<ProfileStatus>,
    ) -> Result<Vec<Profile>, Error> {
        self.profiles
            .list(filter)
            .await
            .map_err(Self::map_profile_error)
    }

    async fn is_admin(&self, user_id: &UserId) -> Result<bool, Error> {
        self.roles
            .has_role(user_id, Role::Admin)
            .await
            .map_err(Self::map_role_error)
    }
}

#[async_trait]
impl<I, P, R, A> AuthenticationService for MembershipService<I, P, R, A>
where
    I: IdentityProvider,
    P: ProfileRepository,
    R: RoleRepository,
    A: AvatarStore,
{
    async fn sign_in(&self, credentials: &SignInCredentials) -> Result<SignInOutcome, Error> {
        let user_id = self
            .identity
            .sign_in(credentials)
            .await
            .map_err(Self::map_identity_error)?;
        let membership_status = self
            .profiles
            .find_by_user(&user_id)
            .await
            .map_err(Self::map_profile_error)?
            .map(|profile| profile.status);
        Ok(SignInOutcome {
            user_id,
            membership_status,
        })
    }

    async fn sign_out(&self, user_id: &UserId) -> Result<(), Error> {
        self.identity
            .sign_out(user_id)
            .await
            .map_err(Self::map_identity_error)
    }
}
