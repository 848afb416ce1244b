//! In-process adapter implementing every driven port over locked maps.
//!
//! Used as the development fallback when no platform is configured and by
//! integration tests that drive the HTTP surface end to end. Behaviour
//! mirrors the platform contract: one profile per identity, newest-first
//! listings, role grant deduplication.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::ports::{
    AvatarStore, AvatarStoreError, ContributionPersistenceError, ContributionRepository,
    IdentityProvider, IdentityProviderError, ProfilePersistenceError, ProfileRepository,
    RolePersistenceError, RoleRepository,
};
use crate::domain::{
    AvatarUpload, AvatarUrl, Contribution, EmailAddress, NewContribution, NewProfile, Profile,
    ProfileId, ProfileStatus, Role, SignInCredentials, UserId,
};

struct IdentityRecord {
    user_id: UserId,
    email: EmailAddress,
    password: Zeroizing<String>,
}

/// In-memory stand-in for the backend platform.
#[derive(Default)]
pub struct InMemoryPlatform {
    identities: Mutex<Vec<IdentityRecord>>,
    profiles: Mutex<Vec<Profile>>,
    roles: Mutex<Vec<(UserId, Role)>>,
    contributions: Mutex<Vec<Contribution>>,
    fail_avatar_uploads: AtomicBool,
}

impl InMemoryPlatform {
    /// Create an empty platform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent avatar uploads fail, exercising the sign-up
    /// leniency path.
    pub fn set_avatar_failure(&self, fail: bool) {
        self.fail_avatar_uploads.store(fail, Ordering::Relaxed);
    }

    fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl IdentityProvider for InMemoryPlatform {
    async fn sign_up<'a>(
        &self,
        email: &EmailAddress,
        password: &str,
        _redirect: Option<&'a str>,
    ) -> Result<UserId, IdentityProviderError> {
        let mut identities = Self::lock(&self.identities);
        if identities.iter().any(|record| &record.email == email) {
            return Err(IdentityProviderError::already_registered());
        }
        let user_id = UserId::random();
        identities.push(IdentityRecord {
            user_id,
            email: email.clone(),
            password: Zeroizing::new(password.to_owned()),
        });
        Ok(user_id)
    }

    async fn sign_in(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<UserId, IdentityProviderError> {
        let identities = Self::lock(&self.identities);
        identities
            .iter()
            .find(|record| {
                &record.email == credentials.email()
                    && record.password.as_str() == credentials.password()
            })
            .map(|record| record.user_id)
            .ok_or_else(IdentityProviderError::invalid_credentials)
    }

    async fn sign_out(&self, _user_id: &UserId) -> Result<(), IdentityProviderError> {
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryPlatform {
    async fn insert(&self, profile: &NewProfile) -> Result<Profile, ProfilePersistenceError> {
        let mut profiles = Self::lock(&self.profiles);
        if profiles.iter().any(|row| row.user_id == profile.user_id) {
            return Err(ProfilePersistenceError::duplicate());
        }
        let stored = Profile {
            id: ProfileId::random(),
            user_id: profile.user_id,
            full_name: profile.full_name.clone(),
            phone_number: profile.phone_number.clone(),
            email: profile.email.clone(),
            avatar_url: profile.avatar_url.clone(),
            status: profile.status,
            created_at: Utc::now(),
        };
        // Prepend so listings come out newest first without re-sorting.
        profiles.insert(0, stored.clone());
        Ok(stored)
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Profile>, ProfilePersistenceError> {
        let profiles = Self::lock(&self.profiles);
        Ok(profiles.iter().find(|row| &row.user_id == user_id).cloned())
    }

    async fn list(
        &self,
        filter: Option<ProfileStatus>,
    ) -> Result<Vec<Profile>, ProfilePersistenceError> {
        let profiles = Self::lock(&self.profiles);
        Ok(profiles
            .iter()
            .filter(|row| filter.is_none_or(|status| row.status == status))
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        profile_id: &ProfileId,
        status: ProfileStatus,
    ) -> Result<(), ProfilePersistenceError> {
        let mut profiles = Self::lock(&self.profiles);
        let row = profiles
            .iter_mut()
            .find(|row| &row.id == profile_id)
            .ok_or_else(|| {
                ProfilePersistenceError::update(format!("no profile record matched {profile_id}"))
            })?;
        row.status = status;
        Ok(())
    }
}

#[async_trait]
impl RoleRepository for InMemoryPlatform {
    async fn grant(&self, user_id: &UserId, role: Role) -> Result<(), RolePersistenceError> {
        let mut roles = Self::lock(&self.roles);
        if !roles.iter().any(|(id, held)| id == user_id && *held == role) {
            roles.push((*user_id, role));
        }
        Ok(())
    }

    async fn has_role(&self, user_id: &UserId, role: Role) -> Result<bool, RolePersistenceError> {
        let roles = Self::lock(&self.roles);
        Ok(roles.iter().any(|(id, held)| id == user_id && *held == role))
    }
}

#[async_trait]
impl ContributionRepository for InMemoryPlatform {
    async fn insert(
        &self,
        contribution: &NewContribution,
    ) -> Result<Contribution, ContributionPersistenceError> {
        let mut contributions = Self::lock(&self.contributions);
        let stored = Contribution {
            id: Uuid::new_v4(),
            user_id: contribution.user_id,
            amount: contribution.amount,
            payment_method: contribution.payment_method,
            phone_number: contribution.phone_number.clone(),
            status: contribution.status,
            created_at: Utc::now(),
        };
        contributions.insert(0, stored.clone());
        Ok(stored)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Contribution>, ContributionPersistenceError> {
        let contributions = Self::lock(&self.contributions);
        Ok(contributions
            .iter()
            .filter(|row| &row.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AvatarStore for InMemoryPlatform {
    async fn store(
        &self,
        user_id: &UserId,
        upload: &AvatarUpload,
    ) -> Result<AvatarUrl, AvatarStoreError> {
        if self.fail_avatar_uploads.load(Ordering::Relaxed) {
            return Err(AvatarStoreError::store("avatar store unavailable"));
        }
        Ok(AvatarUrl::new(format!(
            "memory://avatars/{user_id}/{}",
            upload.file_name()
        )))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::PhoneNumber;

    fn new_profile(user_id: UserId, full_name: &str) -> NewProfile {
        NewProfile {
            user_id,
            full_name: full_name.into(),
            phone_number: PhoneNumber::new("0700123456").expect("fixture phone"),
            email: EmailAddress::new(format!("{}@example.com", user_id)).expect("fixture email"),
            avatar_url: None,
            status: ProfileStatus::Pending,
        }
    }

    #[tokio::test]
    async fn second_profile_for_same_identity_is_a_duplicate() {
        let platform = InMemoryPlatform::new();
        let user_id = UserId::random();
        ProfileRepository::insert(&platform, &new_profile(user_id, "First"))
            .await
            .expect("first insert");
        let error = ProfileRepository::insert(&platform, &new_profile(user_id, "Second"))
            .await
            .expect_err("second insert must fail");
        assert_eq!(error, ProfilePersistenceError::duplicate());
    }

    #[tokio::test]
    async fn listings_come_out_newest_first() {
        let platform = InMemoryPlatform::new();
        ProfileRepository::insert(&platform, &new_profile(UserId::random(), "First"))
            .await
            .expect("insert");
        ProfileRepository::insert(&platform, &new_profile(UserId::random(), "Second"))
            .await
            .expect("insert");

        let listed = platform.list(None).await.expect("list");
        assert_eq!(listed[0].full_name, "Second");
        assert_eq!(listed[1].full_name, "First");
    }

    #[tokio::test]
    async fn duplicate_email_cannot_register_twice() {
        let platform = InMemoryPlatform::new();
        let email = EmailAddress::new("doreen@example.com").expect("fixture email");
        platform
            .sign_up(&email, "secret-phrase", None)
            .await
            .expect("first registration");
        let error = platform
            .sign_up(&email, "other-phrase", None)
            .await
            .expect_err("second registration must fail");
        assert_eq!(error, IdentityProviderError::already_registered());
    }

    #[tokio::test]
    async fn role_grants_deduplicate() {
        let platform = InMemoryPlatform::new();
        let user_id = UserId::random();
        platform.grant(&user_id, Role::Member).await.expect("grant");
        platform.grant(&user_id, Role::Member).await.expect("grant");
        assert!(platform
            .has_role(&user_id, Role::Member)
            .await
            .expect("query"));
        assert!(!platform
            .has_role(&user_id, Role::Admin)
            .await
            .expect("query"));
    }

    #[tokio::test]
    async fn avatar_failure_toggle_breaks_uploads() {
        let platform = InMemoryPlatform::new();
        let user_id = UserId::random();
        let upload = AvatarUpload::new("me.png", vec![1, 2, 3]).expect("upload");

        assert!(platform.store(&user_id, &upload).await.is_ok());
        platform.set_avatar_failure(true);
        assert!(platform.store(&user_id, &upload).await.is_err());
    }
}
