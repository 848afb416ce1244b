//! Document store adapters (`rest/v1`) for the `profiles`, `user_roles`,
//! and `contributions` collections.
//!
//! The store speaks a PostgREST-style dialect: filters are query parameters
//! (`user_id=eq.<uuid>`), ordering is `order=created_at.desc`, and inserts
//! return the created row when asked to with `Prefer: return=representation`.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::json;

use super::client::{PlatformClient, status_message};
use super::dto::{ContributionRow, NewContributionRow, NewProfileRow, ProfileRow, RoleRow};
use crate::domain::ports::{
    ContributionPersistenceError, ContributionRepository, ProfilePersistenceError,
    ProfileRepository, RolePersistenceError, RoleRepository,
};
use crate::domain::{
    Contribution, NewContribution, NewProfile, Profile, ProfileId, ProfileStatus, Role, UserId,
};

const RETURN_REPRESENTATION: (&str, &str) = ("Prefer", "return=representation");

/// Profile repository over the `profiles` collection.
#[derive(Clone)]
pub struct PlatformProfileRepository {
    client: PlatformClient,
}

impl PlatformProfileRepository {
    /// Build the adapter over a shared platform client.
    pub fn new(client: PlatformClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProfileRepository for PlatformProfileRepository {
    async fn insert(&self, profile: &NewProfile) -> Result<Profile, ProfilePersistenceError> {
        let url = self
            .client
            .endpoint("rest/v1/profiles")
            .map_err(ProfilePersistenceError::query)?;
        let response = self
            .client
            .request(Method::POST, url)
            .header(RETURN_REPRESENTATION.0, RETURN_REPRESENTATION.1)
            .json(&NewProfileRow::from_domain(profile))
            .send()
            .await
            .map_err(|error| ProfilePersistenceError::query(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| ProfilePersistenceError::query(error.to_string()))?;
        if status == StatusCode::CONFLICT {
            return Err(ProfilePersistenceError::duplicate());
        }
        if !status.is_success() {
            return Err(ProfilePersistenceError::query(status_message(
                status,
                body.as_ref(),
            )));
        }

        let rows: Vec<ProfileRow> = serde_json::from_slice(body.as_ref())
            .map_err(|error| ProfilePersistenceError::query(format!("invalid row: {error}")))?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ProfilePersistenceError::query("insert returned no representation"))?
            .into_domain()
            .map_err(ProfilePersistenceError::query)
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Profile>, ProfilePersistenceError> {
        let mut url = self
            .client
            .endpoint("rest/v1/profiles")
            .map_err(ProfilePersistenceError::query)?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("user_id", &format!("eq.{user_id}"));

        let rows: Vec<ProfileRow> = fetch_rows(&self.client, url)
            .await
            .map_err(ProfilePersistenceError::query)?;
        rows.into_iter()
            .next()
            .map(|row| row.into_domain().map_err(ProfilePersistenceError::query))
            .transpose()
    }

    async fn list(
        &self,
        filter: Option<ProfileStatus>,
    ) -> Result<Vec<Profile>, ProfilePersistenceError> {
        let mut url = self
            .client
            .endpoint("rest/v1/profiles")
            .map_err(ProfilePersistenceError::query)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("select", "*")
                .append_pair("order", "created_at.desc");
            if let Some(status) = filter {
                query.append_pair("status", &format!("eq.{status}"));
            }
        }

        let rows: Vec<ProfileRow> = fetch_rows(&self.client, url)
            .await
            .map_err(ProfilePersistenceError::query)?;
        rows.into_iter()
            .map(|row| row.into_domain().map_err(ProfilePersistenceError::query))
            .collect()
    }

    async fn update_status(
        &self,
        profile_id: &ProfileId,
        status: ProfileStatus,
    ) -> Result<(), ProfilePersistenceError> {
        let mut url = self
            .client
            .endpoint("rest/v1/profiles")
            .map_err(ProfilePersistenceError::query)?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{profile_id}"));

        let response = self
            .client
            .request(Method::PATCH, url)
            .header(RETURN_REPRESENTATION.0, RETURN_REPRESENTATION.1)
            .json(&json!({ "status": status.as_str() }))
            .send()
            .await
            .map_err(|error| ProfilePersistenceError::update(error.to_string()))?;

        let response_status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| ProfilePersistenceError::update(error.to_string()))?;
        if !response_status.is_success() {
            return Err(ProfilePersistenceError::update(status_message(
                response_status,
                body.as_ref(),
            )));
        }

        let rows: Vec<ProfileRow> = serde_json::from_slice(body.as_ref())
            .map_err(|error| ProfilePersistenceError::update(format!("invalid row: {error}")))?;
        if rows.is_empty() {
            return Err(ProfilePersistenceError::update(format!(
                "no profile record matched {profile_id}"
            )));
        }
        Ok(())
    }
}

/// Role repository over the `user_roles` collection.
#[derive(Clone)]
pub struct PlatformRoleRepository {
    client: PlatformClient,
}

impl PlatformRoleRepository {
    /// Build the adapter over a shared platform client.
    pub fn new(client: PlatformClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RoleRepository for PlatformRoleRepository {
    async fn grant(&self, user_id: &UserId, role: Role) -> Result<(), RolePersistenceError> {
        let url = self
            .client
            .endpoint("rest/v1/user_roles")
            .map_err(RolePersistenceError::query)?;
        let response = self
            .client
            .request(Method::POST, url)
            .json(&RoleRow {
                user_id: *user_id.as_uuid(),
                role: role.as_str().to_owned(),
            })
            .send()
            .await
            .map_err(|error| RolePersistenceError::query(error.to_string()))?;

        let status = response.status();
        // A conflict means the grant already exists, which satisfies the
        // caller's intent.
        if status == StatusCode::CONFLICT || status.is_success() {
            return Ok(());
        }
        let body = response
            .bytes()
            .await
            .map_err(|error| RolePersistenceError::query(error.to_string()))?;
        Err(RolePersistenceError::query(status_message(
            status,
            body.as_ref(),
        )))
    }

    async fn has_role(&self, user_id: &UserId, role: Role) -> Result<bool, RolePersistenceError> {
        let mut url = self
            .client
            .endpoint("rest/v1/user_roles")
            .map_err(RolePersistenceError::query)?;
        url.query_pairs_mut()
            .append_pair("select", "role")
            .append_pair("user_id", &format!("eq.{user_id}"))
            .append_pair("role", &format!("eq.{role}"));

        let rows: Vec<RoleRow> = fetch_rows(&self.client, url)
            .await
            .map_err(RolePersistenceError::query)?;
        Ok(!rows.is_empty())
    }
}

/// Contribution repository over the `contributions` collection.
#[derive(Clone)]
pub struct PlatformContributionRepository {
    client: PlatformClient,
}

impl PlatformContributionRepository {
    /// Build the adapter over a shared platform client.
    pub fn new(client: PlatformClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContributionRepository for PlatformContributionRepository {
    async fn insert(
        &self,
        contribution: &NewContribution,
    ) -> Result<Contribution, ContributionPersistenceError> {
        let url = self
            .client
            .endpoint("rest/v1/contributions")
            .map_err(ContributionPersistenceError::query)?;
        let response = self
            .client
            .request(Method::POST, url)
            .header(RETURN_REPRESENTATION.0, RETURN_REPRESENTATION.1)
            .json(&NewContributionRow::from_domain(contribution))
            .send()
            .await
            .map_err(|error| ContributionPersistenceError::query(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| ContributionPersistenceError::query(error.to_string()))?;
        if !status.is_success() {
            return Err(ContributionPersistenceError::query(status_message(
                status,
                body.as_ref(),
            )));
        }

        let rows: Vec<ContributionRow> = serde_json::from_slice(body.as_ref()).map_err(|error| {
            ContributionPersistenceError::query(format!("invalid row: {error}"))
        })?;
        rows.into_iter()
            .next()
            .ok_or_else(|| {
                ContributionPersistenceError::query("insert returned no representation")
            })?
            .into_domain()
            .map_err(ContributionPersistenceError::query)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Contribution>, ContributionPersistenceError> {
        let mut url = self
            .client
            .endpoint("rest/v1/contributions")
            .map_err(ContributionPersistenceError::query)?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("user_id", &format!("eq.{user_id}"))
            .append_pair("order", "created_at.desc");

        let rows: Vec<ContributionRow> = fetch_rows(&self.client, url)
            .await
            .map_err(ContributionPersistenceError::query)?;
        rows.into_iter()
            .map(|row| row.into_domain().map_err(ContributionPersistenceError::query))
            .collect()
    }
}

/// GET a collection endpoint and decode its row array.
async fn fetch_rows<T: serde::de::DeserializeOwned>(
    client: &PlatformClient,
    url: reqwest::Url,
) -> Result<Vec<T>, String> {
    let response = client
        .request(Method::GET, url)
        .send()
        .await
        .map_err(|error| error.to_string())?;
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|error| error.to_string())?;
    if !status.is_success() {
        return Err(status_message(status, body.as_ref()));
    }
    serde_json::from_slice(body.as_ref()).map_err(|error| format!("invalid row: {error}"))
}
