//! Member profile endpoints.

use actix_web::{get, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, Profile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Wire representation of a membership profile.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(value_type = String, example = "9f1c1f1e-0000-4000-8000-000000000000")]
    pub user_id: String,
    pub full_name: String,
    pub phone_number: String,
    pub email: String,
    pub avatar_url: Option<String>,
    #[schema(example = "pending")]
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id.to_string(),
            user_id: profile.user_id.to_string(),
            full_name: profile.full_name,
            phone_number: profile.phone_number.to_string(),
            email: profile.email.to_string(),
            avatar_url: profile.avatar_url.map(|url| url.to_string()),
            status: profile.status.to_string(),
            created_at: profile.created_at,
        }
    }
}

/// Profile of the signed-in member.
#[utoipa::path(
    get,
    path = "/api/v1/members/me",
    responses(
        (status = 200, description = "Membership profile", body = ProfileResponse),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "No profile for this identity", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["members"],
    operation_id = "currentMember"
)]
#[get("/members/me")]
pub async fn current_member(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ProfileResponse>> {
    let user_id = session.require_user_id()?;
    let profile = state
        .membership_query
        .profile_for_user(&user_id)
        .await?
        .ok_or_else(|| Error::not_found("no membership profile for this identity"))?;
    Ok(web::Json(profile.into()))
}
