//! Administrator endpoints for reviewing membership applications.
//!
//! Access policy: the platform already scopes these collections to
//! administrators; the role check here keeps the HTTP surface honest when
//! running against the in-memory adapter and gives non-admins a clean 403.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::{ReviewDecision, ReviewOutcome, ReviewRequest};
use crate::domain::{Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::members::ProfileResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_profile_id, parse_status_filter, parse_user_id};

async fn require_admin(state: &HttpState, session: &SessionContext) -> Result<UserId, Error> {
    let user_id = session.require_user_id()?;
    if state.membership_query.is_admin(&user_id).await? {
        Ok(user_id)
    } else {
        Err(Error::forbidden("admin role required"))
    }
}

/// Filter for the applications listing.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationsFilter {
    /// `pending`, `approved`, `rejected`, or `all` (default).
    pub status: Option<String>,
}

/// Membership applications, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/applications",
    params(ApplicationsFilter),
    responses(
        (status = 200, description = "Applications", body = [ProfileResponse]),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Admin role required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listApplications"
)]
#[get("/admin/applications")]
pub async fn list_applications(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: web::Query<ApplicationsFilter>,
) -> ApiResult<web::Json<Vec<ProfileResponse>>> {
    require_admin(&state, &session).await?;
    let status = parse_status_filter(filter.status.as_deref())?;
    let applications = state.membership_query.list_applications(status).await?;
    Ok(web::Json(
        applications.into_iter().map(ProfileResponse::from).collect(),
    ))
}

/// Review body for `POST /api/v1/admin/applications/{profileId}/review`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewBody {
    /// Identity owning the profile under review.
    pub user_id: String,
    /// `approved` or `rejected`.
    #[schema(example = "approved")]
    pub decision: String,
}

/// Review outcome payload.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub profile_id: String,
    #[schema(example = "approved")]
    pub status: String,
    pub role_granted: bool,
}

impl From<ReviewOutcome> for ReviewResponse {
    fn from(outcome: ReviewOutcome) -> Self {
        Self {
            profile_id: outcome.profile_id.to_string(),
            status: outcome.status.to_string(),
            role_granted: outcome.role_granted,
        }
    }
}

fn parse_decision(raw: &str) -> Result<ReviewDecision, Error> {
    match raw {
        "approved" => Ok(ReviewDecision::Approved),
        "rejected" => Ok(ReviewDecision::Rejected),
        _ => Err(
            Error::invalid_request("decision must be approved or rejected")
                .with_details(json!({ "field": "decision", "value": raw })),
        ),
    }
}

/// Apply an administrator decision to an application.
#[utoipa::path(
    post,
    path = "/api/v1/admin/applications/{profileId}/review",
    params(("profileId" = String, Path, description = "Profile record under review")),
    request_body = ReviewBody,
    responses(
        (status = 200, description = "Decision applied", body = ReviewResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Admin role required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "reviewApplication"
)]
#[post("/admin/applications/{profile_id}/review")]
pub async fn review_application(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ReviewBody>,
) -> ApiResult<web::Json<ReviewResponse>> {
    require_admin(&state, &session).await?;
    let profile_id = parse_profile_id(&path.into_inner())?;
    let ReviewBody { user_id, decision } = payload.into_inner();
    let request = ReviewRequest {
        profile_id,
        user_id: parse_user_id(&user_id)?,
        decision: parse_decision(&decision)?,
    };
    let outcome = state.membership.review_application(request).await?;
    Ok(web::Json(outcome.into()))
}

/// Reconciliation report payload.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResponse {
    /// Identities that were approved but missing their member grant.
    pub repaired: Vec<String>,
}

/// Grant member roles missing from approved profiles.
#[utoipa::path(
    post,
    path = "/api/v1/admin/reconcile",
    responses(
        (status = 200, description = "Reconciliation report", body = ReconciliationResponse),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Admin role required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "reconcileRoleGrants"
)]
#[post("/admin/reconcile")]
pub async fn reconcile_role_grants(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ReconciliationResponse>> {
    require_admin(&state, &session).await?;
    let report = state.membership.reconcile_role_grants().await?;
    Ok(web::Json(ReconciliationResponse {
        repaired: report
            .repaired
            .into_iter()
            .map(|user_id| user_id.to_string())
            .collect(),
    }))
}
