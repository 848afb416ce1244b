//! Contribution endpoints.

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::{SubmitContributionOutcome, SubmitContributionRequest};
use crate::domain::{Contribution, Error, PhoneNumber};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Wire representation of a contribution record.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContributionResponse {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub amount: u64,
    #[schema(example = "mpesa")]
    pub payment_method: String,
    pub phone_number: String,
    #[schema(example = "pending")]
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Contribution> for ContributionResponse {
    fn from(contribution: Contribution) -> Self {
        Self {
            id: contribution.id.to_string(),
            amount: contribution.amount,
            payment_method: contribution.payment_method.to_string(),
            phone_number: contribution.phone_number.to_string(),
            status: contribution.status.to_string(),
            created_at: contribution.created_at,
        }
    }
}

/// Contribution history with display aggregates.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContributionHistoryResponse {
    pub contributions: Vec<ContributionResponse>,
    /// Sum over completed records, recomputed per fetch.
    pub total_completed: u64,
    pub count: usize,
}

/// Contribution history for the signed-in member, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/contributions",
    responses(
        (status = 200, description = "Contribution history", body = ContributionHistoryResponse),
        (status = 401, description = "Not signed in", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["contributions"],
    operation_id = "listContributions"
)]
#[get("/contributions")]
pub async fn list_contributions(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ContributionHistoryResponse>> {
    let user_id = session.require_user_id()?;
    let summary = state.contributions_query.list_for_user(&user_id).await?;
    let count = summary.contributions.len();
    Ok(web::Json(ContributionHistoryResponse {
        contributions: summary
            .contributions
            .into_iter()
            .map(ContributionResponse::from)
            .collect(),
        total_completed: summary.total_completed,
        count,
    }))
}

/// Submission body for `POST /api/v1/contributions`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitContributionBody {
    /// Whole currency units; at least the configured minimum.
    pub amount: u64,
    /// Mobile-money number the payment prompt is sent to.
    #[schema(example = "0700123456")]
    pub phone_number: String,
}

/// Payment prompt descriptor returned with a recorded contribution.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPromptResponse {
    #[schema(example = "mpesa")]
    pub channel: String,
    pub phone_number: String,
    pub amount: u64,
}

/// Response body for a recorded contribution.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitContributionResponse {
    pub contribution: ContributionResponse,
    /// An external prompt follows on this device; settlement is not
    /// confirmed here.
    pub prompt: PaymentPromptResponse,
}

impl From<SubmitContributionOutcome> for SubmitContributionResponse {
    fn from(outcome: SubmitContributionOutcome) -> Self {
        Self {
            contribution: outcome.contribution.into(),
            prompt: PaymentPromptResponse {
                channel: outcome.prompt.channel.to_string(),
                phone_number: outcome.prompt.phone_number.to_string(),
                amount: outcome.prompt.amount,
            },
        }
    }
}

/// Record a contribution intent for an approved member.
#[utoipa::path(
    post,
    path = "/api/v1/contributions",
    request_body = SubmitContributionBody,
    responses(
        (status = 201, description = "Contribution recorded", body = SubmitContributionResponse),
        (status = 400, description = "Invalid amount or phone number", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Membership not approved", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["contributions"],
    operation_id = "submitContribution"
)]
#[post("/contributions")]
pub async fn submit_contribution(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubmitContributionBody>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let SubmitContributionBody {
        amount,
        phone_number,
    } = payload.into_inner();
    let phone_number = PhoneNumber::new(&phone_number).map_err(|_| {
        Error::invalid_request("invalid phone number (e.g., 0700123456)")
            .with_details(json!({ "field": "phoneNumber", "value": phone_number }))
    })?;

    let outcome = state
        .contributions
        .submit(SubmitContributionRequest {
            user_id,
            amount,
            phone_number,
        })
        .await?;
    Ok(HttpResponse::Created().json(SubmitContributionResponse::from(outcome)))
}
