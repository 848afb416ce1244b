//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: every HTTP endpoint from the inbound layer, the request
//! and response schemas, and the session cookie security scheme. The
//! generated document feeds Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::admin::{ReconciliationResponse, ReviewBody, ReviewResponse};
use crate::inbound::http::auth::{
    AvatarPayload, SignInRequest, SignInResponse, SignUpRequest,
};
use crate::inbound::http::contributions::{
    ContributionHistoryResponse, ContributionResponse, PaymentPromptResponse,
    SubmitContributionBody, SubmitContributionResponse,
};
use crate::inbound::http::members::ProfileResponse;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/signin.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Tujengane member portal API",
        description = "HTTP interface for membership applications, administrator review, and contribution recording."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::sign_up,
        crate::inbound::http::auth::sign_in,
        crate::inbound::http::auth::sign_out,
        crate::inbound::http::members::current_member,
        crate::inbound::http::contributions::list_contributions,
        crate::inbound::http::contributions::submit_contribution,
        crate::inbound::http::admin::list_applications,
        crate::inbound::http::admin::review_application,
        crate::inbound::http::admin::reconcile_role_grants,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        SignUpRequest,
        AvatarPayload,
        SignInRequest,
        SignInResponse,
        ProfileResponse,
        ContributionResponse,
        ContributionHistoryResponse,
        SubmitContributionBody,
        SubmitContributionResponse,
        PaymentPromptResponse,
        ReviewBody,
        ReviewResponse,
        ReconciliationResponse,
    )),
    tags(
        (name = "auth", description = "Sign-up, sign-in, and sign-out"),
        (name = "members", description = "Member profile access"),
        (name = "contributions", description = "Contribution recording and history"),
        (name = "admin", description = "Application review and reconciliation"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
