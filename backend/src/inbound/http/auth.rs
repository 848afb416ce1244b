//! Authentication endpoints: sign-up, sign-in, sign-out.
//!
//! ```text
//! POST /api/v1/auth/signup {"fullName":"...","email":"...","phone":"0700123456","password":"..."}
//! POST /api/v1/auth/signin {"email":"...","password":"..."}
//! POST /api/v1/auth/signout
//! ```

use actix_web::{HttpResponse, post, web};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{AvatarUpload, Error, SignInForm, SignUpForm};
use crate::inbound::http::ApiResult;
use crate::inbound::http::members::ProfileResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::validation_error;

/// Avatar image attached to a sign-up request.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvatarPayload {
    #[schema(example = "me.png")]
    pub file_name: String,
    /// Base64-encoded image bytes.
    pub content: String,
}

/// Sign-up request body for `POST /api/v1/auth/signup`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub full_name: String,
    pub email: String,
    #[schema(example = "0700123456")]
    pub phone: String,
    pub password: String,
    #[serde(default)]
    pub avatar: Option<AvatarPayload>,
}

fn decode_avatar(payload: AvatarPayload) -> Result<AvatarUpload, Error> {
    let bytes = BASE64.decode(payload.content.as_bytes()).map_err(|_| {
        Error::invalid_request("avatar content must be valid base64")
            .with_details(json!({ "field": "avatar" }))
    })?;
    AvatarUpload::new(payload.file_name, bytes).map_err(|error| {
        Error::invalid_request(error.to_string()).with_details(json!({ "field": "avatar" }))
    })
}

/// Register a new member.
///
/// Creates the identity, stores the avatar when one is attached (an upload
/// failure is tolerated), and records a pending membership profile awaiting
/// administrator review.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Pending profile created", body = ProfileResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email or profile already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signUp",
    security([])
)]
#[post("/auth/signup")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    payload: web::Json<SignUpRequest>,
) -> ApiResult<HttpResponse> {
    let SignUpRequest {
        full_name,
        email,
        phone,
        password,
        avatar,
    } = payload.into_inner();

    let application = SignUpForm {
        full_name,
        email,
        phone,
        password,
    }
    .validate()
    .map_err(validation_error)?;
    let avatar = avatar.map(decode_avatar).transpose()?;

    let profile = state.membership.register_member(application, avatar).await?;
    Ok(HttpResponse::Created().json(ProfileResponse::from(profile)))
}

/// Sign-in request body for `POST /api/v1/auth/signin`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Sign-in response payload.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub user_id: String,
    /// Membership status, when a profile exists, so the client can route
    /// pending or rejected members.
    #[schema(example = "approved")]
    pub membership_status: Option<String>,
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signin",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = SignInResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials or unverified email", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signIn",
    security([])
)]
#[post("/auth/signin")]
pub async fn sign_in(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignInRequest>,
) -> ApiResult<HttpResponse> {
    let SignInRequest { email, password } = payload.into_inner();
    let credentials = SignInForm { email, password }
        .validate()
        .map_err(validation_error)?;

    let outcome = state.auth.sign_in(&credentials).await?;
    session.persist_user(&outcome.user_id)?;
    Ok(HttpResponse::Ok().json(SignInResponse {
        user_id: outcome.user_id.to_string(),
        membership_status: outcome
            .membership_status
            .map(|status| status.to_string()),
    }))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signout",
    responses(
        (status = 204, description = "Signed out"),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signOut"
)]
#[post("/auth/signout")]
pub async fn sign_out(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    if let Some(user_id) = session.user_id()? {
        state.auth.sign_out(&user_id).await?;
    }
    session.purge();
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MAX_AVATAR_BYTES;

    #[test]
    fn decode_avatar_accepts_base64_payloads() {
        let payload = AvatarPayload {
            file_name: "me.png".into(),
            content: BASE64.encode([1_u8, 2, 3]),
        };
        let upload = decode_avatar(payload).expect("valid avatar");
        assert_eq!(upload.bytes(), &[1, 2, 3]);
        assert_eq!(upload.extension(), Some("png"));
    }

    #[test]
    fn decode_avatar_rejects_bad_base64() {
        let payload = AvatarPayload {
            file_name: "me.png".into(),
            content: "not base64!!!".into(),
        };
        let error = decode_avatar(payload).expect_err("invalid base64");
        assert_eq!(error.details().expect("details")["field"], "avatar");
    }

    #[test]
    fn decode_avatar_rejects_oversized_payloads() {
        let payload = AvatarPayload {
            file_name: "me.png".into(),
            content: BASE64.encode(vec![0_u8; MAX_AVATAR_BYTES + 1]),
        };
        assert!(decode_avatar(payload).is_err());
    }
}
