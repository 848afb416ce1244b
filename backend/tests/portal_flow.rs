//! End-to-end flow tests over the HTTP surface and the in-memory adapter:
//! sign-up, administrator review, and contribution recording.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};

use backend::domain::ports::{IdentityProvider, ProfileRepository, RoleRepository};
use backend::domain::{
    ContributionService, EmailAddress, MembershipService, NewProfile, PhoneNumber, ProfileStatus,
    Role,
};
use backend::inbound::http::admin::{
    list_applications, reconcile_role_grants, review_application,
};
use backend::inbound::http::auth::{sign_in, sign_out, sign_up};
use backend::inbound::http::contributions::{list_contributions, submit_contribution};
use backend::inbound::http::members::current_member;
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::InMemoryPlatform;

fn http_state(platform: &Arc<InMemoryPlatform>) -> web::Data<HttpState> {
    let membership = Arc::new(MembershipService::new(
        platform.clone(),
        platform.clone(),
        platform.clone(),
        platform.clone(),
    ));
    let contributions = Arc::new(ContributionService::new(platform.clone(), platform.clone()));
    web::Data::new(HttpState::new(
        membership.clone(),
        membership.clone(),
        membership,
        contributions.clone(),
        contributions,
    ))
}

fn portal_app(
    platform: &Arc<InMemoryPlatform>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    App::new()
        .app_data(http_state(platform))
        .app_data(web::JsonConfig::default().limit(10 * 1024 * 1024))
        .service(
            web::scope("/api/v1")
                .wrap(session)
                .service(sign_up)
                .service(sign_in)
                .service(sign_out)
                .service(current_member)
                .service(list_contributions)
                .service(submit_contribution)
                .service(list_applications)
                .service(review_application)
                .service(reconcile_role_grants),
        )
}

fn sign_up_body(email: &str) -> Value {
    json!({
        "fullName": "Doreen Wasera",
        "email": email,
        "phone": "0700123456",
        "password": "secret-phrase",
    })
}

async fn sign_in_cookie<S, B>(app: &S, email: &str, password: &str) -> Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signin")
            .set_json(json!({ "email": email, "password": password }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "sign-in should succeed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Register an administrator identity out-of-band, as provisioning would.
async fn provision_admin(platform: &InMemoryPlatform, email: &str, password: &str) {
    let email = EmailAddress::new(email).expect("admin email");
    let user_id = platform
        .sign_up(&email, password, None)
        .await
        .expect("admin identity");
    platform
        .grant(&user_id, Role::Admin)
        .await
        .expect("admin grant");
}

#[actix_web::test]
async fn sign_up_with_avatar_creates_pending_profile() {
    let platform = Arc::new(InMemoryPlatform::new());
    let app = test::init_service(portal_app(&platform)).await;

    let mut body = sign_up_body("doreen@example.com");
    body["avatar"] = json!({
        "fileName": "me.png",
        "content": BASE64.encode(vec![7_u8; 2 * 1024 * 1024]),
    });

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let profile: Value = test::read_body_json(response).await;
    assert_eq!(profile["status"], "pending");
    assert!(profile["avatarUrl"].is_string(), "avatar url should be set");
}

#[actix_web::test]
async fn sign_up_tolerates_a_broken_avatar_store() {
    let platform = Arc::new(InMemoryPlatform::new());
    platform.set_avatar_failure(true);
    let app = test::init_service(portal_app(&platform)).await;

    let mut body = sign_up_body("doreen@example.com");
    body["avatar"] = json!({
        "fileName": "me.png",
        "content": BASE64.encode([1_u8, 2, 3]),
    });

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let profile: Value = test::read_body_json(response).await;
    assert_eq!(profile["status"], "pending");
    assert!(profile["avatarUrl"].is_null(), "avatar url should be null");
}

#[actix_web::test]
async fn duplicate_email_sign_up_conflicts() {
    let platform = Arc::new(InMemoryPlatform::new());
    let app = test::init_service(portal_app(&platform)).await;

    let first = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(sign_up_body("doreen@example.com"))
            .to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(sign_up_body("doreen@example.com"))
            .to_request(),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let error: Value = test::read_body_json(second).await;
    assert_eq!(error["details"]["code"], "already_registered");
}

#[actix_web::test]
async fn invalid_sign_up_reports_the_failing_fields() {
    let platform = Arc::new(InMemoryPlatform::new());
    let app = test::init_service(portal_app(&platform)).await;

    let mut body = sign_up_body("doreen@example.com");
    body["phone"] = json!("0812345678");

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = test::read_body_json(response).await;
    let fields = error["details"]["fields"].as_array().expect("field list");
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0]["field"], "phone");
}

#[actix_web::test]
async fn membership_flow_from_application_to_contribution() {
    let platform = Arc::new(InMemoryPlatform::new());
    let app = test::init_service(portal_app(&platform)).await;

    // Member applies.
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(sign_up_body("doreen@example.com"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Sign-in reports the pending status.
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signin")
            .set_json(json!({ "email": "doreen@example.com", "password": "secret-phrase" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let member_cookie = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned();
    let signed_in: Value = test::read_body_json(response).await;
    assert_eq!(signed_in["membershipStatus"], "pending");

    // Contributions are blocked while pending, whatever the amount.
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/contributions")
            .cookie(member_cookie.clone())
            .set_json(json!({ "amount": 10_000, "phoneNumber": "0700123456" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Admin reviews the application.
    provision_admin(&platform, "admin@example.com", "admin-phrase").await;
    let admin_cookie = sign_in_cookie(&app, "admin@example.com", "admin-phrase").await;

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/applications?status=pending")
            .cookie(admin_cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let applications: Value = test::read_body_json(response).await;
    let pending = applications.as_array().expect("application list");
    assert_eq!(pending.len(), 1);
    let profile_id = pending[0]["id"].as_str().expect("profile id").to_owned();
    let user_id = pending[0]["userId"].as_str().expect("user id").to_owned();

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/admin/applications/{profile_id}/review"))
            .cookie(admin_cookie.clone())
            .set_json(json!({ "userId": user_id, "decision": "approved" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: Value = test::read_body_json(response).await;
    assert_eq!(outcome["status"], "approved");
    assert_eq!(outcome["roleGranted"], true);

    // Below the minimum is still refused.
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/contributions")
            .cookie(member_cookie.clone())
            .set_json(json!({ "amount": 49, "phoneNumber": "0700123456" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = test::read_body_json(response).await;
    assert_eq!(error["details"]["code"], "amount_below_minimum");

    // The boundary amount is accepted and recorded pending settlement.
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/contributions")
            .cookie(member_cookie.clone())
            .set_json(json!({ "amount": 50, "phoneNumber": "0700123456" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let recorded: Value = test::read_body_json(response).await;
    assert_eq!(recorded["contribution"]["status"], "pending");
    assert_eq!(recorded["prompt"]["channel"], "mpesa");

    // History lists the record; nothing is completed yet.
    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/contributions")
            .cookie(member_cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let history: Value = test::read_body_json(response).await;
    assert_eq!(history["count"], 1);
    assert_eq!(history["totalCompleted"], 0);
}

#[actix_web::test]
async fn rejection_leaves_no_role_grant() {
    let platform = Arc::new(InMemoryPlatform::new());
    let app = test::init_service(portal_app(&platform)).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(sign_up_body("doreen@example.com"))
            .to_request(),
    )
    .await;
    let profile: Value = test::read_body_json(response).await;
    let profile_id = profile["id"].as_str().expect("profile id").to_owned();
    let user_id = profile["userId"].as_str().expect("user id").to_owned();

    provision_admin(&platform, "admin@example.com", "admin-phrase").await;
    let admin_cookie = sign_in_cookie(&app, "admin@example.com", "admin-phrase").await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/admin/applications/{profile_id}/review"))
            .cookie(admin_cookie)
            .set_json(json!({ "userId": user_id, "decision": "rejected" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: Value = test::read_body_json(response).await;
    assert_eq!(outcome["status"], "rejected");
    assert_eq!(outcome["roleGranted"], false);

    let member = backend::domain::UserId::new(&user_id).expect("user id");
    assert!(
        !platform
            .has_role(&member, Role::Member)
            .await
            .expect("role query"),
        "rejected member must not hold the member role"
    );
}

#[actix_web::test]
async fn admin_endpoints_refuse_ordinary_members() {
    let platform = Arc::new(InMemoryPlatform::new());
    let app = test::init_service(portal_app(&platform)).await;

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(sign_up_body("doreen@example.com"))
            .to_request(),
    )
    .await;
    let cookie = sign_in_cookie(&app, "doreen@example.com", "secret-phrase").await;

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/applications")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn contribution_endpoints_require_a_session() {
    let platform = Arc::new(InMemoryPlatform::new());
    let app = test::init_service(portal_app(&platform)).await;

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/contributions")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn reconcile_repairs_approved_profiles_missing_grants() {
    let platform = Arc::new(InMemoryPlatform::new());
    let app = test::init_service(portal_app(&platform)).await;

    // Seed drift directly: an approved profile with no member grant, as a
    // failed grant step after approval would leave behind.
    let drifted = backend::domain::UserId::random();
    platform
        .insert(&NewProfile {
            user_id: drifted,
            full_name: "Drifted Member".into(),
            phone_number: PhoneNumber::new("0712345678").expect("fixture phone"),
            email: EmailAddress::new("drifted@example.com").expect("fixture email"),
            avatar_url: None,
            status: ProfileStatus::Approved,
        })
        .await
        .expect("seed profile");

    provision_admin(&platform, "admin@example.com", "admin-phrase").await;
    let admin_cookie = sign_in_cookie(&app, "admin@example.com", "admin-phrase").await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/reconcile")
            .cookie(admin_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let report: Value = test::read_body_json(response).await;
    let repaired = report["repaired"].as_array().expect("repaired list");
    assert_eq!(repaired.len(), 1);
    assert_eq!(repaired[0], drifted.to_string());

    assert!(
        platform
            .has_role(&drifted, Role::Member)
            .await
            .expect("role query"),
        "reconciliation must grant the missing member role"
    );
}

#[actix_web::test]
async fn sign_out_ends_the_session() {
    let platform = Arc::new(InMemoryPlatform::new());
    let app = test::init_service(portal_app(&platform)).await;

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(sign_up_body("doreen@example.com"))
            .to_request(),
    )
    .await;
    let cookie = sign_in_cookie(&app, "doreen@example.com", "secret-phrase").await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cleared = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie rewritten")
        .into_owned();

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/members/me")
            .cookie(cleared)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
