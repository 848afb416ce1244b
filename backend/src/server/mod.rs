//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::{
    AvatarStore, ContributionRepository, IdentityProvider, ProfileRepository, RoleRepository,
};
use crate::domain::{ContributionService, MembershipService};
use crate::inbound::http::admin::{list_applications, reconcile_role_grants, review_application};
use crate::inbound::http::auth::{sign_in, sign_out, sign_up};
use crate::inbound::http::contributions::{list_contributions, submit_contribution};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::members::current_member;
use crate::inbound::http::state::HttpState;
use crate::middleware::trace::Trace;
use crate::outbound::memory::InMemoryPlatform;
use crate::outbound::platform::{
    PlatformAvatarStore, PlatformContributionRepository, PlatformIdentityProvider,
    PlatformProfileRepository, PlatformRoleRepository,
};

/// Sign-up bodies may carry a base64 avatar of up to 5 MiB; leave headroom
/// over the encoding overhead.
const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;

fn wire_services<I, P, R, A, C>(
    identity: Arc<I>,
    profiles: Arc<P>,
    roles: Arc<R>,
    avatars: Arc<A>,
    contributions: Arc<C>,
    email_redirect: Option<String>,
) -> HttpState
where
    I: IdentityProvider + 'static,
    P: ProfileRepository + 'static,
    R: RoleRepository + 'static,
    A: AvatarStore + 'static,
    C: ContributionRepository + 'static,
{
    let mut membership = MembershipService::new(identity, profiles.clone(), roles, avatars);
    if let Some(redirect) = email_redirect {
        membership = membership.with_email_redirect(redirect);
    }
    let membership = Arc::new(membership);
    let contribution_service = Arc::new(ContributionService::new(profiles, contributions));
    HttpState::new(
        membership.clone(),
        membership.clone(),
        membership,
        contribution_service.clone(),
        contribution_service,
    )
}

/// Build the HTTP state from configuration: platform-backed adapters when a
/// client is configured, the in-memory adapter otherwise.
fn build_http_state(config: &ServerConfig) -> HttpState {
    match &config.platform {
        Some(client) => wire_services(
            Arc::new(PlatformIdentityProvider::new(client.clone())),
            Arc::new(PlatformProfileRepository::new(client.clone())),
            Arc::new(PlatformRoleRepository::new(client.clone())),
            Arc::new(PlatformAvatarStore::new(client.clone())),
            Arc::new(PlatformContributionRepository::new(client.clone())),
            config.email_redirect.clone(),
        ),
        None => {
            tracing::warn!("no platform configured; serving from the in-memory adapter");
            let platform = Arc::new(InMemoryPlatform::new());
            wire_services(
                platform.clone(),
                platform.clone(),
                platform.clone(),
                platform.clone(),
                platform,
                config.email_redirect.clone(),
            )
        }
    }
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(sign_up)
        .service(sign_in)
        .service(sign_out)
        .service(current_member)
        .service(list_contributions)
        .service(submit_contribution)
        .service(list_applications)
        .service(review_application)
        .service(reconcile_role_grants);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().limit(JSON_BODY_LIMIT))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config));
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        platform: _,
        email_redirect: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
