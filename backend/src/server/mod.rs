//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use propertyhub::Trace;
#[cfg(debug_assertions)]
use propertyhub::doc::ApiDoc;
use propertyhub::inbound::http::accounts::{
    current_account, federated_login, login, logout, signup,
};
use propertyhub::inbound::http::error::{json_error_handler, path_error_handler};
use propertyhub::inbound::http::health::{HealthState, live, ready};
use propertyhub::inbound::http::password_reset::{request_otp, reset_password, verify_otp};
use propertyhub::inbound::http::properties::{
    get_property, get_property_file, list_developer_properties, list_properties,
    list_user_properties,
};
use propertyhub::inbound::http::state::HttpState;
use propertyhub::inbound::http::suggestions::{add_suggestion, list_suggestions, set_status, vote};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const SESSION_TTL_HOURS: i64 = 2;
const JSON_LIMIT_BYTES: usize = 64 * 1024;

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
        .session_lifecycle(PersistentSession::default().session_ttl(
            actix_web::cookie::time::Duration::hours(SESSION_TTL_HOURS),
        ))
        .build();

    // Literal paths are registered before `/{kind}/...` patterns.
    let api = web::scope("/api/v1")
        .wrap(session)
        .service(logout)
        .service(current_account)
        .service(list_properties)
        .service(get_property)
        .service(get_property_file)
        .service(list_user_properties)
        .service(list_developer_properties)
        .service(list_suggestions)
        .service(add_suggestion)
        .service(vote)
        .service(set_status)
        .service(request_otp)
        .service(verify_otp)
        .service(reset_password)
        .service(signup)
        .service(login)
        .service(federated_login);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(
            web::JsonConfig::default()
                .limit(JSON_LIMIT_BYTES)
                .error_handler(json_error_handler),
        )
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the HTTP server and flip readiness once the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
        otp_ttl: _,
        identity_verifier: _,
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
