//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{HttpResponse, web};

use crate::domain::ports::{
    MockAccountProfileQuery, MockCredentialCommand, MockPasswordResetCommand,
    MockPropertyCatalogQuery, MockSuggestionCommand, MockSuggestionQuery,
};
use crate::domain::{AccountId, AccountKind, AccountRef, Error};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Path for [`fixture_login`] routes: `/test-login/{kind}/{id}`.
pub const FIXTURE_LOGIN_PATH: &str = "/test-login/{kind}/{id}";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Mocked driving ports; unexpected calls panic.
#[derive(Default)]
pub struct MockPorts {
    pub credentials: MockCredentialCommand,
    pub profile: MockAccountProfileQuery,
    pub catalog: MockPropertyCatalogQuery,
    pub suggestions: MockSuggestionCommand,
    pub suggestions_query: MockSuggestionQuery,
    pub password_reset: MockPasswordResetCommand,
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState {
            credentials: Arc::new(self.credentials),
            profile: Arc::new(self.profile),
            catalog: Arc::new(self.catalog),
            suggestions: Arc::new(self.suggestions),
            suggestions_query: Arc::new(self.suggestions_query),
            password_reset: Arc::new(self.password_reset),
        }
    }
}

/// Handler that binds the session to `kind:id` without credentials.
pub async fn fixture_login(
    session: SessionContext,
    path: web::Path<(String, i32)>,
) -> Result<HttpResponse, Error> {
    let (kind, id) = path.into_inner();
    let kind = kind
        .parse::<AccountKind>()
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let id = AccountId::new(id).map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_account(AccountRef::new(kind, id))?;
    Ok(HttpResponse::Ok().finish())
}
