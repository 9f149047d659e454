//! Account HTTP handlers: signup, login, federated login, logout, profile.
//!
//! ```text
//! POST /api/v1/{developers|users}/signup
//!     {"fullName":"Ada","email":"ada@example.com","password":"..."}
//! POST /api/v1/{developers|users}/login {"email":"ada@example.com","password":"..."}
//! POST /api/v1/{developers|users}/federated-login {"idToken":"eyJ..."}
//! POST /api/v1/logout
//! GET /api/v1/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{FederatedLoginRequest, IdentityAssertion, SignupRequest};
use crate::domain::{
    Account, EmailAddress, Error, FullName, LoginCredentials, LoginValidationError, RawPassword,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    account_validation_error, empty_id_token_error, empty_password_error,
    parse_account_collection,
};

/// Signup request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupBody {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// ID token issued to the client by the identity provider.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FederatedLoginBody {
    /// Signed JWT; its verified `email` and `name` claims identify the account.
    pub id_token: String,
}

/// Public account projection.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    /// `developer` or `consumer`.
    #[schema(example = "consumer")]
    pub kind: String,
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "Ada Lovelace")]
    pub full_name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
}

impl From<Account> for AccountResponse {
    fn from(value: Account) -> Self {
        Self {
            kind: value.kind.as_str().to_owned(),
            id: value.id.get(),
            full_name: value.full_name.to_string(),
            email: value.email.to_string(),
            mobile_number: value.mobile_number,
        }
    }
}

/// Federated login result.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FederatedLoginResponse {
    pub account: AccountResponse,
    /// True when this login created the account.
    pub registered: bool,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::Email(inner) => account_validation_error(inner),
        LoginValidationError::EmptyPassword => empty_password_error(),
    }
}

/// Register a new developer or consumer account.
///
/// The password policy is enforced by the credential service; the session is
/// not established until the caller logs in.
#[utoipa::path(
    post,
    path = "/api/v1/{kind}/signup",
    params(("kind" = String, Path, description = "`developers` or `users`")),
    request_body = SignupBody,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "signup",
    security([])
)]
#[post("/{kind}/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    kind: web::Path<String>,
    payload: web::Json<SignupBody>,
) -> ApiResult<HttpResponse> {
    let kind = parse_account_collection(&kind)?;
    let SignupBody {
        full_name,
        email,
        password,
    } = payload.into_inner();
    let request = SignupRequest {
        kind,
        full_name: FullName::new(full_name).map_err(account_validation_error)?,
        email: EmailAddress::new(email).map_err(account_validation_error)?,
        password: RawPassword::new(password),
    };
    let account = state.credentials.register(request).await?;
    Ok(HttpResponse::Created().json(AccountResponse::from(account)))
}

/// Authenticate with email and password and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/{kind}/login",
    params(("kind" = String, Path, description = "`developers` or `users`")),
    request_body = LoginBody,
    responses(
        (status = 200, description = "Login success", body = AccountResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid user or password", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/{kind}/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    kind: web::Path<String>,
    payload: web::Json<LoginBody>,
) -> ApiResult<web::Json<AccountResponse>> {
    let kind = parse_account_collection(&kind)?;
    let LoginBody { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(map_login_validation_error)?;
    let account = state.credentials.authenticate(kind, credentials).await?;
    session.persist_account(account.reference())?;
    Ok(web::Json(AccountResponse::from(account)))
}

/// Log in with a provider-signed ID token, creating the account on first use.
///
/// Name and email come only from the verified token, never from the client.
#[utoipa::path(
    post,
    path = "/api/v1/{kind}/federated-login",
    params(("kind" = String, Path, description = "`developers` or `users`")),
    request_body = FederatedLoginBody,
    responses(
        (status = 200, description = "Login success", body = FederatedLoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "ID token rejected", body = Error),
        (status = 503, description = "Federated login not configured", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "federatedLogin",
    security([])
)]
#[post("/{kind}/federated-login")]
pub async fn federated_login(
    state: web::Data<HttpState>,
    session: SessionContext,
    kind: web::Path<String>,
    payload: web::Json<FederatedLoginBody>,
) -> ApiResult<web::Json<FederatedLoginResponse>> {
    let kind = parse_account_collection(&kind)?;
    let FederatedLoginBody { id_token } = payload.into_inner();
    let request = FederatedLoginRequest {
        kind,
        assertion: IdentityAssertion::new(id_token).ok_or_else(empty_id_token_error)?,
    };
    let outcome = state.credentials.federated_login(request).await?;
    session.persist_account(outcome.account.reference())?;
    Ok(web::Json(FederatedLoginResponse {
        account: AccountResponse::from(outcome.account),
        registered: outcome.registered,
    }))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["accounts"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Profile of the account bound to the session.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current account", body = AccountResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account no longer exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "currentAccount"
)]
#[get("/me")]
pub async fn current_account(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AccountResponse>> {
    let account = session.require_account()?;
    let profile = state.profile.profile(account).await?;
    Ok(web::Json(AccountResponse::from(profile)))
}
