//! Password reset HTTP handlers.
//!
//! The flow is bound to the session account and must run in order:
//!
//! ```text
//! POST /api/v1/password-reset/otp {"email":"ada@example.com"}
//! POST /api/v1/password-reset/verify {"otp":"042917"}
//! POST /api/v1/password-reset/complete {"password":"N3w!Passw0rd"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{EmailAddress, Error, OtpCode, RawPassword};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{account_validation_error, otp_format_error};

/// Body for requesting a one-time code.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct OtpRequestBody {
    /// Must match the email of the session account.
    #[schema(example = "ada@example.com")]
    pub email: String,
}

/// Returned once a code has been dispatched.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OtpIssuedResponse {
    #[schema(example = "2025-01-15T09:40:00+00:00")]
    pub expires_at: String,
}

/// Body for verifying a one-time code.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct OtpVerifyBody {
    #[schema(example = "042917")]
    pub otp: String,
}

/// Body carrying the replacement password.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ResetPasswordBody {
    pub password: String,
}

/// Issue a one-time code for the session account.
#[utoipa::path(
    post,
    path = "/api/v1/password-reset/otp",
    request_body = OtpRequestBody,
    responses(
        (status = 202, description = "Code dispatched", body = OtpIssuedResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised or email mismatch", body = Error),
        (status = 404, description = "Account not found", body = Error),
        (status = 503, description = "Code delivery unavailable", body = Error)
    ),
    tags = ["password-reset"],
    operation_id = "requestOtp"
)]
#[post("/password-reset/otp")]
pub async fn request_otp(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<OtpRequestBody>,
) -> ApiResult<HttpResponse> {
    let account = session.require_account()?;
    let email = EmailAddress::new(&payload.email).map_err(account_validation_error)?;
    let issued = state.password_reset.request_otp(account, email).await?;
    Ok(HttpResponse::Accepted().json(OtpIssuedResponse {
        expires_at: issued.expires_at.to_rfc3339(),
    }))
}

/// Verify the most recently issued code.
#[utoipa::path(
    post,
    path = "/api/v1/password-reset/verify",
    request_body = OtpVerifyBody,
    responses(
        (status = 204, description = "Code accepted"),
        (status = 400, description = "Malformed code", body = Error),
        (status = 401, description = "Invalid or expired code", body = Error),
        (status = 409, description = "No code outstanding", body = Error)
    ),
    tags = ["password-reset"],
    operation_id = "verifyOtp"
)]
#[post("/password-reset/verify")]
pub async fn verify_otp(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<OtpVerifyBody>,
) -> ApiResult<HttpResponse> {
    let account = session.require_account()?;
    let code = OtpCode::parse(&payload.otp).map_err(otp_format_error)?;
    state.password_reset.verify_otp(account, code).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Replace the password once the code has been verified.
#[utoipa::path(
    post,
    path = "/api/v1/password-reset/complete",
    request_body = ResetPasswordBody,
    responses(
        (status = 204, description = "Password replaced"),
        (status = 400, description = "Password policy violated", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Code not verified", body = Error)
    ),
    tags = ["password-reset"],
    operation_id = "resetPassword"
)]
#[post("/password-reset/complete")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ResetPasswordBody>,
) -> ApiResult<HttpResponse> {
    let account = session.require_account()?;
    let password = RawPassword::new(payload.into_inner().password);
    state.password_reset.reset_password(account, password).await?;
    Ok(HttpResponse::NoContent().finish())
}
