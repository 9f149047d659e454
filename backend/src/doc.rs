//! OpenAPI document for the PropertyHub REST API.
//!
//! Served through Swagger UI in debug builds. Request and response DTOs live
//! beside their handlers; the domain [`Error`](crate::domain::Error) payload
//! is registered directly.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::accounts::{
    AccountResponse, FederatedLoginBody, FederatedLoginResponse, LoginBody, SignupBody,
};
use crate::inbound::http::password_reset::{
    OtpIssuedResponse, OtpRequestBody, OtpVerifyBody, ResetPasswordBody,
};
use crate::inbound::http::properties::PropertyResponse;
use crate::inbound::http::suggestions::{
    NewSuggestionBody, StatusBody, SuggestionResponse, VoteBody, VoteResponse,
};

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
                "Session cookie issued by POST /api/v1/{kind}/login or /{kind}/federated-login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "PropertyHub API",
        description = "Accounts, property catalogue, community suggestions and password reset."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::signup,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::federated_login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::current_account,
        crate::inbound::http::properties::list_properties,
        crate::inbound::http::properties::get_property,
        crate::inbound::http::properties::get_property_file,
        crate::inbound::http::properties::list_user_properties,
        crate::inbound::http::properties::list_developer_properties,
        crate::inbound::http::suggestions::list_suggestions,
        crate::inbound::http::suggestions::add_suggestion,
        crate::inbound::http::suggestions::vote,
        crate::inbound::http::suggestions::set_status,
        crate::inbound::http::password_reset::request_otp,
        crate::inbound::http::password_reset::verify_otp,
        crate::inbound::http::password_reset::reset_password,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        SignupBody,
        LoginBody,
        FederatedLoginBody,
        AccountResponse,
        FederatedLoginResponse,
        PropertyResponse,
        NewSuggestionBody,
        VoteBody,
        StatusBody,
        VoteResponse,
        SuggestionResponse,
        OtpRequestBody,
        OtpIssuedResponse,
        OtpVerifyBody,
        ResetPasswordBody,
    )),
    tags(
        (name = "accounts", description = "Signup, login and the current session"),
        (name = "properties", description = "Property catalogue and brochure files"),
        (name = "suggestions", description = "Community suggestions and votes"),
        (name = "password-reset", description = "One-time-code password reset"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
