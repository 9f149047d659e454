//! Wiring of domain services over the Diesel adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use propertyhub::domain::ports::OtpDelivery;
use propertyhub::domain::{
    CredentialService, PasswordResetService, PropertyCatalogService, SuggestionService,
};
use propertyhub::inbound::http::state::HttpState;
use propertyhub::outbound::otp::LogOnlyOtpDelivery;
use propertyhub::outbound::persistence::{
    DieselAccountRepository, DieselPasswordResetRepository, DieselPropertyRepository,
    DieselSuggestionRepository,
};
use propertyhub::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Build the shared handler state. Repositories share the one pool.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let pool = &config.db_pool;
    let accounts = Arc::new(DieselAccountRepository::new(pool.clone()));
    let properties = Arc::new(DieselPropertyRepository::new(pool.clone()));
    let suggestions_repo = Arc::new(DieselSuggestionRepository::new(pool.clone()));
    let resets = Arc::new(DieselPasswordResetRepository::new(pool.clone()));
    let hasher = Arc::new(Argon2PasswordHasher::default());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let delivery: Arc<dyn OtpDelivery> = Arc::new(LogOnlyOtpDelivery);

    let credentials = Arc::new(CredentialService::new(
        accounts.clone(),
        hasher.clone(),
        config.identity_verifier.clone(),
    ));
    let suggestions = Arc::new(SuggestionService::new(
        suggestions_repo,
        properties.clone(),
        clock.clone(),
    ));
    let password_reset = Arc::new(
        PasswordResetService::new(accounts, resets, hasher, delivery, clock)
            .with_otp_ttl(config.otp_ttl),
    );

    web::Data::new(HttpState {
        credentials: credentials.clone(),
        profile: credentials,
        catalog: Arc::new(PropertyCatalogService::new(properties)),
        suggestions: suggestions.clone(),
        suggestions_query: suggestions,
        password_reset,
    })
}
