//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use chrono::Duration;
use propertyhub::domain::DEFAULT_OTP_TTL_SECS;
use propertyhub::domain::ports::FederatedIdentityVerifier;
use propertyhub::outbound::identity::DisabledIdentityVerifier;
use propertyhub::outbound::persistence::DbPool;

/// Everything the server needs once settings have been validated.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) otp_ttl: Duration,
    pub(crate) identity_verifier: Arc<dyn FederatedIdentityVerifier>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        db_pool: DbPool,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool,
            otp_ttl: Duration::seconds(DEFAULT_OTP_TTL_SECS),
            identity_verifier: Arc::new(DisabledIdentityVerifier),
        }
    }

    /// Override the lifetime of password reset codes.
    #[must_use]
    pub fn with_otp_ttl(mut self, otp_ttl: Duration) -> Self {
        self.otp_ttl = otp_ttl;
        self
    }

    /// Enable federated login against a trusted identity provider.
    #[must_use]
    pub fn with_identity_verifier(mut self, verifier: Arc<dyn FederatedIdentityVerifier>) -> Self {
        self.identity_verifier = verifier;
        self
    }
}
