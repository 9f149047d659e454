//! Process configuration loaded via OrthoConfig.
//!
//! Values come from `PROPERTYHUB_*` environment variables, configuration
//! files and command-line flags, in OrthoConfig's usual precedence.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DEFAULT_OTP_TTL_SECS;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_PATH: &str = "/var/run/secrets/session_key";
const DEFAULT_POOL_SIZE: u32 = 10;

/// Errors raised when settings are present but unusable.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("PROPERTYHUB_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: i64 },
    #[error("federated login needs issuer, audience and key file together; missing {missing}")]
    IncompleteFederatedIdentity { missing: &'static str },
}

/// Trusted identity provider for federated login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedIdentitySettings {
    pub issuer: String,
    pub audience: String,
    /// PEM-encoded RSA public key of the provider.
    pub key_file: PathBuf,
}

/// Top-level application settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PROPERTYHUB")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Maximum pooled database connections.
    pub db_pool_size: Option<u32>,
    /// Lifetime of password reset codes in seconds.
    pub otp_ttl_secs: Option<i64>,
    /// File holding the session signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`; on unless set to `false`.
    pub session_cookie_secure: Option<bool>,
    /// `SameSite` policy: `Strict`, `Lax` or `None`.
    pub session_same_site: Option<String>,
    /// Fall back to a random session key when the key file is unreadable.
    pub session_allow_ephemeral: Option<bool>,
    /// Apply embedded migrations before serving traffic; on unless `false`.
    pub run_migrations: Option<bool>,
    /// Expected `iss` of federated ID tokens.
    pub federated_issuer: Option<String>,
    /// Expected `aud` of federated ID tokens.
    pub federated_audience: Option<String>,
    /// Provider public key used to check ID token signatures.
    pub federated_key_file: Option<PathBuf>,
}

impl AppSettings {
    /// The configured database URL.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Parsed bind address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    /// Pool size, defaulting to ten connections.
    pub fn db_pool_size(&self) -> Result<u32, SettingsError> {
        match self.db_pool_size {
            Some(0) => Err(SettingsError::NotPositive {
                name: "PROPERTYHUB_DB_POOL_SIZE",
                value: 0,
            }),
            Some(size) => Ok(size),
            None => Ok(DEFAULT_POOL_SIZE),
        }
    }

    /// Code lifetime, defaulting to ten minutes.
    pub fn otp_ttl(&self) -> Result<chrono::Duration, SettingsError> {
        let secs = self.otp_ttl_secs.unwrap_or(DEFAULT_OTP_TTL_SECS);
        if secs <= 0 {
            return Err(SettingsError::NotPositive {
                name: "PROPERTYHUB_OTP_TTL_SECS",
                value: secs,
            });
        }
        Ok(chrono::Duration::seconds(secs))
    }

    /// Session key path, defaulting to the mounted secret location.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_PATH))
    }

    pub fn session_cookie_secure(&self) -> bool {
        self.session_cookie_secure.unwrap_or(true)
    }

    pub fn session_allow_ephemeral(&self) -> bool {
        self.session_allow_ephemeral.unwrap_or(false)
    }

    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Identity provider settings, or `None` when federated login is off.
    ///
    /// # Errors
    /// [`SettingsError::IncompleteFederatedIdentity`] when only some of the
    /// three values are present.
    pub fn federated_identity(&self) -> Result<Option<FederatedIdentitySettings>, SettingsError> {
        let issuer = self.federated_issuer.clone().filter(|v| !v.trim().is_empty());
        let audience = self
            .federated_audience
            .clone()
            .filter(|v| !v.trim().is_empty());
        match (issuer, audience, self.federated_key_file.clone()) {
            (None, None, None) => Ok(None),
            (Some(issuer), Some(audience), Some(key_file)) => Ok(Some(FederatedIdentitySettings {
                issuer,
                audience,
                key_file,
            })),
            (None, _, _) => Err(SettingsError::IncompleteFederatedIdentity {
                missing: "PROPERTYHUB_FEDERATED_ISSUER",
            }),
            (_, None, _) => Err(SettingsError::IncompleteFederatedIdentity {
                missing: "PROPERTYHUB_FEDERATED_AUDIENCE",
            }),
            (_, _, None) => Err(SettingsError::IncompleteFederatedIdentity {
                missing: "PROPERTYHUB_FEDERATED_KEY_FILE",
            }),
        }
    }
}
