//! Cookie session settings derived from [`AppSettings`].
//!
//! Release builds insist on a readable key file of at least
//! [`SESSION_KEY_MIN_LEN`] bytes and refuse ephemeral keys unless the
//! operator opts in. Debug builds fall back to a random key with a warning.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroize;

use crate::settings::AppSettings;

pub const SESSION_KEY_MIN_LEN: usize = 64;
const FINGERPRINT_BYTES: usize = 8;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated cookie session settings.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("invalid PROPERTYHUB_SESSION_SAME_SITE '{value}'; expected Strict|Lax|None")]
    InvalidSameSite { value: String },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("SameSite=None requires secure session cookies")]
    InsecureSameSiteNone,
}

/// Validate the session portion of `settings` for the given build mode.
pub fn session_settings(
    settings: &AppSettings,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = settings.session_cookie_secure();
    if !cookie_secure {
        warn!("session cookies are not marked Secure");
    }
    let same_site = same_site(settings.session_same_site.as_deref(), mode, cookie_secure)?;
    let key = session_key(
        settings.session_key_file(),
        mode,
        settings.session_allow_ephemeral(),
    )?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn same_site(
    value: Option<&str>,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let Some(value) = value else {
        return Ok(if mode.is_debug() {
            SameSite::Lax
        } else {
            SameSite::Strict
        });
    };
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.is_debug() => {
            warn!("SameSite=None without Secure; browsers may drop the cookie");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ => Err(SessionConfigError::InvalidSameSite {
            value: value.to_owned(),
        }),
    }
}

fn session_key(
    path: PathBuf,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key; sessions will not survive a restart"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}

/// Truncated SHA-256 of the signing key, safe to log for rotation checks.
///
/// # Examples
/// ```
/// use actix_web::cookie::Key;
/// use propertyhub::inbound::http::session_config::key_fingerprint;
///
/// let fp = key_fingerprint(&Key::generate());
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    struct TempKeyFile {
        path: PathBuf,
    }

    impl TempKeyFile {
        fn new(len: usize) -> Self {
            let path = std::env::temp_dir().join(format!("propertyhub-key-{}", Uuid::new_v4()));
            std::fs::write(&path, vec![b'k'; len]).expect("write key file");
            Self { path }
        }
    }

    impl Drop for TempKeyFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    fn settings_with(key: Option<PathBuf>) -> AppSettings {
        AppSettings {
            database_url: None,
            bind_addr: None,
            db_pool_size: None,
            otp_ttl_secs: None,
            session_key_file: key,
            session_cookie_secure: None,
            session_same_site: None,
            session_allow_ephemeral: None,
            run_migrations: None,
            federated_issuer: None,
            federated_audience: None,
            federated_key_file: None,
        }
    }

    fn missing_path() -> PathBuf {
        std::env::temp_dir().join(format!("propertyhub-missing-{}", Uuid::new_v4()))
    }

    #[rstest]
    fn release_accepts_long_key_with_strict_default() {
        let key = TempKeyFile::new(SESSION_KEY_MIN_LEN);
        let settings = session_settings(&settings_with(Some(key.path.clone())), BuildMode::Release)
            .expect("valid settings");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Strict);
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some(true), true)]
    #[case(Some(false), false)]
    fn cookie_secure_is_on_unless_disabled(
        #[case] configured: Option<bool>,
        #[case] expected: bool,
    ) {
        let mut settings = settings_with(Some(missing_path()));
        settings.session_cookie_secure = configured;
        let resolved = session_settings(&settings, BuildMode::Debug).expect("debug falls back");
        assert_eq!(resolved.cookie_secure, expected);
    }

    #[rstest]
    fn release_rejects_short_key() {
        let key = TempKeyFile::new(16);
        let result = session_settings(&settings_with(Some(key.path.clone())), BuildMode::Release);
        assert!(matches!(
            result,
            Err(SessionConfigError::KeyTooShort { length: 16, .. })
        ));
    }

    #[rstest]
    fn release_requires_key_file_unless_ephemeral_allowed() {
        let mut settings = settings_with(Some(missing_path()));
        assert!(matches!(
            session_settings(&settings, BuildMode::Release),
            Err(SessionConfigError::KeyRead { .. })
        ));

        settings.session_allow_ephemeral = Some(true);
        assert!(session_settings(&settings, BuildMode::Release).is_ok());
    }

    #[rstest]
    fn debug_generates_key_when_file_missing() {
        let settings = session_settings(&settings_with(Some(missing_path())), BuildMode::Debug)
            .expect("debug falls back");
        assert_eq!(settings.same_site, SameSite::Lax);
    }

    #[rstest]
    #[case("strict", true, BuildMode::Release, Some(SameSite::Strict))]
    #[case("Lax", true, BuildMode::Release, Some(SameSite::Lax))]
    #[case("None", true, BuildMode::Release, Some(SameSite::None))]
    #[case("None", false, BuildMode::Release, None)]
    #[case("None", false, BuildMode::Debug, Some(SameSite::None))]
    #[case("sideways", true, BuildMode::Debug, None)]
    fn same_site_policy(
        #[case] value: &str,
        #[case] secure: bool,
        #[case] mode: BuildMode,
        #[case] expected: Option<SameSite>,
    ) {
        assert_eq!(same_site(Some(value), mode, secure).ok(), expected);
    }

    #[rstest]
    fn fingerprint_is_stable_per_key() {
        let first = Key::derive_from(&[b'a'; 64]);
        let second = Key::derive_from(&[b'b'; 64]);

        let fp = key_fingerprint(&first);
        assert_eq!(fp, key_fingerprint(&first));
        assert_ne!(fp, key_fingerprint(&second));
        assert_eq!(fp.len(), FINGERPRINT_BYTES * 2);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
