//! Argon2id implementation of the `PasswordHasher` port.
//!
//! Hashes are PHC strings carrying their own salt and parameters, so
//! verification works across parameter changes. Both operations run on the
//! blocking thread pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;

use crate::domain::ports::{PasswordHasher, PasswordHasherError};
use crate::domain::{PasswordHash, RawPassword};

/// Argon2id hasher with configurable cost parameters.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    /// Use explicit cost parameters, e.g. cheaper ones in tests.
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

fn hash_blocking(
    argon2: &Argon2<'_>,
    password: &RawPassword,
) -> Result<PasswordHash, PasswordHasherError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.expose().as_bytes(), &salt)
        .map(|hash| PasswordHash::new(hash.to_string()))
        .map_err(|err| PasswordHasherError::hash(err.to_string()))
}

fn verify_blocking(
    argon2: &Argon2<'_>,
    password: &RawPassword,
    stored: &PasswordHash,
) -> Result<bool, PasswordHasherError> {
    let parsed = PhcHash::new(stored.as_str())
        .map_err(|err| PasswordHasherError::malformed_hash(err.to_string()))?;
    match argon2.verify_password(password.expose().as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(PasswordHasherError::hash(err.to_string())),
    }
}

fn join_error(err: tokio::task::JoinError) -> PasswordHasherError {
    PasswordHasherError::hash(format!("hashing task failed: {err}"))
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &RawPassword) -> Result<PasswordHash, PasswordHasherError> {
        let argon2 = self.argon2();
        let password = password.clone();
        tokio::task::spawn_blocking(move || hash_blocking(&argon2, &password))
            .await
            .map_err(join_error)?
    }

    async fn verify(
        &self,
        password: &RawPassword,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let argon2 = self.argon2();
        let password = password.clone();
        let hash = hash.clone();
        tokio::task::spawn_blocking(move || verify_blocking(&argon2, &password, &hash))
            .await
            .map_err(join_error)?
    }
}
