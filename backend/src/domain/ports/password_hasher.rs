//! Port for one-way password hashing.

use async_trait::async_trait;

use crate::domain::{PasswordHash, RawPassword};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// Hash computation failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Salted one-way hashing of raw passwords.
///
/// Hashing is CPU bound; adapters are expected to move the work off the
/// async executor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a self-describing hash string for `password`.
    async fn hash(&self, password: &RawPassword) -> Result<PasswordHash, PasswordHasherError>;

    /// Check `password` against a stored hash.
    async fn verify(
        &self,
        password: &RawPassword,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError>;
}
