//! Port for password reset state persistence.

use async_trait::async_trait;

use crate::domain::{AccountRef, PasswordReset};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password reset repository adapters.
    pub enum PasswordResetRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "password reset repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "password reset repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordResetRepository: Send + Sync {
    /// Load the reset record for an account, if one was ever created.
    async fn find(
        &self,
        account: AccountRef,
    ) -> Result<Option<PasswordReset>, PasswordResetRepositoryError>;

    /// Insert or replace the record for `reset.account`.
    async fn save(&self, reset: &PasswordReset) -> Result<(), PasswordResetRepositoryError>;
}
