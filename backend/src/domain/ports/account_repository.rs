//! Port for developer and consumer account persistence.
//!
//! Developers and consumer users live in separate stores, so every lookup is
//! keyed by [`AccountKind`] as well as the id or email.

use async_trait::async_trait;

use crate::domain::{
    Account, AccountKind, AccountRef, EmailAddress, NewAccount, PasswordHash, StoredCredential,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// The email is already registered for this account kind.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Result of an insert-if-absent call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOutcome {
    /// The stored account, fresh or pre-existing.
    pub account: Account,
    /// Whether this call created the row.
    pub inserted: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Fetch an account and its hash by normalised email.
    async fn find_by_email(
        &self,
        kind: AccountKind,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredential>, AccountRepositoryError>;

    /// Fetch the public projection of an account.
    async fn find_by_id(&self, account: AccountRef)
    -> Result<Option<Account>, AccountRepositoryError>;

    /// Insert a new account.
    ///
    /// Fails with [`AccountRepositoryError::DuplicateEmail`] when the email
    /// is taken.
    async fn insert(&self, account: &NewAccount) -> Result<Account, AccountRepositoryError>;

    /// Insert unless the email exists, returning whichever row is stored.
    ///
    /// Implementations must be atomic so two concurrent calls for the same
    /// email leave exactly one row.
    async fn insert_if_absent(
        &self,
        account: &NewAccount,
    ) -> Result<InsertOutcome, AccountRepositoryError>;

    /// Replace the stored hash. Returns `false` when the account is missing.
    async fn update_password_hash(
        &self,
        account: AccountRef,
        hash: &PasswordHash,
    ) -> Result<bool, AccountRepositoryError>;
}
