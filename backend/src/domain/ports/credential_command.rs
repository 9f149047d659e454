//! Driving ports for sign-up, login and profile lookups.
//!
//! Inbound adapters build the validated request types below and call these
//! ports without touching hashing or persistence.

use async_trait::async_trait;

use crate::domain::{
    Account, AccountKind, AccountRef, EmailAddress, Error, FederatedLogin, FullName,
    LoginCredentials, RawPassword,
};

use super::IdentityAssertion;

/// Request to create an account with a chosen password.
#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub kind: AccountKind,
    pub full_name: FullName,
    pub email: EmailAddress,
    /// Checked against the password policy by the service.
    pub password: RawPassword,
}

/// Login through an external identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedLoginRequest {
    pub kind: AccountKind,
    /// Provider-signed token; name and email are taken from it once verified.
    pub assertion: IdentityAssertion,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialCommand: Send + Sync {
    /// Create an account.
    ///
    /// # Errors
    ///
    /// - `invalid_request` when the password violates policy.
    /// - `conflict` when the email is already registered.
    async fn register(&self, request: SignupRequest) -> Result<Account, Error>;

    /// Check an email/password pair.
    ///
    /// # Errors
    ///
    /// `unauthorized` with message `invalid user` or `invalid password`.
    async fn authenticate(
        &self,
        kind: AccountKind,
        credentials: LoginCredentials,
    ) -> Result<Account, Error>;

    /// Log in with a provider-verified email, creating the account on
    /// first sight.
    ///
    /// # Errors
    ///
    /// - `unauthorized` when the assertion does not verify.
    /// - `service_unavailable` when verification cannot be attempted.
    async fn federated_login(&self, request: FederatedLoginRequest)
    -> Result<FederatedLogin, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountProfileQuery: Send + Sync {
    /// Fetch an account's public profile.
    async fn profile(&self, account: AccountRef) -> Result<Account, Error>;
}
