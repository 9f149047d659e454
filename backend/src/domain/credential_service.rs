//! Account registration and login services.
//!
//! Implements [`CredentialCommand`] and [`AccountProfileQuery`] on top of an
//! [`AccountRepository`] and a [`PasswordHasher`]. Raw passwords are hashed
//! before they reach persistence and never leave this module. Federated
//! logins are accepted only for identities a [`FederatedIdentityVerifier`]
//! has checked.

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AccountProfileQuery, AccountRepository, AccountRepositoryError, CredentialCommand,
    FederatedIdentityVerifier, FederatedLoginRequest, IdentityVerifierError, PasswordHasher,
    PasswordHasherError, SignupRequest,
};
use crate::domain::{
    Account, AccountKind, AccountRef, Error, FederatedLogin, LoginCredentials, NewAccount,
    RawPassword, validate_password,
};

const FEDERATED_SECRET_LEN: usize = 32;

/// Credential service implementing the account driving ports.
#[derive(Clone)]
pub struct CredentialService<A, H> {
    accounts: Arc<A>,
    hasher: Arc<H>,
    identities: Arc<dyn FederatedIdentityVerifier>,
}

impl<A, H> CredentialService<A, H> {
    /// Create a new service. `identities` vouches for federated logins.
    pub fn new(
        accounts: Arc<A>,
        hasher: Arc<H>,
        identities: Arc<dyn FederatedIdentityVerifier>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            identities,
        }
    }
}

pub(crate) fn map_account_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
        AccountRepositoryError::DuplicateEmail { .. } => Error::conflict("email already registered")
            .with_details(json!({ "field": "email", "code": "duplicate_email" })),
    }
}

pub(crate) fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

fn map_identity_error(error: IdentityVerifierError) -> Error {
    match error {
        IdentityVerifierError::Rejected { message } => {
            debug!(reason = %message, "federated identity rejected");
            Error::unauthorized("identity assertion rejected")
                .with_details(json!({ "code": "invalid_identity_assertion" }))
        }
        IdentityVerifierError::Unavailable { message } => {
            warn!(reason = %message, "federated identity verification unavailable");
            Error::service_unavailable("federated login is unavailable")
        }
    }
}

/// Translate a policy failure into a validation error listing each rule.
pub(crate) fn password_policy_error(password: &RawPassword) -> Result<(), Error> {
    validate_password(password.expose()).map_err(|err| {
        let codes: Vec<&str> = err.violations().iter().map(|v| v.code()).collect();
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": "password",
            "code": "password_policy",
            "violations": codes,
        }))
    })
}

fn random_secret() -> RawPassword {
    let secret: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(FEDERATED_SECRET_LEN)
        .map(char::from)
        .collect();
    RawPassword::new(secret)
}

#[async_trait]
impl<A, H> CredentialCommand for CredentialService<A, H>
where
    A: AccountRepository,
    H: PasswordHasher,
{
    async fn register(&self, request: SignupRequest) -> Result<Account, Error> {
        password_policy_error(&request.password)?;
        let password_hash = self
            .hasher
            .hash(&request.password)
            .await
            .map_err(map_hasher_error)?;

        let account = self
            .accounts
            .insert(&NewAccount {
                kind: request.kind,
                full_name: request.full_name,
                email: request.email,
                password_hash,
            })
            .await
            .map_err(map_account_error)?;

        info!(account = %account.reference(), "account registered");
        Ok(account)
    }

    async fn authenticate(
        &self,
        kind: AccountKind,
        credentials: LoginCredentials,
    ) -> Result<Account, Error> {
        let Some(stored) = self
            .accounts
            .find_by_email(kind, credentials.email())
            .await
            .map_err(map_account_error)?
        else {
            debug!(%kind, "login for unknown email");
            return Err(Error::unauthorized("invalid user"));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await
            .map_err(map_hasher_error)?;
        if !matches {
            debug!(account = %stored.account.reference(), "login with wrong password");
            return Err(Error::unauthorized("invalid password"));
        }
        Ok(stored.account)
    }

    async fn federated_login(
        &self,
        request: FederatedLoginRequest,
    ) -> Result<FederatedLogin, Error> {
        let identity = self
            .identities
            .verify(&request.assertion)
            .await
            .map_err(map_identity_error)?;

        let secret = random_secret();
        let password_hash = self.hasher.hash(&secret).await.map_err(map_hasher_error)?;

        let outcome = self
            .accounts
            .insert_if_absent(&NewAccount {
                kind: request.kind,
                full_name: identity.full_name,
                email: identity.email,
                password_hash,
            })
            .await
            .map_err(map_account_error)?;

        if outcome.inserted {
            info!(account = %outcome.account.reference(), "account registered via federated login");
        }
        Ok(FederatedLogin {
            account: outcome.account,
            registered: outcome.inserted,
        })
    }
}

#[async_trait]
impl<A, H> AccountProfileQuery for CredentialService<A, H>
where
    A: AccountRepository,
    H: PasswordHasher,
{
    async fn profile(&self, account: AccountRef) -> Result<Account, Error> {
        self.accounts
            .find_by_id(account)
            .await
            .map_err(map_account_error)?
            .ok_or_else(|| Error::not_found("account not found"))
    }
}
