//! Developer and consumer accounts.
//!
//! Both account classes share a shape and live in separate tables; the
//! [`AccountKind`] selects which one an operation targets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{AccountId, PasswordHash};

/// Maximum length of names and email addresses (column width).
pub const ACCOUNT_TEXT_MAX: usize = 100;

/// Account class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    /// Developer who owns properties.
    Developer,
    /// Consumer user assigned to properties.
    Consumer,
}

impl AccountKind {
    /// Stable lowercase name used in logs and sessions.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Developer => "developer",
            Self::Consumer => "consumer",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = AccountValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "developer" => Ok(Self::Developer),
            "consumer" => Ok(Self::Consumer),
            other => Err(AccountValidationError::UnknownKind(other.to_owned())),
        }
    }
}

/// Validation errors for account inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    #[error("full name must not be empty")]
    EmptyFullName,
    #[error("full name must be at most {max} characters")]
    FullNameTooLong { max: usize },
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must look like local@domain")]
    InvalidEmail,
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
    #[error("unknown account kind '{0}'")]
    UnknownKind(String),
}

impl AccountValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyFullName | Self::FullNameTooLong { .. } => "fullName",
            Self::EmptyEmail | Self::InvalidEmail | Self::EmailTooLong { .. } => "email",
            Self::UnknownKind(_) => "kind",
        }
    }
}

/// Normalised email address: trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    ///
    /// # Examples
    /// ```
    /// use propertyhub::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new("  Ada@Example.COM ").unwrap();
    /// assert_eq!(email.as_ref(), "ada@example.com");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AccountValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > ACCOUNT_TEXT_MAX {
            return Err(AccountValidationError::EmailTooLong {
                max: ACCOUNT_TEXT_MAX,
            });
        }
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AccountValidationError::InvalidEmail);
        };
        if local.is_empty()
            || domain.is_empty()
            || domain.contains('@')
            || trimmed.chars().any(char::is_whitespace)
        {
            return Err(AccountValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display name supplied at signup or by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName(String);

impl FullName {
    /// Validate a trimmed, non-empty name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AccountValidationError::EmptyFullName);
        }
        if trimmed.chars().count() > ACCOUNT_TEXT_MAX {
            return Err(AccountValidationError::FullNameTooLong {
                max: ACCOUNT_TEXT_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for FullName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of one account: ids are only unique within a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountRef {
    pub kind: AccountKind,
    pub id: AccountId,
}

impl AccountRef {
    /// Pair a kind with an id.
    pub fn new(kind: AccountKind, id: AccountId) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Public account projection; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub kind: AccountKind,
    pub id: AccountId,
    pub full_name: FullName,
    pub email: EmailAddress,
    pub mobile_number: Option<String>,
}

impl Account {
    /// Identity of this account.
    pub fn reference(&self) -> AccountRef {
        AccountRef::new(self.kind, self.id)
    }
}

/// Account together with its stored hash, only handed to credential checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    pub account: Account,
    pub password_hash: PasswordHash,
}

/// Insert payload for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub kind: AccountKind,
    pub full_name: FullName,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
}

/// Outcome of a federated login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedLogin {
    /// The account for the asserted email.
    pub account: Account,
    /// Whether this call created the account.
    pub registered: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", AccountValidationError::EmptyEmail)]
    #[case("   ", AccountValidationError::EmptyEmail)]
    #[case("no-at-sign", AccountValidationError::InvalidEmail)]
    #[case("@example.com", AccountValidationError::InvalidEmail)]
    #[case("ada@", AccountValidationError::InvalidEmail)]
    #[case("a@b@c", AccountValidationError::InvalidEmail)]
    #[case("ada lovelace@example.com", AccountValidationError::InvalidEmail)]
    fn email_rejects_malformed_input(
        #[case] raw: &str,
        #[case] expected: AccountValidationError,
    ) {
        assert_eq!(EmailAddress::new(raw).expect_err("invalid"), expected);
    }

    #[rstest]
    fn email_rejects_overlong_input() {
        let raw = format!("{}@example.com", "a".repeat(ACCOUNT_TEXT_MAX));
        assert_eq!(
            EmailAddress::new(raw).expect_err("too long"),
            AccountValidationError::EmailTooLong {
                max: ACCOUNT_TEXT_MAX
            }
        );
    }

    #[rstest]
    fn full_name_is_trimmed() {
        let name = FullName::new("  Grace Hopper ").expect("valid name");
        assert_eq!(name.as_ref(), "Grace Hopper");
        assert_eq!(
            FullName::new(" ").expect_err("blank"),
            AccountValidationError::EmptyFullName
        );
    }

    #[rstest]
    #[case(AccountKind::Developer)]
    #[case(AccountKind::Consumer)]
    fn kind_round_trips_through_str(#[case] kind: AccountKind) {
        assert_eq!(kind.as_str().parse::<AccountKind>().expect("parse"), kind);
    }

    #[rstest]
    fn validation_errors_name_their_field() {
        assert_eq!(AccountValidationError::InvalidEmail.field(), "email");
        assert_eq!(AccountValidationError::EmptyFullName.field(), "fullName");
    }
}
