//! Port for checking identity assertions issued by an external provider.
//!
//! Federated login never trusts a bare name/email pair from the client: the
//! client forwards the provider's signed token and an adapter behind this
//! port decides whether it proves ownership of an email address.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{EmailAddress, FullName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity verification adapters.
    pub enum IdentityVerifierError {
        /// The assertion is forged, expired, addressed elsewhere or lacks a
        /// verified email.
        Rejected { message: String } => "identity assertion rejected: {message}",
        /// Verification could not be attempted.
        Unavailable { message: String } => "identity verification unavailable: {message}",
    }
}

/// Opaque token forwarded from the identity provider.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityAssertion(String);

impl IdentityAssertion {
    /// Wrap a token, returning `None` when it is blank.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for IdentityAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdentityAssertion(<redacted>)")
    }
}

/// Claims an adapter has checked against the provider's signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub full_name: FullName,
    pub email: EmailAddress,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FederatedIdentityVerifier: Send + Sync {
    /// Check `assertion` and return the identity it proves.
    async fn verify(
        &self,
        assertion: &IdentityAssertion,
    ) -> Result<VerifiedIdentity, IdentityVerifierError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", false)]
    #[case("   ", false)]
    #[case("header.payload.signature", true)]
    fn blank_assertions_are_refused(#[case] raw: &str, #[case] accepted: bool) {
        assert_eq!(IdentityAssertion::new(raw).is_some(), accepted);
    }

    #[rstest]
    fn debug_output_hides_the_token() {
        let assertion = IdentityAssertion::new("secret-token").expect("non-blank");
        assert!(!format!("{assertion:?}").contains("secret-token"));
    }
}
