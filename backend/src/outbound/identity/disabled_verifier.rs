//! Verifier used when no identity provider is configured.

use async_trait::async_trait;

use crate::domain::ports::{
    FederatedIdentityVerifier, IdentityAssertion, IdentityVerifierError, VerifiedIdentity,
};

/// Refuses every assertion, turning federated login off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledIdentityVerifier;

#[async_trait]
impl FederatedIdentityVerifier for DisabledIdentityVerifier {
    async fn verify(
        &self,
        _assertion: &IdentityAssertion,
    ) -> Result<VerifiedIdentity, IdentityVerifierError> {
        Err(IdentityVerifierError::unavailable(
            "no identity provider is configured",
        ))
    }
}
