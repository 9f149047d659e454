//! Identity verification backed by provider-signed JWTs.
//!
//! Accepts OpenID Connect style ID tokens: the signature must check out
//! against the configured key, `iss` and `aud` must match, the token must be
//! unexpired, and `email_verified` must be `true`. `name` becomes the
//! account's full name, falling back to the email's local part.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use crate::domain::ports::{
    FederatedIdentityVerifier, IdentityAssertion, IdentityVerifierError, VerifiedIdentity,
};
use crate::domain::{EmailAddress, FullName};

const CLOCK_SKEW_LEEWAY_SECS: u64 = 60;

#[derive(Debug, Deserialize)]
struct IdentityClaims {
    email: String,
    #[serde(default)]
    email_verified: bool,
    #[serde(default)]
    name: Option<String>,
}

/// Verifies ID tokens issued by one trusted provider.
#[derive(Clone)]
pub struct JwtIdentityVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityVerifier {
    /// Trust RS256 tokens signed by the provider's public key.
    ///
    /// # Errors
    /// Returns the decoder error when `pem` is not an RSA public key.
    pub fn from_rsa_pem(
        pem: &[u8],
        issuer: &str,
        audience: &str,
    ) -> Result<Self, jsonwebtoken::errors::Error> {
        let key = DecodingKey::from_rsa_pem(pem)?;
        Ok(Self::with_key(key, Algorithm::RS256, issuer, audience))
    }

    /// Trust HS256 tokens minted by a broker sharing `secret`.
    pub fn from_secret(secret: &[u8], issuer: &str, audience: &str) -> Self {
        Self::with_key(
            DecodingKey::from_secret(secret),
            Algorithm::HS256,
            issuer,
            audience,
        )
    }

    fn with_key(key: DecodingKey, algorithm: Algorithm, issuer: &str, audience: &str) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = CLOCK_SKEW_LEEWAY_SECS;
        Self { key, validation }
    }
}

fn identity_from_claims(
    claims: IdentityClaims,
) -> Result<VerifiedIdentity, IdentityVerifierError> {
    if !claims.email_verified {
        return Err(IdentityVerifierError::rejected("email is not verified"));
    }
    let email = EmailAddress::new(&claims.email)
        .map_err(|err| IdentityVerifierError::rejected(format!("email claim: {err}")))?;
    let name = claims
        .name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| {
            email
                .as_ref()
                .split('@')
                .next()
                .unwrap_or_default()
                .to_owned()
        });
    let full_name = FullName::new(name)
        .map_err(|err| IdentityVerifierError::rejected(format!("name claim: {err}")))?;
    Ok(VerifiedIdentity { full_name, email })
}

#[async_trait]
impl FederatedIdentityVerifier for JwtIdentityVerifier {
    async fn verify(
        &self,
        assertion: &IdentityAssertion,
    ) -> Result<VerifiedIdentity, IdentityVerifierError> {
        let token = decode::<IdentityClaims>(assertion.expose(), &self.key, &self.validation)
            .map_err(|err| IdentityVerifierError::rejected(err.to_string()))?;
        identity_from_claims(token.claims)
    }
}
