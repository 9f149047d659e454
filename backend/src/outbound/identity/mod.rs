//! Federated identity verification adapters.

mod disabled_verifier;
mod jwt_verifier;

pub use disabled_verifier::DisabledIdentityVerifier;
pub use jwt_verifier::JwtIdentityVerifier;
