//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`], [`OtpDelivery`],
//! [`FederatedIdentityVerifier`]) are
//! implemented by outbound adapters. Driving ports (`*Command`, `*Query`)
//! are implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod credential_command;
mod identity_verifier;
mod otp_delivery;
mod password_hasher;
mod password_reset_command;
mod password_reset_repository;
mod property_catalog_query;
mod property_repository;
mod suggestion_command;
mod suggestion_repository;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError, InsertOutcome};
#[cfg(test)]
pub use credential_command::{MockAccountProfileQuery, MockCredentialCommand};
pub use credential_command::{
    AccountProfileQuery, CredentialCommand, FederatedLoginRequest, SignupRequest,
};
#[cfg(test)]
pub use identity_verifier::MockFederatedIdentityVerifier;
pub use identity_verifier::{
    FederatedIdentityVerifier, IdentityAssertion, IdentityVerifierError, VerifiedIdentity,
};
#[cfg(test)]
pub use otp_delivery::MockOtpDelivery;
pub use otp_delivery::{OtpDelivery, OtpDeliveryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use password_reset_command::MockPasswordResetCommand;
pub use password_reset_command::{OtpIssued, PasswordResetCommand};
#[cfg(test)]
pub use password_reset_repository::MockPasswordResetRepository;
pub use password_reset_repository::{PasswordResetRepository, PasswordResetRepositoryError};
#[cfg(test)]
pub use property_catalog_query::MockPropertyCatalogQuery;
pub use property_catalog_query::PropertyCatalogQuery;
#[cfg(test)]
pub use property_repository::MockPropertyRepository;
pub use property_repository::{PropertyFileLookup, PropertyRepository, PropertyRepositoryError};
#[cfg(test)]
pub use suggestion_command::{MockSuggestionCommand, MockSuggestionQuery};
pub use suggestion_command::{
    AddSuggestionRequest, CastVoteRequest, ReviewSuggestionRequest, SuggestionCommand,
    SuggestionQuery,
};
#[cfg(test)]
pub use suggestion_repository::MockSuggestionRepository;
pub use suggestion_repository::{SuggestionRepository, SuggestionRepositoryError};
