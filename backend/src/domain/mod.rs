//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities for accounts, properties,
//! suggestions and password resets, plus the services that implement the
//! driving ports in [`ports`]. Nothing here depends on HTTP or Diesel.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Account, PropertySummary, Suggestion, PasswordReset: aggregates.
//! - CredentialService, PropertyCatalogService, SuggestionService,
//!   PasswordResetService: driving port implementations.

pub mod account;
pub mod auth;
pub mod credential_service;
pub mod error;
pub mod ids;
pub mod password;
pub mod password_reset;
pub mod password_reset_service;
pub mod ports;
pub mod property;
pub mod property_catalog_service;
pub mod suggestion;
pub mod suggestion_service;
pub mod trace_id;

pub use self::account::{
    ACCOUNT_TEXT_MAX, Account, AccountKind, AccountRef, AccountValidationError, EmailAddress,
    FederatedLogin, FullName, NewAccount, StoredCredential,
};
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::credential_service::CredentialService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{AccountId, IdValidationError, PropertyId, SuggestionId};
pub use self::password::{
    PASSWORD_MIN_LENGTH, PasswordHash, PasswordPolicyError, PasswordViolation, RawPassword,
    validate_password,
};
pub use self::password_reset::{
    MAX_OTP_ATTEMPTS, OTP_DIGITS, OtpCode, OtpDigest, OtpFormatError, PasswordReset, ResetState,
    ResetStepError, UnknownResetState,
};
pub use self::password_reset_service::{DEFAULT_OTP_TTL_SECS, PasswordResetService};
pub use self::property::{PropertyFile, PropertyFileKind, PropertySummary, UnknownFileKind};
pub use self::property_catalog_service::PropertyCatalogService;
pub use self::suggestion::{
    DuplicateVoter, NewSuggestion, SUGGESTION_TEXT_MAX, Suggestion, SuggestionStatus,
    SuggestionText, SuggestionValidationError, VoteChange, VoteDirection, VoteEntry, VoteLedger,
    VoteRejected, VoteTally,
};
pub use self::suggestion_service::SuggestionService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use propertyhub::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
