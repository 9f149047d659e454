//! Driving port for the OTP-based password reset flow.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AccountRef, EmailAddress, Error, OtpCode, RawPassword};

/// Acknowledgement of an issued code. The code itself never leaves the
/// delivery channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpIssued {
    pub expires_at: DateTime<Utc>,
}

/// Steps out of order fail with `conflict` and detail code
/// `invalid_reset_state`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordResetCommand: Send + Sync {
    /// Issue a fresh code when `email` matches the account.
    async fn request_otp(&self, account: AccountRef, email: EmailAddress)
    -> Result<OtpIssued, Error>;

    /// Confirm a previously issued code.
    async fn verify_otp(&self, account: AccountRef, code: OtpCode) -> Result<(), Error>;

    /// Store a new password after a verified code.
    async fn reset_password(&self, account: AccountRef, password: RawPassword)
    -> Result<(), Error>;
}
