//! Password reset state machine.
//!
//! Each account owns at most one [`PasswordReset`] record. The record walks
//! `Idle -> OtpSent -> OtpVerified -> Completed`; issuing a fresh code is
//! allowed from any state and restarts the flow. Only the SHA-256 digest of
//! the one-time code is ever stored, and a code that has been guessed wrong
//! [`MAX_OTP_ATTEMPTS`] times is discarded.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::AccountRef;

/// Number of digits in a one-time code.
pub const OTP_DIGITS: usize = 6;

/// Wrong guesses tolerated before an issued code is discarded.
pub const MAX_OTP_ATTEMPTS: u32 = 5;

/// Position in the reset flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResetState {
    #[default]
    Idle,
    OtpSent,
    OtpVerified,
    Completed,
}

impl ResetState {
    /// Stored name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::OtpSent => "otp_sent",
            Self::OtpVerified => "otp_verified",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ResetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored state name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reset state '{0}'")]
pub struct UnknownResetState(pub String);

impl FromStr for ResetState {
    type Err = UnknownResetState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "otp_sent" => Ok(Self::OtpSent),
            "otp_verified" => Ok(Self::OtpVerified),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownResetState(other.to_owned())),
        }
    }
}

/// Malformed one-time code input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("otp must be exactly {OTP_DIGITS} digits")]
pub struct OtpFormatError;

/// A six-digit one-time code. Cleared from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(Zeroizing<String>);

impl OtpCode {
    /// Draw a uniformly random code.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let value: u32 = rng.gen_range(0..1_000_000);
        Self(Zeroizing::new(format!("{value:06}")))
    }

    /// Parse caller-supplied input, ignoring surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, OtpFormatError> {
        let trimmed = raw.trim();
        if trimmed.len() != OTP_DIGITS || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OtpFormatError);
        }
        Ok(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// The digits, for handing to a delivery channel.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Hex-encoded SHA-256 digest of the code.
    pub fn digest(&self) -> OtpDigest {
        OtpDigest(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OtpCode(******)")
    }
}

/// Stored digest of a one-time code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpDigest(String);

impl OtpDigest {
    /// Wrap a digest loaded from storage.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Reasons a reset step is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResetStepError {
    #[error("password reset is in state {actual}, expected {expected}")]
    InvalidState {
        expected: ResetState,
        actual: ResetState,
    },
    #[error("invalid otp")]
    OtpMismatch,
    #[error("otp expired")]
    OtpExpired,
}

/// Persisted reset progress for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordReset {
    pub account: AccountRef,
    pub state: ResetState,
    pub otp_hash: Option<OtpDigest>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Wrong codes submitted against the current digest.
    pub failed_attempts: u32,
    pub updated_at: DateTime<Utc>,
}

impl PasswordReset {
    /// Fresh record in [`ResetState::Idle`].
    pub fn idle(account: AccountRef, now: DateTime<Utc>) -> Self {
        Self {
            account,
            state: ResetState::Idle,
            otp_hash: None,
            expires_at: None,
            failed_attempts: 0,
            updated_at: now,
        }
    }

    /// Store a new code digest and move to [`ResetState::OtpSent`].
    pub fn issue(&mut self, digest: OtpDigest, expires_at: DateTime<Utc>, now: DateTime<Utc>) {
        self.state = ResetState::OtpSent;
        self.otp_hash = Some(digest);
        self.expires_at = Some(expires_at);
        self.failed_attempts = 0;
        self.updated_at = now;
    }

    /// Check `code` against the stored digest.
    ///
    /// An expired code drops the record back to [`ResetState::Idle`]. A
    /// mismatch is counted; the caller may retry until [`MAX_OTP_ATTEMPTS`]
    /// misses, after which the record also returns to idle.
    pub fn verify(&mut self, code: &OtpCode, now: DateTime<Utc>) -> Result<(), ResetStepError> {
        self.expect_state(ResetState::OtpSent)?;
        let expired = self.expires_at.is_none_or(|deadline| now >= deadline);
        if expired {
            self.reset_to_idle(now);
            return Err(ResetStepError::OtpExpired);
        }
        if self.otp_hash.as_ref() != Some(&code.digest()) {
            self.failed_attempts = self.failed_attempts.saturating_add(1);
            self.updated_at = now;
            if self.failed_attempts >= MAX_OTP_ATTEMPTS {
                self.reset_to_idle(now);
            }
            return Err(ResetStepError::OtpMismatch);
        }
        self.state = ResetState::OtpVerified;
        self.otp_hash = None;
        self.expires_at = None;
        self.failed_attempts = 0;
        self.updated_at = now;
        Ok(())
    }

    /// Mark the flow finished once the new hash has been stored.
    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<(), ResetStepError> {
        self.expect_state(ResetState::OtpVerified)?;
        self.state = ResetState::Completed;
        self.updated_at = now;
        Ok(())
    }

    /// Fail unless the record is in `expected`.
    pub fn expect_state(&self, expected: ResetState) -> Result<(), ResetStepError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ResetStepError::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }

    fn reset_to_idle(&mut self, now: DateTime<Utc>) {
        self.state = ResetState::Idle;
        self.otp_hash = None;
        self.expires_at = None;
        self.failed_attempts = 0;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, AccountKind};
    use chrono::{Duration, TimeZone};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[fixture]
    fn reset(now: DateTime<Utc>) -> PasswordReset {
        let account = AccountRef::new(
            AccountKind::Consumer,
            AccountId::new(11).expect("valid id"),
        );
        PasswordReset::idle(account, now)
    }

    fn code(raw: &str) -> OtpCode {
        OtpCode::parse(raw).expect("valid code")
    }

    #[rstest]
    fn generated_codes_are_six_digits() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..50 {
            let otp = OtpCode::generate(&mut rng);
            assert_eq!(otp.expose().len(), OTP_DIGITS);
            assert!(otp.expose().bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[rstest]
    #[case("12345")]
    #[case("1234567")]
    #[case("12a456")]
    #[case("")]
    fn parse_rejects_malformed_codes(#[case] raw: &str) {
        assert_eq!(OtpCode::parse(raw).expect_err("malformed"), OtpFormatError);
    }

    #[rstest]
    fn digest_is_hex_sha256() {
        let digest = code("000000").digest();
        assert_eq!(digest.as_str().len(), 64);
        assert_ne!(digest, code("000001").digest());
    }

    #[rstest]
    fn happy_path_reaches_completed(mut reset: PasswordReset, now: DateTime<Utc>) {
        reset.issue(code("424242").digest(), now + Duration::minutes(10), now);
        assert_eq!(reset.state, ResetState::OtpSent);

        reset
            .verify(&code("424242"), now + Duration::minutes(1))
            .expect("code accepted");
        assert_eq!(reset.state, ResetState::OtpVerified);
        assert!(reset.otp_hash.is_none());

        reset
            .complete(now + Duration::minutes(2))
            .expect("completion allowed");
        assert_eq!(reset.state, ResetState::Completed);
    }

    #[rstest]
    fn mismatch_keeps_otp_sent(mut reset: PasswordReset, now: DateTime<Utc>) {
        reset.issue(code("424242").digest(), now + Duration::minutes(10), now);

        let err = reset.verify(&code("111111"), now).expect_err("mismatch");

        assert_eq!(err, ResetStepError::OtpMismatch);
        assert_eq!(reset.state, ResetState::OtpSent);
        assert!(reset.otp_hash.is_some());
        assert_eq!(reset.failed_attempts, 1);
    }

    #[rstest]
    fn repeated_misses_discard_the_code(mut reset: PasswordReset, now: DateTime<Utc>) {
        reset.issue(code("424242").digest(), now + Duration::minutes(10), now);
        for _ in 1..MAX_OTP_ATTEMPTS {
            reset.verify(&code("111111"), now).expect_err("mismatch");
            assert_eq!(reset.state, ResetState::OtpSent);
        }

        let err = reset.verify(&code("111111"), now).expect_err("last miss");

        assert_eq!(err, ResetStepError::OtpMismatch);
        assert_eq!(reset.state, ResetState::Idle);
        assert!(reset.otp_hash.is_none());
        assert_eq!(reset.failed_attempts, 0);
        assert!(matches!(
            reset.verify(&code("424242"), now),
            Err(ResetStepError::InvalidState { .. })
        ));
    }

    #[rstest]
    fn fresh_code_clears_the_miss_count(mut reset: PasswordReset, now: DateTime<Utc>) {
        reset.issue(code("424242").digest(), now + Duration::minutes(10), now);
        reset.verify(&code("111111"), now).expect_err("mismatch");

        reset.issue(code("525252").digest(), now + Duration::minutes(10), now);

        assert_eq!(reset.failed_attempts, 0);
    }

    #[rstest]
    fn expiry_returns_to_idle(mut reset: PasswordReset, now: DateTime<Utc>) {
        reset.issue(code("424242").digest(), now + Duration::minutes(10), now);

        let err = reset
            .verify(&code("424242"), now + Duration::minutes(10))
            .expect_err("expired");

        assert_eq!(err, ResetStepError::OtpExpired);
        assert_eq!(reset.state, ResetState::Idle);
        assert!(reset.otp_hash.is_none());
    }

    #[rstest]
    fn complete_before_verify_is_invalid_state(mut reset: PasswordReset, now: DateTime<Utc>) {
        reset.issue(code("424242").digest(), now + Duration::minutes(10), now);

        let err = reset.complete(now).expect_err("out of order");

        assert_eq!(
            err,
            ResetStepError::InvalidState {
                expected: ResetState::OtpVerified,
                actual: ResetState::OtpSent,
            }
        );
    }

    #[rstest]
    fn verify_from_idle_is_invalid_state(mut reset: PasswordReset, now: DateTime<Utc>) {
        let err = reset.verify(&code("424242"), now).expect_err("no code issued");
        assert!(matches!(err, ResetStepError::InvalidState { .. }));
    }

    #[rstest]
    fn reissue_restarts_completed_flow(mut reset: PasswordReset, now: DateTime<Utc>) {
        reset.state = ResetState::Completed;
        reset.issue(code("999999").digest(), now + Duration::minutes(5), now);
        assert_eq!(reset.state, ResetState::OtpSent);
    }

    #[rstest]
    #[case(ResetState::Idle)]
    #[case(ResetState::OtpSent)]
    #[case(ResetState::OtpVerified)]
    #[case(ResetState::Completed)]
    fn state_names_round_trip(#[case] state: ResetState) {
        assert_eq!(state.as_str().parse::<ResetState>().expect("parse"), state);
    }
}
