//! OTP-based password reset service.
//!
//! Drives [`PasswordReset`] through its states, persisting every transition
//! so a restarted process resumes where the account holder left off.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::credential_service::{map_account_error, map_hasher_error, password_policy_error};
use crate::domain::ports::{
    AccountRepository, OtpDelivery, OtpIssued, PasswordHasher, PasswordResetCommand,
    PasswordResetRepository, PasswordResetRepositoryError,
};
use crate::domain::{
    AccountRef, EmailAddress, Error, OtpCode, PasswordReset, RawPassword, ResetState,
    ResetStepError,
};

/// Default lifetime of an issued code, in seconds.
pub const DEFAULT_OTP_TTL_SECS: i64 = 600;

/// Password reset service implementing [`PasswordResetCommand`].
#[derive(Clone)]
pub struct PasswordResetService<A, R, H> {
    accounts: Arc<A>,
    resets: Arc<R>,
    hasher: Arc<H>,
    delivery: Arc<dyn OtpDelivery>,
    clock: Arc<dyn Clock>,
    otp_ttl: Duration,
}

impl<A, R, H> PasswordResetService<A, R, H> {
    /// Create a service issuing codes valid for [`DEFAULT_OTP_TTL_SECS`].
    pub fn new(
        accounts: Arc<A>,
        resets: Arc<R>,
        hasher: Arc<H>,
        delivery: Arc<dyn OtpDelivery>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            resets,
            hasher,
            delivery,
            clock,
            otp_ttl: Duration::seconds(DEFAULT_OTP_TTL_SECS),
        }
    }

    /// Override how long issued codes stay valid.
    pub fn with_otp_ttl(mut self, otp_ttl: Duration) -> Self {
        self.otp_ttl = otp_ttl;
        self
    }
}

fn map_reset_error(error: PasswordResetRepositoryError) -> Error {
    match error {
        PasswordResetRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("password reset repository unavailable: {message}"))
        }
        PasswordResetRepositoryError::Query { message } => {
            Error::internal(format!("password reset repository error: {message}"))
        }
    }
}

fn map_step_error(error: ResetStepError) -> Error {
    match error {
        ResetStepError::InvalidState { expected, actual } => {
            Error::conflict("password reset step out of order").with_details(json!({
                "code": "invalid_reset_state",
                "expectedState": expected.as_str(),
                "actualState": actual.as_str(),
            }))
        }
        ResetStepError::OtpMismatch => Error::unauthorized("invalid otp"),
        ResetStepError::OtpExpired => Error::unauthorized("otp expired"),
    }
}

impl<A, R, H> PasswordResetService<A, R, H>
where
    A: AccountRepository,
    R: PasswordResetRepository,
    H: PasswordHasher,
{
    async fn load(&self, account: AccountRef) -> Result<PasswordReset, Error> {
        let existing = self.resets.find(account).await.map_err(map_reset_error)?;
        Ok(existing.unwrap_or_else(|| PasswordReset::idle(account, self.clock.utc())))
    }

    async fn store(&self, reset: &PasswordReset) -> Result<(), Error> {
        self.resets.save(reset).await.map_err(map_reset_error)
    }
}

#[async_trait]
impl<A, R, H> PasswordResetCommand for PasswordResetService<A, R, H>
where
    A: AccountRepository,
    R: PasswordResetRepository,
    H: PasswordHasher,
{
    async fn request_otp(
        &self,
        account: AccountRef,
        email: EmailAddress,
    ) -> Result<OtpIssued, Error> {
        let profile = self
            .accounts
            .find_by_id(account)
            .await
            .map_err(map_account_error)?
            .ok_or_else(|| Error::not_found("account not found"))?;
        if profile.email != email {
            return Err(Error::unauthorized("email does not match account"));
        }

        let code = OtpCode::generate(&mut rand::thread_rng());
        let now = self.clock.utc();
        let expires_at = now + self.otp_ttl;
        let mut reset = self.load(account).await?;
        reset.issue(code.digest(), expires_at, now);
        self.store(&reset).await?;

        self.delivery
            .deliver(&profile.email, &code, expires_at)
            .await
            .map_err(|err| Error::service_unavailable(err.to_string()))?;

        info!(%account, %expires_at, "password reset code issued");
        Ok(OtpIssued { expires_at })
    }

    async fn verify_otp(&self, account: AccountRef, code: OtpCode) -> Result<(), Error> {
        let mut reset = self.load(account).await?;
        let outcome = reset.verify(&code, self.clock.utc());
        if !matches!(outcome, Err(ResetStepError::InvalidState { .. })) {
            self.store(&reset).await?;
        }
        if reset.state == ResetState::Idle && outcome == Err(ResetStepError::OtpMismatch) {
            warn!(%account, "password reset code discarded after repeated misses");
        }
        outcome.map_err(map_step_error)
    }

    async fn reset_password(
        &self,
        account: AccountRef,
        password: RawPassword,
    ) -> Result<(), Error> {
        let mut reset = self.load(account).await?;
        reset
            .expect_state(ResetState::OtpVerified)
            .map_err(map_step_error)?;
        password_policy_error(&password)?;

        let hash = self.hasher.hash(&password).await.map_err(map_hasher_error)?;
        let updated = self
            .accounts
            .update_password_hash(account, &hash)
            .await
            .map_err(map_account_error)?;
        if !updated {
            return Err(Error::not_found("account not found"));
        }

        reset
            .complete(self.clock.utc())
            .map_err(map_step_error)?;
        self.store(&reset).await?;
        info!(%account, "password reset completed");
        Ok(())
    }
}
