//! PostgreSQL-backed `PasswordResetRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PasswordResetRepository, PasswordResetRepositoryError};
use crate::domain::{AccountRef, OtpDigest, PasswordReset, ResetState};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::PasswordResetRow;
use super::pool::{DbPool, PoolError};
use super::schema::password_resets;

/// Diesel-backed implementation of the `PasswordResetRepository` port.
#[derive(Clone)]
pub struct DieselPasswordResetRepository {
    pool: DbPool,
}

impl DieselPasswordResetRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PasswordResetRepositoryError {
    PasswordResetRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> PasswordResetRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => PasswordResetRepositoryError::connection(message),
        DieselFailure::UniqueViolation { .. } => {
            PasswordResetRepositoryError::query("unique constraint violated")
        }
        DieselFailure::Query(message) => PasswordResetRepositoryError::query(message),
    }
}

fn row_to_reset(
    account: AccountRef,
    row: PasswordResetRow,
) -> Result<PasswordReset, PasswordResetRepositoryError> {
    let state = row
        .state
        .parse::<ResetState>()
        .map_err(|err| PasswordResetRepositoryError::query(err.to_string()))?;
    let failed_attempts = u32::try_from(row.failed_attempts).map_err(|_| {
        PasswordResetRepositoryError::query(format!(
            "negative failed_attempts {}",
            row.failed_attempts
        ))
    })?;
    Ok(PasswordReset {
        account,
        state,
        otp_hash: row.otp_hash.map(OtpDigest::from_stored),
        expires_at: row.expires_at,
        failed_attempts,
        updated_at: row.updated_at,
    })
}

fn reset_to_row(reset: &PasswordReset) -> PasswordResetRow {
    PasswordResetRow {
        account_kind: reset.account.kind.as_str().to_owned(),
        account_id: reset.account.id.get(),
        state: reset.state.as_str().to_owned(),
        otp_hash: reset.otp_hash.as_ref().map(|digest| digest.as_str().to_owned()),
        expires_at: reset.expires_at,
        failed_attempts: i32::try_from(reset.failed_attempts).unwrap_or(i32::MAX),
        updated_at: reset.updated_at,
    }
}

#[async_trait]
impl PasswordResetRepository for DieselPasswordResetRepository {
    async fn find(
        &self,
        account: AccountRef,
    ) -> Result<Option<PasswordReset>, PasswordResetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = password_resets::table
            .find((account.kind.as_str(), account.id.get()))
            .select(PasswordResetRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| row_to_reset(account, row)).transpose()
    }

    async fn save(&self, reset: &PasswordReset) -> Result<(), PasswordResetRepositoryError> {
        let row = reset_to_row(reset);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(password_resets::table)
            .values(&row)
            .on_conflict((password_resets::account_kind, password_resets::account_id))
            .do_update()
            .set((
                password_resets::state.eq(excluded(password_resets::state)),
                password_resets::otp_hash.eq(excluded(password_resets::otp_hash)),
                password_resets::expires_at.eq(excluded(password_resets::expires_at)),
                password_resets::failed_attempts.eq(excluded(password_resets::failed_attempts)),
                password_resets::updated_at.eq(excluded(password_resets::updated_at)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, AccountKind, OtpCode};
    use chrono::{Duration, Utc};
    use rstest::rstest;

    fn account() -> AccountRef {
        AccountRef::new(AccountKind::Developer, AccountId::new(2).expect("valid id"))
    }

    #[rstest]
    fn rows_round_trip_through_domain() {
        let now = Utc::now();
        let mut reset = PasswordReset::idle(account(), now);
        reset.issue(
            OtpCode::parse("135790").expect("valid code").digest(),
            now + Duration::minutes(10),
            now,
        );

        let row = reset_to_row(&reset);
        assert_eq!(row.account_kind, "developer");
        assert_eq!(row.state, "otp_sent");

        let restored = row_to_reset(account(), row).expect("valid row");
        assert_eq!(restored, reset);
    }

    #[rstest]
    fn unknown_state_is_a_query_error() {
        let row = PasswordResetRow {
            account_kind: "developer".to_owned(),
            account_id: 2,
            state: "halfway".to_owned(),
            otp_hash: None,
            expires_at: None,
            failed_attempts: 0,
            updated_at: Utc::now(),
        };
        assert!(matches!(
            row_to_reset(account(), row),
            Err(PasswordResetRepositoryError::Query { .. })
        ));
    }

    #[rstest]
    fn miss_count_survives_storage() {
        let now = Utc::now();
        let mut reset = PasswordReset::idle(account(), now);
        reset.issue(
            OtpCode::parse("135790").expect("valid code").digest(),
            now + Duration::minutes(10),
            now,
        );
        reset
            .verify(&OtpCode::parse("000000").expect("valid code"), now)
            .expect_err("mismatch");

        let row = reset_to_row(&reset);
        assert_eq!(row.failed_attempts, 1);
        assert_eq!(
            row_to_reset(account(), row).expect("valid row").failed_attempts,
            1
        );
    }
}
