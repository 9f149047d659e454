//! PostgreSQL-backed `AccountRepository` over the `developers` and `users`
//! tables.
//!
//! The two account kinds share a shape but live in separate tables, so each
//! operation dispatches on [`AccountKind`]. Emails arrive already normalised
//! and are matched exactly against the unique `email` index.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{AccountRepository, AccountRepositoryError, InsertOutcome};
use crate::domain::{
    Account, AccountId, AccountKind, AccountRef, EmailAddress, FullName, NewAccount,
    PasswordHash, StoredCredential,
};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{ConsumerRow, DeveloperRow, NewConsumerRow, NewDeveloperRow};
use super::pool::{DbPool, PoolError};
use super::schema::{developers, users};

/// Diesel-backed implementation of the `AccountRepository` port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountRepositoryError {
    AccountRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> AccountRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => AccountRepositoryError::connection(message),
        DieselFailure::UniqueViolation { .. } => {
            AccountRepositoryError::query("unique constraint violated")
        }
        DieselFailure::Query(message) => AccountRepositoryError::query(message),
    }
}

fn map_insert_error(error: diesel::result::Error, email: &EmailAddress) -> AccountRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::UniqueViolation { .. } => {
            AccountRepositoryError::duplicate_email(email.as_ref())
        }
        DieselFailure::Connection(message) => AccountRepositoryError::connection(message),
        DieselFailure::Query(message) => AccountRepositoryError::query(message),
    }
}

/// Columns common to both account tables.
struct AccountColumns {
    id: i32,
    full_name: String,
    email: String,
    password: String,
    mobile_number: Option<String>,
}

impl From<DeveloperRow> for AccountColumns {
    fn from(row: DeveloperRow) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            password: row.password,
            mobile_number: None,
        }
    }
}

impl From<ConsumerRow> for AccountColumns {
    fn from(row: ConsumerRow) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            password: row.password,
            mobile_number: row.mobile_number,
        }
    }
}

fn row_to_credential(
    kind: AccountKind,
    row: AccountColumns,
) -> Result<StoredCredential, AccountRepositoryError> {
    let invalid = |field: &str, err: &dyn std::fmt::Display| {
        AccountRepositoryError::query(format!(
            "stored {kind} {} has invalid {field}: {err}",
            row.id
        ))
    };
    let id = AccountId::new(row.id).map_err(|err| invalid("id", &err))?;
    let full_name = FullName::new(&row.full_name).map_err(|err| invalid("full name", &err))?;
    let email = EmailAddress::new(&row.email).map_err(|err| invalid("email", &err))?;

    Ok(StoredCredential {
        account: Account {
            kind,
            id,
            full_name,
            email,
            mobile_number: row.mobile_number,
        },
        password_hash: PasswordHash::new(row.password),
    })
}

async fn select_by_email(
    conn: &mut AsyncPgConnection,
    kind: AccountKind,
    email: &str,
) -> Result<Option<AccountColumns>, diesel::result::Error> {
    match kind {
        AccountKind::Developer => developers::table
            .filter(developers::email.eq(email))
            .select(DeveloperRow::as_select())
            .first(conn)
            .await
            .optional()
            .map(|row| row.map(AccountColumns::from)),
        AccountKind::Consumer => users::table
            .filter(users::email.eq(email))
            .select(ConsumerRow::as_select())
            .first(conn)
            .await
            .optional()
            .map(|row| row.map(AccountColumns::from)),
    }
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn find_by_email(
        &self,
        kind: AccountKind,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredential>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        select_by_email(&mut conn, kind, email.as_ref())
            .await
            .map_err(map_diesel_error)?
            .map(|row| row_to_credential(kind, row))
            .transpose()
    }

    async fn find_by_id(
        &self,
        account: AccountRef,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AccountColumns> = match account.kind {
            AccountKind::Developer => developers::table
                .find(account.id.get())
                .select(DeveloperRow::as_select())
                .first(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?
                .map(AccountColumns::from),
            AccountKind::Consumer => users::table
                .find(account.id.get())
                .select(ConsumerRow::as_select())
                .first(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?
                .map(AccountColumns::from),
        };

        row.map(|row| row_to_credential(account.kind, row).map(|stored| stored.account))
            .transpose()
    }

    async fn insert(&self, account: &NewAccount) -> Result<Account, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: AccountColumns = match account.kind {
            AccountKind::Developer => diesel::insert_into(developers::table)
                .values(&NewDeveloperRow {
                    full_name: account.full_name.as_ref(),
                    email: account.email.as_ref(),
                    password: account.password_hash.as_str(),
                })
                .returning(DeveloperRow::as_returning())
                .get_result(&mut conn)
                .await
                .map_err(|err| map_insert_error(err, &account.email))?
                .into(),
            AccountKind::Consumer => diesel::insert_into(users::table)
                .values(&NewConsumerRow {
                    full_name: account.full_name.as_ref(),
                    email: account.email.as_ref(),
                    password: account.password_hash.as_str(),
                })
                .returning(ConsumerRow::as_returning())
                .get_result(&mut conn)
                .await
                .map_err(|err| map_insert_error(err, &account.email))?
                .into(),
        };

        row_to_credential(account.kind, row).map(|stored| stored.account)
    }

    async fn insert_if_absent(
        &self,
        account: &NewAccount,
    ) -> Result<InsertOutcome, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let created: Option<AccountColumns> = match account.kind {
            AccountKind::Developer => diesel::insert_into(developers::table)
                .values(&NewDeveloperRow {
                    full_name: account.full_name.as_ref(),
                    email: account.email.as_ref(),
                    password: account.password_hash.as_str(),
                })
                .on_conflict(developers::email)
                .do_nothing()
                .returning(DeveloperRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?
                .map(AccountColumns::from),
            AccountKind::Consumer => diesel::insert_into(users::table)
                .values(&NewConsumerRow {
                    full_name: account.full_name.as_ref(),
                    email: account.email.as_ref(),
                    password: account.password_hash.as_str(),
                })
                .on_conflict(users::email)
                .do_nothing()
                .returning(ConsumerRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?
                .map(AccountColumns::from),
        };

        let (row, inserted) = match created {
            Some(row) => (row, true),
            None => {
                let existing = select_by_email(&mut conn, account.kind, account.email.as_ref())
                    .await
                    .map_err(map_diesel_error)?
                    .ok_or_else(|| {
                        AccountRepositoryError::query("account vanished after insert conflict")
                    })?;
                (existing, false)
            }
        };

        let stored = row_to_credential(account.kind, row)?;
        Ok(InsertOutcome {
            account: stored.account,
            inserted,
        })
    }

    async fn update_password_hash(
        &self,
        account: AccountRef,
        hash: &PasswordHash,
    ) -> Result<bool, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = match account.kind {
            AccountKind::Developer => {
                diesel::update(developers::table.find(account.id.get()))
                    .set(developers::password.eq(hash.as_str()))
                    .execute(&mut conn)
                    .await
            }
            AccountKind::Consumer => {
                diesel::update(users::table.find(account.id.get()))
                    .set(users::password.eq(hash.as_str()))
                    .execute(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;

        Ok(updated > 0)
    }
}
