//! PostgreSQL-backed `SuggestionRepository`.
//!
//! The vote ledger is stored as JSON text in `voted_users` and decoded only
//! here. Vote updates are guarded by the `revision` column: the `UPDATE`
//! filters on the revision the caller read, and zero affected rows means
//! another writer got there first.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{SuggestionRepository, SuggestionRepositoryError};
use crate::domain::{
    AccountId, NewSuggestion, PropertyId, Suggestion, SuggestionId, SuggestionStatus,
    SuggestionText, VoteEntry, VoteLedger, VoteTally,
};

use super::diesel_error_mapping::{
    DieselFailure, classify_diesel_error, counter_from_db, counter_to_db, pool_error_message,
};
use super::models::{NewSuggestionRow, SuggestionRow, SuggestionVotesUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::property_suggestions;

/// Diesel-backed implementation of the `SuggestionRepository` port.
#[derive(Clone)]
pub struct DieselSuggestionRepository {
    pool: DbPool,
}

impl DieselSuggestionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SuggestionRepositoryError {
    SuggestionRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> SuggestionRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => SuggestionRepositoryError::connection(message),
        DieselFailure::UniqueViolation { .. } => {
            SuggestionRepositoryError::query("unique constraint violated")
        }
        DieselFailure::Query(message) => SuggestionRepositoryError::query(message),
    }
}

/// Decode the stored ledger. Anything unreadable becomes an empty ledger.
fn decode_ledger(suggestion_id: i32, raw: &str) -> VoteLedger {
    if raw.trim().is_empty() {
        return VoteLedger::default();
    }
    let entries = match serde_json::from_str::<Vec<VoteEntry>>(raw) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(suggestion_id, error = %err, "unparseable vote ledger; treating as empty");
            return VoteLedger::default();
        }
    };
    VoteLedger::from_entries(entries).unwrap_or_else(|err| {
        warn!(suggestion_id, error = %err, "inconsistent vote ledger; treating as empty");
        VoteLedger::default()
    })
}

fn encode_ledger(ledger: &VoteLedger) -> Result<String, SuggestionRepositoryError> {
    serde_json::to_string(ledger)
        .map_err(|err| SuggestionRepositoryError::query(format!("encode vote ledger: {err}")))
}

fn row_to_suggestion(row: SuggestionRow) -> Result<Suggestion, SuggestionRepositoryError> {
    let invalid = |what: &str, err: &dyn std::fmt::Display| {
        SuggestionRepositoryError::query(format!(
            "stored suggestion {} has invalid {what}: {err}",
            row.id
        ))
    };
    let id = SuggestionId::new(row.id).map_err(|err| invalid("id", &err))?;
    let property_id =
        PropertyId::new(row.property_id).map_err(|err| invalid("property id", &err))?;
    let author_id = AccountId::new(row.user_id).map_err(|err| invalid("author id", &err))?;
    let text = SuggestionText::new(&row.suggestion).map_err(|err| invalid("text", &err))?;
    let status = row.status.parse::<SuggestionStatus>().unwrap_or_else(|err| {
        warn!(suggestion_id = row.id, error = %err, "unrecognised status, defaulting to pending");
        SuggestionStatus::Pending
    });

    Ok(Suggestion {
        id,
        property_id,
        author_id,
        text,
        status,
        created_at: row.created_at,
        tally: VoteTally {
            likes: counter_from_db(row.likes),
            dislikes: counter_from_db(row.dislikes),
        },
        ledger: decode_ledger(row.id, &row.voted_users),
        revision: counter_from_db(row.revision),
    })
}

fn counter_for_db(value: u32, what: &str) -> Result<i32, SuggestionRepositoryError> {
    counter_to_db(value).ok_or_else(|| {
        SuggestionRepositoryError::query(format!("{what} {value} exceeds storage range"))
    })
}

/// Distinguish a lost race from a row that no longer exists.
async fn classify_failed_update(
    conn: &mut AsyncPgConnection,
    id: i32,
    expected_revision: u32,
) -> SuggestionRepositoryError {
    let exists = property_suggestions::table
        .find(id)
        .select(property_suggestions::id)
        .first::<i32>(conn)
        .await
        .optional()
        .map_err(map_diesel_error);

    match exists {
        Ok(Some(_)) => SuggestionRepositoryError::revision_mismatch(expected_revision),
        Ok(None) => SuggestionRepositoryError::query("suggestion not found for update"),
        Err(err) => err,
    }
}

#[async_trait]
impl SuggestionRepository for DieselSuggestionRepository {
    async fn find_by_id(
        &self,
        id: SuggestionId,
    ) -> Result<Option<Suggestion>, SuggestionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = property_suggestions::table
            .find(id.get())
            .select(SuggestionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_suggestion).transpose()
    }

    async fn insert(
        &self,
        suggestion: &NewSuggestion,
    ) -> Result<Suggestion, SuggestionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let empty_ledger = encode_ledger(&VoteLedger::default())?;
        let row = diesel::insert_into(property_suggestions::table)
            .values(&NewSuggestionRow {
                property_id: suggestion.property_id.get(),
                user_id: suggestion.author_id.get(),
                suggestion: suggestion.text.as_ref(),
                status: SuggestionStatus::Pending.as_str(),
                created_at: suggestion.created_at,
                likes: 0,
                dislikes: 0,
                voted_users: &empty_ledger,
                revision: 0,
            })
            .returning(SuggestionRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_suggestion(row)
    }

    async fn list_for_property(
        &self,
        property_id: PropertyId,
    ) -> Result<Vec<Suggestion>, SuggestionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = property_suggestions::table
            .filter(property_suggestions::property_id.eq(property_id.get()))
            .order((
                property_suggestions::created_at.desc(),
                property_suggestions::id.desc(),
            ))
            .select(SuggestionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_suggestion).collect()
    }

    async fn save_votes(
        &self,
        suggestion: &Suggestion,
        expected_revision: u32,
    ) -> Result<(), SuggestionRepositoryError> {
        let voted_users = encode_ledger(&suggestion.ledger)?;
        let update = SuggestionVotesUpdate {
            likes: counter_for_db(suggestion.tally.likes, "likes")?,
            dislikes: counter_for_db(suggestion.tally.dislikes, "dislikes")?,
            voted_users: &voted_users,
            revision: counter_for_db(suggestion.revision, "revision")?,
        };
        let expected = counter_for_db(expected_revision, "revision")?;
        let id = suggestion.id.get();

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            property_suggestions::table
                .filter(property_suggestions::id.eq(id))
                .filter(property_suggestions::revision.eq(expected)),
        )
        .set(&update)
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(classify_failed_update(&mut conn, id, expected_revision).await);
        }
        Ok(())
    }

    async fn set_status(
        &self,
        id: SuggestionId,
        status: SuggestionStatus,
    ) -> Result<Option<Suggestion>, SuggestionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(property_suggestions::table.find(id.get()))
            .set(property_suggestions::status.eq(status.as_str()))
            .returning(SuggestionRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_suggestion).transpose()
    }
}
