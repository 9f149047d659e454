//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{developers, password_resets, property_suggestions, users};

/// Row read from the developers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = developers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DeveloperRow {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Insertable developer account.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = developers)]
pub(crate) struct NewDeveloperRow<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Row read from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ConsumerRow {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub mobile_number: Option<String>,
}

/// Insertable consumer account.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewConsumerRow<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Property projection without document payloads.
///
/// Loaded positionally from [`super::diesel_property_repository`]'s summary
/// select, so field order matters.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct PropertySummaryRow {
    pub id: i32,
    pub developer_id: i32,
    pub name: String,
    pub apartment_type: String,
    pub carpet_area: i32,
    pub development_stage: String,
    pub image_url: Option<String>,
    pub has_brochure: bool,
    pub has_floor_plan: bool,
}

/// Row read from the property_suggestions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = property_suggestions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SuggestionRow {
    pub id: i32,
    pub property_id: i32,
    pub user_id: i32,
    pub suggestion: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub likes: i32,
    pub dislikes: i32,
    pub voted_users: String,
    pub revision: i32,
}

/// Insertable suggestion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = property_suggestions)]
pub(crate) struct NewSuggestionRow<'a> {
    pub property_id: i32,
    pub user_id: i32,
    pub suggestion: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub likes: i32,
    pub dislikes: i32,
    pub voted_users: &'a str,
    pub revision: i32,
}

/// Vote columns written by the compare-and-swap update.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = property_suggestions)]
pub(crate) struct SuggestionVotesUpdate<'a> {
    pub likes: i32,
    pub dislikes: i32,
    pub voted_users: &'a str,
    pub revision: i32,
}

/// Row read from and written to the password_resets table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = password_resets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PasswordResetRow {
    pub account_kind: String,
    pub account_id: i32,
    pub state: String,
    pub otp_hash: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub failed_attempts: i32,
    pub updated_at: DateTime<Utc>,
}
