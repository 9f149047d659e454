//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Developer accounts.
    developers (id) {
        id -> Int4,
        full_name -> Varchar,
        /// Lower-cased, unique.
        email -> Varchar,
        /// Argon2id PHC string.
        password -> Varchar,
    }
}

diesel::table! {
    /// Consumer user accounts.
    users (id) {
        id -> Int4,
        full_name -> Varchar,
        /// Lower-cased, unique.
        email -> Varchar,
        /// Argon2id PHC string.
        password -> Varchar,
        mobile_number -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Properties owned by developers, with optional document blobs.
    properties (id) {
        id -> Int4,
        developer_id -> Int4,
        name -> Varchar,
        apartment_type -> Varchar,
        /// Square feet.
        carpet_area -> Int4,
        development_stage -> Varchar,
        image_url -> Nullable<Varchar>,
        brochure_filename -> Nullable<Varchar>,
        brochure -> Nullable<Bytea>,
        floor_plan_filename -> Nullable<Varchar>,
        floor_plan -> Nullable<Bytea>,
    }
}

diesel::table! {
    /// Assignment of properties to consumer users.
    user_properties (user_id, property_id) {
        user_id -> Int4,
        property_id -> Int4,
    }
}

diesel::table! {
    /// Suggestions with their embedded vote ledger.
    property_suggestions (id) {
        id -> Int4,
        property_id -> Int4,
        user_id -> Int4,
        suggestion -> Text,
        status -> Varchar,
        created_at -> Timestamptz,
        likes -> Int4,
        dislikes -> Int4,
        /// JSON array of `{"userId": .., "vote": "up"|"down"}`.
        voted_users -> Text,
        /// Compare-and-swap guard for vote updates.
        revision -> Int4,
    }
}

diesel::table! {
    /// Password reset progress, one row per account.
    password_resets (account_kind, account_id) {
        account_kind -> Varchar,
        account_id -> Int4,
        state -> Varchar,
        otp_hash -> Nullable<Varchar>,
        expires_at -> Nullable<Timestamptz>,
        failed_attempts -> Int4,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(properties -> developers (developer_id));
diesel::joinable!(user_properties -> users (user_id));
diesel::joinable!(user_properties -> properties (property_id));
diesel::joinable!(property_suggestions -> properties (property_id));
diesel::joinable!(property_suggestions -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    developers,
    users,
    properties,
    user_properties,
    property_suggestions,
    password_resets,
);
