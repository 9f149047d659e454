//! Shared Diesel error classification for the repositories in this module.
//!
//! Each repository turns a [`DieselFailure`] into its own port error so the
//! logging and variant matching live in one place.

use tracing::debug;

use super::pool::PoolError;

/// Coarse category of a failed Diesel call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped mid-query.
    Connection(&'static str),
    /// A unique index rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// Any other failure; the message is safe to surface.
    Query(&'static str),
}

/// Extract the message carried by a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error, logging the driver detail at debug level.
pub(crate) fn classify_diesel_error(error: diesel::result::Error) -> DieselFailure {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DeserializationError(_) => DieselFailure::Query("stored row is malformed"),
        _ => DieselFailure::Query("database error"),
    }
}

/// Convert a stored non-negative counter, clamping corrupt values to zero.
pub(crate) fn counter_from_db(value: i32) -> u32 {
    u32::try_from(value).unwrap_or_default()
}

/// Convert a domain counter for storage.
pub(crate) fn counter_to_db(value: u32) -> Option<i32> {
    i32::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn not_found_is_a_query_failure() {
        assert_eq!(
            classify_diesel_error(diesel::result::Error::NotFound),
            DieselFailure::Query("record not found")
        );
    }

    #[rstest]
    fn pool_errors_keep_their_message() {
        assert_eq!(
            pool_error_message(PoolError::checkout("timed out")),
            "timed out"
        );
    }

    #[rstest]
    #[case(-3, 0)]
    #[case(0, 0)]
    #[case(17, 17)]
    fn counters_clamp_negative_values(#[case] stored: i32, #[case] expected: u32) {
        assert_eq!(counter_from_db(stored), expected);
    }

    #[rstest]
    fn oversized_counters_do_not_fit() {
        assert_eq!(counter_to_db(u32::MAX), None);
        assert_eq!(counter_to_db(42), Some(42));
    }
}
