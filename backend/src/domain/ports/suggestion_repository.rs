//! Port for suggestion persistence.
//!
//! Adapters own the stored encoding of the vote ledger. A ledger that cannot
//! be decoded is loaded as empty and reported at `warn`; it never fails the
//! read.

use async_trait::async_trait;

use crate::domain::{
    NewSuggestion, PropertyId, Suggestion, SuggestionId, SuggestionStatus,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by suggestion repository adapters.
    pub enum SuggestionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "suggestion repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "suggestion repository query failed: {message}",
        /// Optimistic concurrency check failed.
        RevisionMismatch { expected: u32 } =>
            "suggestion revision changed since {expected} was read",
    }
}

/// Port for suggestion storage.
///
/// # Revision Semantics
///
/// - New suggestions start at revision 0.
/// - [`SuggestionRepository::save_votes`] only writes when the stored
///   revision equals `expected_revision`, otherwise it returns
///   [`SuggestionRepositoryError::RevisionMismatch`]. The caller sets
///   `suggestion.revision` to the new value beforehand.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SuggestionRepository: Send + Sync {
    async fn find_by_id(
        &self,
        id: SuggestionId,
    ) -> Result<Option<Suggestion>, SuggestionRepositoryError>;

    /// Insert a suggestion with no votes and `pending` status.
    async fn insert(&self, suggestion: &NewSuggestion)
    -> Result<Suggestion, SuggestionRepositoryError>;

    /// Suggestions for a property, newest first.
    async fn list_for_property(
        &self,
        property_id: PropertyId,
    ) -> Result<Vec<Suggestion>, SuggestionRepositoryError>;

    /// Persist counters, ledger and revision in one guarded update.
    async fn save_votes(
        &self,
        suggestion: &Suggestion,
        expected_revision: u32,
    ) -> Result<(), SuggestionRepositoryError>;

    /// Overwrite the review status. Returns the updated row, or `None` when
    /// the suggestion does not exist.
    async fn set_status(
        &self,
        id: SuggestionId,
        status: SuggestionStatus,
    ) -> Result<Option<Suggestion>, SuggestionRepositoryError>;
}
