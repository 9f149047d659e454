//! Driving ports for suggestions and voting.

use async_trait::async_trait;

use crate::domain::{
    AccountId, Error, PropertyId, Suggestion, SuggestionId, SuggestionStatus, SuggestionText,
    VoteDirection,
};

/// Request to attach a suggestion to a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddSuggestionRequest {
    pub property_id: PropertyId,
    pub author_id: AccountId,
    pub text: SuggestionText,
}

/// Request to cast or flip a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastVoteRequest {
    pub voter_id: AccountId,
    pub suggestion_id: SuggestionId,
    pub direction: VoteDirection,
}

/// Request from a developer to review a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewSuggestionRequest {
    pub developer_id: AccountId,
    pub suggestion_id: SuggestionId,
    pub status: SuggestionStatus,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SuggestionCommand: Send + Sync {
    /// Create a pending suggestion with no votes.
    async fn add(&self, request: AddSuggestionRequest) -> Result<Suggestion, Error>;

    /// Record a vote.
    ///
    /// # Errors
    ///
    /// - `not_found` when the suggestion is missing.
    /// - `conflict` for a repeated vote or a lost concurrent update.
    async fn vote(&self, request: CastVoteRequest) -> Result<Suggestion, Error>;

    /// Approve or reject a suggestion on one of the developer's properties.
    async fn set_status(&self, request: ReviewSuggestionRequest) -> Result<Suggestion, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SuggestionQuery: Send + Sync {
    /// Suggestions for a property, newest first.
    async fn list_for_property(&self, property_id: PropertyId) -> Result<Vec<Suggestion>, Error>;
}
