//! Suggestion and voting services.
//!
//! Votes follow a read-modify-write cycle guarded by the suggestion revision.
//! A writer that loses the race gets a conflict and nothing is retried.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    AddSuggestionRequest, CastVoteRequest, PropertyRepository, ReviewSuggestionRequest,
    SuggestionCommand, SuggestionQuery, SuggestionRepository, SuggestionRepositoryError,
};
use crate::domain::property_catalog_service::map_property_error;
use crate::domain::{
    Error, NewSuggestion, PropertyId, PropertySummary, Suggestion, SuggestionId, VoteRejected,
};

/// Suggestion service implementing the suggestion driving ports.
#[derive(Clone)]
pub struct SuggestionService<S, P> {
    suggestions: Arc<S>,
    properties: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<S, P> SuggestionService<S, P> {
    /// Create a new service. `clock` stamps suggestion creation times.
    pub fn new(suggestions: Arc<S>, properties: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            suggestions,
            properties,
            clock,
        }
    }
}

fn map_suggestion_error(error: SuggestionRepositoryError) -> Error {
    match error {
        SuggestionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("suggestion repository unavailable: {message}"))
        }
        SuggestionRepositoryError::Query { message } => {
            Error::internal(format!("suggestion repository error: {message}"))
        }
        SuggestionRepositoryError::RevisionMismatch { expected } => {
            Error::conflict("suggestion changed concurrently").with_details(json!({
                "code": "revision_mismatch",
                "expectedRevision": expected,
            }))
        }
    }
}

impl<S, P> SuggestionService<S, P>
where
    S: SuggestionRepository,
    P: PropertyRepository,
{
    async fn require_property(&self, id: PropertyId) -> Result<PropertySummary, Error> {
        self.properties
            .find_by_id(id)
            .await
            .map_err(map_property_error)?
            .ok_or_else(|| Error::not_found(format!("property {id} not found")))
    }

    async fn require_suggestion(&self, id: SuggestionId) -> Result<Suggestion, Error> {
        self.suggestions
            .find_by_id(id)
            .await
            .map_err(map_suggestion_error)?
            .ok_or_else(|| Error::not_found(format!("suggestion {id} not found")))
    }
}

#[async_trait]
impl<S, P> SuggestionCommand for SuggestionService<S, P>
where
    S: SuggestionRepository,
    P: PropertyRepository,
{
    async fn add(&self, request: AddSuggestionRequest) -> Result<Suggestion, Error> {
        self.require_property(request.property_id).await?;
        let suggestion = self
            .suggestions
            .insert(&NewSuggestion {
                property_id: request.property_id,
                author_id: request.author_id,
                text: request.text,
                created_at: self.clock.utc(),
            })
            .await
            .map_err(map_suggestion_error)?;

        info!(
            suggestion = %suggestion.id,
            property = %suggestion.property_id,
            "suggestion added"
        );
        Ok(suggestion)
    }

    async fn vote(&self, request: CastVoteRequest) -> Result<Suggestion, Error> {
        let mut suggestion = self.require_suggestion(request.suggestion_id).await?;
        let expected_revision = suggestion.revision;

        suggestion
            .cast_vote(request.voter_id, request.direction)
            .map_err(|rejected| match rejected {
                VoteRejected::AlreadyVoted(direction) => Error::conflict("already voted this way")
                    .with_details(json!({
                        "code": "duplicate_vote",
                        "vote": direction.as_str(),
                    })),
            })?;
        suggestion.revision = expected_revision + 1;

        self.suggestions
            .save_votes(&suggestion, expected_revision)
            .await
            .map_err(map_suggestion_error)?;
        Ok(suggestion)
    }

    async fn set_status(&self, request: ReviewSuggestionRequest) -> Result<Suggestion, Error> {
        let suggestion = self.require_suggestion(request.suggestion_id).await?;
        let property = self.require_property(suggestion.property_id).await?;
        if property.developer_id != request.developer_id {
            return Err(Error::forbidden(
                "only the owning developer may review this suggestion",
            ));
        }

        let updated = self
            .suggestions
            .set_status(request.suggestion_id, request.status)
            .await
            .map_err(map_suggestion_error)?
            .ok_or_else(|| {
                Error::not_found(format!("suggestion {} not found", request.suggestion_id))
            })?;

        info!(
            suggestion = %updated.id,
            status = updated.status.as_str(),
            "suggestion reviewed"
        );
        Ok(updated)
    }
}

#[async_trait]
impl<S, P> SuggestionQuery for SuggestionService<S, P>
where
    S: SuggestionRepository,
    P: PropertyRepository,
{
    async fn list_for_property(&self, property_id: PropertyId) -> Result<Vec<Suggestion>, Error> {
        self.require_property(property_id).await?;
        self.suggestions
            .list_for_property(property_id)
            .await
            .map_err(map_suggestion_error)
    }
}
