//! Suggestion and vote HTTP handlers.
//!
//! ```text
//! GET /api/v1/properties/{id}/suggestions
//! POST /api/v1/properties/{id}/suggestions {"text":"Add a rooftop garden"}
//! POST /api/v1/suggestions/{id}/votes {"vote":"up"}
//! PUT /api/v1/suggestions/{id}/status {"status":"approved"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{AddSuggestionRequest, CastVoteRequest, ReviewSuggestionRequest};
use crate::domain::{
    Error, PropertyId, Suggestion, SuggestionId, SuggestionStatus, SuggestionText, VoteDirection,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, suggestion_validation_error};

const PROPERTY_ID: FieldName = FieldName::new("propertyId");
const SUGGESTION_ID: FieldName = FieldName::new("suggestionId");

/// Body for `POST /properties/{id}/suggestions`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct NewSuggestionBody {
    #[schema(example = "Add a rooftop garden")]
    pub text: String,
}

/// Body for `POST /suggestions/{id}/votes`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct VoteBody {
    /// `up` or `down`.
    #[schema(example = "up")]
    pub vote: String,
}

/// Body for `PUT /suggestions/{id}/status`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct StatusBody {
    /// `pending`, `approved` or `rejected`.
    #[schema(example = "approved")]
    pub status: String,
}

/// One voter's current vote.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub user_id: i32,
    #[schema(example = "down")]
    pub vote: String,
}

/// Suggestion with its tally and ledger.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    pub id: i32,
    pub property_id: i32,
    pub author_id: i32,
    pub text: String,
    #[schema(example = "pending")]
    pub status: String,
    #[schema(example = "2025-01-15T09:30:00+00:00")]
    pub created_at: String,
    pub likes: u32,
    pub dislikes: u32,
    pub votes: Vec<VoteResponse>,
    /// Compare-and-swap counter bumped by each vote.
    pub revision: u32,
}

impl From<Suggestion> for SuggestionResponse {
    fn from(value: Suggestion) -> Self {
        let votes = value
            .ledger
            .entries()
            .iter()
            .map(|entry| VoteResponse {
                user_id: entry.user_id.get(),
                vote: entry.vote.as_str().to_owned(),
            })
            .collect();
        Self {
            id: value.id.get(),
            property_id: value.property_id.get(),
            author_id: value.author_id.get(),
            text: value.text.as_ref().to_owned(),
            status: value.status.as_str().to_owned(),
            created_at: value.created_at.to_rfc3339(),
            likes: value.tally.likes,
            dislikes: value.tally.dislikes,
            votes,
            revision: value.revision,
        }
    }
}

/// Suggestions raised for a property, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}/suggestions",
    params(("id" = i32, Path, description = "Property identifier")),
    responses(
        (status = 200, description = "Suggestions", body = [SuggestionResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Property not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["suggestions"],
    operation_id = "listSuggestions"
)]
#[get("/properties/{id}/suggestions")]
pub async fn list_suggestions(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<SuggestionResponse>>> {
    session.require_account()?;
    let property_id = parse_id(&path, PROPERTY_ID, PropertyId::parse)?;
    let suggestions = state.suggestions_query.list_for_property(property_id).await?;
    Ok(web::Json(
        suggestions
            .into_iter()
            .map(SuggestionResponse::from)
            .collect(),
    ))
}

/// Raise a suggestion on a property as the signed-in consumer.
#[utoipa::path(
    post,
    path = "/api/v1/properties/{id}/suggestions",
    params(("id" = i32, Path, description = "Property identifier")),
    request_body = NewSuggestionBody,
    responses(
        (status = 201, description = "Suggestion created", body = SuggestionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Consumer session required", body = Error),
        (status = 404, description = "Property not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["suggestions"],
    operation_id = "addSuggestion"
)]
#[post("/properties/{id}/suggestions")]
pub async fn add_suggestion(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<NewSuggestionBody>,
) -> ApiResult<HttpResponse> {
    let author_id = session.require_consumer()?;
    let property_id = parse_id(&path, PROPERTY_ID, PropertyId::parse)?;
    let text = SuggestionText::new(payload.into_inner().text)
        .map_err(suggestion_validation_error)?;
    let suggestion = state
        .suggestions
        .add(AddSuggestionRequest {
            property_id,
            author_id,
            text,
        })
        .await?;
    Ok(HttpResponse::Created().json(SuggestionResponse::from(suggestion)))
}

/// Vote on a suggestion. Repeating the current vote is a conflict; the
/// opposite vote flips it.
#[utoipa::path(
    post,
    path = "/api/v1/suggestions/{id}/votes",
    params(("id" = i32, Path, description = "Suggestion identifier")),
    request_body = VoteBody,
    responses(
        (status = 200, description = "Vote recorded", body = SuggestionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Consumer session required", body = Error),
        (status = 404, description = "Suggestion not found", body = Error),
        (status = 409, description = "Duplicate vote or concurrent update", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["suggestions"],
    operation_id = "voteOnSuggestion"
)]
#[post("/suggestions/{id}/votes")]
pub async fn vote(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<VoteBody>,
) -> ApiResult<web::Json<SuggestionResponse>> {
    let voter_id = session.require_consumer()?;
    let suggestion_id = parse_id(&path, SUGGESTION_ID, SuggestionId::parse)?;
    let direction = payload
        .vote
        .parse::<VoteDirection>()
        .map_err(suggestion_validation_error)?;
    let suggestion = state
        .suggestions
        .vote(CastVoteRequest {
            voter_id,
            suggestion_id,
            direction,
        })
        .await?;
    Ok(web::Json(SuggestionResponse::from(suggestion)))
}

/// Approve or reject a suggestion on a property the developer owns.
#[utoipa::path(
    put,
    path = "/api/v1/suggestions/{id}/status",
    params(("id" = i32, Path, description = "Suggestion identifier")),
    request_body = StatusBody,
    responses(
        (status = 200, description = "Status updated", body = SuggestionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Owning developer session required", body = Error),
        (status = 404, description = "Suggestion not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["suggestions"],
    operation_id = "setSuggestionStatus"
)]
#[put("/suggestions/{id}/status")]
pub async fn set_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<StatusBody>,
) -> ApiResult<web::Json<SuggestionResponse>> {
    let developer_id = session.require_developer()?;
    let suggestion_id = parse_id(&path, SUGGESTION_ID, SuggestionId::parse)?;
    let status = payload
        .status
        .parse::<SuggestionStatus>()
        .map_err(suggestion_validation_error)?;
    let suggestion = state
        .suggestions
        .set_status(ReviewSuggestionRequest {
            developer_id,
            suggestion_id,
            status,
        })
        .await?;
    Ok(web::Json(SuggestionResponse::from(suggestion)))
}

#[cfg(test)]
mod tests;
