//! Handler tests for suggestion endpoints.

use super::*;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use chrono::{TimeZone, Utc};
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::{AccountId, VoteEntry, VoteLedger, VoteTally};
use crate::inbound::http::test_utils::{
    FIXTURE_LOGIN_PATH, MockPorts, fixture_login, session_cookie, test_session_middleware,
};

fn account_id(id: i32) -> AccountId {
    AccountId::new(id).expect("fixture id")
}

fn suggestion(entries: Vec<VoteEntry>) -> Suggestion {
    let likes = entries
        .iter()
        .filter(|e| e.vote == VoteDirection::Up)
        .count() as u32;
    let dislikes = entries.len() as u32 - likes;
    Suggestion {
        id: SuggestionId::new(3).expect("fixture id"),
        property_id: PropertyId::new(4).expect("fixture id"),
        author_id: account_id(9),
        text: SuggestionText::new("Add a rooftop garden").expect("fixture text"),
        status: SuggestionStatus::Pending,
        created_at: Utc
            .with_ymd_and_hms(2025, 1, 15, 9, 30, 0)
            .single()
            .expect("valid timestamp"),
        tally: VoteTally { likes, dislikes },
        ledger: VoteLedger::from_entries(entries).expect("unique voters"),
        revision: 1,
    }
}

fn test_app(
    ports: MockPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .wrap(test_session_middleware())
        .route(FIXTURE_LOGIN_PATH, web::get().to(fixture_login))
        .service(
            web::scope("/api/v1")
                .service(list_suggestions)
                .service(add_suggestion)
                .service(vote)
                .service(set_status),
        )
}

/// Log in as `login` and send `request` with the resulting cookie.
async fn call_as(
    ports: MockPorts,
    login: &str,
    request: actix_test::TestRequest,
) -> actix_web::dev::ServiceResponse {
    let app = actix_test::init_service(test_app(ports)).await;
    let login_response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri(login).to_request(),
    )
    .await;
    assert_eq!(login_response.status(), StatusCode::OK);
    let cookie = session_cookie(&login_response);
    actix_test::call_service(&app, request.cookie(cookie).to_request()).await
}

#[actix_web::test]
async fn consumer_adds_suggestion() {
    let mut ports = MockPorts::default();
    ports
        .suggestions
        .expect_add()
        .withf(|request| {
            request.author_id.get() == 7
                && request.property_id.get() == 4
                && request.text.as_ref() == "Add a rooftop garden"
        })
        .times(1)
        .return_once(|_| Ok(suggestion(Vec::new())));

    let response = call_as(
        ports,
        "/test-login/consumer/7",
        actix_test::TestRequest::post()
            .uri("/api/v1/properties/4/suggestions")
            .set_json(json!({"text": "  Add a rooftop garden  "})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: SuggestionResponse = actix_test::read_body_json(response).await;
    assert_eq!(body.likes, 0);
    assert_eq!(body.status, "pending");
    assert!(body.votes.is_empty());
}

#[actix_web::test]
async fn blank_suggestion_text_is_rejected() {
    let response = call_as(
        MockPorts::default(),
        "/test-login/consumer/7",
        actix_test::TestRequest::post()
            .uri("/api/v1/properties/4/suggestions")
            .set_json(json!({"text": "   "})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "empty_text");
}

#[actix_web::test]
async fn developers_cannot_vote() {
    let response = call_as(
        MockPorts::default(),
        "/test-login/developer/1",
        actix_test::TestRequest::post()
            .uri("/api/v1/suggestions/3/votes")
            .set_json(json!({"vote": "up"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn vote_returns_updated_ledger() {
    let mut ports = MockPorts::default();
    ports
        .suggestions
        .expect_vote()
        .withf(|request| {
            request.voter_id.get() == 7
                && request.suggestion_id.get() == 3
                && request.direction == VoteDirection::Down
        })
        .return_once(|_| {
            Ok(suggestion(vec![VoteEntry {
                user_id: account_id(7),
                vote: VoteDirection::Down,
            }]))
        });

    let response = call_as(
        ports,
        "/test-login/consumer/7",
        actix_test::TestRequest::post()
            .uri("/api/v1/suggestions/3/votes")
            .set_json(json!({"vote": "down"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["dislikes"], 1);
    assert_eq!(body["votes"], json!([{"userId": 7, "vote": "down"}]));
}

#[rstest]
#[case("sideways", StatusCode::BAD_REQUEST)]
#[case("UP", StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn unknown_vote_direction_is_rejected(
    #[case] direction: &str,
    #[case] expected: StatusCode,
) {
    let response = call_as(
        MockPorts::default(),
        "/test-login/consumer/7",
        actix_test::TestRequest::post()
            .uri("/api/v1/suggestions/3/votes")
            .set_json(json!({ "vote": direction })),
    )
    .await;

    assert_eq!(response.status(), expected);
}

#[actix_web::test]
async fn duplicate_vote_conflict_reaches_client() {
    let mut ports = MockPorts::default();
    ports.suggestions.expect_vote().return_once(|_| {
        Err(Error::conflict("already voted this way")
            .with_details(json!({"code": "duplicate_vote", "vote": "up"})))
    });

    let response = call_as(
        ports,
        "/test-login/consumer/7",
        actix_test::TestRequest::post()
            .uri("/api/v1/suggestions/3/votes")
            .set_json(json!({"vote": "up"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "duplicate_vote");
}

#[actix_web::test]
async fn developer_sets_status() {
    let mut ports = MockPorts::default();
    ports
        .suggestions
        .expect_set_status()
        .withf(|request| {
            request.developer_id.get() == 1 && request.status == SuggestionStatus::Approved
        })
        .return_once(|_| {
            let mut approved = suggestion(Vec::new());
            approved.status = SuggestionStatus::Approved;
            Ok(approved)
        });

    let response = call_as(
        ports,
        "/test-login/developer/1",
        actix_test::TestRequest::put()
            .uri("/api/v1/suggestions/3/status")
            .set_json(json!({"status": "approved"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: SuggestionResponse = actix_test::read_body_json(response).await;
    assert_eq!(body.status, "approved");
}

#[actix_web::test]
async fn listing_requires_a_session() {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/properties/4/suggestions")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn lists_suggestions_for_property() {
    let mut ports = MockPorts::default();
    ports
        .suggestions_query
        .expect_list_for_property()
        .withf(|id| id.get() == 4)
        .return_once(|_| Ok(vec![suggestion(Vec::new())]));

    let response = call_as(
        ports,
        "/test-login/developer/1",
        actix_test::TestRequest::get().uri("/api/v1/properties/4/suggestions"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Vec<SuggestionResponse> = actix_test::read_body_json(response).await;
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].created_at, "2025-01-15T09:30:00+00:00");
}
