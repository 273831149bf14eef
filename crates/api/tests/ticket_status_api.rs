//! Integration tests for `PATCH /api/v1/transactions/ticket/{ticket_id}/status`.

mod common;

use antrean_db::repositories::{QueueSessionRepo, QueueTicketRepo};
use axum::http::StatusCode;
use axum::Router;
use common::{
    body_json, build_test_app, create_company, create_room, create_user, join_as,
    patch_json_auth,
};
use serde_json::json;
use sqlx::PgPool;

struct Fixture {
    app: Router,
    company_token: String,
    user_token: String,
    ticket_id: i64,
    session_id: i64,
}

/// A company with one room and one joined ticket.
async fn setup(pool: &PgPool) -> Fixture {
    let (company, company_token) = create_company(pool, "acme@example.com").await;
    let room = create_room(pool, company.id, "desk-key-1").await;
    let (_, user_token) = create_user(pool, "bob@example.com").await;

    let app = build_test_app(pool.clone());
    let response = join_as(app.clone(), &user_token, "desk-key-1", room.fields[0].id).await;
    let joined = body_json(response).await;

    Fixture {
        app,
        company_token,
        user_token,
        ticket_id: joined["data"]["ticket"]["id"].as_i64().unwrap(),
        session_id: joined["data"]["ticket"]["session_id"].as_i64().unwrap(),
    }
}

fn status_uri(ticket_id: i64) -> String {
    format!("/api/v1/transactions/ticket/{ticket_id}/status")
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn serving_sets_called_number(pool: PgPool) {
    let f = setup(&pool).await;

    let response = patch_json_auth(
        f.app,
        &status_uri(f.ticket_id),
        json!({ "status": "serving" }),
        &f.company_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "serving");
    assert!(!json["data"]["called_at"].is_null());
    assert!(json["data"]["completed_at"].is_null());

    let session = QueueSessionRepo::find_by_id(&pool, f.session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.called_number, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn serving_then_done_completes_ticket(pool: PgPool) {
    let f = setup(&pool).await;

    let serve = patch_json_auth(
        f.app.clone(),
        &status_uri(f.ticket_id),
        json!({ "status": "serving" }),
        &f.company_token,
    )
    .await;
    assert_eq!(serve.status(), StatusCode::OK);

    let response = patch_json_auth(
        f.app,
        &status_uri(f.ticket_id),
        json!({ "status": "done" }),
        &f.company_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "done");
    assert!(!json["data"]["completed_at"].is_null());

    // Completing a ticket leaves the "now serving" number where it was.
    let session = QueueSessionRepo::find_by_id(&pool, f.session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.called_number, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn waiting_to_done_is_an_invalid_transition(pool: PgPool) {
    let f = setup(&pool).await;

    let response = patch_json_auth(
        f.app,
        &status_uri(f.ticket_id),
        json!({ "status": "done" }),
        &f.company_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_TRANSITION");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("waiting") && message.contains("done"));

    let ticket = QueueTicketRepo::find_by_id(&pool, f.ticket_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ticket.status, "waiting");
    assert!(ticket.completed_at.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn terminal_ticket_cannot_move(pool: PgPool) {
    let f = setup(&pool).await;

    let cancel = patch_json_auth(
        f.app.clone(),
        &status_uri(f.ticket_id),
        json!({ "status": "cancelled" }),
        &f.company_token,
    )
    .await;
    assert_eq!(cancel.status(), StatusCode::OK);

    let response = patch_json_auth(
        f.app,
        &status_uri(f.ticket_id),
        json!({ "status": "serving" }),
        &f.company_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_TRANSITION");

    let session = QueueSessionRepo::find_by_id(&pool, f.session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.called_number, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_status_is_rejected(pool: PgPool) {
    let f = setup(&pool).await;

    let response = patch_json_auth(
        f.app,
        &status_uri(f.ticket_id),
        json!({ "status": "teleported" }),
        &f.company_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_role_cannot_change_status(pool: PgPool) {
    let f = setup(&pool).await;

    let response = patch_json_auth(
        f.app,
        &status_uri(f.ticket_id),
        json!({ "status": "cancelled" }),
        &f.user_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn other_company_cannot_change_status(pool: PgPool) {
    let f = setup(&pool).await;
    let (_, rival_token) = create_company(&pool, "rival@example.com").await;

    let response = patch_json_auth(
        f.app,
        &status_uri(f.ticket_id),
        json!({ "status": "serving" }),
        &rival_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let ticket = QueueTicketRepo::find_by_id(&pool, f.ticket_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ticket.status, "waiting");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_ticket_is_not_found(pool: PgPool) {
    let (_, company_token) = create_company(&pool, "acme@example.com").await;

    let app = build_test_app(pool);
    let response = patch_json_auth(
        app,
        &status_uri(999_999),
        json!({ "status": "serving" }),
        &company_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_calls_of_one_ticket_admit_one(pool: PgPool) {
    let f = setup(&pool).await;
    let uri = status_uri(f.ticket_id);

    let (a, b) = futures::join!(
        patch_json_auth(f.app.clone(), &uri, json!({ "status": "serving" }), &f.company_token),
        patch_json_auth(f.app.clone(), &uri, json!({ "status": "serving" }), &f.company_token),
    );

    let mut statuses = [a.status(), b.status()];
    statuses.sort_by_key(|s| s.as_u16());
    assert_eq!(statuses, [StatusCode::OK, StatusCode::BAD_REQUEST]);
}
