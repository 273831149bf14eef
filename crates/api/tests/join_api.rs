//! Integration tests for `POST /api/v1/rooms/join`.

mod common;

use antrean_core::intake::FieldType;
use antrean_db::models::form_field::CreateFormField;
use antrean_db::models::room::UpdateRoom;
use antrean_db::repositories::{QueueSessionRepo, RoomRepo};
use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_company, create_room, create_user, join_as, post_json,
    post_json_auth,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn first_join_issues_number_one(pool: PgPool) {
    let (company, _) = create_company(&pool, "acme@example.com").await;
    let room = create_room(&pool, company.id, "desk-key-1").await;
    let (user, token) = create_user(&pool, "bob@example.com").await;
    let name_field = room.fields[0].id;

    let app = build_test_app(pool.clone());
    let response = join_as(app, &token, "desk-key-1", name_field).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let ticket = &json["data"]["ticket"];
    assert_eq!(json["data"]["already_joined"], false);
    assert_eq!(ticket["number"], 1);
    assert_eq!(ticket["status"], "waiting");
    assert_eq!(ticket["user_id"], user.id);
    assert!(ticket["called_at"].is_null());
    assert_eq!(ticket["answers"].as_array().unwrap().len(), 1);
    assert_eq!(ticket["answers"][0]["field_id"], name_field);
    assert_eq!(ticket["answers"][0]["label"], "Name");
    assert_eq!(ticket["answers"][0]["value"], "Bob");

    let session = QueueSessionRepo::find_active_for_room(&pool, room.room.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.current_number, 1);
    assert_eq!(session.called_number, 0);
    assert_eq!(ticket["session_id"], session.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rejoin_returns_existing_ticket(pool: PgPool) {
    let (company, _) = create_company(&pool, "acme@example.com").await;
    let room = create_room(&pool, company.id, "desk-key-1").await;
    let (_, token) = create_user(&pool, "bob@example.com").await;
    let name_field = room.fields[0].id;

    let app = build_test_app(pool.clone());
    let first = body_json(join_as(app.clone(), &token, "desk-key-1", name_field).await).await;

    let response = join_as(app, &token, "desk-key-1", name_field).await;
    assert_eq!(response.status(), StatusCode::OK);
    let second = body_json(response).await;

    assert_eq!(second["data"]["already_joined"], true);
    assert_eq!(second["data"]["ticket"]["id"], first["data"]["ticket"]["id"]);
    assert_eq!(second["data"]["ticket"]["number"], 1);
    assert_eq!(second["data"]["ticket"]["answers"][0]["value"], "Bob");

    let session = QueueSessionRepo::find_active_for_room(&pool, room.room.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.current_number, 1, "rejoin must not consume a number");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_required_answer_is_rejected(pool: PgPool) {
    let (company, _) = create_company(&pool, "acme@example.com").await;
    let room = create_room(&pool, company.id, "desk-key-1").await;
    let (_, token) = create_user(&pool, "bob@example.com").await;

    let body = json!({
        "secret_key": "desk-key-1",
        "answers": [{ "field_id": room.fields[0].id, "value": "   " }],
    });
    let app = build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/rooms/join", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("Name"));

    // No ticket, and the counter was never touched.
    let session = QueueSessionRepo::find_active_for_room(&pool, room.room.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.current_number, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn answer_for_another_rooms_field_is_rejected(pool: PgPool) {
    let (company, _) = create_company(&pool, "acme@example.com").await;
    let room = create_room(&pool, company.id, "desk-key-1").await;
    let other = create_room(&pool, company.id, "desk-key-2").await;
    let (_, token) = create_user(&pool, "bob@example.com").await;

    let body = json!({
        "secret_key": "desk-key-1",
        "answers": [
            { "field_id": room.fields[0].id, "value": "Bob" },
            { "field_id": other.fields[1].id, "value": "hello" },
        ],
    });
    let app = build_test_app(pool);
    let response = post_json_auth(app, "/api/v1/rooms/join", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Unknown form field"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn join_requires_authentication(pool: PgPool) {
    let (company, _) = create_company(&pool, "acme@example.com").await;
    create_room(&pool, company.id, "desk-key-1").await;

    let app = build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/rooms/join",
        json!({ "secret_key": "desk-key-1", "answers": [] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn company_cannot_join(pool: PgPool) {
    let (company, company_token) = create_company(&pool, "acme@example.com").await;
    let room = create_room(&pool, company.id, "desk-key-1").await;

    let app = build_test_app(pool);
    let response = join_as(app, &company_token, "desk-key-1", room.fields[0].id).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_secret_key_is_rejected(pool: PgPool) {
    let (_, token) = create_user(&pool, "bob@example.com").await;

    let app = build_test_app(pool);
    let response = post_json_auth(app, "/api/v1/rooms/join", json!({ "answers": [] }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("secret_key"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_secret_key_is_not_found(pool: PgPool) {
    let (_, token) = create_user(&pool, "bob@example.com").await;

    let app = build_test_app(pool);
    let response = join_as(app, &token, "no-such-key", 1).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert!(!json["error"].as_str().unwrap().contains("no-such-key"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inactive_room_is_not_found(pool: PgPool) {
    let (company, _) = create_company(&pool, "acme@example.com").await;
    let room = create_room(&pool, company.id, "desk-key-1").await;
    let (_, token) = create_user(&pool, "bob@example.com").await;

    let deactivate = UpdateRoom {
        name: None,
        description: None,
        is_active: Some(false),
        fields: None,
    };
    RoomRepo::update_with_fields(&pool, room.room.id, &deactivate)
        .await
        .unwrap()
        .unwrap();

    let app = build_test_app(pool.clone());
    let response = join_as(app, &token, "desk-key-1", room.fields[0].id).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert!(QueueSessionRepo::find_active_for_room(&pool, room.room.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_joins_get_distinct_consecutive_numbers(pool: PgPool) {
    let (company, _) = create_company(&pool, "acme@example.com").await;
    let room = create_room(&pool, company.id, "desk-key-1").await;
    let name_field = room.fields[0].id;

    let mut tokens = Vec::new();
    for i in 0..5 {
        let (_, token) = create_user(&pool, &format!("joiner{i}@example.com")).await;
        tokens.push(token);
    }

    let app = build_test_app(pool.clone());
    let responses = futures::future::join_all(
        tokens
            .iter()
            .map(|token| join_as(app.clone(), token, "desk-key-1", name_field)),
    )
    .await;

    let mut numbers = Vec::new();
    let mut sessions = Vec::new();
    for response in responses {
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        numbers.push(json["data"]["ticket"]["number"].as_i64().unwrap());
        sessions.push(json["data"]["ticket"]["session_id"].as_i64().unwrap());
    }
    numbers.sort_unstable();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    sessions.dedup();
    assert_eq!(sessions.len(), 1, "all joiners share one active session");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_duplicate_join_yields_one_ticket(pool: PgPool) {
    let (company, _) = create_company(&pool, "acme@example.com").await;
    let room = create_room(&pool, company.id, "desk-key-1").await;
    let (_, token) = create_user(&pool, "bob@example.com").await;
    let name_field = room.fields[0].id;

    let app = build_test_app(pool.clone());
    let (a, b) = futures::join!(
        join_as(app.clone(), &token, "desk-key-1", name_field),
        join_as(app.clone(), &token, "desk-key-1", name_field),
    );

    let mut statuses = [a.status(), b.status()];
    statuses.sort_by_key(|s| s.as_u16());
    assert_eq!(statuses, [StatusCode::OK, StatusCode::CREATED]);

    let a = body_json(a).await;
    let b = body_json(b).await;
    assert_eq!(a["data"]["ticket"]["id"], b["data"]["ticket"]["id"]);

    let session = QueueSessionRepo::find_active_for_room(&pool, room.room.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.current_number, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn closed_session_starts_numbering_again(pool: PgPool) {
    let (company, _) = create_company(&pool, "acme@example.com").await;
    let room = create_room(&pool, company.id, "desk-key-1").await;
    let (_, bob) = create_user(&pool, "bob@example.com").await;
    let name_field = room.fields[0].id;

    let app = build_test_app(pool.clone());
    let first = body_json(join_as(app.clone(), &bob, "desk-key-1", name_field).await).await;

    assert!(QueueSessionRepo::close_active_for_room(&pool, room.room.id)
        .await
        .unwrap());

    let response = join_as(app, &bob, "desk-key-1", name_field).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let second = body_json(response).await;

    assert_eq!(second["data"]["ticket"]["number"], 1);
    assert_ne!(
        second["data"]["ticket"]["session_id"],
        first["data"]["ticket"]["session_id"]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn join_racing_a_form_edit_never_fails_with_500(pool: PgPool) {
    let (company, _) = create_company(&pool, "acme@example.com").await;
    let room = create_room(&pool, company.id, "desk-key-1").await;
    let (_, bob) = create_user(&pool, "bob@example.com").await;
    let name_field = room.fields[0].id;
    let app = build_test_app(pool.clone());

    let edit = UpdateRoom {
        name: None,
        description: None,
        is_active: None,
        fields: Some(vec![CreateFormField {
            label: "Full name".to_string(),
            field_type: FieldType::Text,
            required: true,
        }]),
    };

    let (response, edited) = futures::join!(
        join_as(app, &bob, "desk-key-1", name_field),
        RoomRepo::update_with_fields(&pool, room.room.id, &edit),
    );
    edited.unwrap().unwrap();

    // Either the join committed first, or it saw the new field set and the
    // old field id is rejected as unknown.
    let status = response.status();
    assert!(
        status == StatusCode::CREATED || status == StatusCode::BAD_REQUEST,
        "unexpected status {status}"
    );
    if status == StatusCode::CREATED {
        let json = body_json(response).await;
        assert_eq!(json["data"]["ticket"]["answers"][0]["label"], "Name");
    }
}
