//! HTTP surface: status mapping and payload shapes.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use internal_chat::domain::Caller;

use crate::common::{body_json, caller, TestApp, OTHER_TENANT};

async fn create_sales(app: &TestApp) -> String {
    let response = app
        .post_json(
            "/api/v1/chat/rooms",
            Some(caller(1)),
            json!({ "kind": "group", "name": "Sales", "member_ids": [2] }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();
    let response = app.get("/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    let app = TestApp::new();
    let response = app.get("/api/v1/chat/rooms", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_foreign_and_non_member_rooms_look_the_same() {
    let app = TestApp::new();
    let room_id = create_sales(&app).await;
    let uri = format!("/api/v1/chat/rooms/{}", room_id);

    let foreign = app.get(&uri, Some(Caller::new(OTHER_TENANT, 1))).await;
    let outsider = app.get(&uri, Some(caller(3))).await;

    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);
    assert_eq!(outsider.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(foreign).await, body_json(outsider).await);
}

#[tokio::test]
async fn test_room_payload() {
    let app = TestApp::new();
    let room_id = create_sales(&app).await;

    let response = app
        .get(&format!("/api/v1/chat/rooms/{}", room_id), Some(caller(2)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["kind"], "group");
    assert_eq!(body["name"], "Sales");
    assert_eq!(body["members"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_direct_room_reuse_returns_ok() {
    let app = TestApp::new();
    let first = app
        .post_json(
            "/api/v1/chat/rooms",
            Some(caller(1)),
            json!({ "kind": "dm", "member_ids": [2] }),
        )
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let first = body_json(first).await;

    let second = app
        .post_json(
            "/api/v1/chat/rooms",
            Some(caller(2)),
            json!({ "kind": "dm", "member_ids": [1] }),
        )
        .await;
    assert_eq!(second.status(), StatusCode::OK);
    let second = body_json(second).await;
    assert_eq!(first["id"], second["id"]);
    assert_eq!(second["created"], false);
}

#[tokio::test]
async fn test_error_statuses() {
    let app = TestApp::new();
    let room_id = create_sales(&app).await;
    let members_uri = format!("/api/v1/chat/rooms/{}/members", room_id);

    // Member without moderation rights.
    let response = app
        .post_json(&members_uri, Some(caller(2)), json!({ "user_id": 3 }))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .post_json(&members_uri, Some(caller(1)), json!({ "user_id": 2 }))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .post_json(
            "/api/v1/chat/rooms",
            Some(caller(1)),
            json!({ "kind": "dm", "member_ids": [2, 3] }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.get("/api/v1/chat/rooms/not-a-uuid", Some(caller(1))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_json(
            &format!("/api/v1/chat/rooms/{}/messages", room_id),
            Some(caller(1)),
            json!({
                "content": "quoted",
                "quote": {
                    "external_account_ref": 3,
                    "external_conversation_ref": 99,
                    "external_message_ref": 1
                }
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_message_flow_over_http() {
    let app = TestApp::new();
    let room_id = create_sales(&app).await;
    let messages_uri = format!("/api/v1/chat/rooms/{}/messages", room_id);

    let response = app
        .post_json(&messages_uri, Some(caller(1)), json!({ "content": "@user2 ping" }))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let sent = body_json(response).await;
    assert_eq!(sent["kind"], "text");

    let response = app
        .get(&format!("{}?limit=10", messages_uri), Some(caller(2)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["messages"][0]["id"], sent["id"]);
    assert_eq!(page["next_cursor"], sent["created_at"]);

    let response = app
        .get("/api/v1/chat/mentions?unread_only=true", Some(caller(2)))
        .await;
    let inbox = body_json(response).await;
    assert_eq!(inbox.as_array().map(Vec::len), Some(1));
    let mention_id = inbox[0]["id"].as_str().unwrap().to_string();

    let response = app
        .post_json(
            &format!("/api/v1/chat/mentions/{}/read", mention_id),
            Some(caller(2)),
            json!({}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .get(&format!("/api/v1/chat/rooms/{}/unread", room_id), Some(caller(2)))
        .await;
    assert_eq!(body_json(response).await["unread_count"], 1);

    let response = app
        .post_json(
            &format!("/api/v1/chat/rooms/{}/read", room_id),
            Some(caller(2)),
            json!({}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .get(&format!("/api/v1/chat/rooms/{}/unread", room_id), Some(caller(2)))
        .await;
    assert_eq!(body_json(response).await["unread_count"], 0);

    let message_uri = format!("/api/v1/chat/messages/{}", sent["id"].as_str().unwrap());
    let response = app.delete(&message_uri, Some(caller(1))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.get(&message_uri, Some(caller(2))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["deleted_at"].is_string());
}

#[tokio::test]
async fn test_next_cursor_fetches_the_following_page() {
    let app = TestApp::new();
    let room_id = create_sales(&app).await;
    let messages_uri = format!("/api/v1/chat/rooms/{}/messages", room_id);

    for content in ["one", "two", "three"] {
        let response = app
            .post_json(&messages_uri, Some(caller(1)), json!({ "content": content }))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .get(&format!("{}?limit=2", messages_uri), Some(caller(2)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;
    assert_eq!(first["messages"][0]["content"], "three");
    assert_eq!(first["messages"][1]["content"], "two");
    let cursor = first["next_cursor"].as_str().unwrap().to_string();
    assert!(cursor.ends_with('Z'));

    let response = app
        .get(
            &format!("{}?limit=2&cursor={}", messages_uri, cursor),
            Some(caller(2)),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let second = body_json(response).await;
    assert_eq!(second["messages"].as_array().map(Vec::len), Some(1));
    assert_eq!(second["messages"][0]["content"], "one");
}
