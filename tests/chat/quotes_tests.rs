//! Quoting external conversations.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use internal_chat::application::services::{
    ChatError, ChatService, CreateRoomDto, MessageQueryDto, QuoteRequestDto, SendMessageDto,
};

use super::text;
use crate::common::{caller, TestApp, QUOTE_TIMEOUT};

const REQUEST: QuoteRequestDto = QuoteRequestDto {
    external_account_ref: 3,
    external_conversation_ref: 44,
    external_message_ref: 555,
};

async fn sales_room(app: &TestApp) -> Uuid {
    app.chat
        .create_room(
            caller(1),
            CreateRoomDto {
                kind: "group".into(),
                name: Some("Sales".into()),
                member_ids: vec![2],
            },
        )
        .await
        .unwrap()
        .room
        .room
        .id
}

#[tokio::test]
async fn test_quote_snapshot_is_attached_and_listed() {
    let app = TestApp::new();
    app.conversations.add_conversation(3, 44);
    let room_id = sales_room(&app).await;

    let sent = app
        .chat
        .send_message(
            caller(1),
            room_id,
            SendMessageDto {
                content: "customer asks about refunds".into(),
                kind: None,
                quote: Some(REQUEST),
            },
        )
        .await
        .unwrap();

    let quote = sent.quote.expect("quote attached");
    assert_eq!(quote.message_id, sent.message.id);
    assert_eq!(quote.external_message_ref, 555);
    assert_eq!(quote.snapshot_blob["conversation"]["id"], json!(44));
    assert_eq!(quote.snapshot_blob["target_message_id"], json!(555));
    assert_eq!(quote.snapshot_blob["messages"][0]["id"], json!(555));

    app.chat
        .send_message(caller(2), room_id, text("on it"))
        .await
        .unwrap();

    let page = app
        .chat
        .list_messages(caller(2), room_id, MessageQueryDto::default())
        .await
        .unwrap();
    assert_eq!(page.messages.len(), 2);
    assert!(page.messages[0].quote.is_none());
    assert_eq!(
        page.messages[1].quote.as_ref().map(|q| q.id),
        Some(quote.id)
    );
}

#[tokio::test]
async fn test_failed_fetch_leaves_no_quote() {
    let app = TestApp::new();
    let room_id = sales_room(&app).await;
    let message = app
        .chat
        .send_message(caller(1), room_id, text("see conversation"))
        .await
        .unwrap()
        .message;

    let err = app
        .chat
        .create_quote(caller(1), message.id, REQUEST)
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::ExternalService(_)));
    assert_eq!(app.store.quote_count(), 0);
}

#[tokio::test]
async fn test_quote_on_send_failure_keeps_message() {
    let app = TestApp::new();
    let room_id = sales_room(&app).await;

    let err = app
        .chat
        .send_message(
            caller(1),
            room_id,
            SendMessageDto {
                content: "quoted".into(),
                kind: None,
                quote: Some(REQUEST),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::ExternalService(_)));

    let page = app
        .chat
        .list_messages(caller(1), room_id, MessageQueryDto::default())
        .await
        .unwrap();
    assert_eq!(page.messages.len(), 1);
    assert!(page.messages[0].quote.is_none());
    assert_eq!(app.store.quote_count(), 0);
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let app = TestApp::new();
    app.conversations.add_conversation(3, 44);
    app.conversations.set_delay(QUOTE_TIMEOUT + Duration::from_millis(300));
    let room_id = sales_room(&app).await;
    let message = app
        .chat
        .send_message(caller(1), room_id, text("slow"))
        .await
        .unwrap()
        .message;

    let err = app
        .chat
        .create_quote(caller(1), message.id, REQUEST)
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::ExternalService(_)));
    assert_eq!(app.store.quote_count(), 0);
}

#[tokio::test]
async fn test_one_quote_per_message() {
    let app = TestApp::new();
    app.conversations.add_conversation(3, 44);
    let room_id = sales_room(&app).await;
    let message = app
        .chat
        .send_message(caller(1), room_id, text("quote me"))
        .await
        .unwrap()
        .message;

    app.chat
        .create_quote(caller(2), message.id, REQUEST)
        .await
        .unwrap();
    let err = app
        .chat
        .create_quote(caller(1), message.id, REQUEST)
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::Conflict(_)));
    assert_eq!(app.store.quote_count(), 1);
}

#[tokio::test]
async fn test_quote_requires_membership() {
    let app = TestApp::new();
    app.conversations.add_conversation(3, 44);
    let room_id = sales_room(&app).await;
    let message = app
        .chat
        .send_message(caller(1), room_id, text("private"))
        .await
        .unwrap()
        .message;

    let err = app
        .chat
        .create_quote(caller(4), message.id, REQUEST)
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::AccessDenied));
    assert_eq!(app.conversations.calls(), 0);
}
