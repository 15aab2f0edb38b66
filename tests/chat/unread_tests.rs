//! Unread counts and read cursors.

use internal_chat::application::services::{ChatError, ChatService, CreateRoomDto};

use super::text;
use crate::common::{at, caller, TestApp};

#[tokio::test]
async fn test_unread_count_follows_read_cursor() {
    let app = TestApp::new();
    let room_id = app
        .chat
        .create_room(
            caller(1),
            CreateRoomDto {
                kind: "dm".into(),
                name: None,
                member_ids: vec![2],
            },
        )
        .await
        .unwrap()
        .room
        .room
        .id;

    app.store.set_time(at(10));
    app.chat.send_message(caller(2), room_id, text("m1")).await.unwrap();
    app.store.set_time(at(20));
    app.chat.send_message(caller(2), room_id, text("m2")).await.unwrap();

    assert_eq!(app.chat.unread_count(caller(1), room_id).await.unwrap(), 2);

    app.store.set_time(at(25));
    let cursor = app.chat.mark_room_read(caller(1), room_id).await.unwrap();
    assert_eq!(cursor, at(25));
    assert_eq!(app.chat.unread_count(caller(1), room_id).await.unwrap(), 0);

    app.store.set_time(at(30));
    app.chat.send_message(caller(2), room_id, text("m3")).await.unwrap();
    assert_eq!(app.chat.unread_count(caller(1), room_id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_own_and_deleted_messages_are_not_unread() {
    let app = TestApp::new();
    let room_id = app
        .chat
        .create_room(
            caller(1),
            CreateRoomDto {
                kind: "group".into(),
                name: Some("Ops".into()),
                member_ids: vec![2],
            },
        )
        .await
        .unwrap()
        .room
        .room
        .id;

    app.chat.send_message(caller(1), room_id, text("mine")).await.unwrap();
    let theirs = app
        .chat
        .send_message(caller(2), room_id, text("theirs"))
        .await
        .unwrap()
        .message;
    app.chat.send_message(caller(2), room_id, text("kept")).await.unwrap();

    assert_eq!(app.chat.unread_count(caller(1), room_id).await.unwrap(), 2);
    assert_eq!(app.chat.unread_count(caller(2), room_id).await.unwrap(), 1);

    app.chat.delete_message(caller(2), theirs.id).await.unwrap();
    assert_eq!(app.chat.unread_count(caller(1), room_id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_read_cursor_requires_membership() {
    let app = TestApp::new();
    let room_id = app
        .chat
        .create_room(
            caller(1),
            CreateRoomDto {
                kind: "group".into(),
                name: Some("Ops".into()),
                member_ids: vec![],
            },
        )
        .await
        .unwrap()
        .room
        .room
        .id;

    let err = app.chat.mark_room_read(caller(2), room_id).await.unwrap_err();
    assert!(matches!(err, ChatError::AccessDenied));
    let err = app.chat.unread_count(caller(2), room_id).await.unwrap_err();
    assert!(matches!(err, ChatError::AccessDenied));
}
