//! Mention resolution and the mention inbox.

use pretty_assertions::assert_eq;
use uuid::Uuid;

use internal_chat::application::services::{ChatError, ChatService, CreateRoomDto};
use internal_chat::domain::Caller;

use super::text;
use crate::common::{caller, TestApp, OTHER_TENANT};

async fn room_with(app: &TestApp, owner: i64, members: Vec<i64>) -> Uuid {
    app.chat
        .create_room(
            caller(owner),
            CreateRoomDto {
                kind: "group".into(),
                name: Some("Sales".into()),
                member_ids: members,
            },
        )
        .await
        .unwrap()
        .room
        .room
        .id
}

#[tokio::test]
async fn test_end_to_end_mention_inbox() {
    let app = TestApp::new();
    let room_id = room_with(&app, 1, vec![2]).await;

    let sent = app
        .chat
        .send_message(caller(1), room_id, text("@user2 ping"))
        .await
        .unwrap()
        .message;

    let inbox = app.chat.list_mentions(caller(2), true).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].message_id, sent.id);
    assert_eq!(inbox[0].room_id, room_id);
    assert_eq!(inbox[0].mentioned_user_id, 2);

    app.chat.mark_mention_read(caller(2), inbox[0].id).await.unwrap();

    let unread = app.chat.list_mentions(caller(2), true).await.unwrap();
    assert!(unread.is_empty());

    let all = app.chat.list_mentions(caller(2), false).await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].read_at.is_some());
}

#[tokio::test]
async fn test_repeated_handle_creates_one_mention() {
    let app = TestApp::new();
    let room_id = room_with(&app, 1, vec![3]).await;

    let sent = app
        .chat
        .send_message(caller(1), room_id, text("@alice @alice hi"))
        .await
        .unwrap()
        .message;

    let mentions = app.store.mentions_for_message(sent.id);
    assert_eq!(mentions.len(), 1);
    assert_eq!(mentions[0].mentioned_user_id, 3);
}

#[tokio::test]
async fn test_handles_by_name_and_email() {
    let app = TestApp::new();
    let room_id = room_with(&app, 1, vec![3, 4]).await;

    let sent = app
        .chat
        .send_message(
            caller(1),
            room_id,
            text("@BobStone and @bob, also @ALICE. and @nobody and @user1"),
        )
        .await
        .unwrap()
        .message;

    let mut users: Vec<i64> = app
        .store
        .mentions_for_message(sent.id)
        .iter()
        .map(|m| m.mentioned_user_id)
        .collect();
    users.sort();
    // The sender's own handle is skipped.
    assert_eq!(users, vec![3, 4]);
}

#[tokio::test]
async fn test_send_succeeds_when_directory_fails() {
    let app = TestApp::new();
    let room_id = room_with(&app, 1, vec![2]).await;
    app.store.fail_directory(true);

    let sent = app
        .chat
        .send_message(caller(1), room_id, text("@user2 ping"))
        .await
        .unwrap()
        .message;
    assert!(app.store.mentions_for_message(sent.id).is_empty());
}

#[tokio::test]
async fn test_mark_read_is_scoped_to_recipient() {
    let app = TestApp::new();
    let room_id = room_with(&app, 1, vec![2, 3]).await;
    app.chat
        .send_message(caller(1), room_id, text("@user2 ping"))
        .await
        .unwrap();
    let mention = app.chat.list_mentions(caller(2), true).await.unwrap()[0].clone();

    let err = app
        .chat
        .mark_mention_read(caller(3), mention.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::NotFound));

    let err = app
        .chat
        .mark_mention_read(Caller::new(OTHER_TENANT, 2), mention.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::NotFound));

    app.chat.mark_mention_read(caller(2), mention.id).await.unwrap();
    let first_read = app.chat.list_mentions(caller(2), false).await.unwrap()[0].read_at;

    app.chat.mark_mention_read(caller(2), mention.id).await.unwrap();
    let second_read = app.chat.list_mentions(caller(2), false).await.unwrap()[0].read_at;
    assert_eq!(first_read, second_read);
}

#[tokio::test]
async fn test_inbox_is_newest_first() {
    let app = TestApp::new();
    let room_id = room_with(&app, 1, vec![2]).await;
    let older = app
        .chat
        .send_message(caller(1), room_id, text("@user2 one"))
        .await
        .unwrap()
        .message;
    let newer = app
        .chat
        .send_message(caller(1), room_id, text("@user2 two"))
        .await
        .unwrap()
        .message;

    let inbox: Vec<Uuid> = app
        .chat
        .list_mentions(caller(2), false)
        .await
        .unwrap()
        .iter()
        .map(|m| m.message_id)
        .collect();
    assert_eq!(inbox, vec![newer.id, older.id]);
}
