//! Timeline behavior: membership gate, pagination, soft delete.

use pretty_assertions::assert_eq;
use uuid::Uuid;

use internal_chat::application::services::{
    ChatError, ChatService, CreateRoomDto, MessageQueryDto, SendMessageDto,
};
use internal_chat::domain::{AuditAction, Caller, MessageKind};

use super::text;
use crate::common::{at, caller, TestApp, OTHER_TENANT, TENANT};

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
async fn test_membership_gate() {
    let app = TestApp::new();
    let room_id = sales_room(&app).await;

    let err = app
        .chat
        .list_messages(caller(3), room_id, MessageQueryDto::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::AccessDenied));

    let err = app
        .chat
        .send_message(caller(3), room_id, text("let me in"))
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::AccessDenied));

    let err = app
        .chat
        .send_message(Caller::new(OTHER_TENANT, 1), room_id, text("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::NotFound));
}

#[tokio::test]
async fn test_send_validates_content_and_kind() {
    let app = TestApp::new();
    let room_id = sales_room(&app).await;

    let err = app
        .chat
        .send_message(caller(1), room_id, text("   "))
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::Validation(_)));

    let err = app
        .chat
        .send_message(caller(1), room_id, text(&"x".repeat(4001)))
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::Validation(_)));

    let err = app
        .chat
        .send_message(
            caller(1),
            room_id,
            SendMessageDto {
                content: "hi".into(),
                kind: Some("sticker".into()),
                quote: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::Validation(_)));

    let sent = app
        .chat
        .send_message(
            caller(1),
            room_id,
            SendMessageDto {
                content: "  deployed v2  ".into(),
                kind: Some("system".into()),
                quote: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(sent.message.content, "deployed v2");
    assert_eq!(sent.message.kind, MessageKind::System);
}

#[tokio::test]
async fn test_content_is_stored_verbatim() {
    let app = TestApp::new();
    let room_id = sales_room(&app).await;
    let content = "    fn main() {}\n";

    let sent = app
        .chat
        .send_message(caller(1), room_id, text(content))
        .await
        .unwrap();
    assert_eq!(sent.message.content, content);

    let fetched = app
        .chat
        .get_message(caller(2), sent.message.id)
        .await
        .unwrap();
    assert_eq!(fetched.message.content, content);
}

#[tokio::test]
async fn test_pagination_is_newest_first_with_cursor() {
    let app = TestApp::new();
    let room_id = sales_room(&app).await;

    for i in 0..5 {
        app.store.set_time(at(100 + i * 10));
        app.chat
            .send_message(caller(1 + i % 2), room_id, text(&format!("m{}", i)))
            .await
            .unwrap();
    }

    let first = app
        .chat
        .list_messages(
            caller(1),
            room_id,
            MessageQueryDto {
                limit: Some(2),
                before: None,
            },
        )
        .await
        .unwrap();
    let contents: Vec<&str> = first.messages.iter().map(|m| m.message.content.as_str()).collect();
    assert_eq!(contents, vec!["m4", "m3"]);
    assert_eq!(first.next_cursor, Some(at(130)));

    // A message arriving between polls does not shift older pages.
    app.store.set_time(at(500));
    app.chat
        .send_message(caller(2), room_id, text("late"))
        .await
        .unwrap();

    let second = app
        .chat
        .list_messages(
            caller(1),
            room_id,
            MessageQueryDto {
                limit: Some(2),
                before: first.next_cursor,
            },
        )
        .await
        .unwrap();
    let contents: Vec<&str> = second.messages.iter().map(|m| m.message.content.as_str()).collect();
    assert_eq!(contents, vec!["m2", "m1"]);

    let third = app
        .chat
        .list_messages(
            caller(1),
            room_id,
            MessageQueryDto {
                limit: Some(2),
                before: second.next_cursor,
            },
        )
        .await
        .unwrap();
    let contents: Vec<&str> = third.messages.iter().map(|m| m.message.content.as_str()).collect();
    assert_eq!(contents, vec!["m0"]);

    let last = app
        .chat
        .list_messages(
            caller(1),
            room_id,
            MessageQueryDto {
                limit: Some(2),
                before: third.next_cursor,
            },
        )
        .await
        .unwrap();
    assert!(last.messages.is_empty());
    assert_eq!(last.next_cursor, None);
}

#[tokio::test]
async fn test_page_size_is_capped() {
    let app = TestApp::new();
    let room_id = sales_room(&app).await;
    for i in 0..120 {
        app.chat
            .send_message(caller(1), room_id, text(&format!("m{}", i)))
            .await
            .unwrap();
    }

    let page = app
        .chat
        .list_messages(
            caller(1),
            room_id,
            MessageQueryDto {
                limit: Some(1000),
                before: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(page.messages.len(), 100);

    let page = app
        .chat
        .list_messages(caller(1), room_id, MessageQueryDto::default())
        .await
        .unwrap();
    assert_eq!(page.messages.len(), 50);
}

#[tokio::test]
async fn test_soft_delete_visibility() {
    let app = TestApp::new();
    let room_id = sales_room(&app).await;

    let keep = app
        .chat
        .send_message(caller(2), room_id, text("keep"))
        .await
        .unwrap()
        .message;
    let doomed = app
        .chat
        .send_message(caller(2), room_id, text("oops"))
        .await
        .unwrap()
        .message;

    app.chat.delete_message(caller(2), doomed.id).await.unwrap();

    let page = app
        .chat
        .list_messages(caller(1), room_id, MessageQueryDto::default())
        .await
        .unwrap();
    let ids: Vec<Uuid> = page.messages.iter().map(|m| m.message.id).collect();
    assert_eq!(ids, vec![keep.id]);

    let fetched = app.chat.get_message(caller(1), doomed.id).await.unwrap();
    assert!(fetched.message.deleted_at.is_some());
    let deleted_at = fetched.message.deleted_at;

    // Retrying is a no-op and keeps the first timestamp.
    app.chat.delete_message(caller(2), doomed.id).await.unwrap();
    let again = app.chat.get_message(caller(1), doomed.id).await.unwrap();
    assert_eq!(again.message.deleted_at, deleted_at);

    let deletions = app
        .store
        .audit_entries(TENANT)
        .into_iter()
        .filter(|e| e.action == AuditAction::MessageDeleted)
        .count();
    assert_eq!(deletions, 1);
}

#[tokio::test]
async fn test_delete_rights() {
    let app = TestApp::new();
    let room_id = sales_room(&app).await;

    let owners = app
        .chat
        .send_message(caller(1), room_id, text("from the owner"))
        .await
        .unwrap()
        .message;
    let members = app
        .chat
        .send_message(caller(2), room_id, text("from a member"))
        .await
        .unwrap()
        .message;

    let err = app.chat.delete_message(caller(2), owners.id).await.unwrap_err();
    assert!(matches!(err, ChatError::PermissionDenied(_)));

    let err = app.chat.delete_message(caller(3), members.id).await.unwrap_err();
    assert!(matches!(err, ChatError::AccessDenied));

    let err = app
        .chat
        .delete_message(Caller::new(OTHER_TENANT, 1), members.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::NotFound));

    app.chat.delete_message(caller(1), members.id).await.unwrap();
}

#[tokio::test]
async fn test_rejoined_member_sees_full_timeline() {
    let app = TestApp::new();
    let room_id = sales_room(&app).await;

    app.chat.remove_member(caller(2), room_id, 2).await.unwrap();
    app.chat
        .send_message(caller(1), room_id, text("while you were away"))
        .await
        .unwrap();
    app.chat
        .add_member(
            caller(1),
            room_id,
            internal_chat::application::services::AddMemberDto {
                user_id: 2,
                role: None,
            },
        )
        .await
        .unwrap();

    let page = app
        .chat
        .list_messages(caller(2), room_id, MessageQueryDto::default())
        .await
        .unwrap();
    assert_eq!(page.messages.len(), 1);
    assert_eq!(page.messages[0].message.content, "while you were away");
}
