//! Message Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{CreateQuoteRequest, MessageListQuery, SendMessageRequest};
use crate::application::dto::response::{
    timestamp, MessagePageResponse, MessageResponse, QuoteResponse, ReadCursorResponse,
    UnreadResponse,
};
use crate::domain::Caller;
use crate::presentation::http::extractors::parse_uuid;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

/// Page through a room's timeline, newest first
pub async fn list_messages(
    State(state): State<AppState>,
    caller: Caller,
    Path(room_id): Path<String>,
    Query(query): Query<MessageListQuery>,
) -> Result<Json<MessagePageResponse>, AppError> {
    let room_id = parse_uuid(&room_id, "room")?;
    let page = state.chat.list_messages(caller, room_id, query.into()).await?;
    Ok(Json(page.into()))
}

/// Send a message to a room
pub async fn send_message(
    State(state): State<AppState>,
    caller: Caller,
    Path(room_id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let room_id = parse_uuid(&room_id, "room")?;
    body.validate().map_err(validation_error)?;

    let message = state.chat.send_message(caller, room_id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(message.into())))
}

/// Get a single message, deleted or not
pub async fn get_message(
    State(state): State<AppState>,
    caller: Caller,
    Path(message_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let message_id = parse_uuid(&message_id, "message")?;
    let message = state.chat.get_message(caller, message_id).await?;
    Ok(Json(message.into()))
}

/// Soft-delete a message
pub async fn delete_message(
    State(state): State<AppState>,
    caller: Caller,
    Path(message_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let message_id = parse_uuid(&message_id, "message")?;
    state.chat.delete_message(caller, message_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Attach a conversation quote to a message
pub async fn create_quote(
    State(state): State<AppState>,
    caller: Caller,
    Path(message_id): Path<String>,
    Json(body): Json<CreateQuoteRequest>,
) -> Result<(StatusCode, Json<QuoteResponse>), AppError> {
    let message_id = parse_uuid(&message_id, "message")?;
    body.validate().map_err(validation_error)?;

    let quote = state.chat.create_quote(caller, message_id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(quote.into())))
}

/// Mark the room read up to now
pub async fn mark_room_read(
    State(state): State<AppState>,
    caller: Caller,
    Path(room_id): Path<String>,
) -> Result<Json<ReadCursorResponse>, AppError> {
    let room_id = parse_uuid(&room_id, "room")?;
    let cursor = state.chat.mark_room_read(caller, room_id).await?;
    Ok(Json(ReadCursorResponse {
        room_id: room_id.to_string(),
        last_read_at: timestamp(cursor),
    }))
}

/// Unread count for the caller
pub async fn unread_count(
    State(state): State<AppState>,
    caller: Caller,
    Path(room_id): Path<String>,
) -> Result<Json<UnreadResponse>, AppError> {
    let room_id = parse_uuid(&room_id, "room")?;
    let unread_count = state.chat.unread_count(caller, room_id).await?;
    Ok(Json(UnreadResponse {
        room_id: room_id.to_string(),
        unread_count,
    }))
}
