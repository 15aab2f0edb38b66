//! Room Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{AddMemberRequest, CreateRoomRequest};
use crate::application::dto::response::{
    CreatedRoomResponse, MemberResponse, RoomResponse, RoomSummaryResponse,
};
use crate::domain::Caller;
use crate::presentation::http::extractors::parse_uuid;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

/// List the caller's rooms
pub async fn list_rooms(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<RoomSummaryResponse>>, AppError> {
    let rooms = state.chat.list_rooms(caller).await?;
    Ok(Json(rooms.into_iter().map(RoomSummaryResponse::from).collect()))
}

/// Create a room. An existing direct room is returned with 200.
pub async fn create_room(
    State(state): State<AppState>,
    caller: Caller,
    Json(body): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<CreatedRoomResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let result = state.chat.create_room(caller, body.into()).await?;
    let status = if result.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(result.into())))
}

/// Get a room with its members
pub async fn get_room(
    State(state): State<AppState>,
    caller: Caller,
    Path(room_id): Path<String>,
) -> Result<Json<RoomResponse>, AppError> {
    let room_id = parse_uuid(&room_id, "room")?;
    let room = state.chat.get_room(caller, room_id).await?;
    Ok(Json(room.into()))
}

/// Add a member to a group room
pub async fn add_member(
    State(state): State<AppState>,
    caller: Caller,
    Path(room_id): Path<String>,
    Json(body): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), AppError> {
    let room_id = parse_uuid(&room_id, "room")?;
    body.validate().map_err(validation_error)?;

    let membership = state.chat.add_member(caller, room_id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(membership.into())))
}

/// Remove a member from a group room, or leave it
pub async fn remove_member(
    State(state): State<AppState>,
    caller: Caller,
    Path((room_id, user_id)): Path<(String, i64)>,
) -> Result<StatusCode, AppError> {
    let room_id = parse_uuid(&room_id, "room")?;
    state.chat.remove_member(caller, room_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
