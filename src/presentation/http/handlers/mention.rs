//! Mention Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::MentionQuery;
use crate::application::dto::response::MentionResponse;
use crate::domain::Caller;
use crate::presentation::http::extractors::parse_uuid;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// The caller's mention inbox, newest first
pub async fn list_mentions(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<MentionQuery>,
) -> Result<Json<Vec<MentionResponse>>, AppError> {
    let mentions = state.chat.list_mentions(caller, query.unread_only).await?;
    Ok(Json(mentions.into_iter().map(MentionResponse::from).collect()))
}

/// Mark one mention read
pub async fn mark_mention_read(
    State(state): State<AppState>,
    caller: Caller,
    Path(mention_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mention_id = parse_uuid(&mention_id, "mention")?;
    state.chat.mark_mention_read(caller, mention_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
