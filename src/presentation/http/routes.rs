//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1/chat", chat_routes())
        .route("/health", get(handlers::health::health_check))
        .with_state(state)
}

/// Chat routes. The caller comes from gateway headers on every request.
fn chat_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/rooms",
            get(handlers::room::list_rooms).post(handlers::room::create_room),
        )
        .route("/rooms/{room_id}", get(handlers::room::get_room))
        .route("/rooms/{room_id}/members", post(handlers::room::add_member))
        .route(
            "/rooms/{room_id}/members/{user_id}",
            delete(handlers::room::remove_member),
        )
        .route(
            "/rooms/{room_id}/messages",
            get(handlers::message::list_messages).post(handlers::message::send_message),
        )
        .route("/rooms/{room_id}/read", post(handlers::message::mark_room_read))
        .route("/rooms/{room_id}/unread", get(handlers::message::unread_count))
        .route(
            "/messages/{message_id}",
            get(handlers::message::get_message).delete(handlers::message::delete_message),
        )
        .route(
            "/messages/{message_id}/quote",
            post(handlers::message::create_quote),
        )
        .route("/mentions", get(handlers::mention::list_mentions))
        .route(
            "/mentions/{mention_id}/read",
            post(handlers::mention::mark_mention_read),
        )
}
