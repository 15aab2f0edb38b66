//! Chat service errors.

use crate::domain::ConversationError;
use crate::shared::error::AppError;

/// Error kinds returned by every chat operation.
///
/// `NotFound` covers both absent entities and entities of another tenant.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Not found")]
    NotFound,

    #[error("Access denied: not a member of this room")]
    AccessDenied,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal error")]
    Internal,
}

impl ChatError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self::PermissionDenied(message.into())
    }
}

/// Store errors become chat errors here; driver detail is logged and dropped.
impl From<AppError> for ChatError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound(_) => ChatError::NotFound,
            AppError::AccessDenied(_) => ChatError::AccessDenied,
            AppError::Conflict(msg) => ChatError::Conflict(msg),
            AppError::Validation(msg) | AppError::BadRequest(msg) => ChatError::Validation(msg),
            AppError::Forbidden(msg) => ChatError::PermissionDenied(msg),
            AppError::ExternalService(msg) => ChatError::ExternalService(msg),
            other => {
                tracing::error!(error = %other, "chat store failure");
                ChatError::Internal
            }
        }
    }
}

impl From<ConversationError> for ChatError {
    fn from(err: ConversationError) -> Self {
        ChatError::ExternalService(err.to_string())
    }
}

/// Transport mapping. Access-denied stays distinct here and is rendered as
/// not-found by `AppError`'s response.
impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::NotFound => AppError::NotFound("Not found".into()),
            ChatError::AccessDenied => AppError::AccessDenied("Not a member".into()),
            ChatError::PermissionDenied(msg) => AppError::Forbidden(msg),
            ChatError::Validation(msg) => AppError::Validation(msg),
            ChatError::Conflict(msg) => AppError::Conflict(msg),
            ChatError::ExternalService(msg) => AppError::ExternalService(msg),
            ChatError::Internal => AppError::Internal("chat operation failed".into()),
        }
    }
}
