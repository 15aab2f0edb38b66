//! HTTP Handlers
//!
//! Each handler extracts the caller, validates the body, calls the chat
//! service and maps the result to a response DTO.

pub mod health;
pub mod mention;
pub mod message;
pub mod room;
