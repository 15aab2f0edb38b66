//! Presentation Layer
//!
//! Thin HTTP adapter over the chat service.

pub mod http;
pub mod middleware;
