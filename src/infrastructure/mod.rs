//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - Database repositories (PostgreSQL)
//! - The external conversation service client (HTTP)

pub mod conversations;
pub mod database;
pub mod repositories;
