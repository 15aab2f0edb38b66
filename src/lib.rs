//! # Internal Chat Library
//!
//! Tenant-scoped internal chat for a multi-tenant platform:
//! - Direct and group rooms with owner/moderator/member roles
//! - An append-only, soft-deletable message timeline with watermark pagination
//! - `@handle` mentions and a per-user mention inbox
//! - Quotes of external CRM conversations attached to messages
//! - Unread tracking and a best-effort audit trail
//!
//! Authentication is external: every operation runs as a verified
//! [`domain::Caller`].
//!
//! ## Module Structure
//!
//! ```text
//! internal_chat/
//! +-- config/         Configuration management
//! +-- domain/         Entities, repository traits, pure rules
//! +-- application/    Chat orchestrator, component services, DTOs
//! +-- infrastructure/ PostgreSQL repositories, conversation client
//! +-- presentation/   HTTP routes and handlers
//! +-- shared/         Errors and validation helpers
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
