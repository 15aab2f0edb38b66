//! # Domain Layer
//!
//! The domain layer contains the core rules of the internal chat.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Rooms, memberships, messages, mentions, quotes, audit entries
//! - **value_objects**: Immutable value types (Caller)
//! - **services**: Pure domain rules (access policy, mention resolution)
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Repository traits define data access contracts
//! - Every lookup is tenant-scoped

pub mod entities;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use value_objects::*;
