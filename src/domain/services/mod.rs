//! # Domain Services
//!
//! Domain services encapsulate business rules that don't naturally belong
//! to a single entity. They are pure: no I/O, no clocks.
//!
//! ## Services
//!
//! - **AccessPolicy**: who may change memberships and delete messages
//! - **MentionIndex**: `@handle` extraction and resolution against a user directory

mod access_policy;
mod mention_index;

pub use access_policy::*;
pub use mention_index::*;
