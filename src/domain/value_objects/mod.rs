//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! ## Value Objects
//!
//! - **Caller**: the verified `(tenant_id, user_id)` pair every operation runs as

mod caller;

pub use caller::*;
