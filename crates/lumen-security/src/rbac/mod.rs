//! RBAC authorization engine.

pub mod engine;
pub mod verdict;

pub use engine::{AccessContext, AuthorizationEngine, Principal};
pub use verdict::{AllowReason, DenyReason, Verdict};
