//! # Lumen Security
//!
//! Authorization engine for Lumen admin roles: combines the grant store,
//! the role hierarchy, and network allow-list matching into a single
//! allow/deny verdict with a reason code.

pub mod network;
pub mod rbac;

pub use rbac::*;
