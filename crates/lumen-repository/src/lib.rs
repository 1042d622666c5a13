//! # Lumen Repository
//!
//! Storage for admin role grant records: the [`AdminRoleStore`] trait, an
//! in-memory implementation for tests and single-process embeddings, and a
//! MySQL implementation backed by sqlx.

pub mod memory;
pub mod mysql;
pub mod requests;
pub mod traits;

pub use memory::InMemoryRoleStore;
pub use mysql::MySqlRoleStore;
pub use requests::{CreateGrant, GrantUpdate};
pub use traits::AdminRoleStore;
