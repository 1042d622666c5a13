//! MySQL-backed store implementation.

pub mod grant_repository;

pub use grant_repository::MySqlRoleStore;
