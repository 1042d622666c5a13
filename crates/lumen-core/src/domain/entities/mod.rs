//! Domain entities.

pub mod grant;

pub use grant::AdminRoleGrant;
