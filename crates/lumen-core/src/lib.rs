//! # Lumen Core
//!
//! Core types, domain model, and error definitions for the Lumen admin
//! authorization engine: role tiers, the closed permission catalog,
//! permission sets, IP allow-list rules, and the admin role grant entity.

pub mod domain;
pub mod error;
pub mod id;
pub mod result;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;
