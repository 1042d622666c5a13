//! Domain model for admin role grants.

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
