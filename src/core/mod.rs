// Core types and validators shared across domains

pub mod roles;
pub mod validators;

pub use roles::{grants_admin, grants_moderation, Role};
