// YaMDb API - reviews and ratings for titles, over a JSON REST interface

// HTTP routing
pub mod api;
pub mod app_state;
pub mod config;

// Core types and primitives
pub mod core;

// Domain-Driven Organization - one module per resource
pub mod domains;

// Request plumbing shared by the domains: extractors, pagination, permissions
pub mod framework;

// Database, tokens, mail and request context
pub mod infrastructure;

// Common utilities
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};
