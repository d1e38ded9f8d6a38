// Core infrastructure modules
pub mod database; // SQLite pool and schema bootstrap
pub mod mailer; // Outbound mail collaborator
pub mod middleware; // Request authentication
pub mod security; // Access tokens and confirmation codes
pub mod viewer; // Viewer context

pub use database::Database;
pub use viewer::ViewerContext;
