// Auth - signup with an emailed confirmation code, exchanged for an access token

pub mod handlers;
pub mod serializers;
pub mod service;

pub use service::AuthService;
