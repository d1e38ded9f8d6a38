// Users - accounts, roles and profile management

pub mod handlers;
pub mod model;
pub mod repository;
pub mod serializers;

pub use model::{role_of, NewUser, User};
pub use repository::UserRepository;
