// Titles - works under review, with their genres, category and computed rating

pub mod handlers;
pub mod model;
pub mod repository;
pub mod serializers;

pub use model::{TitleChanges, TitleDetail, TitleFilter, TitleOrdering};
pub use repository::TitleRepository;
