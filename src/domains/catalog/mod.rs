// Catalog - categories and genres, both plain name/slug dictionaries

pub mod handlers;
pub mod model;
pub mod repository;

pub use model::{CatalogItem, CatalogKind};
pub use repository::CatalogRepository;
