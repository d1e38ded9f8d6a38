// Reviews - scored opinions on a title, one per author per title

pub mod handlers;
pub mod model;
pub mod repository;
pub mod serializers;

pub use model::Review;
pub use repository::ReviewRepository;
