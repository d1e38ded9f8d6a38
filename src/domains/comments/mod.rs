// Comments - replies attached to a review

pub mod handlers;
pub mod model;
pub mod repository;
pub mod serializers;

pub use model::Comment;
pub use repository::CommentRepository;
