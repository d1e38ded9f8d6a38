// ViewerContext Middleware - resolves the bearer token into a request-scoped viewer

pub mod viewer_context_extractor;
pub mod viewer_context_middleware;

pub use viewer_context_extractor::Vc;
pub use viewer_context_middleware::viewer_context_middleware;
