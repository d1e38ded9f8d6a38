// ViewerContext Extractor - hands the request's viewer to handlers

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{error::AppError, infrastructure::viewer::ViewerContext};

/// Cheap-to-clone handle on the request's `ViewerContext`.
///
/// Derefs to `ViewerContext`, so handlers read `vc.user_id()`,
/// `vc.is_admin()` and so on directly.
#[derive(Debug, Clone)]
pub struct Vc(Arc<ViewerContext>);

impl std::ops::Deref for Vc {
    type Target = ViewerContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// Implement FromRequestParts so Axum can extract Vc from request extensions
impl<S> FromRequestParts<S> for Vc
where
    S: Send + Sync,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let vc = parts
            .extensions
            .get::<Arc<ViewerContext>>()
            .map(|vc| Vc(vc.clone()))
            .ok_or_else(|| AppError::Internal("Viewer context missing from request".to_string()));

        async move { vc }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn test_vc_extracted_from_extensions() {
        let (mut parts, _) = Request::new(()).into_parts();
        parts
            .extensions
            .insert(Arc::new(ViewerContext::anonymous("test-request".to_string())));

        let vc = Vc::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(vc.request_id, "test-request");
        assert!(!vc.is_authenticated());
    }

    #[tokio::test]
    async fn test_missing_context_is_internal_error() {
        let (mut parts, _) = Request::new(()).into_parts();
        let result = Vc::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
