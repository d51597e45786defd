use crate::core::error::ApiError;
use axum::http::{Method, Uri};

/// Unmatched routes get the same JSON envelope as every other failure
pub async fn fallback_handler(method: Method, uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {} {}", method, uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_fallback_is_not_found() {
        let error = fallback_handler(Method::GET, Uri::from_static("/nowhere?x=1")).await;

        assert_eq!(error.status(), StatusCode::NOT_FOUND);
        assert_eq!(error.to_string(), "no route for GET /nowhere");
    }
}
