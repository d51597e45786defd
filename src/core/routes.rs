// HTTP routes configuration

use crate::core::state::AppState;
use crate::handlers::accounts::{
    add_account_handler, delete_account_handler, list_accounts_handler, show_account_handler,
    update_account_handler, upload_account_image_handler,
};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        .route("/health", get(crate::handlers::health::health_handler))
        .route("/api-docs/openapi.json", get(crate::core::api_doc::openapi_handler))

        // Account endpoints
        .route("/accounts", get(list_accounts_handler).post(add_account_handler))
        .route(
            "/accounts/{id}",
            get(show_account_handler)
                .patch(update_account_handler)
                .delete(delete_account_handler),
        )
        .route("/accounts/{id}/images", post(upload_account_image_handler))

        // JSON 404 for all unmatched routes
        .fallback(crate::handlers::fallback::fallback_handler)

        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
