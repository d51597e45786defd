// OpenAPI document for the account API

use crate::handlers::accounts;
use crate::models::account::{Account, AccountImageForm, AddAccount, UpdateAccount};
use crate::models::response::{ErrorResponse, Message};
use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "accounts",
        description = "Account CRUD API",
        version = "0.1.0",
    ),
    paths(
        accounts::show_account_handler,
        accounts::list_accounts_handler,
        accounts::add_account_handler,
        accounts::update_account_handler,
        accounts::delete_account_handler,
        accounts::upload_account_image_handler,
    ),
    components(schemas(Account, AddAccount, UpdateAccount, AccountImageForm, Message, ErrorResponse)),
    tags((name = "accounts", description = "Account resource"))
)]
pub struct ApiDoc;

/// Serve the generated document
///
/// GET /api-docs/openapi.json
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
