use crate::core::error::{ApiError, ValidationError};
use crate::core::state::AppState;
use crate::endpoint::account::Reply;
use crate::models::account::{Account, AccountImageForm, AddAccount, UpdateAccount, UploadedFile};
use crate::models::response::{ErrorResponse, Message};
use crate::validation::account::parse_account_id;
use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{BytesRejection, PathRejection, QueryRejection},
        Multipart, Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Form field carrying the uploaded image
const FILE_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            Reply::Account(account) => (status, Json(account)).into_response(),
            Reply::Accounts(accounts) => (status, Json(accounts)).into_response(),
            Reply::Message(message) => (status, Json(Message { message })).into_response(),
            Reply::NoContent => status.into_response(),
        }
    }
}

fn path_id(path: Result<Path<String>, PathRejection>) -> Result<String, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ApiError::InvalidInput(format!("invalid account id: {}", rejection.body_text())))
}

/// Buffered body, or the extractor's rejection in the JSON envelope
fn request_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, ApiError> {
    body.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Failed to read request body");
        body_error(rejection.status(), rejection.body_text())
    })
}

fn multipart_error(error: MultipartError) -> ApiError {
    warn!(error = %error.body_text(), "Failed to read upload");
    match error.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge(error.body_text()),
        _ => ValidationError::InvalidMultipart(error.body_text()).into(),
    }
}

fn body_error(status: StatusCode, text: String) -> ApiError {
    match status {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge(text),
        _ => ValidationError::UnreadableBody(text).into(),
    }
}

/// Show a single account
///
/// GET /accounts/{id}
#[utoipa::path(
    get,
    path = "/accounts/{id}",
    params(("id" = i64, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account found", body = Account),
        (status = 400, description = "Account ID is not an integer", body = ErrorResponse),
        (status = 404, description = "No account with this ID", body = ErrorResponse),
    ),
    tag = "accounts"
)]
pub async fn show_account_handler(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Reply, ApiError> {
    let id = path_id(path)?;
    state.accounts.get_one(&id)
}

/// List accounts, optionally filtered by name
///
/// GET /accounts?q=<name fragment>
#[utoipa::path(
    get,
    path = "/accounts",
    params(("q" = Option<String>, Query, description = "Name search by q")),
    responses(
        (status = 200, description = "Matching accounts", body = Vec<Account>),
        (status = 400, description = "Malformed query string", body = ErrorResponse),
        (status = 404, description = "No account matched", body = ErrorResponse),
    ),
    tag = "accounts"
)]
pub async fn list_accounts_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Reply, ApiError> {
    let Query(params) = query.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected account list query");
        ApiError::from(ValidationError::InvalidQuery(rejection.body_text()))
    })?;

    state.accounts.list(params.q.as_deref())
}

/// Add an account
///
/// POST /accounts with body `{"name": "..."}`
#[utoipa::path(
    post,
    path = "/accounts",
    request_body(content = AddAccount, description = "Add account", content_type = "application/json"),
    responses(
        (status = 200, description = "Account created", body = Account),
        (status = 400, description = "Invalid body or name, or the insert failed", body = ErrorResponse),
        (status = 413, description = "Body exceeds the configured limit", body = ErrorResponse),
    ),
    tag = "accounts"
)]
pub async fn add_account_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Reply, ApiError> {
    let body = request_body(body)?;
    state.accounts.create(&body)
}

/// Rename an account
///
/// PATCH /accounts/{id} with body `{"name": "..."}`
#[utoipa::path(
    patch,
    path = "/accounts/{id}",
    params(("id" = i64, Path, description = "Account ID")),
    request_body(content = UpdateAccount, description = "Update account", content_type = "application/json"),
    responses(
        (status = 200, description = "Account updated", body = Account),
        (status = 400, description = "Invalid ID, body or name", body = ErrorResponse),
        (status = 404, description = "No account with this ID", body = ErrorResponse),
        (status = 413, description = "Body exceeds the configured limit", body = ErrorResponse),
    ),
    tag = "accounts"
)]
pub async fn update_account_handler(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Reply, ApiError> {
    let id = path_id(path)?;
    parse_account_id(&id)?;

    let body = request_body(body)?;
    state.accounts.update(&id, &body)
}

/// Delete an account
///
/// DELETE /accounts/{id}
#[utoipa::path(
    delete,
    path = "/accounts/{id}",
    params(("id" = i64, Path, description = "Account ID")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 400, description = "Account ID is not an integer", body = ErrorResponse),
        (status = 404, description = "No account with this ID", body = ErrorResponse),
    ),
    tag = "accounts"
)]
pub async fn delete_account_handler(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Reply, ApiError> {
    let id = path_id(path)?;
    state.accounts.delete(&id)
}

/// Accept an account image as multipart form data
///
/// POST /accounts/{id}/images with a `file` part
#[utoipa::path(
    post,
    path = "/accounts/{id}/images",
    params(("id" = i64, Path, description = "Account ID")),
    request_body(content = AccountImageForm, description = "Account image", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Upload acknowledged", body = Message),
        (status = 400, description = "Invalid ID or no file attached", body = ErrorResponse),
        (status = 413, description = "Upload exceeds the configured limit", body = ErrorResponse),
    ),
    tag = "accounts"
)]
pub async fn upload_account_image_handler(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Reply, ApiError> {
    let id = path_id(path)?;
    parse_account_id(&id)?;

    let file = match multipart {
        Ok(multipart) => read_file_part(multipart).await?,
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "Upload is not multipart");
            None
        }
    };

    state.accounts.upload_image(&id, file)
}

/// Read the multipart stream until the first file part named `file`
async fn read_file_part(mut multipart: Multipart) -> Result<Option<UploadedFile>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);

        let data = field.bytes().await.map_err(multipart_error)?;

        return Ok(Some(UploadedFile {
            file_name,
            content_type,
            size: data.len(),
        }));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use crate::core::config::{AccountsConfig, Config, LoggingConfig, ServerConfig};
    use crate::core::routes::build_router;
    use crate::core::state::AppState;
    use crate::models::account::Account;
    use crate::models::response::{ErrorResponse, Message};
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "X-ACCOUNT-BOUNDARY";

    fn create_test_config() -> Config {
        Config {
            server: ServerConfig {
                port: 8080,
                bind_address: "127.0.0.1".to_string(),
                num_threads: 2,
                max_upload_bytes: 1024 * 1024,
            },
            logging: LoggingConfig::default(),
            accounts: AccountsConfig {
                seed: true,
                max_name_length: 255,
            },
        }
    }

    fn create_test_app() -> Router {
        build_router(Arc::new(AppState::new(create_test_config())))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn multipart_request(uri: &str, field: &str, file_name: Option<&str>) -> Request<Body> {
        let disposition = match file_name {
            Some(name) => format!("form-data; name=\"{}\"; filename=\"{}\"", field, name),
            None => format!("form-data; name=\"{}\"", field),
        };
        let body = format!(
            "--{b}\r\nContent-Disposition: {d}\r\nContent-Type: image/png\r\n\r\nPNGDATA\r\n--{b}--\r\n",
            b = BOUNDARY,
            d = disposition
        );

        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn error_message(bytes: &[u8]) -> String {
        serde_json::from_slice::<ErrorResponse>(bytes).unwrap().message
    }

    #[tokio::test]
    async fn test_show_account() {
        let app = create_test_app();

        let (status, body) = send(&app, get("/accounts/1")).await;

        assert_eq!(status, StatusCode::OK);
        let account: Account = serde_json::from_slice(&body).unwrap();
        assert_eq!(account, Account::new(1, "account_1"));
    }

    #[tokio::test]
    async fn test_show_account_bad_id() {
        let app = create_test_app();

        let (status, body) = send(&app, get("/accounts/abc")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_message(&body).starts_with("invalid account id"));
    }

    #[tokio::test]
    async fn test_show_account_not_found() {
        let app = create_test_app();

        let (status, body) = send(&app, get("/accounts/77")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_message(&body), "account id=77 is not found");
    }

    #[tokio::test]
    async fn test_list_accounts() {
        let app = create_test_app();

        let (status, body) = send(&app, get("/accounts")).await;

        assert_eq!(status, StatusCode::OK);
        let accounts: Vec<Account> = serde_json::from_slice(&body).unwrap();
        assert_eq!(accounts.len(), 3);
        assert_eq!(accounts[0].id, 1);
    }

    #[tokio::test]
    async fn test_list_accounts_filtered() {
        let app = create_test_app();

        let (status, body) = send(&app, get("/accounts?q=account_2")).await;

        assert_eq!(status, StatusCode::OK);
        let accounts: Vec<Account> = serde_json::from_slice(&body).unwrap();
        assert_eq!(accounts, vec![Account::new(2, "account_2")]);
    }

    #[tokio::test]
    async fn test_list_accounts_empty_query_returns_all() {
        let app = create_test_app();

        let (status, body) = send(&app, get("/accounts?q=")).await;

        assert_eq!(status, StatusCode::OK);
        let accounts: Vec<Account> = serde_json::from_slice(&body).unwrap();
        assert_eq!(accounts.len(), 3);
    }

    #[tokio::test]
    async fn test_list_accounts_unmatched() {
        let app = create_test_app();

        let (status, body) = send(&app, get("/accounts?q=nobody")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!error_message(&body).is_empty());
    }

    #[tokio::test]
    async fn test_add_account() {
        let app = create_test_app();

        let (status, body) = send(
            &app,
            json_request(Method::POST, "/accounts", r#"{"name": "Alice"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let account: Account = serde_json::from_slice(&body).unwrap();
        assert_eq!(account.name, "Alice");
        assert_eq!(account.id, 4);

        let (status, _) = send(&app, get("/accounts/4")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_add_account_empty_name() {
        let app = create_test_app();

        let (status, body) = send(
            &app,
            json_request(Method::POST, "/accounts", r#"{"name": ""}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_message(&body), "name is empty");

        // Nothing was inserted
        let (status, _) = send(&app, get("/accounts/4")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_add_account_malformed_body() {
        let app = create_test_app();

        let (status, body) = send(&app, json_request(Method::POST, "/accounts", "{")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_message(&body).contains("not valid JSON"));
    }

    #[tokio::test]
    async fn test_update_account() {
        let app = create_test_app();

        let (status, body) = send(
            &app,
            json_request(Method::PATCH, "/accounts/1", r#"{"name": "Bob"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let account: Account = serde_json::from_slice(&body).unwrap();
        assert_eq!(account, Account::new(1, "Bob"));
    }

    #[tokio::test]
    async fn test_update_account_bad_id_and_missing() {
        let app = create_test_app();

        let (status, _) = send(
            &app,
            json_request(Method::PATCH, "/accounts/x", r#"{"name": "Bob"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            json_request(Method::PATCH, "/accounts/50", r#"{"name": "Bob"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_account_twice() {
        let app = create_test_app();

        let (status, body) = send(&app, delete("/accounts/3")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());

        let (status, body) = send(&app, delete("/accounts/3")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_message(&body), "account id=3 is not found");
    }

    #[tokio::test]
    async fn test_delete_account_bad_id() {
        let app = create_test_app();

        let (status, _) = send(&app, delete("/accounts/3.5")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_image() {
        let app = create_test_app();

        let (status, body) = send(
            &app,
            multipart_request("/accounts/1/images", "file", Some("photo.png")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let message: Message = serde_json::from_slice(&body).unwrap();
        assert!(message.message.contains("photo.png"));
    }

    #[tokio::test]
    async fn test_upload_image_wrong_field() {
        let app = create_test_app();

        let (status, body) = send(
            &app,
            multipart_request("/accounts/1/images", "avatar", Some("photo.png")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_message(&body).contains("file"));
    }

    #[tokio::test]
    async fn test_upload_image_part_without_filename() {
        let app = create_test_app();

        let (status, _) = send(&app, multipart_request("/accounts/1/images", "file", None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_image_not_multipart() {
        let app = create_test_app();

        let (status, body) = send(
            &app,
            json_request(Method::POST, "/accounts/1/images", "{}"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_message(&body).contains("file"));
    }

    #[tokio::test]
    async fn test_upload_image_bad_id() {
        let app = create_test_app();

        let (status, body) = send(
            &app,
            multipart_request("/accounts/me/images", "file", Some("photo.png")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_message(&body).starts_with("invalid account id"));
    }
}
