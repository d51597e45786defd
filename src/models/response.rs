use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Plain confirmation body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Message {
    pub message: String,
}

/// Body of every failure response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}
