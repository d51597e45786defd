use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored account
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Account {
    /// Identifier assigned by the store on insertion
    pub id: i64,
    /// Display name, validated before it reaches the store
    pub name: String,
}

impl Account {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// An account that has not been inserted yet
    pub fn unsaved(name: impl Into<String>) -> Self {
        Self::new(0, name)
    }
}

/// Decoded body of `POST /accounts`
#[derive(Debug, PartialEq, Eq, ToSchema)]
pub struct AddAccount {
    pub name: String,
}

/// Decoded body of `PATCH /accounts/{id}`
#[derive(Debug, PartialEq, Eq, ToSchema)]
pub struct UpdateAccount {
    pub name: String,
}

/// Form accepted by `POST /accounts/{id}/images`, documentation only
#[derive(ToSchema)]
pub struct AccountImageForm {
    /// Account image
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Metadata of a file part received by the image upload endpoint
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    /// Size of the part body in bytes
    pub size: usize,
}
