use crate::core::error::ValidationError;
use crate::models::account::{AddAccount, UpdateAccount, UploadedFile};
use serde_json::{Map, Value};

/// Default upper bound on account name length, in characters
pub const DEFAULT_MAX_NAME_LENGTH: usize = 255;

/// Constraints applied to account names before they are persisted
#[derive(Debug, Clone, Copy)]
pub struct NameRules {
    pub max_length: usize,
}

impl Default for NameRules {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }
}

impl NameRules {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Check a candidate account name
    ///
    /// Names must be non-blank, no longer than `max_length` characters and
    /// free of control characters. The name is stored exactly as sent.
    pub fn validate(&self, name: &str) -> Result<(), ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let length = name.chars().count();
        if length > self.max_length {
            return Err(ValidationError::NameTooLong {
                max: self.max_length,
                actual: length,
            });
        }

        if name.chars().any(char::is_control) {
            return Err(ValidationError::NameHasControlCharacters);
        }

        Ok(())
    }
}

/// Parse an account id taken from a request path
pub fn parse_account_id(raw: &str) -> Result<i64, ValidationError> {
    raw.parse::<i64>()
        .map_err(|e| ValidationError::InvalidId(format!("{:?}: {}", raw, e)))
}

impl AddAccount {
    /// Decode a `POST /accounts` body
    pub fn decode(body: &[u8]) -> Result<Self, ValidationError> {
        let object = decode_object(body)?;
        let name = required_string(&object, "name")?;
        Ok(Self { name })
    }

    pub fn validate(&self, rules: &NameRules) -> Result<(), ValidationError> {
        rules.validate(&self.name)
    }
}

impl UpdateAccount {
    /// Decode a `PATCH /accounts/{id}` body
    pub fn decode(body: &[u8]) -> Result<Self, ValidationError> {
        let object = decode_object(body)?;
        let name = required_string(&object, "name")?;
        Ok(Self { name })
    }

    pub fn validate(&self, rules: &NameRules) -> Result<(), ValidationError> {
        rules.validate(&self.name)
    }
}

/// Require that an upload carried a file part
pub fn require_file(file: Option<UploadedFile>) -> Result<UploadedFile, ValidationError> {
    file.ok_or(ValidationError::MissingFile)
}

fn decode_object(body: &[u8]) -> Result<Map<String, Value>, ValidationError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ValidationError::MalformedBody(e.to_string()))?;

    match value {
        Value::Object(object) => Ok(object),
        _ => Err(ValidationError::NotAnObject),
    }
}

fn required_string(object: &Map<String, Value>, field: &'static str) -> Result<String, ValidationError> {
    match object.get(field) {
        None => Err(ValidationError::MissingField(field)),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "string",
        }),
    }
}
