//! Account request handling, independent of the HTTP framework
//!
//! Every operation takes raw request pieces (path id text, query value,
//! body bytes, upload metadata), validates them, calls the store once and
//! returns either a [`Reply`] or an [`ApiError`]. Status codes are decided
//! by [`Reply::status`] and [`ApiError::status`] only.

use crate::core::error::ApiError;
use crate::models::account::{Account, AddAccount, UpdateAccount, UploadedFile};
use crate::stores::account_store::AccountStore;
use crate::validation::account::{parse_account_id, require_file, NameRules};
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Successful outcome of an account operation
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Account(Account),
    Accounts(Vec<Account>),
    Message(String),
    NoContent,
}

impl Reply {
    pub fn status(&self) -> StatusCode {
        match self {
            Reply::Account(_) | Reply::Accounts(_) | Reply::Message(_) => StatusCode::OK,
            Reply::NoContent => StatusCode::NO_CONTENT,
        }
    }
}

#[derive(Clone)]
pub struct AccountEndpoint {
    store: Arc<dyn AccountStore>,
    name_rules: NameRules,
}

impl AccountEndpoint {
    pub fn new(store: Arc<dyn AccountStore>, name_rules: NameRules) -> Self {
        Self { store, name_rules }
    }

    /// GET /accounts/{id}
    pub fn get_one(&self, raw_id: &str) -> Result<Reply, ApiError> {
        let id = parse_account_id(raw_id)?;

        let account = self.store.find_by_id(id).map_err(|e| {
            debug!(account_id = id, error = %e, "Account lookup failed");
            ApiError::not_found(e)
        })?;

        Ok(Reply::Account(account))
    }

    /// GET /accounts?q=
    ///
    /// An empty match is reported the same way as a store failure.
    pub fn list(&self, q: Option<&str>) -> Result<Reply, ApiError> {
        let accounts = self.store.find_all(q).map_err(|e| {
            warn!(query = ?q, error = %e, "Account listing failed");
            ApiError::not_found(e)
        })?;

        if accounts.is_empty() {
            debug!(query = ?q, "No accounts matched");
            return Err(ApiError::not_found("no accounts matched"));
        }

        Ok(Reply::Accounts(accounts))
    }

    /// POST /accounts
    pub fn create(&self, body: &[u8]) -> Result<Reply, ApiError> {
        let add = AddAccount::decode(body)?;
        add.validate(&self.name_rules)?;

        let mut account = Account::unsaved(add.name);

        // Insert failures are reported as client errors whatever their cause
        account.id = self.store.insert(&account).map_err(|e| {
            warn!(error = %e, "Account insert failed");
            ApiError::invalid_input(e)
        })?;

        info!(account_id = account.id, name = %account.name, "Account created");

        Ok(Reply::Account(account))
    }

    /// PATCH /accounts/{id}
    pub fn update(&self, raw_id: &str, body: &[u8]) -> Result<Reply, ApiError> {
        let id = parse_account_id(raw_id)?;

        let update = UpdateAccount::decode(body)?;
        update.validate(&self.name_rules)?;

        let account = Account::new(id, update.name);

        self.store.update(&account).map_err(|e| {
            warn!(account_id = id, error = %e, "Account update failed");
            ApiError::not_found(e)
        })?;

        info!(account_id = id, name = %account.name, "Account updated");

        Ok(Reply::Account(account))
    }

    /// DELETE /accounts/{id}
    pub fn delete(&self, raw_id: &str) -> Result<Reply, ApiError> {
        let id = parse_account_id(raw_id)?;

        self.store.delete(id).map_err(|e| {
            warn!(account_id = id, error = %e, "Account delete failed");
            ApiError::not_found(e)
        })?;

        info!(account_id = id, "Account deleted");

        Ok(Reply::NoContent)
    }

    /// POST /accounts/{id}/images
    ///
    /// The file is acknowledged but not stored anywhere.
    pub fn upload_image(&self, raw_id: &str, file: Option<UploadedFile>) -> Result<Reply, ApiError> {
        let id = parse_account_id(raw_id)?;
        let file = require_file(file)?;

        info!(
            account_id = id,
            file_name = %file.file_name,
            content_type = ?file.content_type,
            size = file.size,
            "Account image received"
        );

        Ok(Reply::Message(format!(
            "upload complete filename={}",
            file.file_name
        )))
    }
}
