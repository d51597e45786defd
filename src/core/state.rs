// Application state (AppState)

use crate::core::config::Config;
use crate::endpoint::account::AccountEndpoint;
use crate::stores::account_store::{AccountStore, MemoryAccountStore};
use crate::validation::account::NameRules;
use std::sync::Arc;

/// Shared application state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountEndpoint,

    pub config: Arc<Config>,
}

impl AppState {
    /// Build state around the in-memory store, seeded according to config
    pub fn new(config: Config) -> Self {
        let store: Arc<dyn AccountStore> = if config.accounts.seed {
            Arc::new(MemoryAccountStore::with_seed())
        } else {
            Arc::new(MemoryAccountStore::new())
        };

        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Arc<dyn AccountStore>) -> Self {
        let name_rules = NameRules::new(config.accounts.max_name_length);

        Self {
            accounts: AccountEndpoint::new(store, name_rules),
            config: Arc::new(config),
        }
    }
}
