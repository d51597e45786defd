use crate::models::account::Account;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("account id={0} is not found")]
    NotFound(i64),

    #[error("no more account ids available")]
    IdsExhausted,

    #[error("datastore failure: {0}")]
    Backend(String),
}

/// Persistence primitives the account endpoint relies on
///
/// Implementations must be safe to share between request tasks; any
/// isolation of conflicting writes is the implementation's business.
pub trait AccountStore: Send + Sync {
    /// Look up a single account
    fn find_by_id(&self, id: i64) -> Result<Account, StoreError>;

    /// All accounts whose name contains `filter`, or every account when
    /// no filter is given
    fn find_all(&self, filter: Option<&str>) -> Result<Vec<Account>, StoreError>;

    /// Persist a new account and return its assigned id
    /// The id carried by `account` is ignored
    fn insert(&self, account: &Account) -> Result<i64, StoreError>;

    /// Replace the name of an existing account
    fn update(&self, account: &Account) -> Result<(), StoreError>;

    fn delete(&self, id: i64) -> Result<(), StoreError>;
}

/// In-memory account store
pub struct MemoryAccountStore {
    accounts: DashMap<i64, Account>,
    last_id: AtomicI64,
}

impl MemoryAccountStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            last_id: AtomicI64::new(0),
        }
    }

    /// Create a store holding the three sample accounts `account_1`..`account_3`
    pub fn with_seed() -> Self {
        let store = Self::new();
        for id in 1..=3 {
            store.accounts.insert(id, Account::new(id, format!("account_{}", id)));
        }
        store.last_id.store(3, Ordering::SeqCst);
        store
    }

    fn next_id(&self) -> Result<i64, StoreError> {
        self.last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| last.checked_add(1))
            .map(|previous| previous + 1)
            .map_err(|_| StoreError::IdsExhausted)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Default for MemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore for MemoryAccountStore {
    fn find_by_id(&self, id: i64) -> Result<Account, StoreError> {
        self.accounts
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound(id))
    }

    fn find_all(&self, filter: Option<&str>) -> Result<Vec<Account>, StoreError> {
        let filter = filter.filter(|q| !q.is_empty());

        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .filter(|entry| filter.map_or(true, |q| entry.value().name.contains(q)))
            .map(|entry| entry.value().clone())
            .collect();

        accounts.sort_by_key(|account| account.id);
        Ok(accounts)
    }

    fn insert(&self, account: &Account) -> Result<i64, StoreError> {
        let id = self.next_id()?;
        self.accounts.insert(id, Account::new(id, account.name.clone()));
        Ok(id)
    }

    fn update(&self, account: &Account) -> Result<(), StoreError> {
        match self.accounts.get_mut(&account.id) {
            Some(mut entry) => {
                entry.name = account.name.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(account.id)),
        }
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.accounts
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}
