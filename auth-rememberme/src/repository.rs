use crate::{
    error::{RememberMeError, Result},
    models::RememberMeRecord,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

pub mod postgres;

pub use postgres::PostgresRememberMeRepository;

/// Storage of issued remember-me tokens
///
/// Each operation is atomic on its own; no ordering is guaranteed between
/// separate calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RememberMeRepository: Send + Sync {
    /// Store a new record. Fails if its public key is already stored.
    async fn insert(&self, record: &RememberMeRecord) -> Result<()>;

    async fn find_by_public_key(&self, public_key: &str) -> Result<Option<RememberMeRecord>>;

    /// Delete every record of `username`, returning how many were removed
    async fn delete_by_username(&self, username: &str) -> Result<u64>;

    /// Delete the user's existing records and store `record` as one unit
    async fn replace_for_user(&self, record: &RememberMeRecord) -> Result<u64>;

    /// Delete records created before `cutoff`
    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64>;
}

/// In-memory token store for development and tests
#[derive(Debug, Default)]
pub struct InMemoryRememberMeRepository {
    records: RwLock<HashMap<String, RememberMeRecord>>,
}

impl InMemoryRememberMeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn insert_locked(records: &mut HashMap<String, RememberMeRecord>, record: &RememberMeRecord) -> Result<()> {
        if records.contains_key(&record.public_key) {
            return Err(RememberMeError::Storage(
                "public key is already registered".to_string(),
            ));
        }
        records.insert(record.public_key.clone(), record.clone());
        Ok(())
    }

    fn delete_locked(records: &mut HashMap<String, RememberMeRecord>, username: &str) -> u64 {
        let before = records.len();
        records.retain(|_, record| record.username != username);
        (before - records.len()) as u64
    }
}

#[async_trait]
impl RememberMeRepository for InMemoryRememberMeRepository {
    async fn insert(&self, record: &RememberMeRecord) -> Result<()> {
        Self::insert_locked(&mut self.records.write(), record)
    }

    async fn find_by_public_key(&self, public_key: &str) -> Result<Option<RememberMeRecord>> {
        Ok(self.records.read().get(public_key).cloned())
    }

    async fn delete_by_username(&self, username: &str) -> Result<u64> {
        Ok(Self::delete_locked(&mut self.records.write(), username))
    }

    async fn replace_for_user(&self, record: &RememberMeRecord) -> Result<u64> {
        let mut records = self.records.write();
        // Fail before deleting anything so the old tokens survive a conflict
        if records
            .get(&record.public_key)
            .is_some_and(|existing| existing.username != record.username)
        {
            return Err(RememberMeError::Storage(
                "public key is already registered".to_string(),
            ));
        }

        let removed = Self::delete_locked(&mut records, &record.username);
        Self::insert_locked(&mut records, record)?;
        Ok(removed)
    }

    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|_, record| record.created_at >= cutoff);
        Ok((before - records.len()) as u64)
    }
}
