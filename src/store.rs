// ABOUTME: Registry of issued API keys behind a storage trait
// ABOUTME: Ships a concurrent in-memory implementation; persistent backends plug in the same way
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Issued-Key Registry
//!
//! Minted keys are recorded so callers can list active keys and revoke them.
//! The backing store is a collaborator behind [`KeyRegistry`], not part of
//! this crate's contract; [`InMemoryKeyRegistry`] is the provided
//! implementation.

use crate::api_keys::ApiKey;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Record of an issued API key, as held by the registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedKeyRecord {
    /// Key id carried in bearer token claims
    pub key_id: String,
    /// Human-readable key name
    pub name: String,
    /// Expiration time, if any
    pub expires_at: Option<DateTime<Utc>>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl IssuedKeyRecord {
    /// Whether this record has passed its expiration time
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() > at)
    }
}

impl From<&ApiKey> for IssuedKeyRecord {
    fn from(key: &ApiKey) -> Self {
        Self {
            key_id: key.key_id.clone(),
            name: key.name.clone(),
            expires_at: key.expires_at,
            created_at: key.created_at,
        }
    }
}

/// Storage abstraction for issued-key records
pub trait KeyRegistry: Send + Sync {
    /// Record a newly issued key
    ///
    /// # Errors
    ///
    /// Returns an error if a record with the same key id already exists
    fn insert(&self, record: IssuedKeyRecord) -> AppResult<()>;

    /// Fetch a record by key id
    ///
    /// # Errors
    ///
    /// Returns an error if no record with this key id exists
    fn get(&self, key_id: &str) -> AppResult<IssuedKeyRecord>;

    /// List all records that have not expired, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read
    fn active_keys(&self) -> AppResult<Vec<IssuedKeyRecord>>;

    /// Remove a record, returning it
    ///
    /// # Errors
    ///
    /// Returns an error if no record with this key id exists
    fn revoke(&self, key_id: &str) -> AppResult<IssuedKeyRecord>;
}

/// Concurrent in-memory key registry
#[derive(Debug, Default)]
pub struct InMemoryKeyRegistry {
    records: DashMap<String, IssuedKeyRecord>,
}

impl InMemoryKeyRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Number of records held, expired ones included
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl KeyRegistry for InMemoryKeyRegistry {
    fn insert(&self, record: IssuedKeyRecord) -> AppResult<()> {
        if self.records.contains_key(&record.key_id) {
            return Err(AppError::already_exists(record.key_id));
        }
        self.records.insert(record.key_id.clone(), record);
        Ok(())
    }

    fn get(&self, key_id: &str) -> AppResult<IssuedKeyRecord> {
        self.records
            .get(key_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found(key_id))
    }

    fn active_keys(&self) -> AppResult<Vec<IssuedKeyRecord>> {
        let mut keys: Vec<IssuedKeyRecord> = self
            .records
            .iter()
            .filter(|entry| !entry.value().is_expired())
            .map(|entry| entry.value().clone())
            .collect();
        keys.sort_by_key(|record| record.created_at);
        Ok(keys)
    }

    fn revoke(&self, key_id: &str) -> AppResult<IssuedKeyRecord> {
        self.records
            .remove(key_id)
            .map(|(_, record)| record)
            .ok_or_else(|| AppError::not_found(key_id))
    }
}
