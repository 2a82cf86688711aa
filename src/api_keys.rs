// ABOUTME: API key management for machine-to-machine authentication
// ABOUTME: Handles creation, format validation, hashing, and lifecycle of API keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # API Key Management
//!
//! Provides M2M API key generation and validation. Key ids and key secrets
//! are drawn from the uniform random generator in [`crate::random`]; only a
//! SHA-256 hash of the full key is ever stored.

use crate::constants::{defaults, key_prefixes};
use crate::errors::{AppError, AppResult};
use crate::random::{random_string, random_string_with, StringMode};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::debug;
use uuid::Uuid;

/// Freshly generated key material. The full key is shown to the caller once
/// and never stored.
#[derive(Debug, Clone)]
pub struct ApiKeyData {
    /// Complete key, e.g. `pk_live_<32 chars>`
    pub full_key: String,
    /// Display prefix for identification (first 12 characters)
    pub key_prefix: String,
    /// SHA-256 hex hash of the full key, for storage
    pub key_hash: String,
}

/// Stored API key record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    /// Record id
    pub id: String,
    /// Short random key id carried in bearer token claims
    pub key_id: String,
    /// Human-readable key name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Display prefix for identification
    pub key_prefix: String,
    /// SHA-256 hex hash of the full key
    pub key_hash: String,
    /// Whether the key is active
    pub is_active: bool,
    /// Expiration time, if any
    pub expires_at: Option<DateTime<Utc>>,
    /// Last time the key was used
    pub last_used_at: Option<DateTime<Utc>>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Request to create a new API key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApiKeyRequest {
    /// Human-readable key name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Expiration in days from now; defaults to 30
    pub expires_in_days: Option<i64>,
}

/// API Key Manager
#[derive(Clone)]
pub struct ApiKeyManager {
    key_prefix: &'static str,
}

impl Default for ApiKeyManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiKeyManager {
    /// Create a new API key manager issuing live keys
    #[must_use]
    pub const fn new() -> Self {
        Self {
            key_prefix: key_prefixes::LIVE,
        }
    }

    /// Generate a short random key id (10 characters from `[a-z0-9]`)
    ///
    /// # Errors
    ///
    /// Returns an error if the secure random source cannot supply bytes
    pub fn generate_key_id(&self) -> AppResult<String> {
        random_string(defaults::KEY_ID_LENGTH)
    }

    /// Generate a new API key with optional test prefix
    ///
    /// # Errors
    ///
    /// Returns an error if the secure random source cannot supply bytes
    pub fn generate_api_key(&self, is_test: bool) -> AppResult<ApiKeyData> {
        let secret = random_string_with(
            &mut OsRng,
            defaults::KEY_SECRET_LENGTH,
            StringMode::Corrected,
        )?;

        let prefix = if is_test {
            key_prefixes::TEST
        } else {
            self.key_prefix
        };
        let full_key = format!("{prefix}{secret}");

        // Display prefix for identification (first 12 chars)
        let key_prefix = if full_key.len() >= defaults::KEY_PREFIX_LENGTH {
            full_key[..defaults::KEY_PREFIX_LENGTH].to_string()
        } else {
            full_key.clone() // Safe: String ownership for API key display
        };

        let key_hash = Self::hash_key(&full_key);

        Ok(ApiKeyData {
            full_key,
            key_prefix,
            key_hash,
        })
    }

    /// Validate an API key format
    ///
    /// # Errors
    ///
    /// Returns an error if the API key format is invalid or has incorrect length
    pub fn validate_key_format(&self, api_key: &str) -> AppResult<()> {
        if !api_key.starts_with(self.key_prefix) && !api_key.starts_with(key_prefixes::TEST) {
            return Err(AppError::invalid_format("Invalid API key format"));
        }

        // Both prefixes are 8 characters followed by the 32-character secret
        let expected_len = key_prefixes::LIVE.len() + defaults::KEY_SECRET_LENGTH;
        if api_key.len() != expected_len {
            return Err(AppError::invalid_format("Invalid API key length"));
        }

        Ok(())
    }

    /// Check if an API key string is a test key
    #[must_use]
    pub fn is_test_key(&self, api_key: &str) -> bool {
        api_key.starts_with(key_prefixes::TEST)
    }

    /// Extract the display prefix from a full key
    #[must_use]
    pub fn extract_key_prefix(&self, api_key: &str) -> String {
        api_key.chars().take(defaults::KEY_PREFIX_LENGTH).collect()
    }

    /// Hash an API key for storage
    #[must_use]
    pub fn hash_key(api_key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(api_key.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Compare a presented key against a stored hash in constant time
    #[must_use]
    pub fn verify_key(api_key: &str, stored_hash: &str) -> bool {
        let presented = Self::hash_key(api_key);
        presented.as_bytes().ct_eq(stored_hash.as_bytes()).into()
    }

    /// Create a new API key record
    ///
    /// Returns the stored record together with the plaintext key, which is
    /// surfaced exactly once and cannot be recovered afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the secure random source cannot supply bytes
    pub fn create_api_key(&self, request: CreateApiKeyRequest) -> AppResult<(ApiKey, String)> {
        let key_id = self.generate_key_id()?;
        let api_key_data = self.generate_api_key(false)?;
        let full_key = api_key_data.full_key;
        let key_prefix = api_key_data.key_prefix;
        let key_hash = api_key_data.key_hash;

        let days = request.expires_in_days.unwrap_or(defaults::TOKEN_EXPIRY_DAYS);
        let expires_at = Some(Utc::now() + Duration::days(days));

        let api_key = ApiKey {
            id: Uuid::new_v4().to_string(),
            key_id,
            name: request.name,
            description: request.description,
            key_prefix,
            key_hash,
            is_active: true,
            expires_at,
            last_used_at: None,
            created_at: Utc::now(),
        };

        debug!(key_id = %api_key.key_id, prefix = %api_key.key_prefix, "minted new API key");

        Ok((api_key, full_key))
    }

    /// Check if a key record is valid and active
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is inactive or expired
    pub fn is_key_valid(&self, api_key: &ApiKey) -> AppResult<()> {
        if !api_key.is_active {
            return Err(AppError::auth_invalid("API key is inactive")
                .with_resource_id(api_key.key_id.clone()));
        }

        if let Some(expires_at) = api_key.expires_at {
            if Utc::now() > expires_at {
                return Err(AppError::auth_expired().with_resource_id(api_key.key_id.clone()));
            }
        }

        Ok(())
    }
}
