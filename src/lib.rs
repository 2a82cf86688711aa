// ABOUTME: Main library entry point for the keymint M2M key toolkit
// ABOUTME: Provides uniform random generation, API key minting, and bearer token verification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![deny(unsafe_code)]

//! # Keymint
//!
//! Machine-to-machine API key material generation and verification.
//!
//! ## Features
//!
//! - **Unbiased randomness**: rejection-sampling integer and string
//!   generation over the operating system CSPRNG, with an injectable byte
//!   source for testing
//! - **API keys**: `pk_live_` / `pk_test_` key minting, SHA-256 storage
//!   hashes, constant-time verification
//! - **Bearer tokens**: HS256 JWTs carrying the key id, validated for
//!   signature, expiry, issuer, and audience
//! - **Issued-key registry**: trait-based record store with a concurrent
//!   in-memory implementation
//!
//! ## Example Usage
//!
//! ```rust
//! use keymint::api_keys::{ApiKeyManager, CreateApiKeyRequest};
//! use keymint::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let manager = ApiKeyManager::new();
//!     let (record, full_key) = manager.create_api_key(CreateApiKeyRequest {
//!         name: "My Pokemon API".into(),
//!         description: None,
//!         expires_in_days: None,
//!     })?;
//!
//!     // The plaintext key is surfaced exactly once; only its hash is stored.
//!     assert!(full_key.starts_with("pk_live_"));
//!     assert_eq!(record.key_hash.len(), 64);
//!     Ok(())
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by the CLI binary (src/bin/) and integration tests
// (tests/). They must remain `pub` so external consumers can access them.

/// `API` key management for M2M authentication
pub mod api_keys;

/// Signed bearer token minting and validation
pub mod auth;

/// Configuration management
pub mod config;

/// Shared constants for key generation and configuration
pub mod constants;

/// Unified error handling
pub mod errors;

/// Structured logging configuration
pub mod logging;

/// Uniform random integer and string generation
pub mod random;

/// Issued-key registry
pub mod store;
