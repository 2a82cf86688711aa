// ABOUTME: Tests for API key generation, format validation, and lifecycle checks
// ABOUTME: Covers key id/charset invariants, storage hashing, and expiry handling
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use chrono::{Duration, Utc};
use keymint::api_keys::{ApiKeyManager, CreateApiKeyRequest};
use keymint::constants::pattern;
use keymint::errors::ErrorCode;

#[test]
fn test_api_key_generation() {
    let manager = ApiKeyManager::new();

    // Live key generation
    let api_key_data = manager.generate_api_key(false).unwrap();
    assert!(api_key_data.full_key.starts_with("pk_live_"));
    assert_eq!(api_key_data.full_key.len(), 40);
    assert_eq!(api_key_data.key_prefix.len(), 12);
    assert_eq!(api_key_data.key_hash.len(), 64); // SHA-256 hex

    // Test key generation
    let test_data = manager.generate_api_key(true).unwrap();
    assert!(test_data.full_key.starts_with("pk_test_"));
    assert_eq!(test_data.full_key.len(), 40);
}

#[test]
fn test_key_secret_uses_alphanumeric_block() {
    let manager = ApiKeyManager::new();
    let api_key_data = manager.generate_api_key(false).unwrap();
    let secret = &api_key_data.full_key["pk_live_".len()..];
    assert_eq!(secret.len(), 32);
    assert!(secret.chars().all(|c| pattern::ALPHANUMERIC_BLOCK.contains(c)));
}

#[test]
fn test_key_id_length_and_charset() {
    let manager = ApiKeyManager::new();
    let key_id = manager.generate_key_id().unwrap();
    assert_eq!(key_id.len(), 10);
    assert!(key_id.chars().all(|c| pattern::ALPHANUMERIC_BLOCK.contains(c)));

    // Two draws should not collide (36^10 possibilities)
    assert_ne!(key_id, manager.generate_key_id().unwrap());
}

#[test]
fn test_key_validation() {
    let manager = ApiKeyManager::new();

    assert!(manager
        .validate_key_format("pk_live_abcdefghijklmnopqrstuvwxyz123456")
        .is_ok());
    assert!(manager
        .validate_key_format("pk_test_abcdefghijklmnopqrstuvwxyz123456")
        .is_ok());

    assert!(manager.validate_key_format("invalid_key").is_err());
    assert!(manager.validate_key_format("pk_live_short").is_err());
    assert!(manager
        .validate_key_format("pk_live_abcdefghijklmnopqrstuvwxyz1234567")
        .is_err());

    let err = manager.validate_key_format("sk_live_whatever").unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidFormat);
}

#[test]
fn test_generated_keys_pass_validation() {
    let manager = ApiKeyManager::new();
    for is_test in [false, true] {
        let data = manager.generate_api_key(is_test).unwrap();
        manager.validate_key_format(&data.full_key).unwrap();
    }
}

#[test]
fn test_test_key_detection_and_prefix_extraction() {
    let manager = ApiKeyManager::new();
    assert!(manager.is_test_key("pk_test_abc"));
    assert!(!manager.is_test_key("pk_live_abc"));

    assert_eq!(
        manager.extract_key_prefix("pk_live_abcdefghijklmnopqrstuvwxyz123456"),
        "pk_live_abcd"
    );
}

#[test]
fn test_hash_is_stable_and_verification_constant_time_path() {
    let key = "pk_live_abcdefghijklmnopqrstuvwxyz123456";
    let hash = ApiKeyManager::hash_key(key);
    assert_eq!(hash, ApiKeyManager::hash_key(key));
    assert_eq!(hash.len(), 64);

    assert!(ApiKeyManager::verify_key(key, &hash));
    assert!(!ApiKeyManager::verify_key("pk_live_000000000000000000000000000000zz", &hash));
    assert!(!ApiKeyManager::verify_key(key, "not-a-hash"));
}

#[test]
fn test_create_api_key_record() {
    let manager = ApiKeyManager::new();
    let (record, full_key) = manager
        .create_api_key(CreateApiKeyRequest {
            name: "Integration".into(),
            description: Some("integration test key".into()),
            expires_in_days: None,
        })
        .unwrap();

    assert!(full_key.starts_with("pk_live_"));
    assert_eq!(record.key_id.len(), 10);
    assert_eq!(record.key_hash, ApiKeyManager::hash_key(&full_key));
    assert_eq!(record.key_prefix, &full_key[..12]);
    assert!(record.is_active);
    assert!(record.last_used_at.is_none());

    // Default expiry is 30 days out
    let expires_at = record.expires_at.unwrap();
    let days = (expires_at - Utc::now()).num_days();
    assert!((29..=30).contains(&days), "unexpected default expiry: {days} days");
}

#[test]
fn test_create_api_key_custom_expiry() {
    let manager = ApiKeyManager::new();
    let (record, _) = manager
        .create_api_key(CreateApiKeyRequest {
            name: "Short lived".into(),
            description: None,
            expires_in_days: Some(7),
        })
        .unwrap();

    let days = (record.expires_at.unwrap() - Utc::now()).num_days();
    assert!((6..=7).contains(&days));
}

#[test]
fn test_is_key_valid() {
    let manager = ApiKeyManager::new();
    let (mut record, _) = manager
        .create_api_key(CreateApiKeyRequest {
            name: "Lifecycle".into(),
            description: None,
            expires_in_days: None,
        })
        .unwrap();

    manager.is_key_valid(&record).unwrap();

    // Inactive key
    record.is_active = false;
    let err = manager.is_key_valid(&record).unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);

    // Expired key
    record.is_active = true;
    record.expires_at = Some(Utc::now() - Duration::days(1));
    let err = manager.is_key_valid(&record).unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthExpired);
    assert_eq!(err.context.resource_id.as_deref(), Some(record.key_id.as_str()));
}
