// ABOUTME: End-to-end test of the key issuance flow
// ABOUTME: Mint a key, record it, mint its bearer token, validate, and revoke
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use keymint::api_keys::{ApiKeyManager, CreateApiKeyRequest};
use keymint::auth::ApiTokenManager;
use keymint::errors::ErrorCode;
use keymint::store::{InMemoryKeyRegistry, IssuedKeyRecord, KeyRegistry};

#[test]
fn test_full_key_issuance_flow() {
    let key_manager = ApiKeyManager::new();
    let token_manager = ApiTokenManager::new(
        b"0123456789abcdefghijklmnopqrstuvwxyz",
        "keymint",
        "m2m-api",
        "1",
    );
    let registry = InMemoryKeyRegistry::new();

    // Mint a key and record it
    let (record, full_key) = key_manager
        .create_api_key(CreateApiKeyRequest {
            name: "Lifecycle".into(),
            description: None,
            expires_in_days: None,
        })
        .unwrap();
    key_manager.validate_key_format(&full_key).unwrap();
    key_manager.is_key_valid(&record).unwrap();
    registry.insert(IssuedKeyRecord::from(&record)).unwrap();

    // Mint and validate the bearer token for the recorded key
    let token = token_manager.mint(&record.key_id).unwrap();
    let claims = token_manager.validate(&token).unwrap();
    assert_eq!(claims.key_id, record.key_id);

    // The token's key id resolves to an active registry record
    let stored = registry.get(&claims.key_id).unwrap();
    assert!(!stored.is_expired());
    assert_eq!(registry.active_keys().unwrap().len(), 1);

    // A caller presenting the plaintext key matches the stored hash
    assert!(ApiKeyManager::verify_key(&full_key, &record.key_hash));

    // Revocation removes the record; the key id no longer resolves
    registry.revoke(&record.key_id).unwrap();
    let err = registry.get(&claims.key_id).unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}
