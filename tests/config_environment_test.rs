// ABOUTME: Tests for environment-based configuration loading and validation
// ABOUTME: Serialized because they mutate process environment variables
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use keymint::config::{AppConfig, AuthConfig, Environment};
use keymint::constants::env_config;
use keymint::errors::ErrorCode;
use serial_test::serial;
use std::env;

const VALID_SECRET: &str = "0123456789abcdefghijklmnopqrstuvwxyz";

fn clear_env() {
    for var in [
        env_config::SIGNING_SECRET,
        env_config::ISSUER,
        env_config::AUDIENCE,
        env_config::KEY_ID,
        env_config::TOKEN_EXPIRY_DAYS,
        env_config::ENVIRONMENT,
        env_config::PUBLIC_URL,
        env_config::DEPLOYMENT_URL,
    ] {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_missing_signing_secret() {
    clear_env();
    let err = AuthConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigMissing);
}

#[test]
#[serial]
fn test_short_signing_secret_rejected() {
    clear_env();
    env::set_var(env_config::SIGNING_SECRET, "too-short");
    let err = AuthConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigInvalid);
}

#[test]
#[serial]
fn test_defaults_applied() {
    clear_env();
    env::set_var(env_config::SIGNING_SECRET, VALID_SECRET);

    let config = AuthConfig::from_env().unwrap();
    assert_eq!(config.signing_secret, VALID_SECRET);
    assert_eq!(config.issuer, "keymint");
    assert_eq!(config.audience, "m2m-api");
    assert_eq!(config.key_id, "1");
    assert_eq!(config.token_expiry_days, 30);
}

#[test]
#[serial]
fn test_overrides_respected() {
    clear_env();
    env::set_var(env_config::SIGNING_SECRET, VALID_SECRET);
    env::set_var(env_config::ISSUER, "my-service");
    env::set_var(env_config::AUDIENCE, "my-api");
    env::set_var(env_config::KEY_ID, "2026-01");
    env::set_var(env_config::TOKEN_EXPIRY_DAYS, "7");

    let config = AuthConfig::from_env().unwrap();
    assert_eq!(config.issuer, "my-service");
    assert_eq!(config.audience, "my-api");
    assert_eq!(config.key_id, "2026-01");
    assert_eq!(config.token_expiry_days, 7);
}

#[test]
#[serial]
fn test_invalid_expiry_rejected() {
    clear_env();
    env::set_var(env_config::SIGNING_SECRET, VALID_SECRET);

    env::set_var(env_config::TOKEN_EXPIRY_DAYS, "soon");
    let err = AuthConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigInvalid);

    env::set_var(env_config::TOKEN_EXPIRY_DAYS, "0");
    let err = AuthConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigInvalid);

    env::set_var(env_config::TOKEN_EXPIRY_DAYS, "-3");
    let err = AuthConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigInvalid);
}

#[test]
#[serial]
fn test_development_base_url_defaults_to_localhost() {
    clear_env();
    env::set_var(env_config::SIGNING_SECRET, VALID_SECRET);

    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.base_url, "http://localhost:3000");
}

#[test]
#[serial]
fn test_preview_base_url_from_deployment_url() {
    clear_env();
    env::set_var(env_config::SIGNING_SECRET, VALID_SECRET);
    env::set_var(env_config::ENVIRONMENT, "preview");
    env::set_var(env_config::DEPLOYMENT_URL, "my-branch.example.dev");

    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.environment, Environment::Preview);
    assert_eq!(config.base_url, "https://my-branch.example.dev");
}

#[test]
#[serial]
fn test_preview_without_deployment_url_falls_back() {
    clear_env();
    env::set_var(env_config::SIGNING_SECRET, VALID_SECRET);
    env::set_var(env_config::ENVIRONMENT, "preview");

    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.base_url, "http://localhost:3000");
}

#[test]
#[serial]
fn test_production_requires_public_url() {
    clear_env();
    env::set_var(env_config::SIGNING_SECRET, VALID_SECRET);
    env::set_var(env_config::ENVIRONMENT, "production");

    let err = AppConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigMissing);

    env::set_var(env_config::PUBLIC_URL, "https://keys.example.com");
    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.environment, Environment::Production);
    assert_eq!(config.base_url, "https://keys.example.com");
}
