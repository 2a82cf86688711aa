// ABOUTME: Centralized constants for key formats, generation defaults, and environment variables
// ABOUTME: Single source of truth so key layout and configuration names stay consistent
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Shared constants for key generation and configuration

/// API key prefixes
pub mod key_prefixes {
    /// Live `API` key prefix
    pub const LIVE: &str = "pk_live_";
    /// Test `API` key prefix
    pub const TEST: &str = "pk_test_";
}

/// Character classes used for random string generation
pub mod pattern {
    /// Lowercase alphabet followed by the digits 0-9, in that order.
    /// The ordering is load-bearing: legacy-mode strings are built by
    /// repeating this block verbatim.
    pub const ALPHANUMERIC_BLOCK: &str = "abcdefghijklmnopqrstuvwxyz0123456789";
}

/// Default sizes and lifetimes for generated key material
pub mod defaults {
    /// Length of a generated key id (characters from the alphanumeric block)
    pub const KEY_ID_LENGTH: usize = 10;
    /// Length of the random portion of a full `API` key
    pub const KEY_SECRET_LENGTH: usize = 32;
    /// Length of a generated `HMAC` signing secret
    pub const SIGNING_SECRET_LENGTH: usize = 64;
    /// Minimum accepted length for a configured signing secret
    pub const MIN_SIGNING_SECRET_LENGTH: usize = 32;
    /// Display prefix length for key identification
    pub const KEY_PREFIX_LENGTH: usize = 12;
    /// Default bearer token lifetime in days
    pub const TOKEN_EXPIRY_DAYS: i64 = 30;
    /// Default signing key id (`kid`) advertised in token headers
    pub const SIGNING_KEY_ID: &str = "1";
    /// Base `URL` used when no deployment information is configured
    pub const LOCAL_BASE_URL: &str = "http://localhost:3000";
}

/// Service names used in token claims and structured logs
pub mod service_names {
    /// This service, used as the default token issuer
    pub const KEYMINT: &str = "keymint";
    /// Default audience for minted machine-to-machine tokens
    pub const M2M_API: &str = "m2m-api";
}

/// Environment variable names
pub mod env_config {
    /// `HMAC` signing secret for bearer tokens (required)
    pub const SIGNING_SECRET: &str = "KEYMINT_SIGNING_SECRET";
    /// Token issuer override
    pub const ISSUER: &str = "KEYMINT_ISSUER";
    /// Token audience override
    pub const AUDIENCE: &str = "KEYMINT_AUDIENCE";
    /// Key id (`kid`) advertised in token headers
    pub const KEY_ID: &str = "KEYMINT_KID";
    /// Token lifetime override in days
    pub const TOKEN_EXPIRY_DAYS: &str = "KEYMINT_TOKEN_EXPIRY_DAYS";
    /// Deployment environment (development, preview, production)
    pub const ENVIRONMENT: &str = "KEYMINT_ENV";
    /// Public base `URL`, required in production
    pub const PUBLIC_URL: &str = "KEYMINT_PUBLIC_URL";
    /// Per-deployment `URL` assigned by the hosting platform (preview builds)
    pub const DEPLOYMENT_URL: &str = "DEPLOYMENT_URL";
}
