// ABOUTME: Signed bearer token minting and validation for issued API keys
// ABOUTME: HS256 JWTs carrying the key id, with issuer/audience/expiry enforcement
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Bearer Token Management
//!
//! Machine-to-machine callers authenticate with a signed JWT minted at key
//! creation time. The token carries the random key id produced by
//! [`crate::random`]; validation enforces signature, expiry, issuer, audience,
//! and the advertised `kid` header.

use crate::config::environment::AuthConfig;
use crate::constants::defaults;
use crate::errors::{AppError, AppResult};
use crate::random::random_string;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Claims carried by a minted API token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiTokenClaims {
    /// Issuer
    pub iss: String,
    /// Subject (the key id)
    pub sub: String,
    /// Audience
    pub aud: String,
    /// Issued-at timestamp (seconds since epoch)
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,
    /// Key id of the API key this token was minted for
    pub key_id: String,
}

/// Token manager for HS256 API tokens
#[derive(Clone)]
pub struct ApiTokenManager {
    secret: Zeroizing<Vec<u8>>,
    issuer: String,
    audience: String,
    kid: String,
    token_expiry_days: i64,
}

impl ApiTokenManager {
    /// Create a new token manager with the default 30-day expiry
    pub fn new(
        secret: &[u8],
        issuer: impl Into<String>,
        audience: impl Into<String>,
        kid: impl Into<String>,
    ) -> Self {
        Self {
            secret: Zeroizing::new(secret.to_vec()),
            issuer: issuer.into(),
            audience: audience.into(),
            kid: kid.into(),
            token_expiry_days: defaults::TOKEN_EXPIRY_DAYS,
        }
    }

    /// Override the default token lifetime
    #[must_use]
    pub fn with_token_expiry_days(mut self, days: i64) -> Self {
        self.token_expiry_days = days;
        self
    }

    /// Build a token manager from validated configuration
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.signing_secret.as_bytes(),
            config.issuer.clone(),
            config.audience.clone(),
            config.key_id.clone(),
        )
        .with_token_expiry_days(config.token_expiry_days)
    }

    /// Generate a cryptographically secure signing secret
    ///
    /// 64 characters drawn uniformly from `[a-z0-9]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the secure random source cannot supply bytes
    pub fn generate_signing_secret() -> AppResult<String> {
        random_string(defaults::SIGNING_SECRET_LENGTH)
    }

    /// Mint an HS256 token for the given key id using the default lifetime
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn mint(&self, key_id: &str) -> AppResult<String> {
        self.mint_with_expiry(key_id, Duration::days(self.token_expiry_days))
    }

    /// Mint an HS256 token for the given key id with an explicit lifetime
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn mint_with_expiry(&self, key_id: &str, expires_in: Duration) -> AppResult<String> {
        let now = Utc::now();
        let expiry = now + expires_in;

        let claims = ApiTokenClaims {
            iss: self.issuer.clone(),
            sub: key_id.to_owned(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            key_id: key_id.to_owned(),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(self.kid.clone());

        let encoding_key = EncodingKey::from_secret(&self.secret);
        encode(&header, &claims, &encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode API token: {e}")))
    }

    /// Validate an API token and return its claims
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The token is malformed or not valid JWT format
    /// - The token header is missing the expected `kid`
    /// - The signature is invalid
    /// - The token has expired
    /// - Issuer or audience do not match
    pub fn validate(&self, token: &str) -> AppResult<ApiTokenClaims> {
        // Check the advertised key id before touching the signature, so key
        // rotation mismatches surface as their own failure.
        let header = decode_header(token)
            .map_err(|e| AppError::auth_malformed(format!("Invalid token header: {e}")))?;
        let kid = header
            .kid
            .ok_or_else(|| AppError::auth_malformed("Token header missing kid"))?;
        if kid != self.kid {
            return Err(AppError::auth_invalid(format!("Unknown signing key id: {kid}")));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_issuer(&[self.issuer.as_str()]);

        let decoding_key = DecodingKey::from_secret(&self.secret);
        let token_data = decode::<ApiTokenClaims>(token, &decoding_key, &validation)
            .map_err(|e| Self::convert_jwt_error(&e))?;

        Ok(token_data.claims)
    }

    /// Map jsonwebtoken errors onto the application's error codes
    fn convert_jwt_error(e: &jsonwebtoken::errors::Error) -> AppError {
        use jsonwebtoken::errors::ErrorKind;
        tracing::warn!("API token validation failed: {:?}", e);

        match e.kind() {
            ErrorKind::ExpiredSignature => AppError::auth_expired(),
            ErrorKind::InvalidSignature => {
                AppError::auth_invalid("Token signature verification failed")
            }
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => AppError::auth_malformed(format!("Malformed token: {e}")),
            _ => AppError::auth_invalid(format!("Token validation failed: {e}")),
        }
    }
}
