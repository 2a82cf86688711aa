// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Environment-based configuration management

use crate::constants::{defaults, env_config, service_names};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{info, warn};

/// Deployment environment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Per-branch preview deployment
    Preview,
    /// Production deployment
    Production,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "preview" => Self::Preview,
            // Default fallback for unrecognized values
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if this is a development environment
    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Preview => write!(f, "preview"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Token signing and claim configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// `HMAC` signing secret for bearer tokens
    pub signing_secret: String,
    /// Token issuer
    pub issuer: String,
    /// Token audience
    pub audience: String,
    /// Key id (`kid`) advertised in token headers
    pub key_id: String,
    /// Token lifetime in days
    pub token_expiry_days: i64,
}

impl AuthConfig {
    /// Load and validate auth configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the signing secret is absent or too short, or if
    /// the expiry override is not a positive integer
    pub fn from_env() -> AppResult<Self> {
        let signing_secret = env::var(env_config::SIGNING_SECRET).map_err(|_| {
            AppError::config_missing(format!(
                "{} must be set to a secret of at least {} characters",
                env_config::SIGNING_SECRET,
                defaults::MIN_SIGNING_SECRET_LENGTH
            ))
        })?;

        if signing_secret.len() < defaults::MIN_SIGNING_SECRET_LENGTH {
            return Err(AppError::config_invalid(format!(
                "{} is too short: {} characters, need at least {}",
                env_config::SIGNING_SECRET,
                signing_secret.len(),
                defaults::MIN_SIGNING_SECRET_LENGTH
            )));
        }

        let issuer =
            env::var(env_config::ISSUER).unwrap_or_else(|_| service_names::KEYMINT.into());
        let audience =
            env::var(env_config::AUDIENCE).unwrap_or_else(|_| service_names::M2M_API.into());
        let key_id =
            env::var(env_config::KEY_ID).unwrap_or_else(|_| defaults::SIGNING_KEY_ID.into());

        let token_expiry_days = match env::var(env_config::TOKEN_EXPIRY_DAYS) {
            Ok(raw) => {
                let days: i64 = raw.parse().map_err(|_| {
                    AppError::config_invalid(format!(
                        "{} must be an integer, got {raw:?}",
                        env_config::TOKEN_EXPIRY_DAYS
                    ))
                })?;
                if days <= 0 {
                    return Err(AppError::config_invalid(format!(
                        "{} must be positive, got {days}",
                        env_config::TOKEN_EXPIRY_DAYS
                    )));
                }
                days
            }
            Err(_) => defaults::TOKEN_EXPIRY_DAYS,
        };

        Ok(Self {
            signing_secret,
            issuer,
            audience,
            key_id,
            token_expiry_days,
        })
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Base `URL` this deployment is reachable at
    pub base_url: String,
    /// Token configuration
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load the full application configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if auth configuration is missing/invalid, or if the
    /// public `URL` is not set in production
    pub fn from_env() -> AppResult<Self> {
        let environment = env::var(env_config::ENVIRONMENT)
            .map(|raw| Environment::from_str_or_default(&raw))
            .unwrap_or_default();

        let base_url = Self::resolve_base_url(&environment)?;
        let auth = AuthConfig::from_env()?;

        info!(
            environment = %environment,
            base_url = %base_url,
            issuer = %auth.issuer,
            "configuration loaded"
        );

        Ok(Self {
            environment,
            base_url,
            auth,
        })
    }

    /// Determine the deployment base URL for the given environment
    fn resolve_base_url(environment: &Environment) -> AppResult<String> {
        if environment.is_production() {
            return env::var(env_config::PUBLIC_URL).map_err(|_| {
                AppError::config_missing(format!(
                    "{} must be set in production",
                    env_config::PUBLIC_URL
                ))
            });
        }

        match env::var(env_config::DEPLOYMENT_URL) {
            Ok(host) => Ok(format!("https://{host}")),
            Err(_) => {
                if !environment.is_development() {
                    warn!(
                        environment = %environment,
                        "no deployment URL configured, falling back to {}",
                        defaults::LOCAL_BASE_URL
                    );
                }
                Ok(defaults::LOCAL_BASE_URL.into())
            }
        }
    }
}
