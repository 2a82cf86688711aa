// ABOUTME: Configuration module for deployment-specific settings
// ABOUTME: Environment variable parsing and validation live in environment.rs
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Configuration management

/// Environment-based configuration
pub mod environment;

pub use environment::{AppConfig, AuthConfig, Environment};
