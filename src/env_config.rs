//! Environment configuration validation and loading: validates required
//! environment variables at startup and fails fast with a collected list
//! of errors rather than one-at-a-time panics.

use anyhow::Result;
use std::env;

/// Required environment variables that must be set.
const REQUIRED_VARS: &[&str] = &["SPIDER_URL"];

/// Environment variables that should be validated if present.
const VALIDATED_VARS: &[(&str, fn(&str) -> bool)] = &[
    ("SERVER_PORT", validate_port),
    ("WORKER_POOL_SIZE", validate_positive_number),
];

/// Validates all required environment variables are set and any present
/// optional ones parse correctly.
pub fn validate_env() -> Result<()> {
    let mut errors = Vec::new();

    for var in REQUIRED_VARS {
        if env::var(var).is_err() {
            errors.push(format!("Missing required environment variable: {var}"));
        }
    }

    for (var, validator) in VALIDATED_VARS {
        if let Ok(value) = env::var(var) {
            if !validator(&value) {
                errors.push(format!(
                    "Invalid value for environment variable {var}: '{value}'"
                ));
            }
        }
    }

    if !errors.is_empty() {
        anyhow::bail!(
            "Environment configuration errors:\n  - {}",
            errors.join("\n  - ")
        );
    }

    Ok(())
}

/// Logs non-sensitive configuration at startup. Upstream credentials live
/// per-account in the account store, not in the environment, so there is
/// nothing here that needs redaction beyond `SPIDER_URL` itself (which is a
/// base URL, not a secret, and is logged as-is).
pub fn log_env_config() {
    tracing::info!("Environment configuration:");
    log_var("SPIDER_URL");
    log_var("SERVER_HOST");
    log_var("SERVER_PORT");
    log_var("WORKER_POOL_SIZE");
    log_var("RUST_LOG");
}

fn log_var(name: &str) {
    if let Ok(value) = env::var(name) {
        tracing::info!("  {}: {}", name, value);
    }
}

/// Validate port number.
fn validate_port(value: &str) -> bool {
    value.parse::<u16>().is_ok()
}

/// Validate positive number.
fn validate_positive_number(value: &str) -> bool {
    value.parse::<u32>().map(|n| n > 0).unwrap_or(false)
}
