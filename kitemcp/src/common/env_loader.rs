//! Environment variable loading with a shared prefix
//!
//! All kitemcp settings live under one prefix (`KITE_API_KEY`, `KITE_API_ROOT`, ...),
//! so lookups go through an [`EnvLoader`] that owns the prefix.

use std::env;

/// Read a variable, treating an unset or blank value as absent
pub fn load_env_nonempty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a boolean flag in the usual shell spellings
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Loader for environment variables sharing a prefix
#[derive(Debug, Clone)]
pub struct EnvLoader {
    prefix: String,
}

impl EnvLoader {
    /// Create a new environment loader with the given prefix
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    /// Full variable name for `suffix`, e.g. `KITE_API_KEY` for `API_KEY`
    pub fn key(&self, suffix: &str) -> String {
        format!("{}_{}", self.prefix, suffix)
    }

    /// Load a string value with default
    pub fn load_string(&self, suffix: &str, default: &str) -> String {
        load_env_nonempty(&self.key(suffix)).unwrap_or_else(|| default.to_string())
    }

    /// Load a string value, `None` when unset or blank
    pub fn load_optional(&self, suffix: &str) -> Option<String> {
        load_env_nonempty(&self.key(suffix))
    }

    /// Load a boolean flag, returning the raw text when it is not a recognised flag
    pub fn load_flag(&self, suffix: &str) -> Option<Result<bool, String>> {
        self.load_optional(suffix)
            .map(|raw| parse_flag(&raw).ok_or(raw))
    }
}
