//! Configuration management for the helpdesk.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::policy::{CustomerDeletePolicy, TransitionRules};
use crate::seed::Seed;
use helpdesk_runtime::{StoreConfig, MAX_BROADCAST_CAPACITY};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Data set to start with: `sample` or `empty`
pub const SEED_VAR: &str = "HELPDESK_SEED";
/// Customer delete policy: `orphan`, `cascade` or `block`
pub const CUSTOMER_DELETE_VAR: &str = "HELPDESK_CUSTOMER_DELETE";
/// Transition rules: `permissive` or `guarded`
pub const TRANSITIONS_VAR: &str = "HELPDESK_TRANSITIONS";
/// Capacity of the action broadcast channel
pub const BROADCAST_CAPACITY_VAR: &str = "HELPDESK_BROADCAST_CAPACITY";
/// Log filter directives
pub const LOG_VAR: &str = "RUST_LOG";

/// Errors from strict configuration loading
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set to a value that does not parse
    #[error("invalid value `{value}` for {key}: {reason}")]
    InvalidValue {
        /// Variable name
        key: &'static str,
        /// Rejected value
        value: String,
        /// Parser message
        reason: String,
    },
}

/// Helpdesk configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskConfig {
    /// Initial data set
    pub seed: Seed,
    /// What deleting a customer does to its tickets
    pub customer_delete: CustomerDeletePolicy,
    /// Which status moves are accepted
    pub transitions: TransitionRules,
    /// Capacity of the action broadcast channel
    pub broadcast_capacity: usize,
    /// Log filter (trace, debug, info, warn, error or full directives)
    pub log_filter: String,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            seed: Seed::Sample,
            customer_delete: CustomerDeletePolicy::Orphan,
            transitions: TransitionRules::Permissive,
            broadcast_capacity: 64,
            log_filter: "helpdesk=info".to_string(),
        }
    }
}

impl DeskConfig {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from environment variables, rejecting bad values
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first variable that is
    /// set but does not parse.
    pub fn try_from_env() -> Result<Self, ConfigError> {
        Self::try_from_lookup(|key| env::var(key).ok())
    }

    /// Lenient loading from any key/value source
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            seed: lookup(SEED_VAR)
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.seed),
            customer_delete: lookup(CUSTOMER_DELETE_VAR)
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.customer_delete),
            transitions: lookup(TRANSITIONS_VAR)
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.transitions),
            broadcast_capacity: lookup(BROADCAST_CAPACITY_VAR)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.broadcast_capacity),
            log_filter: lookup(LOG_VAR).unwrap_or(defaults.log_filter),
        }
    }

    /// Strict loading from any key/value source
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first variable that is
    /// set but does not parse.
    pub fn try_from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            seed: parse_var(&lookup, SEED_VAR)?.unwrap_or(defaults.seed),
            customer_delete: parse_var(&lookup, CUSTOMER_DELETE_VAR)?
                .unwrap_or(defaults.customer_delete),
            transitions: parse_var(&lookup, TRANSITIONS_VAR)?.unwrap_or(defaults.transitions),
            broadcast_capacity: parse_capacity(&lookup)?.unwrap_or(defaults.broadcast_capacity),
            log_filter: lookup(LOG_VAR).unwrap_or(defaults.log_filter),
        })
    }

    /// Runtime settings derived from this configuration
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default().with_broadcast_capacity(self.broadcast_capacity)
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let Some(value) = lookup(key) else {
        return Ok(None);
    };
    let parsed = value.trim().parse::<T>();
    match parsed {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => Err(ConfigError::InvalidValue {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

fn parse_capacity<F>(lookup: &F) -> Result<Option<usize>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(capacity) = parse_var::<F, usize>(lookup, BROADCAST_CAPACITY_VAR)? else {
        return Ok(None);
    };
    if (1..=MAX_BROADCAST_CAPACITY).contains(&capacity) {
        Ok(Some(capacity))
    } else {
        Err(ConfigError::InvalidValue {
            key: BROADCAST_CAPACITY_VAR,
            value: capacity.to_string(),
            reason: format!("must be between 1 and {MAX_BROADCAST_CAPACITY}"),
        })
    }
}
