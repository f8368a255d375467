//! Engine configuration loaded from environment variables.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `BASTION_OPENING_BALANCE` | `1000` | wallet balance of a new session |
//! | `BASTION_DELAY` | `none` | `none`, `simulated`, or a fixed delay in milliseconds |

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;

use bastion_lending::DEFAULT_OPENING_BALANCE;

use crate::delay::{Delay, FixedDelay, NoDelay, SimulatedLatency};

pub const OPENING_BALANCE_VAR: &str = "BASTION_OPENING_BALANCE";
pub const DELAY_VAR: &str = "BASTION_DELAY";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayMode {
    None,
    Simulated,
    Fixed(Duration),
}

impl DelayMode {
    pub fn into_delay(self) -> Arc<dyn Delay> {
        match self {
            DelayMode::None => Arc::new(NoDelay),
            DelayMode::Simulated => Arc::new(SimulatedLatency),
            DelayMode::Fixed(d) => Arc::new(FixedDelay(d)),
        }
    }

    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_lowercase().as_str() {
            "" | "none" | "0" => Ok(DelayMode::None),
            "simulated" => Ok(DelayMode::Simulated),
            other => other
                .parse::<u64>()
                .map(|ms| DelayMode::Fixed(Duration::from_millis(ms)))
                .map_err(|e| ConfigError::InvalidValue {
                    key: DELAY_VAR,
                    value: raw.to_string(),
                    reason: format!("expected none, simulated or milliseconds ({e})"),
                }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub opening_balance: Decimal,
    pub delay: DelayMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            opening_balance: DEFAULT_OPENING_BALANCE,
            delay: DelayMode::None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map here).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        if let Some(raw) = lookup(OPENING_BALANCE_VAR) {
            let balance = raw
                .trim()
                .parse::<Decimal>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: OPENING_BALANCE_VAR,
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
            if balance < Decimal::ZERO {
                return Err(ConfigError::InvalidValue {
                    key: OPENING_BALANCE_VAR,
                    value: raw,
                    reason: "must not be negative".to_string(),
                });
            }
            cfg.opening_balance = balance;
        }

        if let Some(raw) = lookup(DELAY_VAR) {
            cfg.delay = DelayMode::parse(&raw)?;
        }

        Ok(cfg)
    }
}
