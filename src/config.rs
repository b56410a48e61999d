//! Runtime configuration.
//!
//! [`MatchConfig`] tunes the ranking; [`ServerConfig`] adds what the HTTP binary needs.
//! Both can be read from the environment.

use log::warn;

use crate::error::MatchError;

/// Multiplier applied to a raw score when the target's identity does not satisfy
/// the scorer's preference.
pub const DEFAULT_INCOMPATIBLE_PENALTY: f64 = 0.1;

/// Environment variable overriding [`MatchConfig::incompatible_penalty`].
pub const PENALTY_ENV: &str = "MATCH_INCOMPATIBLE_PENALTY";

/// Matching configuration.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MatchConfig {
    /// Multiplier for gender-incompatible pairs. `1.0` disables the penalty; `0.0`
    /// zeroes every incompatible score.
    pub incompatible_penalty: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            incompatible_penalty: DEFAULT_INCOMPATIBLE_PENALTY,
        }
    }
}

impl MatchConfig {
    pub fn with_penalty(incompatible_penalty: f64) -> Self {
        Self {
            incompatible_penalty,
        }
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        let p = self.incompatible_penalty;
        if !p.is_finite() || p < 0.0 {
            return Err(MatchError::InvalidPenalty(p));
        }
        Ok(())
    }

    /// Reads [`PENALTY_ENV`]; missing or unusable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let Some(raw) = lookup(PENALTY_ENV) else {
            return Self::default();
        };
        let parsed = raw
            .trim()
            .parse::<f64>()
            .ok()
            .map(Self::with_penalty)
            .filter(|c| c.validate().is_ok());
        match parsed {
            Some(config) => config,
            None => {
                warn!(
                    "ignoring {}={:?}, using default penalty {}",
                    PENALTY_ENV, raw, DEFAULT_INCOMPATIBLE_PENALTY
                );
                Self::default()
            }
        }
    }
}

/// Configuration of the HTTP binary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub matching: MatchConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            matching: MatchConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads `PORT` and [`PENALTY_ENV`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("ignoring PORT={:?}, using {}", raw, defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };
        Self {
            port,
            matching: MatchConfig::from_lookup(&lookup),
        }
    }
}
