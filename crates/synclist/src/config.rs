//! # Arbiter Configuration
//!
//! Selects how a blocked thread waits for admission. Loaded once, usually
//! from a TOML file:
//!
//! ```toml
//! wait_strategy = "spin"
//! spin_limit = 64
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SeqError, SeqResult};

/// How a thread waits while admission is refused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitStrategy {
    /// Re-test the state, yielding the thread's turn between attempts.
    ///
    /// Cheap to reason about, burns CPU under contention. Fine for short
    /// critical sections.
    Spin,
    /// Block on the arbiter's condition variable and re-check on wake.
    #[default]
    Park,
}

/// Configuration for an [`AccessArbiter`](crate::AccessArbiter).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    /// Waiting strategy.
    pub wait_strategy: WaitStrategy,
    /// Busy-spin iterations before yielding (spin) or parking (park).
    pub spin_limit: u32,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self::parking()
    }
}

impl ArbiterConfig {
    /// Spinning preset: short busy-spin, then yield on every retry.
    #[must_use]
    pub const fn spinning() -> Self {
        Self {
            wait_strategy: WaitStrategy::Spin,
            spin_limit: 16,
        }
    }

    /// Parking preset: brief spin to absorb short critical sections, then park.
    #[must_use]
    pub const fn parking() -> Self {
        Self {
            wait_strategy: WaitStrategy::Park,
            spin_limit: 8,
        }
    }

    /// Parses a configuration from TOML text. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SeqError::InvalidConfig`] if the text is not valid TOML or
    /// names an unknown strategy.
    pub fn from_toml_str(text: &str) -> SeqResult<Self> {
        toml::from_str(text).map_err(|e| SeqError::InvalidConfig(e.to_string()))
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SeqError::InvalidConfig`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> SeqResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SeqError::InvalidConfig(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(
            "Loaded arbiter config from {}: {:?}",
            path.display(),
            config
        );
        Ok(config)
    }
}
