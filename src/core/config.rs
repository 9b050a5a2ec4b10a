//! Configuration: preload margins with TOML parsing and smart defaults.

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, WindowError};

/// Rows prefetched behind the access point by default.
pub const UP_PRELOAD_COUNT: usize = 20;

/// Rows prefetched ahead of the access point by default.
///
/// Larger than the backward margin since scroll-down is the dominant access
/// pattern. Also the distance from the window tail at which a load-more
/// request is armed.
pub const DOWN_PRELOAD_COUNT: usize = 40;

/// Upper bound on either margin; anything larger is a configuration mistake,
/// not a tuning choice.
const MAX_PRELOAD: usize = 10_000;

/// Access-layer configuration model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AccessConfig {
    /// Rows prefetched behind the access point.
    pub up_preload: usize,
    /// Rows prefetched ahead of the access point; also the tail margin that
    /// arms a load-more request.
    pub down_preload: usize,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            up_preload: UP_PRELOAD_COUNT,
            down_preload: DOWN_PRELOAD_COUNT,
        }
    }
}

impl AccessConfig {
    /// Parse from a TOML string, falling back to defaults for absent keys.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject margins that would defeat the purpose of windowed access.
    pub fn validate(&self) -> Result<()> {
        if self.down_preload == 0 {
            return Err(WindowError::InvalidConfig {
                details: "down_preload must be at least 1".to_string(),
            });
        }
        if self.up_preload > MAX_PRELOAD || self.down_preload > MAX_PRELOAD {
            return Err(WindowError::InvalidConfig {
                details: format!(
                    "preload margins must not exceed {MAX_PRELOAD} (got up={}, down={})",
                    self.up_preload, self.down_preload
                ),
            });
        }
        Ok(())
    }
}
