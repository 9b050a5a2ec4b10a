//! LW-prefixed error types with structured error codes.

#![allow(missing_docs)]

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, WindowError>;

/// Top-level error type for the windowed access core.
///
/// Only contract violations and infrastructure failures live here; transient
/// data conditions (cache miss, cancelled computation) are modeled as
/// placeholder fallbacks and never surface as errors.
#[derive(Debug, Error)]
pub enum WindowError {
    #[error("[LW-1001] row {row} out of range, current window holds {row_count} rows")]
    RowOutOfRange { row: usize, row_count: usize },

    #[error("[LW-1101] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[LW-1102] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[LW-2001] channel closed in component {component}")]
    ChannelClosed { component: &'static str },
}

impl WindowError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::RowOutOfRange { .. } => "LW-1001",
            Self::InvalidConfig { .. } => "LW-1101",
            Self::ConfigParse { .. } => "LW-1102",
            Self::ChannelClosed { .. } => "LW-2001",
        }
    }

    /// Whether the failure is a caller contract violation rather than a
    /// runtime data condition.
    #[must_use]
    pub const fn is_contract_violation(&self) -> bool {
        matches!(self, Self::RowOutOfRange { .. })
    }
}

impl From<toml::de::Error> for WindowError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
