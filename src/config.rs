//! Configuration for discovery and logging, read from YAML.
//!
//! ```yaml
//! discovery:
//!   failure_detail: summary
//! logging:
//!   filter: "theorist=debug"
//!   json: false
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{err_msg, TheoryError};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TheoristConfig {
    pub discovery: DiscoveryConfig,
    pub logging: LoggingConfig,
}

impl TheoristConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, TheoryError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
            .map_err(|e| err_msg!(Config, "invalid configuration").with_source(e))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TheoryError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            err_msg!(Config, "failed to read '{}'", path.display()).with_source(e)
        })?;
        Self::from_yaml_str(&text)
    }
}

/// How much of an underlying error a resolution-failure case reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureDetail {
    /// The failing error's own message.
    Summary,
    /// The failing error followed by its whole cause chain.
    #[default]
    Chain,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    pub failure_detail: FailureDetail,
}

impl DiscoveryConfig {
    /// Renders `err` at the configured level of detail.
    pub fn describe(&self, err: &TheoryError) -> String {
        match self.failure_detail {
            FailureDetail::Summary => err.to_string(),
            FailureDetail::Chain => err.chain_text(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
            json: false,
        }
    }
}
