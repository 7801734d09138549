//! Pipeline configuration
//!
//! Settings come from command-line flags, optionally layered over a TOML
//! file:
//!
//! ```toml
//! [pipeline]
//! cores = 8
//! details = false
//! numeric_pid = true
//! skip_first_sample = true
//! ```

use crate::error::{PcpuvisError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings consumed by [`crate::pipeline::run`]
///
/// # Example
/// ```
/// use pcpuvis::config::PipelineConfig;
///
/// let config = PipelineConfig { cores: 4, ..Default::default() };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// CPU cores of the monitored system; raw samples are divided by it
    pub cores: u32,

    /// Rank individual instances (`chrome#1`) instead of process groups
    pub detailed: bool,

    /// Instance suffixes are PIDs after `_` instead of instance numbers after `#`
    pub numeric_pid: bool,

    /// Data rows dropped before aggregation
    ///
    /// Perfmon writes a blank first sample; set to 1 to discard it.
    pub skip_leading_samples: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cores: 1,
            detailed: false,
            numeric_pid: false,
            skip_leading_samples: 0,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.cores == 0 {
            return Err(PcpuvisError::InvalidConfig(
                "cores must be a positive integer, got 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// `[pipeline]` table of the config file; unset keys defer to flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    pub cores: Option<u32>,
    pub details: Option<bool>,
    pub numeric_pid: Option<bool>,
    pub skip_first_sample: Option<bool>,
}

/// Root of `pcpuvis.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub pipeline: FileSettings,
}

impl ConfigFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| PcpuvisError::InvalidConfig(e.to_string()))
    }
}

/// Flag values as given on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagSettings {
    pub cores: Option<u32>,
    pub details: bool,
    pub numeric_pid: bool,
    pub skip_first_sample: bool,
}

/// Combine flags with an optional config file; a set flag always wins
///
/// Fails when no core count is given anywhere.
pub fn resolve(flags: FlagSettings, file: Option<&ConfigFile>) -> Result<PipelineConfig> {
    let settings = file.map(|f| f.pipeline.clone()).unwrap_or_default();

    let cores = flags.cores.or(settings.cores).ok_or_else(|| {
        PcpuvisError::InvalidConfig("core count is required (-c <cores>)".to_string())
    })?;
    let skip_first = flags.skip_first_sample || settings.skip_first_sample.unwrap_or(false);

    let config = PipelineConfig {
        cores,
        detailed: flags.details || settings.details.unwrap_or(false),
        numeric_pid: flags.numeric_pid || settings.numeric_pid.unwrap_or(false),
        skip_leading_samples: usize::from(skip_first),
    };
    config.validate()?;
    Ok(config)
}
