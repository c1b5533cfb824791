//! Configuration module

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, Result};
use crate::scan::ScanPattern;

const GIB: u64 = 1024 * 1024 * 1024;

/// Main configuration struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Buffer sizes to sweep, in KiB
    pub sizes_kb: Vec<u64>,

    /// Bytes scanned per single-threaded run
    pub single_thread_budget_bytes: u64,

    /// Bytes scanned per multi-threaded run, summed over all workers
    pub multi_thread_budget_bytes: u64,

    /// Workers per multi-threaded run
    pub threads: usize,

    /// Sweeps to run, in order
    pub patterns: Vec<ScanPattern>,

    /// Logical core for single-threaded sweeps; `None` leaves them unpinned
    pub pin_core: Option<usize>,

    /// Stride of the cache-line scan
    pub cache_line_bytes: usize,

    /// Wait for Enter before exiting
    pub pause_on_exit: bool,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_output: false,
        }
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            sizes_kb: doubling_sizes(2, 20),
            single_thread_budget_bytes: 4 * GIB,
            multi_thread_budget_bytes: 64 * GIB,
            threads: 32,
            patterns: ScanPattern::ALL.to_vec(),
            pin_core: Some(2),
            cache_line_bytes: 64,
            pause_on_exit: true,
            logging: LoggingConfig::default(),
        }
    }
}

/// `steps` sizes starting at `first_kb`, each double the previous
pub fn doubling_sizes(first_kb: u64, steps: usize) -> Vec<u64> {
    std::iter::successors(Some(first_kb), |kb| kb.checked_mul(2))
        .take(steps)
        .collect()
}

impl BenchConfig {
    /// Load config from environment
    pub fn from_env() -> Result<Self> {
        // Try to load from file first
        let config_path = std::env::var("MEMBW_CONFIG")
            .unwrap_or_else(|_| "config/membw.json".to_string());

        let config = if std::path::Path::new(&config_path).exists() {
            Self::load(&config_path)?
        } else {
            BenchConfig::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Load config from a JSON file; missing fields take their defaults
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BenchConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &str) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.sizes_kb.is_empty() {
            return Err(invalid("sizes_kb must not be empty"));
        }
        if let Some(kb) = self
            .sizes_kb
            .iter()
            .find(|&&kb| kb == 0 || kb.checked_mul(1024).and_then(|b| usize::try_from(b).ok()).is_none())
        {
            return Err(invalid(format!("size {}KB is out of range", kb)));
        }
        if self.threads == 0 {
            return Err(invalid("threads must be positive"));
        }
        if self.single_thread_budget_bytes == 0 || self.multi_thread_budget_bytes == 0 {
            return Err(invalid("byte budgets must be positive"));
        }
        if self.cache_line_bytes == 0 || self.cache_line_bytes % 4 != 0 {
            return Err(invalid(format!(
                "cache_line_bytes {} must be a positive multiple of 4",
                self.cache_line_bytes
            )));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> BenchError {
    BenchError::InvalidConfig(msg.into())
}
