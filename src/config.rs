//! Runtime configuration: an optional TOML file overlaid by command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::physics::RunMode;
use crate::run::{
    RunSettings, DEFAULT_BATCH_SIZE, DEFAULT_BUFFER_CAPACITY, DEFAULT_LUMINOSITY_PER_BATCH,
    MAX_BUFFER_CAPACITY,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub mode: RunMode,
    pub allow_isr: bool,
    /// RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
    pub batch_size: usize,
    pub buffer_capacity: usize,
    pub luminosity_per_batch: f64,
    /// Frame period in milliseconds.
    pub tick_ms: u64,
    pub log_file: PathBuf,
    /// Default filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: RunMode::All,
            allow_isr: true,
            seed: None,
            batch_size: DEFAULT_BATCH_SIZE,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            luminosity_per_batch: DEFAULT_LUMINOSITY_PER_BATCH,
            tick_ms: 16, // ~60 FPS
            log_file: PathBuf::from("zeus-explorer.log"),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be at least 1".into()));
        }
        if self.buffer_capacity == 0 || self.buffer_capacity > MAX_BUFFER_CAPACITY {
            return Err(Error::Config(format!(
                "buffer_capacity must be between 1 and {}",
                MAX_BUFFER_CAPACITY
            )));
        }
        if self.tick_ms == 0 {
            return Err(Error::Config("tick_ms must be at least 1".into()));
        }
        if !self.luminosity_per_batch.is_finite() || self.luminosity_per_batch < 0.0 {
            return Err(Error::Config(
                "luminosity_per_batch must be a non-negative number".into(),
            ));
        }
        Ok(())
    }

    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            mode: self.mode,
            allow_isr: self.allow_isr,
            batch_size: self.batch_size,
            buffer_capacity: self.buffer_capacity,
            luminosity_per_batch: self.luminosity_per_batch,
        }
    }
}
