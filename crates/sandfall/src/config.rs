//! Runner configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `sandfall.ron` file (if exists)
//! 3. Environment variables prefixed with `SANDFALL_`
//!
//! Example environment variable: `SANDFALL_WORLD__WIDTH=128`

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use sandfall_core::world::WorldConfig;
use serde::{Deserialize, Serialize};

/// Main runner configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SandfallConfig {
    #[serde(default)]
    pub world: WorldConfig,

    #[serde(default)]
    pub run: RunConfig,
}

/// How long to run and how often to report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Seed for reproducible runs (thread rng when unset)
    pub seed: Option<u64>,
    /// Ticks to run when the scenario does not say
    pub ticks: u64,
    /// Snapshot interval in ticks (0 = final frame only)
    pub print_every: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: None,
            ticks: 200,
            print_every: 0,
        }
    }
}

impl SandfallConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `sandfall.ron` in the working directory (if exists)
    /// 3. Environment variables prefixed with `SANDFALL_` (highest priority)
    pub fn load() -> Result<Self> {
        Self::build(File::with_name("sandfall").format(FileFormat::Ron).required(false))
    }

    /// Same layering, with an explicit config file that must exist
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        Self::build(File::from(path).format(FileFormat::Ron))
    }

    fn build<S>(file: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let defaults =
            Config::try_from(&SandfallConfig::default()).context("Failed to encode defaults")?;

        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .add_source(defaults)
            // Layer 2: Config file
            .add_source(file)
            // Layer 3: Environment variables (SANDFALL_WORLD__WIDTH, etc.)
            .add_source(
                Environment::with_prefix("SANDFALL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build().context("Failed to build configuration")?;

        let config: SandfallConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        log::debug!(
            "Loaded config: {}x{} world, {} ticks, seed {:?}",
            config.world.width,
            config.world.height,
            config.run.ticks,
            config.run.seed
        );
        Ok(config)
    }
}
