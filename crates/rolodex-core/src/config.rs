//! Configuration for the Rolodex engine.
//!
//! Supports YAML configuration files, environment variable overrides, and
//! reasonable defaults. Every tunable that shapes filtering, cohorts, or
//! windowing lives here so tests can pin them explicitly.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure for the engine.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub window: WindowConfig,

    #[serde(default)]
    pub facets: FacetConfig,

    #[serde(default)]
    pub cohorts: CohortConfig,
}

impl EngineConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Config file specified by ROLODEX_CONFIG env var
    /// 3. ./config/rolodex.yaml
    /// 4. Hardcoded defaults (lowest priority)
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        builder = Self::set_defaults(builder)?;

        if let Ok(config_path) = std::env::var("ROLODEX_CONFIG") {
            builder = builder.add_source(File::with_name(&config_path).required(false));
        }

        builder = builder.add_source(File::with_name("./config/rolodex").required(false));

        // Example: ROLODEX_WINDOW__INITIAL=24
        builder = builder.add_source(
            Environment::with_prefix("ROLODEX")
                .separator("__")
                .try_parsing(true),
        );

        let config: EngineConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Set default values for all configuration options.
    fn set_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            .set_default("window.initial", 18)?
            .set_default("window.step", 12)?
            .set_default("facets.catalog_cap", 30)?
            .set_default("cohorts.new_period_days", 30)?
            .set_default("cohorts.dormant_days", 60)?
            .set_default("cohorts.response_window_days", 7)?
            .set_default("cohorts.champion_strength", 80)?
            .set_default("cohorts.warm_mutual_threshold", 3)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.initial == 0 {
            return Err(ConfigError::Message(
                "window.initial must be > 0".to_string(),
            ));
        }

        if self.window.step == 0 {
            return Err(ConfigError::Message("window.step must be > 0".to_string()));
        }

        if self.facets.catalog_cap == 0 {
            return Err(ConfigError::Message(
                "facets.catalog_cap must be > 0".to_string(),
            ));
        }

        if self.cohorts.champion_strength > 100 {
            return Err(ConfigError::Message(
                "cohorts.champion_strength must be <= 100".to_string(),
            ));
        }

        if self.cohorts.new_period_days <= 0
            || self.cohorts.dormant_days <= 0
            || self.cohorts.response_window_days <= 0
        {
            return Err(ConfigError::Message(
                "cohort day thresholds must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from a specific file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config: EngineConfig = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }
}

/// Incremental disclosure window sizing.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct WindowConfig {
    /// Visible record count on first render and after filter changes.
    pub initial: usize,

    /// How many records each expansion reveals.
    pub step: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            initial: 18,
            step: 12,
        }
    }
}

/// Facet catalog limits.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct FacetConfig {
    /// Maximum distinct values surfaced per facet group.
    pub catalog_cap: usize,
}

impl Default for FacetConfig {
    fn default() -> Self {
        Self { catalog_cap: 30 }
    }
}

/// Time and score thresholds for the built-in cohorts.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct CohortConfig {
    /// Trailing calendar days that count as "new this period".
    pub new_period_days: i64,

    /// Days without contact after which a record needs attention.
    pub dormant_days: i64,

    /// Trailing days a response counts toward the response rate.
    pub response_window_days: i64,

    /// Minimum strength that qualifies a record as a champion.
    pub champion_strength: u8,

    /// Minimum mutual connections that qualify an invitation as warm.
    pub warm_mutual_threshold: u32,
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            new_period_days: 30,
            dormant_days: 60,
            response_window_days: 7,
            champion_strength: 80,
            warm_mutual_threshold: 3,
        }
    }
}
