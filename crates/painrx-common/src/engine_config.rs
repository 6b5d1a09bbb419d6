//! Engine configuration.
//!
//! Tunables for the rule pipeline, read from painrx.toml (or the path in
//! PAINRX_CONFIG). Every field has a default so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PainRxError, Result};

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pain-trend abort/advisory thresholds
    #[serde(default)]
    pub pain_trend: PainTrendConfig,

    /// Low-body-weight rule
    #[serde(default)]
    pub weight: WeightConfig,
}

// ── Pain trend ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PainTrendConfig {
    /// Worsening (or inversion amplitude) at or above which generation stops.
    #[serde(default = "default_abort_delta")]
    pub abort_delta: u8,

    /// Worsening (or inversion amplitude) that only adds an advisory comment.
    #[serde(default = "default_advisory_delta")]
    pub advisory_delta: u8,
}

fn default_abort_delta() -> u8 { 2 }
fn default_advisory_delta() -> u8 { 1 }

impl Default for PainTrendConfig {
    fn default() -> Self {
        Self {
            abort_delta: default_abort_delta(),
            advisory_delta: default_advisory_delta(),
        }
    }
}

// ── Weight ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    /// Patients strictly below this weight get the protocol's weight adjustment.
    #[serde(default = "default_low_weight")]
    pub low_weight_threshold_kg: f64,
}

fn default_low_weight() -> f64 { 50.0 }

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            low_weight_threshold_kg: default_low_weight(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────────────────

impl EngineConfig {
    /// Load configuration from painrx.toml.
    /// Checks PAINRX_CONFIG env var first, then the current directory.
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var("PAINRX_CONFIG").unwrap_or_else(|_| "painrx.toml".to_string());

        if !Path::new(&path).exists() {
            tracing::debug!("No config file at {path}, using defaults");
            return Ok(Self::default());
        }
        Self::from_toml(&path)
    }

    /// Load from a TOML file
    pub fn from_toml(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn from_yaml(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject threshold combinations the pain-trend and weight rules cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.pain_trend.advisory_delta == 0 {
            return Err(PainRxError::Config(
                "pain_trend.advisory_delta must be at least 1".to_string(),
            ));
        }
        if self.pain_trend.advisory_delta >= self.pain_trend.abort_delta {
            return Err(PainRxError::Config(format!(
                "pain_trend.advisory_delta ({}) must be below abort_delta ({})",
                self.pain_trend.advisory_delta, self.pain_trend.abort_delta
            )));
        }
        if !(self.weight.low_weight_threshold_kg > 0.0) {
            return Err(PainRxError::Config(
                "weight.low_weight_threshold_kg must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
