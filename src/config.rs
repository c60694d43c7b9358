//! Tunable parameters for the inference engine.
//!
//! Every knob has a default taken from [`crate::constants`]. Configuration
//! can be built programmatically or loaded from JSON so tuning runs against
//! real garment data are reproducible:
//!
//! ```no_run
//! use fit_style::EngineConfig;
//! use std::path::Path;
//!
//! let config = EngineConfig::from_json_file(Path::new("engine.json"))?;
//! let defaults = EngineConfig::default();
//! # Ok::<(), fit_style::EngineError>(())
//! ```
//!
//! # Sections
//!
//! - [`FitOptions`]: axis weights, backup margin, sizing-bias language
//! - [`DetectorConfig`]: sampling, clustering and fetch budget for photos

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{bias, detector, limits, weights};
use crate::error::{EngineError, Result};
use crate::sizing::chart::Axis;

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub fit: FitOptions,
    pub detector: DetectorConfig,
}

/// Size recommendation options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Weight of chest, waist and hips
    pub primary_weight: f64,

    /// Weight of shoulder, sleeve and inseam
    pub secondary_weight: f64,

    /// Weight of rise, thigh, leg opening and length
    pub tertiary_weight: f64,

    /// Largest weighted-score gap at which the runner-up is offered as backup
    pub backup_step: f64,

    /// Inches beyond acceptable ease before an axis counts toward
    /// "runs small" / "runs large"
    pub bias_threshold_in: f64,

    /// Primary axes that must be biased the same way
    pub bias_min_axes: usize,

    /// Cap on insight bullets
    pub max_insights: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            primary_weight: weights::PRIMARY,
            secondary_weight: weights::SECONDARY,
            tertiary_weight: weights::TERTIARY,
            backup_step: weights::SECONDARY,
            bias_threshold_in: bias::THRESHOLD_IN,
            bias_min_axes: bias::MIN_PRIMARY_AXES,
            max_insights: limits::MAX_FIT_INSIGHTS,
        }
    }
}

impl FitOptions {
    /// Scoring weight for an axis.
    pub fn weight(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Chest | Axis::Waist | Axis::Hips => self.primary_weight,
            Axis::Shoulder | Axis::Sleeve | Axis::Inseam => self.secondary_weight,
            Axis::Rise | Axis::Thigh | Axis::LegOpening | Axis::Length => self.tertiary_weight,
        }
    }
}

/// Dominant color detector parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Longest side after downsampling, in pixels
    pub sample_dimension: u32,

    /// Number of k-means clusters
    pub cluster_count: usize,

    /// k-means iteration cap
    pub max_iterations: usize,

    /// Alpha below which a sample is transparent
    pub min_alpha: u8,

    /// Near-white cut-off (L*) and the chroma under which it applies
    pub white_min_lightness: f32,
    pub white_max_chroma: f32,

    /// ΔE from a uniform border color under which a sample is background
    pub background_delta_e: f32,

    /// Fetch-and-decode budget in milliseconds
    pub fetch_timeout_ms: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            sample_dimension: detector::SAMPLE_DIMENSION,
            cluster_count: detector::CLUSTER_COUNT,
            max_iterations: detector::MAX_ITERATIONS,
            min_alpha: detector::MIN_ALPHA,
            white_min_lightness: detector::WHITE_MIN_LIGHTNESS,
            white_max_chroma: detector::WHITE_MAX_CHROMA,
            background_delta_e: detector::BACKGROUND_DELTA_E,
            fetch_timeout_ms: detector::FETCH_TIMEOUT.as_millis() as u64,
        }
    }
}

impl DetectorConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| EngineError::config(format!("cannot read {}", path.display()), e))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| EngineError::config(format!("cannot parse {}", path.display()), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| EngineError::config("cannot serialize configuration", e))?;
        std::fs::write(path, json)
            .map_err(|e| EngineError::config(format!("cannot write {}", path.display()), e))?;
        Ok(())
    }

    /// Reject values that would make scoring or clustering meaningless.
    pub fn validate(&self) -> Result<()> {
        let fit = &self.fit;
        for (name, weight) in [
            ("fit.primary_weight", fit.primary_weight),
            ("fit.secondary_weight", fit.secondary_weight),
            ("fit.tertiary_weight", fit.tertiary_weight),
        ] {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(EngineError::invalid(name, weight.to_string()));
            }
        }
        if !fit.bias_threshold_in.is_finite() || fit.bias_threshold_in < 0.0 {
            return Err(EngineError::invalid(
                "fit.bias_threshold_in",
                fit.bias_threshold_in.to_string(),
            ));
        }
        if fit.bias_min_axes == 0 {
            return Err(EngineError::invalid("fit.bias_min_axes", "0"));
        }
        if fit.max_insights == 0 {
            return Err(EngineError::invalid("fit.max_insights", "0"));
        }
        if self.detector.cluster_count == 0 {
            return Err(EngineError::invalid("detector.cluster_count", "0"));
        }
        if self.detector.sample_dimension == 0 {
            return Err(EngineError::invalid("detector.sample_dimension", "0"));
        }
        Ok(())
    }
}
