//! Reference values and thresholds for fit and color inference
//!
//! Compile-time defaults. Anything a product team is expected to tune is also
//! surfaced through [`crate::config::EngineConfig`], which starts from these.

/// Unit conversion
pub mod units {
    /// Exact centimeters per inch
    pub const CM_PER_INCH: f64 = 2.54;

    /// Bare height numbers at or above this are read as centimeters
    pub const HEIGHT_CM_FLOOR: f64 = 100.0;

    /// Bare height numbers below this are read as feet.inches
    pub const HEIGHT_FEET_CEILING: f64 = 10.0;
}

/// Ease tolerance adjustments, in inches
pub mod tolerance {
    /// Extra negative ease allowed per stretch level
    pub const STRETCH_LOW_IN: f64 = 0.75;
    pub const STRETCH_MEDIUM_IN: f64 = 1.5;
    pub const STRETCH_HIGH_IN: f64 = 2.5;

    /// Snug fits accept this much extra negative ease...
    pub const SNUG_NEGATIVE_SHIFT_IN: f64 = 1.0;
    /// ...and only this fraction of the regular positive ease
    pub const SNUG_MAX_SCALE: f64 = 0.5;

    /// Extra positive ease for relaxed and oversized cuts
    pub const RELAXED_EXTRA_IN: f64 = 2.0;
    pub const OVERSIZED_EXTRA_IN: f64 = 5.0;
}

/// Axis weights used when aggregating a size's score
pub mod weights {
    /// Chest, waist, hips
    pub const PRIMARY: f64 = 2.0;
    /// Shoulder, sleeve, inseam
    pub const SECONDARY: f64 = 1.0;
    /// Rise, thigh, leg opening, length
    pub const TERTIARY: f64 = 0.5;
}

/// Systematic sizing bias ("runs small" / "runs large")
pub mod bias {
    /// Inches beyond the acceptable ease before an axis counts as biased
    pub const THRESHOLD_IN: f64 = 1.0;

    /// Primary axes that must agree before the chart is called biased
    pub const MIN_PRIMARY_AXES: usize = 2;
}

/// Bounds on human-readable output
pub mod limits {
    pub const MAX_FIT_INSIGHTS: usize = 5;
    pub const MAX_REASONS: usize = 4;
    pub const MAX_ALTERNATIVES: usize = 3;
    pub const MAX_FABRIC_INSIGHTS: usize = 4;
}

/// Dominant color detection
pub mod detector {
    use std::time::Duration;

    /// Longest side of the downsampled image
    pub const SAMPLE_DIMENSION: u32 = 64;

    /// k for k-means
    pub const CLUSTER_COUNT: usize = 4;

    /// k-means iteration cap
    pub const MAX_ITERATIONS: usize = 12;

    /// Centroid movement (ΔE) below which k-means has converged
    pub const CONVERGENCE_DELTA_E: f32 = 0.5;

    /// Samples with lower alpha are treated as transparent
    pub const MIN_ALPHA: u8 = 128;

    /// Near-white: L* above this with chroma below WHITE_MAX_CHROMA
    pub const WHITE_MIN_LIGHTNESS: f32 = 92.0;
    pub const WHITE_MAX_CHROMA: f32 = 8.0;

    /// Samples this close (ΔE) to a uniform border color are background
    pub const BACKGROUND_DELTA_E: f32 = 10.0;

    /// Border spread (mean ΔE from its median) under which it counts as uniform
    pub const BORDER_UNIFORMITY_DELTA_E: f32 = 12.0;

    /// Mean ΔE at which cluster tightness bottoms out
    pub const TIGHTNESS_SCALE_DELTA_E: f32 = 25.0;

    /// Confidence blend
    pub const MASS_WEIGHT: f32 = 0.6;
    pub const TIGHTNESS_WEIGHT: f32 = 0.4;

    /// Confidence ceiling when only background-like pixels were available
    pub const FALLBACK_CONFIDENCE_CAP: f32 = 0.3;

    /// Fetch-and-decode budget
    pub const FETCH_TIMEOUT: Duration = Duration::from_millis(8_000);
}

/// Confidence bands for color output
pub mod thresholds {
    /// Detected colors below this get a caveat in the color reasons
    pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.8;
}
