//! # Fit Style
//!
//! Deterministic fit and style suitability for virtual garment try-on.
//!
//! Given a user's body and color profile and a garment's structured
//! attributes, this library produces:
//! - A recommended size with backup, risk tier and confidence
//! - A color suitability verdict against the user's seasonal palette
//! - A body-shape suitability verdict with a styling tip
//! - A fabric comfort verdict from the material text
//!
//! When the catalog carries no color, the dominant color of the garment
//! photo can be detected instead.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fit_style::{assess_garment, BodyProfile, Category, FitOptions, GarmentRecord, SizeChartEntry, Axis};
//!
//! let profile = BodyProfile {
//!     waist_in: Some(28.0),
//!     hips_in: Some(38.0),
//!     ..Default::default()
//! };
//! let mut garment = GarmentRecord::new(Category::LowerBody);
//! garment.size_chart = vec![
//!     SizeChartEntry::new("S").with(Axis::Waist, 27.0).with(Axis::Hips, 37.0),
//!     SizeChartEntry::new("M").with(Axis::Waist, 29.0).with(Axis::Hips, 39.0),
//! ];
//!
//! let assessment = assess_garment(&profile, None, &garment, &FitOptions::default());
//! println!("Size: {:?}", assessment.fit.recommended_size);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod garment;
pub mod image_loader;
pub mod measurement;
pub mod profile;
pub mod sizing;
pub mod suitability;

pub use color::{DominantColor, DominantColorCache, DominantColorDetector};
pub use config::{DetectorConfig, EngineConfig, FitOptions};
pub use error::{EngineError, Result};
pub use garment::{Category, FitType, GarmentRecord, StretchLevel, StretchSpec};
pub use image_loader::ImageSource;
pub use profile::{BodyProfile, BodyShape, ColorProfile, RawBodyProfile, Season, Undertone};
pub use sizing::{normalize_size_chart, recommend_size, Axis, ChartUnit, FitResult, Risk, SizeChartEntry};
pub use suitability::{
    analyze_fabric_comfort, detect_stretch, evaluate_suitability, is_stretchy, FabricComfort, SuitabilityReport,
    SuitabilityResult, Verdict,
};

/// Whether an evaluator had enough data to produce a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Ok,
    InsufficientData,
}

/// Every verdict for one garment and one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarmentAssessment {
    pub fit: FitResult,
    pub color: SuitabilityResult,
    pub body: SuitabilityResult,
    pub fabric: FabricComfort,
    /// Photo color used in place of missing catalog color
    pub detected_color: Option<DominantColor>,
}

/// Assess a garment from catalog data alone.
///
/// `color_profile` defaults to the color fields of `profile` when no
/// separate face analysis exists.
pub fn assess_garment(
    profile: &BodyProfile,
    color_profile: Option<&ColorProfile>,
    garment: &GarmentRecord,
    options: &FitOptions,
) -> GarmentAssessment {
    assemble(profile, color_profile, garment, options, None)
}

/// Assess a garment, detecting its color from the photo when the catalog
/// has none.
///
/// Detection failures degrade to an unknown garment color.
pub async fn assess_garment_with_image(
    profile: &BodyProfile,
    color_profile: Option<&ColorProfile>,
    garment: &GarmentRecord,
    options: &FitOptions,
    detector: &DominantColorDetector,
    cache: Option<&DominantColorCache>,
) -> GarmentAssessment {
    let image = garment
        .image
        .as_deref()
        .map(str::trim)
        .filter(|reference| !reference.is_empty());

    let detected = match image {
        Some(reference) if !garment.has_catalog_color() => {
            let source = ImageSource::from_reference(reference);
            match cache {
                Some(cache) => detector.detect_cached(&source, cache).await,
                None => detector.detect(&source).await,
            }
        }
        _ => None,
    };

    assemble(profile, color_profile, garment, options, detected)
}

fn assemble(
    profile: &BodyProfile,
    color_profile: Option<&ColorProfile>,
    garment: &GarmentRecord,
    options: &FitOptions,
    detected: Option<DominantColor>,
) -> GarmentAssessment {
    let from_body;
    let color_profile = match color_profile {
        Some(explicit) => explicit,
        None => {
            from_body = ColorProfile::from_body(profile);
            &from_body
        }
    };

    let fit = recommend_size(profile, garment, options);
    let report = evaluate_suitability(color_profile, profile.body_shape, garment, detected.as_ref());
    let fabric = analyze_fabric_comfort(
        garment.material.as_deref(),
        garment.fabric_stretch,
        garment.category,
        garment.fit_type,
    );

    debug!(
        category = garment.category.as_str(),
        fit = ?fit.status,
        color = ?report.color.status,
        body = ?report.body.status,
        fabric = ?fabric.result.status,
        "garment assessed"
    );

    GarmentAssessment {
        fit,
        color: report.color,
        body: report.body,
        fabric,
        detected_color: detected,
    }
}
