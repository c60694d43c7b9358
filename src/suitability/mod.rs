//! Color, body-shape and fabric suitability
//!
//! The three evaluators share one result shape: a [`Status`], an optional
//! tagged [`Verdict`], and bounded reasons and alternatives.

pub mod body_shape;
pub mod color;
pub mod fabric;

use serde::{Deserialize, Serialize};

use crate::color::DominantColor;
use crate::constants::limits;
use crate::garment::GarmentRecord;
use crate::profile::{BodyShape, ColorProfile};
use crate::Status;

pub use body_shape::evaluate_body_shape;
pub use color::{evaluate_color, GarmentColor};
pub use fabric::{analyze_fabric_comfort, detect_stretch, is_stretchy, FabricComfort};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorVerdict {
    Great,
    Ok,
    Risky,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeVerdict {
    Flattering,
    Neutral,
    Risky,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComfortVerdict {
    Comfortable,
    Ok,
    Risky,
}

/// Verdict of one evaluator, tagged by domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Verdict {
    Color(ColorVerdict),
    BodyShape(ShapeVerdict),
    Fabric(ComfortVerdict),
}

/// Input an evaluator was missing, so the caller can open the right prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataGap {
    ColorProfile,
    GarmentColor,
    BodyShape,
    Material,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuitabilityResult {
    pub status: Status,
    pub verdict: Option<Verdict>,
    /// At most four
    pub reasons: Vec<String>,
    /// At most three
    pub alternatives: Vec<String>,
    /// Empty unless `status` is insufficient data
    pub missing: Vec<DataGap>,
}

impl SuitabilityResult {
    pub fn ok(verdict: Verdict, reasons: Vec<String>, alternatives: Vec<String>) -> Self {
        Self {
            status: Status::Ok,
            verdict: Some(verdict),
            reasons: bounded(reasons, limits::MAX_REASONS),
            alternatives: bounded(alternatives, limits::MAX_ALTERNATIVES),
            missing: Vec::new(),
        }
    }

    pub fn insufficient(missing: Vec<DataGap>, reasons: Vec<String>, alternatives: Vec<String>) -> Self {
        Self {
            status: Status::InsufficientData,
            verdict: None,
            reasons: bounded(reasons, limits::MAX_REASONS),
            alternatives: bounded(alternatives, limits::MAX_ALTERNATIVES),
            missing,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

/// Drop duplicates (first occurrence wins) and cap the length.
fn bounded(items: Vec<String>, max: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(max.min(items.len()));
    for item in items {
        if out.len() == max {
            break;
        }
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Color and body-shape verdicts for one garment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuitabilityReport {
    pub color: SuitabilityResult,
    pub body: SuitabilityResult,
}

/// Evaluate color and body-shape suitability together.
///
/// `detected` is only consulted when the record carries no catalog color.
pub fn evaluate_suitability(
    profile: &ColorProfile,
    body_shape: BodyShape,
    garment: &GarmentRecord,
    detected: Option<&DominantColor>,
) -> SuitabilityReport {
    let garment_color = GarmentColor::resolve(
        garment.color_hex.as_deref(),
        garment.primary_color.as_deref(),
        detected,
    );
    SuitabilityReport {
        color: evaluate_color(profile, garment_color.as_ref()),
        body: evaluate_body_shape(body_shape, garment.category, garment.fit_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::garment::{Category, FitType};
    use crate::profile::Season;

    #[test]
    fn test_verdict_wire_format() {
        let json = serde_json::to_value(Verdict::Color(ColorVerdict::Great)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "color", "value": "great"}));
        let json = serde_json::to_value(Verdict::BodyShape(ShapeVerdict::Risky)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "body_shape", "value": "risky"}));
    }

    #[test]
    fn test_results_are_bounded() {
        let reasons: Vec<String> = (0..9).map(|i| format!("reason {i}")).collect();
        let alternatives = vec!["a".to_string(), "a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()];
        let result = SuitabilityResult::ok(Verdict::Fabric(ComfortVerdict::Ok), reasons, alternatives);
        assert_eq!(result.reasons.len(), 4);
        assert_eq!(result.alternatives, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_evaluate_suitability_prefers_catalog_color() {
        let profile = ColorProfile {
            season: Some(Season::Winter),
            ..Default::default()
        };
        let mut garment = GarmentRecord::new(Category::UpperBody);
        garment.fit_type = FitType::Regular;
        garment.color_hex = Some("#000000".to_string());

        let detected = DominantColor {
            hex: "#FFA500".to_string(),
            name: "orange".to_string(),
            family: crate::color::ColorFamily::Orange,
            rgb: [255, 165, 0],
            confidence: 0.9,
        };

        let report = evaluate_suitability(&profile, BodyShape::Rectangle, &garment, Some(&detected));
        assert_eq!(report.color.verdict, Some(Verdict::Color(ColorVerdict::Great)));
        assert!(report.body.is_ok());
    }
}
