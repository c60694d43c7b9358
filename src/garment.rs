//! Garment records as the catalog (or a brand chart / OCR pipeline) provides them

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::constants::tolerance;
use crate::error::EngineError;
use crate::sizing::chart::{normalize_size_chart, ChartUnit, SizeChartEntry};
use crate::suitability::fabric::detect_stretch;

/// Garment category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[serde(alias = "top", alias = "tops", alias = "upper")]
    UpperBody,
    #[serde(alias = "bottom", alias = "bottoms", alias = "lower")]
    LowerBody,
    #[serde(alias = "dress", alias = "one_piece")]
    Dresses,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::UpperBody => "upper_body",
            Category::LowerBody => "lower_body",
            Category::Dresses => "dresses",
        }
    }

    /// Plural noun for reason text ("tops", "bottoms", "dresses").
    pub fn noun(self) -> &'static str {
        match self {
            Category::UpperBody => "tops",
            Category::LowerBody => "bottoms",
            Category::Dresses => "dresses",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = EngineError;

    /// An unrecognized category is a caller bug, not missing data.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "upper_body" | "upper" | "top" | "tops" | "shirt" | "shirts" | "outerwear" => {
                Ok(Category::UpperBody)
            }
            "lower_body" | "lower" | "bottom" | "bottoms" | "pants" | "trousers" | "jeans"
            | "skirt" | "skirts" | "shorts" => Ok(Category::LowerBody),
            "dresses" | "dress" | "one_piece" | "jumpsuit" => Ok(Category::Dresses),
            _ => Err(EngineError::invalid("category", s)),
        }
    }
}

/// How the garment is cut relative to the body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum FitType {
    Snug,
    #[default]
    Regular,
    Relaxed,
    Oversized,
}

impl FitType {
    /// Lenient label parse; unknown labels fall back to regular.
    pub fn from_label(label: &str) -> FitType {
        match label.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "snug" | "slim" | "slim_fit" | "fitted" | "skinny" | "bodycon" | "tight" => FitType::Snug,
            "regular" | "regular_fit" | "classic" | "standard" | "straight" | "" => FitType::Regular,
            "relaxed" | "relaxed_fit" | "loose" | "comfort" | "wide" | "wide_leg" => FitType::Relaxed,
            "oversized" | "oversize" | "boxy" | "baggy" => FitType::Oversized,
            other => {
                debug!(fit_type = other, "unknown fit type, treating as regular");
                FitType::Regular
            }
        }
    }

    pub fn is_tight(self) -> bool {
        self == FitType::Snug
    }

    pub fn is_loose(self) -> bool {
        matches!(self, FitType::Relaxed | FitType::Oversized)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FitType::Snug => "snug",
            FitType::Regular => "regular",
            FitType::Relaxed => "relaxed",
            FitType::Oversized => "oversized",
        }
    }
}

impl From<String> for FitType {
    fn from(label: String) -> Self {
        FitType::from_label(&label)
    }
}

impl fmt::Display for FitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fabric elasticity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StretchLevel {
    #[default]
    Unknown,
    None,
    Low,
    Medium,
    High,
}

impl StretchLevel {
    /// Extra negative ease, in inches, this stretch tolerates.
    pub fn negative_allowance(self) -> f64 {
        match self {
            StretchLevel::Unknown | StretchLevel::None => 0.0,
            StretchLevel::Low => tolerance::STRETCH_LOW_IN,
            StretchLevel::Medium => tolerance::STRETCH_MEDIUM_IN,
            StretchLevel::High => tolerance::STRETCH_HIGH_IN,
        }
    }

    pub fn is_known(self) -> bool {
        self != StretchLevel::Unknown
    }

    pub fn is_stretchy(self) -> bool {
        matches!(self, StretchLevel::Medium | StretchLevel::High)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StretchLevel::Unknown => "unknown",
            StretchLevel::None => "none",
            StretchLevel::Low => "low",
            StretchLevel::Medium => "medium",
            StretchLevel::High => "high",
        }
    }
}

impl fmt::Display for StretchLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit stretch field: older records store a flag, newer ones a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StretchSpec {
    Flag(bool),
    Level(StretchLevel),
}

impl StretchSpec {
    /// `true` reads as medium stretch, `false` as none.
    pub fn level(self) -> StretchLevel {
        match self {
            StretchSpec::Flag(true) => StretchLevel::Medium,
            StretchSpec::Flag(false) => StretchLevel::None,
            StretchSpec::Level(level) => level,
        }
    }
}

/// A garment's structured attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarmentRecord {
    pub category: Category,
    #[serde(default)]
    pub fit_type: FitType,
    #[serde(default)]
    pub fabric_stretch: Option<StretchSpec>,
    /// Free-text material, e.g. "98% cotton, 2% elastane"
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub size_chart: Vec<SizeChartEntry>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub color_hex: Option<String>,
    /// Photo reference for dominant color detection
    #[serde(default)]
    pub image: Option<String>,
}

impl GarmentRecord {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            fit_type: FitType::Regular,
            fabric_stretch: None,
            material: None,
            size_chart: Vec::new(),
            primary_color: None,
            color_hex: None,
            image: None,
        }
    }

    /// Replace the chart with a raw one in any accepted shape.
    pub fn with_raw_size_chart(mut self, raw: &Value, unit: ChartUnit) -> Self {
        self.size_chart = normalize_size_chart(raw, unit);
        self
    }

    /// Stretch level used for fit tolerance.
    ///
    /// The explicit field wins over anything inferred from the material text.
    pub fn effective_stretch(&self) -> StretchLevel {
        match self.fabric_stretch {
            Some(spec) => spec.level(),
            None => self
                .material
                .as_deref()
                .map(detect_stretch)
                .unwrap_or(StretchLevel::Unknown),
        }
    }

    /// True when catalog metadata carries a color (hex or name).
    pub fn has_catalog_color(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.color_hex) || present(&self.primary_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!("Tops".parse::<Category>().unwrap(), Category::UpperBody);
        assert_eq!("lower body".parse::<Category>().unwrap(), Category::LowerBody);
        assert_eq!("dress".parse::<Category>().unwrap(), Category::Dresses);
        assert!("hats".parse::<Category>().is_err());
    }

    #[test]
    fn test_fit_type_labels() {
        assert_eq!(FitType::from_label("Slim Fit"), FitType::Snug);
        assert_eq!(FitType::from_label("baggy"), FitType::Oversized);
        assert_eq!(FitType::from_label("mystery"), FitType::Regular);
    }

    #[test]
    fn test_explicit_stretch_beats_material() {
        let mut garment = GarmentRecord::new(Category::LowerBody);
        garment.material = Some("92% cotton, 8% elastane".into());
        assert_eq!(garment.effective_stretch(), StretchLevel::High);

        garment.fabric_stretch = Some(StretchSpec::Flag(false));
        assert_eq!(garment.effective_stretch(), StretchLevel::None);
    }

    #[test]
    fn test_garment_json() {
        let garment: GarmentRecord = serde_json::from_str(
            r##"{
                "category": "lower_body",
                "fitType": "Skinny",
                "fabricStretch": true,
                "sizeChart": [{"size": "S", "measurements": {"waist": 27}}],
                "colorHex": "#000080"
            }"##,
        )
        .unwrap();
        assert_eq!(garment.fit_type, FitType::Snug);
        assert_eq!(garment.effective_stretch(), StretchLevel::Medium);
        assert_eq!(garment.size_chart.len(), 1);
        assert!(garment.has_catalog_color());

        let level: GarmentRecord =
            serde_json::from_str(r#"{"category": "top", "fabricStretch": "high"}"#).unwrap();
        assert_eq!(level.fabric_stretch, Some(StretchSpec::Level(StretchLevel::High)));
    }
}
