//! User body and color profiles
//!
//! [`RawBodyProfile`] mirrors what the profile store persists (legacy
//! centimeter fields next to newer inch fields, numbers as strings).
//! [`BodyProfile`] is the canonical, inches-only view every evaluator reads.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::measurement::{parse_height, positive, resolve_inches, RawNumber};
use crate::sizing::chart::Axis;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Gender {
    Female,
    Male,
    NonBinary,
    #[default]
    Unspecified,
}

impl From<String> for Gender {
    fn from(label: String) -> Self {
        match label.trim().to_lowercase().as_str() {
            "female" | "f" | "woman" | "women" => Gender::Female,
            "male" | "m" | "man" | "men" => Gender::Male,
            "non_binary" | "nonbinary" | "non-binary" | "nb" => Gender::NonBinary,
            _ => Gender::Unspecified,
        }
    }
}

/// Body silhouette
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum BodyShape {
    Hourglass,
    Pear,
    Apple,
    Rectangle,
    InvertedTriangle,
    #[default]
    Unknown,
}

impl BodyShape {
    pub fn from_label(label: &str) -> BodyShape {
        match label.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "hourglass" => BodyShape::Hourglass,
            "pear" | "triangle" | "spoon" => BodyShape::Pear,
            "apple" | "round" | "oval" => BodyShape::Apple,
            "rectangle" | "straight" | "athletic" | "banana" => BodyShape::Rectangle,
            "inverted_triangle" | "v_shape" | "v" | "wedge" => BodyShape::InvertedTriangle,
            other => {
                if !other.is_empty() {
                    debug!(body_shape = other, "unrecognized body shape");
                }
                BodyShape::Unknown
            }
        }
    }

    pub fn is_known(self) -> bool {
        self != BodyShape::Unknown
    }

    pub fn label(self) -> &'static str {
        match self {
            BodyShape::Hourglass => "hourglass",
            BodyShape::Pear => "pear",
            BodyShape::Apple => "apple",
            BodyShape::Rectangle => "rectangle",
            BodyShape::InvertedTriangle => "inverted triangle",
            BodyShape::Unknown => "unknown",
        }
    }
}

impl From<String> for BodyShape {
    fn from(label: String) -> Self {
        BodyShape::from_label(&label)
    }
}

impl fmt::Display for BodyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Skin undertone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Undertone {
    Warm,
    Cool,
    #[serde(alias = "olive")]
    Neutral,
}

impl Undertone {
    pub fn as_str(self) -> &'static str {
        match self {
            Undertone::Warm => "warm",
            Undertone::Cool => "cool",
            Undertone::Neutral => "neutral",
        }
    }
}

/// Seasonal color-analysis category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    #[serde(alias = "fall")]
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    pub fn as_str(self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }

    /// Undertone a season is built on; neutral undertones sit between.
    pub fn undertone(self) -> Undertone {
        match self {
            Season::Spring | Season::Autumn => Undertone::Warm,
            Season::Summer | Season::Winter => Undertone::Cool,
        }
    }
}

/// Skin/hair contrast depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    Light,
    Medium,
    Deep,
}

/// Canonical body profile: every linear field is inches or `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BodyProfile {
    pub height_in: Option<f64>,
    pub weight_kg: Option<f64>,
    pub chest_in: Option<f64>,
    pub bust_in: Option<f64>,
    pub waist_in: Option<f64>,
    pub hips_in: Option<f64>,
    pub shoulder_in: Option<f64>,
    pub inseam_in: Option<f64>,
    pub gender: Gender,
    pub body_shape: BodyShape,
    pub undertone: Option<Undertone>,
    pub season: Option<Season>,
    pub best_colors: Vec<String>,
    pub avoid_colors: Vec<String>,
}

impl BodyProfile {
    /// Body measurement for a garment axis, if the profile has one.
    ///
    /// Chest falls back to bust. Axes with no body counterpart (sleeve,
    /// rise, thigh, leg opening, length) are always `None`.
    pub fn measurement(&self, axis: Axis) -> Option<f64> {
        let value = match axis {
            Axis::Chest => self.chest_in.or(self.bust_in),
            Axis::Waist => self.waist_in,
            Axis::Hips => self.hips_in,
            Axis::Shoulder => self.shoulder_in,
            Axis::Inseam => self.inseam_in,
            Axis::Sleeve | Axis::Rise | Axis::Thigh | Axis::LegOpening | Axis::Length => None,
        };
        value.and_then(positive)
    }

    /// Axes this profile can be compared on, in canonical order.
    pub fn measured_axes(&self) -> Vec<Axis> {
        Axis::ALL
            .into_iter()
            .filter(|axis| self.measurement(*axis).is_some())
            .collect()
    }

    pub fn has_measurements(&self) -> bool {
        Axis::ALL.iter().any(|axis| self.measurement(*axis).is_some())
    }
}

/// Profile as persisted: legacy centimeter fields, newer inch fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawBodyProfile {
    /// Legacy height: free-form ("5.4", "170", "5'4\"")
    pub height: Option<RawNumber>,
    pub height_in: Option<RawNumber>,
    pub weight: Option<RawNumber>,
    pub weight_kg: Option<RawNumber>,
    pub chest: Option<RawNumber>,
    pub chest_in: Option<RawNumber>,
    pub bust: Option<RawNumber>,
    pub bust_in: Option<RawNumber>,
    pub waist: Option<RawNumber>,
    pub waist_in: Option<RawNumber>,
    pub hips: Option<RawNumber>,
    pub hips_in: Option<RawNumber>,
    pub shoulder: Option<RawNumber>,
    pub shoulder_in: Option<RawNumber>,
    pub inseam: Option<RawNumber>,
    pub inseam_in: Option<RawNumber>,
    pub gender: Option<Gender>,
    pub body_shape: Option<BodyShape>,
    pub undertone: Option<Undertone>,
    pub season: Option<Season>,
    pub best_colors: Vec<String>,
    pub avoid_colors: Vec<String>,
}

impl RawBodyProfile {
    /// Canonicalize into inches.
    pub fn normalize(&self) -> BodyProfile {
        let value = |field: &Option<RawNumber>| field.as_ref().and_then(RawNumber::value);
        let axis = |explicit: &Option<RawNumber>, legacy: &Option<RawNumber>| {
            resolve_inches(value(explicit), value(legacy))
        };

        let height_in = value(&self.height_in).or_else(|| {
            self.height.as_ref().and_then(|raw| match raw {
                RawNumber::Text(text) => parse_height(text),
                RawNumber::Number(n) => parse_height(&n.to_string()),
            })
        });

        BodyProfile {
            height_in,
            weight_kg: value(&self.weight_kg).or_else(|| value(&self.weight)),
            chest_in: axis(&self.chest_in, &self.chest),
            bust_in: axis(&self.bust_in, &self.bust),
            waist_in: axis(&self.waist_in, &self.waist),
            hips_in: axis(&self.hips_in, &self.hips),
            shoulder_in: axis(&self.shoulder_in, &self.shoulder),
            inseam_in: axis(&self.inseam_in, &self.inseam),
            gender: self.gender.unwrap_or_default(),
            body_shape: self.body_shape.unwrap_or_default(),
            undertone: self.undertone,
            season: self.season,
            best_colors: self.best_colors.clone(),
            avoid_colors: self.avoid_colors.clone(),
        }
    }
}

/// Output of the face-analysis collaborator, consumed read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorProfile {
    pub undertone: Option<Undertone>,
    pub season: Option<Season>,
    pub depth: Option<Depth>,
    pub best_colors: Vec<String>,
    pub avoid_colors: Vec<String>,
    pub confidence: f64,
}

impl ColorProfile {
    /// Color fields carried on a body profile, for users without a face scan.
    pub fn from_body(body: &BodyProfile) -> Self {
        Self {
            undertone: body.undertone,
            season: body.season,
            depth: None,
            best_colors: body.best_colors.clone(),
            avoid_colors: body.avoid_colors.clone(),
            confidence: 0.0,
        }
    }

    /// True when nothing usable is known about the user's coloring.
    pub fn is_empty(&self) -> bool {
        self.undertone.is_none()
            && self.season.is_none()
            && self.best_colors.iter().all(|c| c.trim().is_empty())
            && self.avoid_colors.iter().all(|c| c.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_profile_normalization() {
        let raw: RawBodyProfile = serde_json::from_str(
            r#"{
                "height": "5.4",
                "chest": 86,
                "waistIn": 28,
                "waist": 90,
                "hips": "not sure",
                "bustIn": 0,
                "bodyShape": "Pear",
                "season": "fall"
            }"#,
        )
        .unwrap();
        let profile = raw.normalize();

        assert_eq!(profile.height_in, Some(64.0));
        assert!((profile.chest_in.unwrap() - 33.86).abs() < 0.01);
        assert_eq!(profile.waist_in, Some(28.0));
        assert_eq!(profile.hips_in, None);
        assert_eq!(profile.bust_in, None);
        assert_eq!(profile.body_shape, BodyShape::Pear);
        assert_eq!(profile.season, Some(Season::Autumn));
    }

    #[test]
    fn test_measurement_falls_back_to_bust() {
        let profile = BodyProfile {
            bust_in: Some(35.0),
            waist_in: Some(28.0),
            ..Default::default()
        };
        assert_eq!(profile.measurement(Axis::Chest), Some(35.0));
        assert_eq!(profile.measurement(Axis::Sleeve), None);
        assert_eq!(profile.measured_axes(), vec![Axis::Chest, Axis::Waist]);
    }

    #[test]
    fn test_empty_profile() {
        let profile = BodyProfile::default();
        assert!(!profile.has_measurements());
        assert!(ColorProfile::from_body(&profile).is_empty());
        assert_eq!(profile.body_shape, BodyShape::Unknown);
    }

    #[test]
    fn test_body_shape_labels() {
        assert_eq!(BodyShape::from_label("Inverted Triangle"), BodyShape::InvertedTriangle);
        assert_eq!(BodyShape::from_label("athletic"), BodyShape::Rectangle);
        assert_eq!(BodyShape::from_label("blob"), BodyShape::Unknown);
    }
}
