//! Garment color against the user's seasonal color profile

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::naming::{family_from_name, nearest_named, ColorFamily, ColorTier, Temperature};
use crate::color::{ColorConverter, DominantColor};
use crate::constants::{limits, thresholds};
use crate::profile::{ColorProfile, Season, Undertone};
use crate::suitability::{capitalize, ColorVerdict, DataGap, SuitabilityResult, Verdict};

/// Where the garment color came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSource {
    Hex,
    Name,
    Detected,
}

/// Garment color resolved to a family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarmentColor {
    pub family: ColorFamily,
    /// Human label used in reasons
    pub label: String,
    pub source: ColorSource,
    pub confidence: f32,
}

impl GarmentColor {
    /// Resolve catalog hex, then catalog name, then a detected color.
    ///
    /// Returns `None` when none of them identifies a color family.
    pub fn resolve(hex: Option<&str>, name: Option<&str>, detected: Option<&DominantColor>) -> Option<Self> {
        if let Some(hex) = hex.map(str::trim).filter(|h| !h.is_empty()) {
            match ColorConverter::new().hex_to_rgb(hex) {
                Ok(rgb) => {
                    let named = nearest_named(rgb);
                    return Some(Self {
                        family: named.family,
                        label: named.name.to_string(),
                        source: ColorSource::Hex,
                        confidence: 1.0,
                    });
                }
                Err(e) => debug!(hex, error = %e, "ignoring malformed garment hex"),
            }
        }

        if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
            match family_from_name(name) {
                Some(family) => {
                    return Some(Self {
                        family,
                        label: name.to_lowercase(),
                        source: ColorSource::Name,
                        confidence: 1.0,
                    })
                }
                None => debug!(name, "garment color name matches no family"),
            }
        }

        detected.map(|color| Self {
            family: color.family,
            label: color.name.clone(),
            source: ColorSource::Detected,
            confidence: color.confidence,
        })
    }
}

struct SeasonPalette {
    rationale: &'static str,
    best: &'static [ColorFamily],
    avoid: &'static [ColorFamily],
}

const SPRING: SeasonPalette = SeasonPalette {
    rationale: "Spring coloring glows in warm, clear shades",
    best: &[
        ColorFamily::Coral,
        ColorFamily::Peach,
        ColorFamily::Turquoise,
        ColorFamily::Camel,
        ColorFamily::Cream,
        ColorFamily::Yellow,
    ],
    avoid: &[ColorFamily::Black, ColorFamily::Burgundy, ColorFamily::Plum, ColorFamily::Gray],
};

const SUMMER: SeasonPalette = SeasonPalette {
    rationale: "Summer coloring suits soft, cool shades",
    best: &[
        ColorFamily::Lavender,
        ColorFamily::LightBlue,
        ColorFamily::Pink,
        ColorFamily::Navy,
        ColorFamily::Gray,
        ColorFamily::Plum,
    ],
    avoid: &[ColorFamily::Orange, ColorFamily::Mustard, ColorFamily::Rust, ColorFamily::Black, ColorFamily::Camel],
};

const AUTUMN: SeasonPalette = SeasonPalette {
    rationale: "Autumn coloring is warmed by rich, earthy shades",
    best: &[
        ColorFamily::Rust,
        ColorFamily::Mustard,
        ColorFamily::Olive,
        ColorFamily::Teal,
        ColorFamily::Camel,
        ColorFamily::Brown,
    ],
    avoid: &[ColorFamily::Black, ColorFamily::White, ColorFamily::Pink, ColorFamily::Lavender, ColorFamily::LightBlue],
};

const WINTER: SeasonPalette = SeasonPalette {
    rationale: "Winter coloring carries cool, high-contrast shades",
    best: &[
        ColorFamily::Black,
        ColorFamily::White,
        ColorFamily::Navy,
        ColorFamily::Red,
        ColorFamily::Emerald,
        ColorFamily::Burgundy,
        ColorFamily::Purple,
    ],
    avoid: &[ColorFamily::Beige, ColorFamily::Camel, ColorFamily::Orange, ColorFamily::Peach, ColorFamily::Mustard],
};

fn palette_for(season: Season) -> &'static SeasonPalette {
    match season {
        Season::Spring => &SPRING,
        Season::Summer => &SUMMER,
        Season::Autumn => &AUTUMN,
        Season::Winter => &WINTER,
    }
}

/// Map free-text color preferences to families, keeping first-seen order.
fn families(colors: &[String]) -> Vec<ColorFamily> {
    let mut out = Vec::new();
    for color in colors {
        match family_from_name(color) {
            Some(family) if !out.contains(&family) => out.push(family),
            Some(_) => {}
            None if !color.trim().is_empty() => debug!(color = %color, "profile color matches no family"),
            None => {}
        }
    }
    out
}

fn temperature_word(temperature: Temperature) -> &'static str {
    match temperature {
        Temperature::Warm => "warm",
        Temperature::Cool => "cool",
        Temperature::Balanced => "balanced",
    }
}

/// Evaluate a garment color against a color profile.
pub fn evaluate_color(profile: &ColorProfile, garment: Option<&GarmentColor>) -> SuitabilityResult {
    let mut missing = Vec::new();
    let mut reasons = Vec::new();
    if profile.is_empty() {
        missing.push(DataGap::ColorProfile);
        reasons.push("Add your color profile to see how this shade suits you".to_string());
    }
    if garment.is_none() {
        missing.push(DataGap::GarmentColor);
        reasons.push("This garment's color is unknown; pick it from the photo".to_string());
    }
    let Some(garment) = garment.filter(|_| missing.is_empty()) else {
        return SuitabilityResult::insufficient(missing, reasons, Vec::new());
    };

    let family = garment.family;
    let label = capitalize(&garment.label);
    let best = families(&profile.best_colors);
    let avoid = families(&profile.avoid_colors);

    let (verdict, candidates) = if !best.is_empty() || !avoid.is_empty() {
        let verdict = if best.contains(&family) {
            reasons.push(format!("{label} is one of your best colors"));
            ColorVerdict::Great
        } else if avoid.contains(&family) {
            reasons.push(format!("{label} is on your list of colors to avoid"));
            ColorVerdict::Risky
        } else {
            reasons.push(format!("{label} is neither a best color nor one to avoid for you"));
            ColorVerdict::Ok
        };
        if let Some(season) = profile.season {
            reasons.push(palette_for(season).rationale.to_string());
        }
        let candidates = match (best.is_empty(), profile.season) {
            (true, Some(season)) => palette_for(season).best.to_vec(),
            _ => best,
        };
        (verdict, candidates)
    } else if let Some(season) = profile.season {
        let palette = palette_for(season);
        reasons.push(palette.rationale.to_string());
        let verdict = if palette.best.contains(&family) {
            reasons.push(format!("{label} sits in the {} palette", season.as_str()));
            ColorVerdict::Great
        } else if palette.avoid.contains(&family) {
            reasons.push(format!("{label} tends to overpower {} coloring", season.as_str()));
            ColorVerdict::Risky
        } else {
            reasons.push(format!("{label} is outside the core {} palette", season.as_str()));
            ColorVerdict::Ok
        };
        (verdict, palette.best.to_vec())
    } else if let Some(undertone) = profile.undertone {
        let temperature = family.temperature();
        let verdict = match (undertone, temperature) {
            (Undertone::Warm, Temperature::Warm) | (Undertone::Cool, Temperature::Cool) => ColorVerdict::Great,
            (Undertone::Warm, Temperature::Cool) | (Undertone::Cool, Temperature::Warm) => ColorVerdict::Risky,
            _ => ColorVerdict::Ok,
        };
        reasons.push(format!(
            "{label} is a {} shade and your undertone is {}",
            temperature_word(temperature),
            undertone.as_str()
        ));
        let candidates: Vec<ColorFamily> = Season::ALL
            .into_iter()
            .filter(|s| s.undertone() == undertone)
            .flat_map(|s| palette_for(s).best.iter().copied())
            .collect();
        (verdict, candidates)
    } else {
        return SuitabilityResult::insufficient(
            vec![DataGap::ColorProfile],
            vec!["Your saved colors could not be matched to color families".to_string()],
            Vec::new(),
        );
    };

    let (alternatives, mixed_tiers) = if verdict == ColorVerdict::Great {
        (Vec::new(), false)
    } else {
        alternatives_for(family, &candidates)
    };

    if mixed_tiers {
        reasons.push(format!(
            "Few {} shades in your palette, so alternatives include other tones",
            tier_word(family.tier())
        ));
    } else if family.tier() == ColorTier::Neutral && verdict != ColorVerdict::Risky {
        reasons.push(format!("{label} is a neutral and pairs with most of your palette"));
    }
    if garment.source == ColorSource::Detected && f64::from(garment.confidence) < thresholds::HIGH_CONFIDENCE_THRESHOLD {
        reasons.push("Color was estimated from the photo and may be off".to_string());
    }

    debug!(family = %family, ?verdict, "color suitability");
    SuitabilityResult::ok(Verdict::Color(verdict), reasons, alternatives)
}

fn tier_word(tier: ColorTier) -> &'static str {
    match tier {
        ColorTier::Neutral => "neutral",
        ColorTier::Chromatic => "colorful",
    }
}

/// Best colors of the garment's tier first, then the rest, never the garment's own family.
///
/// The flag is set when a color from the other tier makes the shown list.
fn alternatives_for(family: ColorFamily, candidates: &[ColorFamily]) -> (Vec<String>, bool) {
    let tier = family.tier();
    let mut ordered: Vec<ColorFamily> = Vec::new();
    let same_tier = candidates.iter().filter(|c| c.tier() == tier);
    let other_tier = candidates.iter().filter(|c| c.tier() != tier);
    for candidate in same_tier.chain(other_tier) {
        if *candidate != family && !ordered.contains(candidate) {
            ordered.push(*candidate);
        }
    }
    ordered.truncate(limits::MAX_ALTERNATIVES);
    let mixed = ordered.iter().any(|c| c.tier() != tier);
    (ordered.into_iter().map(|c| c.label().to_string()).collect(), mixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    fn hex(h: &str) -> Option<GarmentColor> {
        GarmentColor::resolve(Some(h), None, None)
    }

    #[test]
    fn test_avoid_color_is_risky_with_alternatives() {
        let profile = ColorProfile {
            best_colors: vec!["navy".into(), "Emerald".into(), "wine".into(), "white".into()],
            avoid_colors: vec!["orange".into()],
            ..Default::default()
        };
        let result = evaluate_color(&profile, hex("#FF8C00").as_ref());

        assert_eq!(result.status, Status::Ok);
        assert_eq!(result.verdict, Some(Verdict::Color(ColorVerdict::Risky)));
        assert!(!result.reasons.is_empty());
        // Chromatic garment: chromatic best colors come first
        assert_eq!(result.alternatives, vec!["emerald", "burgundy", "navy"]);
    }

    #[test]
    fn test_other_tier_fallback_is_explained() {
        // Neutral garment, only one other neutral among the best colors
        let profile = ColorProfile {
            best_colors: vec!["camel".into(), "olive".into(), "rust".into()],
            avoid_colors: vec!["black".into()],
            ..Default::default()
        };
        let result = evaluate_color(&profile, hex("#000000").as_ref());
        assert_eq!(result.verdict, Some(Verdict::Color(ColorVerdict::Risky)));
        assert_eq!(result.alternatives, vec!["camel", "olive", "rust"]);
        assert!(result.reasons.iter().any(|r| r.contains("Few neutral shades")));

        // Enough neutrals: no fallback, no note
        let profile = ColorProfile {
            best_colors: vec!["camel".into(), "cream".into(), "brown".into(), "olive".into()],
            avoid_colors: vec!["black".into()],
            ..Default::default()
        };
        let result = evaluate_color(&profile, hex("#000000").as_ref());
        assert_eq!(result.alternatives, vec!["camel", "cream", "brown"]);
        assert!(!result.reasons.iter().any(|r| r.starts_with("Few ")));
    }

    #[test]
    fn test_best_color_is_great() {
        let profile = ColorProfile {
            best_colors: vec!["Navy Blue".into()],
            ..Default::default()
        };
        let garment = GarmentColor::resolve(None, Some("Midnight"), None);
        let result = evaluate_color(&profile, garment.as_ref());
        assert_eq!(result.verdict, Some(Verdict::Color(ColorVerdict::Great)));
        assert!(result.alternatives.is_empty());
    }

    #[test]
    fn test_season_palette_used_without_lists() {
        let profile = ColorProfile {
            season: Some(Season::Autumn),
            ..Default::default()
        };
        let result = evaluate_color(&profile, hex("#B7410E").as_ref());
        assert_eq!(result.verdict, Some(Verdict::Color(ColorVerdict::Great)));

        let result = evaluate_color(&profile, hex("#FFC0CB").as_ref());
        assert_eq!(result.verdict, Some(Verdict::Color(ColorVerdict::Risky)));
        assert_eq!(result.alternatives.len(), 3);
        assert!(!result.alternatives.contains(&"pink".to_string()));
    }

    #[test]
    fn test_undertone_decides_without_season() {
        let profile = ColorProfile {
            undertone: Some(Undertone::Cool),
            ..Default::default()
        };
        let great = evaluate_color(&profile, hex("#800020").as_ref());
        assert_eq!(great.verdict, Some(Verdict::Color(ColorVerdict::Great)));
        let risky = evaluate_color(&profile, hex("#E1AD01").as_ref());
        assert_eq!(risky.verdict, Some(Verdict::Color(ColorVerdict::Risky)));

        let neutral = ColorProfile {
            undertone: Some(Undertone::Neutral),
            ..Default::default()
        };
        let ok = evaluate_color(&neutral, hex("#E1AD01").as_ref());
        assert_eq!(ok.verdict, Some(Verdict::Color(ColorVerdict::Ok)));
    }

    #[test]
    fn test_missing_inputs_are_itemized() {
        let empty = ColorProfile::default();
        let both = evaluate_color(&empty, None);
        assert_eq!(both.status, Status::InsufficientData);
        assert_eq!(both.missing, vec![DataGap::ColorProfile, DataGap::GarmentColor]);
        assert_eq!(both.reasons.len(), 2);
        assert!(both.verdict.is_none());

        let garment_only = evaluate_color(&empty, hex("#000000").as_ref());
        assert_eq!(garment_only.missing, vec![DataGap::ColorProfile]);

        let profile = ColorProfile {
            season: Some(Season::Summer),
            ..Default::default()
        };
        let profile_only = evaluate_color(&profile, None);
        assert_eq!(profile_only.missing, vec![DataGap::GarmentColor]);
    }

    #[test]
    fn test_resolution_order() {
        let detected = DominantColor {
            hex: "#008000".into(),
            name: "green".into(),
            family: ColorFamily::Green,
            rgb: [0, 128, 0],
            confidence: 0.5,
        };
        let from_hex = GarmentColor::resolve(Some("#000080"), Some("red"), Some(&detected)).unwrap();
        assert_eq!(from_hex.family, ColorFamily::Navy);

        let from_name = GarmentColor::resolve(Some("oops"), Some("Red"), Some(&detected)).unwrap();
        assert_eq!((from_name.family, from_name.source), (ColorFamily::Red, ColorSource::Name));

        let from_photo = GarmentColor::resolve(None, Some("multicolor"), Some(&detected)).unwrap();
        assert_eq!(from_photo.source, ColorSource::Detected);

        assert!(GarmentColor::resolve(None, Some("  "), None).is_none());
    }

    #[test]
    fn test_low_confidence_detection_is_flagged() {
        let profile = ColorProfile {
            season: Some(Season::Spring),
            ..Default::default()
        };
        let detected = DominantColor {
            hex: "#FF7F50".into(),
            name: "coral".into(),
            family: ColorFamily::Coral,
            rgb: [255, 127, 80],
            confidence: 0.3,
        };
        let garment = GarmentColor::resolve(None, None, Some(&detected));
        let result = evaluate_color(&profile, garment.as_ref());
        assert!(result.reasons.iter().any(|r| r.contains("estimated from the photo")));
    }
}
