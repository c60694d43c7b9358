//! Fabric stretch classification and comfort verdicts
//!
//! Stretch comes from, in priority order: the garment's explicit stretch
//! field, blend percentages of elastic fibres, the ordered keyword lexicon,
//! and finally `Unknown`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::limits;
use crate::garment::{Category, FitType, StretchLevel, StretchSpec};
use crate::suitability::{ComfortVerdict, DataGap, SuitabilityResult, Verdict};

/// Fibres whose blend percentage decides stretch.
const ELASTIC_FIBRES: &[&str] = &["spandex", "elastane", "elasthane", "lycra"];

/// Ordered stretch lexicon, first match wins.
pub const STRETCH_RULES: &[(&[&str], StretchLevel)] = &[
    (&["non stretch", "no stretch", "nonstretch", "rigid"], StretchLevel::None),
    (
        &["spandex", "elastane", "elasthane", "lycra", "elastic", "power stretch", "4 way stretch", "four way stretch"],
        StretchLevel::High,
    ),
    (
        &["stretch", "jersey", "knit", "knitted", "rib", "ribbed", "ponte", "scuba"],
        StretchLevel::Medium,
    ),
    (
        &["modal", "viscose", "rayon", "wool", "merino", "cashmere", "bamboo", "tencel", "lyocell"],
        StretchLevel::Low,
    ),
    (
        &[
            "cotton", "linen", "silk", "denim", "polyester", "leather", "nylon", "chiffon", "satin",
            "tweed", "canvas", "corduroy", "twill", "suede", "acrylic", "poplin", "organza",
        ],
        StretchLevel::None,
    ),
];

/// Breathability notes, every matching rule contributes.
const BREATHABILITY_RULES: &[(&[&str], &str)] = &[
    (
        &["linen", "cotton", "bamboo", "tencel", "lyocell", "modal", "silk"],
        "Breathable fibres keep it cool",
    ),
    (&["wool", "merino", "cashmere"], "Warm and temperature-regulating"),
    (
        &["polyester", "nylon", "acrylic", "leather", "vinyl", "pvc", "scuba"],
        "Less breathable; can feel warm",
    ),
];

/// Lowercased words of `text`, padded for whole-word matching. `%` stays
/// attached to its number.
fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '%' || c == '.' { c } else { ' ' })
        .collect();
    let words: Vec<&str> = cleaned
        .split_whitespace()
        .map(|w| w.trim_matches('.'))
        .filter(|w| !w.is_empty())
        .collect();
    format!(" {} ", words.join(" ").replace(" %", "%"))
}

fn contains_word(normalized: &str, pattern: &str) -> bool {
    normalized.contains(&format!(" {pattern} "))
}

fn percent(token: &str) -> Option<f64> {
    token.strip_suffix('%')?.parse::<f64>().ok().filter(|p| p.is_finite() && *p >= 0.0)
}

/// Highest blend percentage attached to an elastic fibre.
///
/// Labels either lead with percentages ("95% cotton 5% elastane") or trail
/// them ("cotton 95% elastane 5%"); the first token tells which.
fn elastic_percentage(normalized: &str) -> Option<f64> {
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    let leading = tokens.first().is_some_and(|t| percent(t).is_some());

    let mut highest: Option<f64> = None;
    for (i, token) in tokens.iter().enumerate() {
        if !ELASTIC_FIBRES.contains(token) {
            continue;
        }
        let before = i.checked_sub(1).and_then(|j| percent(tokens[j]));
        let after = tokens.get(i + 1).and_then(|t| percent(t));
        let pct = if leading { before.or(after) } else { after.or(before) };
        if let Some(pct) = pct {
            highest = Some(highest.map_or(pct, |h| h.max(pct)));
        }
    }
    highest
}

/// Classify free-text material into a stretch level.
pub fn detect_stretch(material: &str) -> StretchLevel {
    let normalized = normalize(material);
    if normalized.trim().is_empty() {
        return StretchLevel::Unknown;
    }

    if let Some(pct) = elastic_percentage(&normalized) {
        let level = if pct >= 5.0 {
            StretchLevel::High
        } else if pct >= 2.0 {
            StretchLevel::Medium
        } else if pct > 0.0 {
            StretchLevel::Low
        } else {
            StretchLevel::None
        };
        debug!(material, pct, level = level.as_str(), "stretch from blend percentage");
        return level;
    }

    STRETCH_RULES
        .iter()
        .find(|(patterns, _)| patterns.iter().any(|p| contains_word(&normalized, p)))
        .map(|(_, level)| *level)
        .unwrap_or(StretchLevel::Unknown)
}

/// True for medium or high stretch.
pub fn is_stretchy(material: &str) -> bool {
    detect_stretch(material).is_stretchy()
}

/// Where the stretch level came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StretchSource {
    Explicit,
    Material,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FabricComfort {
    pub stretch: StretchLevel,
    pub stretch_source: StretchSource,
    /// False when there is no material text to read
    pub has_enough_data: bool,
    /// Verdict plus up to four insights in `reasons`
    pub result: SuitabilityResult,
}

/// Comfort of a garment given its material, stretch field, category and fit.
pub fn analyze_fabric_comfort(
    material: Option<&str>,
    explicit_stretch: Option<StretchSpec>,
    category: Category,
    fit: FitType,
) -> FabricComfort {
    let material = material.map(str::trim).filter(|m| !m.is_empty());
    let inferred = material.map(detect_stretch).unwrap_or_default();

    let (stretch, stretch_source) = match explicit_stretch {
        Some(spec) => (spec.level(), StretchSource::Explicit),
        None if inferred.is_known() => (inferred, StretchSource::Material),
        None => (StretchLevel::Unknown, StretchSource::Unknown),
    };
    let has_enough_data = material.is_some();

    if !has_enough_data && !stretch.is_known() {
        return FabricComfort {
            stretch,
            stretch_source,
            has_enough_data,
            result: SuitabilityResult::insufficient(
                vec![DataGap::Material],
                vec!["Fabric details are missing for this garment".to_string()],
                Vec::new(),
            ),
        };
    }

    let verdict = comfort_verdict(stretch, category, fit);
    let mut insights = vec![stretch_insight(stretch).to_string()];
    if let Some(note) = fit_insight(stretch, category, fit) {
        insights.push(note.to_string());
    }
    if stretch_source == StretchSource::Explicit && inferred.is_known() && inferred != stretch {
        debug!(listed = stretch.as_str(), inferred = inferred.as_str(), "stretch field disagrees with material");
        insights.push(format!(
            "Listed stretch ({stretch}) differs from the fabric content ({inferred})"
        ));
    }
    if let Some(material) = material {
        let normalized = normalize(material);
        insights.extend(
            BREATHABILITY_RULES
                .iter()
                .filter(|(patterns, _)| patterns.iter().any(|p| contains_word(&normalized, p)))
                .map(|(_, note)| note.to_string()),
        );
    }
    insights.truncate(limits::MAX_FABRIC_INSIGHTS);

    let alternatives = if verdict == ComfortVerdict::Risky {
        vec![
            "Look for a version with elastane".to_string(),
            "Size up for more room".to_string(),
        ]
    } else {
        Vec::new()
    };

    FabricComfort {
        stretch,
        stretch_source,
        has_enough_data,
        result: SuitabilityResult::ok(Verdict::Fabric(verdict), insights, alternatives),
    }
}

fn comfort_verdict(stretch: StretchLevel, category: Category, fit: FitType) -> ComfortVerdict {
    let fitted_bottom = matches!(category, Category::LowerBody | Category::Dresses);
    match (stretch, fit) {
        (StretchLevel::Medium | StretchLevel::High, _) => ComfortVerdict::Comfortable,
        (_, FitType::Relaxed | FitType::Oversized) if stretch.is_known() => ComfortVerdict::Comfortable,
        (StretchLevel::Low, FitType::Regular) => ComfortVerdict::Comfortable,
        (StretchLevel::Low, _) => ComfortVerdict::Ok,
        (StretchLevel::None, FitType::Snug) if fitted_bottom => ComfortVerdict::Risky,
        (StretchLevel::None, FitType::Regular) if !fitted_bottom => ComfortVerdict::Comfortable,
        _ => ComfortVerdict::Ok,
    }
}

fn stretch_insight(stretch: StretchLevel) -> &'static str {
    match stretch {
        StretchLevel::High => "High stretch moves with you",
        StretchLevel::Medium => "Some stretch for easy movement",
        StretchLevel::Low => "Slight give with little recovery",
        StretchLevel::None => "No stretch; the fit will not give",
        StretchLevel::Unknown => "Stretch could not be determined from the fabric",
    }
}

fn fit_insight(stretch: StretchLevel, category: Category, fit: FitType) -> Option<&'static str> {
    match (stretch, fit, category) {
        (StretchLevel::None, FitType::Snug, Category::LowerBody) => {
            Some("Snug, rigid bottoms can restrict sitting and bending")
        }
        (StretchLevel::None, FitType::Snug, Category::Dresses) => Some("A snug, rigid dress leaves little room to move"),
        (StretchLevel::None, FitType::Snug, Category::UpperBody) => Some("Size up if you are between sizes"),
        (StretchLevel::Medium | StretchLevel::High, FitType::Snug, _) => {
            Some("Stretch keeps a snug fit comfortable")
        }
        (_, FitType::Oversized, _) => Some("Oversized cut leaves plenty of room"),
        _ => None,
    }
}
