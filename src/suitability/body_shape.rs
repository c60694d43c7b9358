//! Garment cut against the user's body shape
//!
//! One ordered rule table keyed by shape, optional category and a fit-type
//! set (empty set matches every fit). The first matching rule wins, so the
//! specific rules for a shape come before its catch-all.

use tracing::debug;

use crate::garment::{Category, FitType};
use crate::profile::BodyShape;
use crate::suitability::{capitalize, DataGap, ShapeVerdict, SuitabilityResult, Verdict};

pub const FALLBACK_REASON: &str = "Works for most body types; adjust with styling";

struct ShapeRule {
    shape: BodyShape,
    category: Option<Category>,
    fits: &'static [FitType],
    verdict: ShapeVerdict,
    reasons: &'static [&'static str],
    tip: &'static str,
}

impl ShapeRule {
    fn matches(&self, shape: BodyShape, category: Category, fit: FitType) -> bool {
        self.shape == shape
            && self.category.map_or(true, |c| c == category)
            && (self.fits.is_empty() || self.fits.contains(&fit))
    }
}

use BodyShape::*;
use FitType::*;
use ShapeVerdict::{Flattering, Neutral, Risky};

const fn rule(
    shape: BodyShape,
    category: Option<Category>,
    fits: &'static [FitType],
    verdict: ShapeVerdict,
    reasons: &'static [&'static str],
    tip: &'static str,
) -> ShapeRule {
    ShapeRule {
        shape,
        category,
        fits,
        verdict,
        reasons,
        tip,
    }
}

const UPPER: Option<Category> = Some(Category::UpperBody);
const LOWER: Option<Category> = Some(Category::LowerBody);
const DRESS: Option<Category> = Some(Category::Dresses);
const ANY: Option<Category> = None;

static SHAPE_RULES: &[ShapeRule] = &[
    // Hourglass
    rule(Hourglass, ANY, &[Snug, Regular], Flattering,
        &["Follows your defined waist", "Keeps bust and hips in balance"],
        "Add a belt to mark the waist"),
    rule(Hourglass, ANY, &[Oversized], Risky,
        &["Extra volume hides your waist definition"],
        "Belt it or choose a regular fit"),
    rule(Hourglass, ANY, &[], Neutral,
        &["A relaxed cut softens your curves"],
        "Tuck in or belt to show the waist"),
    // Pear
    rule(Pear, UPPER, &[Regular, Relaxed], Flattering,
        &["Draws the eye upward", "Balances fuller hips"],
        "Pick tops with bright colors or shoulder detail"),
    rule(Pear, LOWER, &[Snug], Risky,
        &["A tight fit emphasizes hips and thighs"],
        "Try a straight or bootcut leg"),
    rule(Pear, DRESS, &[Regular, Relaxed], Flattering,
        &["An easy skirt skims the hips"],
        "Fit-and-flare shapes work well"),
    rule(Pear, ANY, &[], Neutral,
        &["Works when top and bottom are balanced"],
        "Pair with darker bottoms"),
    // Apple
    rule(Apple, ANY, &[Snug], Risky,
        &["Clings at the midsection"],
        "Choose a relaxed or empire-waist cut"),
    rule(Apple, UPPER, &[Relaxed, Oversized], Flattering,
        &["Skims the midsection", "Creates a longer line"],
        "A V-neck lengthens the torso"),
    rule(Apple, DRESS, &[Regular, Relaxed], Flattering,
        &["Floats over the waist"],
        "A shorter hem shows off your legs"),
    rule(Apple, LOWER, &[], Neutral,
        &["Mid-rise waistbands sit comfortably"],
        "Pick flat-front styles"),
    rule(Apple, ANY, &[], Neutral,
        &["Keeps a clean line through the torso"],
        "Open necklines draw the eye up"),
    // Rectangle
    rule(Rectangle, DRESS, &[], Flattering,
        &["Waist seams add shape to a straight frame"],
        "Wrap and peplum styles build curves"),
    rule(Rectangle, ANY, &[Oversized], Neutral,
        &["Boxy cuts add no shape"],
        "Belt it to create a waist"),
    rule(Rectangle, ANY, &[Snug], Neutral,
        &["Shows a straight silhouette"],
        "Layer to add dimension"),
    rule(Rectangle, ANY, &[], Flattering,
        &["Most cuts sit cleanly on a balanced frame"],
        "Use texture and layers for dimension"),
    // Inverted triangle
    rule(InvertedTriangle, UPPER, &[Snug], Risky,
        &["Tight tops widen the shoulders"],
        "Choose V-necks and raglan sleeves"),
    rule(InvertedTriangle, UPPER, &[Oversized], Risky,
        &["Volume on top exaggerates broad shoulders"],
        "Keep the volume on your lower half"),
    rule(InvertedTriangle, LOWER, &[Relaxed, Oversized], Flattering,
        &["Volume below balances broad shoulders"],
        "Wide-leg and A-line shapes work well"),
    rule(InvertedTriangle, DRESS, &[Regular, Relaxed], Flattering,
        &["A flared skirt balances the shoulders"],
        "Skip shoulder pads and puff sleeves"),
    rule(InvertedTriangle, ANY, &[], Neutral,
        &["Balance volume between top and bottom"],
        "Draw attention to the lower half"),
];

/// Evaluate a garment's category and fit against a body shape.
pub fn evaluate_body_shape(shape: BodyShape, category: Category, fit: FitType) -> SuitabilityResult {
    if !shape.is_known() {
        return SuitabilityResult::insufficient(
            vec![DataGap::BodyShape],
            vec![FALLBACK_REASON.to_string()],
            vec!["Add your body shape for tailored styling tips".to_string()],
        );
    }

    let Some(rule) = SHAPE_RULES.iter().find(|r| r.matches(shape, category, fit)) else {
        debug!(shape = shape.label(), category = category.as_str(), fit = fit.as_str(), "no body shape rule");
        return SuitabilityResult::ok(
            Verdict::BodyShape(ShapeVerdict::Neutral),
            vec![FALLBACK_REASON.to_string()],
            vec!["Adjust with belts, tucks and layers".to_string()],
        );
    };

    let mut reasons = vec![format!("{}-fit {} for {} figures", capitalize(fit.as_str()), category.noun(), shape.label())];
    reasons.extend(rule.reasons.iter().map(|r| r.to_string()));

    SuitabilityResult::ok(Verdict::BodyShape(rule.verdict), reasons, vec![rule.tip.to_string()])
}
