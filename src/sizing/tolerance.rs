//! Ease tolerance bands
//!
//! A band is the range of `garment - body` (inches) that still counts as a
//! fit on one axis. Bands start from an ordered per-category table and are
//! then bent by the cut of the garment and the stretch of its fabric.

use serde::{Deserialize, Serialize};

use crate::constants::tolerance;
use crate::garment::{Category, FitType, StretchLevel};
use crate::sizing::chart::Axis;

/// Acceptable ease range for one axis, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceBand {
    pub min: f64,
    pub max: f64,
}

impl ToleranceBand {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, ease: f64) -> bool {
        ease >= self.min && ease <= self.max
    }
}

/// `(category, axis) -> band`, first match wins. `None` matches any category.
const BASE_BANDS: &[(Option<Category>, Axis, ToleranceBand)] = &[
    (Some(Category::UpperBody), Axis::Chest, ToleranceBand::new(0.0, 4.0)),
    (Some(Category::UpperBody), Axis::Waist, ToleranceBand::new(0.0, 5.0)),
    (Some(Category::UpperBody), Axis::Hips, ToleranceBand::new(0.0, 5.0)),
    (Some(Category::UpperBody), Axis::Length, ToleranceBand::new(-1.5, 2.0)),
    (Some(Category::LowerBody), Axis::Waist, ToleranceBand::new(-0.5, 2.0)),
    (Some(Category::LowerBody), Axis::Hips, ToleranceBand::new(0.0, 3.0)),
    (Some(Category::LowerBody), Axis::Inseam, ToleranceBand::new(-1.0, 1.0)),
    (Some(Category::LowerBody), Axis::Rise, ToleranceBand::new(-0.75, 0.75)),
    (Some(Category::LowerBody), Axis::Thigh, ToleranceBand::new(0.0, 3.0)),
    (Some(Category::LowerBody), Axis::LegOpening, ToleranceBand::new(-1.0, 3.0)),
    (Some(Category::LowerBody), Axis::Length, ToleranceBand::new(-1.0, 1.5)),
    (Some(Category::Dresses), Axis::Chest, ToleranceBand::new(0.0, 3.0)),
    (Some(Category::Dresses), Axis::Waist, ToleranceBand::new(0.0, 3.0)),
    (Some(Category::Dresses), Axis::Hips, ToleranceBand::new(0.0, 4.0)),
    (Some(Category::Dresses), Axis::Length, ToleranceBand::new(-2.0, 2.0)),
    (None, Axis::Chest, ToleranceBand::new(0.0, 4.0)),
    (None, Axis::Shoulder, ToleranceBand::new(-0.5, 1.5)),
    (None, Axis::Sleeve, ToleranceBand::new(-1.0, 1.5)),
];

/// Used when no row of the table matches.
const FALLBACK_BAND: ToleranceBand = ToleranceBand::new(-1.0, 2.0);

/// Circumference axes; only these respond to cut and stretch.
fn is_girth(axis: Axis) -> bool {
    matches!(
        axis,
        Axis::Chest | Axis::Waist | Axis::Hips | Axis::Thigh | Axis::LegOpening | Axis::Shoulder
    )
}

/// Band for a regular-cut, non-stretch garment.
pub fn base_band(category: Category, axis: Axis) -> ToleranceBand {
    BASE_BANDS
        .iter()
        .find(|(cat, ax, _)| *ax == axis && cat.map_or(true, |c| c == category))
        .map(|(_, _, band)| *band)
        .unwrap_or(FALLBACK_BAND)
}

/// Band after fit type and fabric stretch are applied.
///
/// Snug cuts accept some negative ease and halve the positive side; relaxed
/// and oversized cuts widen the positive side. Stretch widens the negative
/// side, since a stretchy garment may measure smaller than the body and
/// still fit. Shoulders take half of any cut adjustment. Length axes are
/// left alone.
pub fn band_for(category: Category, fit: FitType, stretch: StretchLevel, axis: Axis) -> ToleranceBand {
    let mut band = base_band(category, axis);
    if !is_girth(axis) {
        return band;
    }

    let share = if axis == Axis::Shoulder { 0.5 } else { 1.0 };
    match fit {
        FitType::Snug => {
            band.min -= tolerance::SNUG_NEGATIVE_SHIFT_IN * share;
            if band.max > 0.0 {
                band.max *= 1.0 - (1.0 - tolerance::SNUG_MAX_SCALE) * share;
            }
        }
        FitType::Regular => {}
        FitType::Relaxed => band.max += tolerance::RELAXED_EXTRA_IN * share,
        FitType::Oversized => band.max += tolerance::OVERSIZED_EXTRA_IN * share,
    }

    band.min -= stretch.negative_allowance() * share;
    band
}
