//! Per-size fit scoring
//!
//! Compares a body profile against one size row, axis by axis, and ranks
//! sizes by primary tightness and weighted passing axes.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::config::FitOptions;
use crate::garment::{Category, FitType, StretchLevel};
use crate::profile::BodyProfile;
use crate::sizing::chart::{Axis, SizeChartEntry};
use crate::sizing::tolerance::{band_for, ToleranceBand};

/// One axis of one size, compared against the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisComparison {
    pub axis: Axis,
    pub body_in: f64,
    pub garment_in: f64,
    /// `garment - body`; negative means the garment is smaller than the body
    pub ease: f64,
    pub band: ToleranceBand,
    pub passes: bool,
    pub weight: f64,
}

impl AxisComparison {
    /// Inches below the band (positive) or above it (negative); 0 inside.
    pub fn shortfall(&self) -> f64 {
        if self.ease < self.band.min {
            self.band.min - self.ease
        } else if self.ease > self.band.max {
            self.band.max - self.ease
        } else {
            0.0
        }
    }
}

/// Aggregate score of one size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeScore {
    pub size: String,
    /// Position in the source chart
    pub index: usize,
    pub comparisons: Vec<AxisComparison>,
    /// Sum of weights of passing axes
    pub weighted_pass: f64,
    /// Sum of weights of every compared axis
    pub weighted_total: f64,
    /// Weighted inches by which primary axes fall below their band
    pub tight: f64,
    /// Σ|ease| over compared axes
    pub deviation: f64,
}

impl SizeScore {
    /// Weighted passing ratio in [0, 1]; 0 when nothing was compared.
    pub fn ratio(&self) -> f64 {
        if self.weighted_total > 0.0 {
            (self.weighted_pass / self.weighted_total).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn has_comparisons(&self) -> bool {
        !self.comparisons.is_empty()
    }

    pub fn primary(&self) -> impl Iterator<Item = &AxisComparison> {
        self.comparisons.iter().filter(|c| c.axis.is_primary())
    }

    pub fn non_primary(&self) -> impl Iterator<Item = &AxisComparison> {
        self.comparisons.iter().filter(|c| !c.axis.is_primary())
    }
}

/// Scores sizes for one garment against one body.
pub struct FitScorer<'a> {
    options: &'a FitOptions,
    category: Category,
    fit: FitType,
    stretch: StretchLevel,
}

impl<'a> FitScorer<'a> {
    pub fn new(options: &'a FitOptions, category: Category, fit: FitType, stretch: StretchLevel) -> Self {
        Self {
            options,
            category,
            fit,
            stretch,
        }
    }

    /// Tolerance band this scorer applies to an axis.
    pub fn band(&self, axis: Axis) -> ToleranceBand {
        band_for(self.category, self.fit, self.stretch, axis)
    }

    /// Compare every axis present in both the profile and the size row.
    pub fn score(&self, profile: &BodyProfile, entry: &SizeChartEntry, index: usize) -> SizeScore {
        let comparisons: Vec<AxisComparison> = entry
            .measurements
            .iter()
            .filter_map(|(&axis, &garment_in)| {
                let body_in = profile.measurement(axis)?;
                let ease = garment_in - body_in;
                let band = self.band(axis);
                Some(AxisComparison {
                    axis,
                    body_in,
                    garment_in,
                    ease,
                    band,
                    passes: band.contains(ease),
                    weight: self.options.weight(axis),
                })
            })
            .collect();

        let weighted_pass = comparisons.iter().filter(|c| c.passes).map(|c| c.weight).sum();
        let weighted_total = comparisons.iter().map(|c| c.weight).sum();
        let tight = comparisons
            .iter()
            .filter(|c| c.axis.is_primary())
            .map(|c| c.shortfall().max(0.0) * c.weight)
            .sum();
        let deviation = comparisons.iter().map(|c| c.ease.abs()).sum();

        SizeScore {
            size: entry.size.clone(),
            index,
            comparisons,
            weighted_pass,
            weighted_total,
            tight,
            deviation,
        }
    }

    /// Score and rank every size, best first.
    pub fn rank(&self, profile: &BodyProfile, chart: &[SizeChartEntry]) -> Vec<SizeScore> {
        let mut scores: Vec<SizeScore> = chart
            .iter()
            .enumerate()
            .map(|(index, entry)| self.score(profile, entry, index))
            .collect();
        scores.sort_by(compare_scores);
        scores
    }
}

/// Ranking order: sizes that could be compared at all, then less primary
/// tightness, then more weighted passes, then smaller total deviation, then
/// chart order.
///
/// A size too small at the chest, waist or hips never outranks one that is
/// not. Tightness only grows with the body, so on a graded chart a larger
/// measurement moves the pick up or leaves it in place.
pub fn compare_scores(a: &SizeScore, b: &SizeScore) -> Ordering {
    b.has_comparisons()
        .cmp(&a.has_comparisons())
        .then_with(|| a.tight.total_cmp(&b.tight))
        .then_with(|| b.weighted_pass.total_cmp(&a.weighted_pass))
        .then_with(|| a.deviation.total_cmp(&b.deviation))
        .then_with(|| a.index.cmp(&b.index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> BodyProfile {
        BodyProfile {
            chest_in: Some(34.0),
            waist_in: Some(28.0),
            hips_in: Some(38.0),
            inseam_in: Some(30.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_score_counts_weighted_passes() {
        let options = FitOptions::default();
        let scorer = FitScorer::new(&options, Category::LowerBody, FitType::Regular, StretchLevel::None);
        let entry = SizeChartEntry::new("M")
            .with(Axis::Waist, 29.0)
            .with(Axis::Hips, 39.0)
            .with(Axis::Inseam, 33.0)
            .with(Axis::Rise, 10.0);

        let score = scorer.score(&profile(), &entry, 1);

        // Rise has no body counterpart and is skipped
        assert_eq!(score.comparisons.len(), 3);
        assert_eq!(score.weighted_pass, 4.0);
        assert_eq!(score.weighted_total, 5.0);
        assert!((score.ratio() - 0.8).abs() < 1e-9);
        assert_eq!(score.deviation, 5.0);

        let inseam = score.comparisons.iter().find(|c| c.axis == Axis::Inseam).unwrap();
        assert!(!inseam.passes);
        assert_eq!(inseam.shortfall(), -2.0);
    }

    #[test]
    fn test_rank_tie_breaks_on_deviation() {
        let options = FitOptions::default();
        let scorer = FitScorer::new(&options, Category::UpperBody, FitType::Regular, StretchLevel::None);
        let chart = vec![
            SizeChartEntry::new("L").with(Axis::Chest, 37.5),
            SizeChartEntry::new("M").with(Axis::Chest, 35.0),
            SizeChartEntry::new("XS").with(Axis::Length, 20.0),
        ];

        let ranked = scorer.rank(&profile(), &chart);
        let order: Vec<&str> = ranked.iter().map(|s| s.size.as_str()).collect();
        assert_eq!(order, vec!["M", "L", "XS"]);
    }

    #[test]
    fn test_rank_puts_tight_sizes_last() {
        let options = FitOptions::default();
        let scorer = FitScorer::new(&options, Category::UpperBody, FitType::Regular, StretchLevel::None);
        let chart = vec![
            SizeChartEntry::new("S").with(Axis::Chest, 36.0).with(Axis::Waist, 29.0),
            SizeChartEntry::new("M").with(Axis::Chest, 38.0).with(Axis::Waist, 31.0),
        ];
        let body = BodyProfile {
            chest_in: Some(32.5),
            waist_in: Some(30.0),
            ..Default::default()
        };

        // S passes chest but is tight at the waist; M passes waist, chest loose
        let ranked = scorer.rank(&body, &chart);
        assert_eq!(ranked[0].weighted_pass, ranked[1].weighted_pass);
        assert_eq!(ranked[0].size, "M");
        assert_eq!(ranked[0].tight, 0.0);
        assert!(ranked[1].tight > 0.0);
    }
}
