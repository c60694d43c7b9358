//! Size selection
//!
//! Aggregates per-size scores into a recommendation, an optional backup, a
//! risk tier, a confidence and a few human-readable insights. Missing data
//! is reported through `status`, itemized by which side is missing, so the
//! caller can send the user to the right data-entry flow.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::FitOptions;
use crate::garment::{Category, GarmentRecord};
use crate::profile::BodyProfile;
use crate::sizing::chart::{chart_axes, Axis};
use crate::sizing::scorer::{AxisComparison, FitScorer, SizeScore};
use crate::Status;

/// Allows for float noise when comparing weighted sums.
const SCORE_EPSILON: f64 = 1e-9;

/// Qualitative confidence band attached to a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Risk {
    Low,
    Medium,
    High,
}

impl Risk {
    pub fn as_str(self) -> &'static str {
        match self {
            Risk::Low => "low",
            Risk::Medium => "medium",
            Risk::High => "high",
        }
    }
}

/// What is missing when no comparison is possible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingData {
    /// The user needs to enter measurements
    pub missing_body: bool,
    /// The garment needs a size chart
    pub missing_garment: bool,
    /// Body measurements that would unlock a recommendation
    pub body_axes: Vec<Axis>,
    /// Chart axes that would unlock a recommendation
    pub garment_axes: Vec<Axis>,
}

impl MissingData {
    pub fn is_empty(&self) -> bool {
        !self.missing_body && !self.missing_garment
    }
}

/// Size recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitResult {
    pub status: Status,
    pub recommended_size: Option<String>,
    pub backup_size: Option<String>,
    pub risk: Option<Risk>,
    pub confidence: f64,
    pub missing: MissingData,
    pub insights: Vec<String>,
    /// Every size, best first
    pub scores: Vec<SizeScore>,
}

impl FitResult {
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    fn insufficient(missing: MissingData, insight: String) -> Self {
        Self {
            status: Status::InsufficientData,
            recommended_size: None,
            backup_size: None,
            risk: None,
            confidence: 0.0,
            missing,
            insights: vec![insight],
            scores: Vec::new(),
        }
    }
}

/// Body axes that matter most for a category, used to prompt for data.
fn key_axes(category: Category) -> &'static [Axis] {
    match category {
        Category::UpperBody => &[Axis::Chest, Axis::Waist, Axis::Shoulder],
        Category::LowerBody => &[Axis::Waist, Axis::Hips, Axis::Inseam],
        Category::Dresses => &[Axis::Chest, Axis::Waist, Axis::Hips],
    }
}

/// Axes a body profile can hold at all.
fn body_measurable(axis: Axis) -> bool {
    matches!(
        axis,
        Axis::Chest | Axis::Waist | Axis::Hips | Axis::Shoulder | Axis::Inseam
    )
}

/// Recommend a size for `profile` from `garment`'s chart.
///
/// Deterministic and total: missing data yields
/// [`Status::InsufficientData`], never an error.
pub fn recommend_size(profile: &BodyProfile, garment: &GarmentRecord, options: &FitOptions) -> FitResult {
    let body_axes = profile.measured_axes();
    let garment_axes = chart_axes(&garment.size_chart);
    let shared = garment_axes.iter().any(|axis| body_axes.contains(axis));

    if !shared {
        let missing = missing_data(profile, garment, &garment_axes);
        debug!(
            missing_body = missing.missing_body,
            missing_garment = missing.missing_garment,
            "no shared measurement axes"
        );
        let insight = remediation_hint(&missing);
        return FitResult::insufficient(missing, insight);
    }

    let stretch = garment.effective_stretch();
    let scorer = FitScorer::new(options, garment.category, garment.fit_type, stretch);
    let scores = scorer.rank(profile, &garment.size_chart);

    // `shared` guarantees at least one size with a comparison, and the
    // ranking puts compared sizes ahead of uncompared ones.
    let Some(winner) = scores.first() else {
        let missing = missing_data(profile, garment, &garment_axes);
        let insight = remediation_hint(&missing);
        return FitResult::insufficient(missing, insight);
    };

    let backup = scores.get(1).filter(|runner| {
        runner.weighted_pass > 0.0
            && winner.weighted_pass - runner.weighted_pass <= options.backup_step + SCORE_EPSILON
    });

    let risk = risk_for(winner);
    let confidence = winner.ratio();
    let insights = insights_for(winner, options);

    debug!(
        size = winner.size.as_str(),
        backup = backup.map(|b| b.size.as_str()),
        risk = risk.as_str(),
        confidence,
        %stretch,
        "size recommended"
    );

    FitResult {
        status: Status::Ok,
        recommended_size: Some(winner.size.clone()),
        backup_size: backup.map(|b| b.size.clone()),
        risk: Some(risk),
        confidence,
        missing: MissingData::default(),
        insights,
        scores,
    }
}

fn missing_data(profile: &BodyProfile, garment: &GarmentRecord, garment_axes: &[Axis]) -> MissingData {
    // Sleeve, length and rise never match a body measurement, so a chart
    // holding only those counts as no chart.
    let usable: Vec<Axis> = garment_axes.iter().copied().filter(|a| body_measurable(*a)).collect();
    let missing_garment = usable.is_empty();
    // Only reached with no shared axis: a usable chart means the body side
    // is what's lacking.
    let missing_body = !profile.has_measurements() || !missing_garment;

    let wanted: Vec<Axis> = if missing_garment {
        key_axes(garment.category).to_vec()
    } else {
        usable
    };

    let body_axes = if missing_body {
        wanted
            .iter()
            .copied()
            .filter(|axis| profile.measurement(*axis).is_none())
            .collect()
    } else {
        Vec::new()
    };

    let garment_axes = if missing_garment {
        let measured = profile.measured_axes();
        let preferred: Vec<Axis> = key_axes(garment.category)
            .iter()
            .copied()
            .filter(|axis| measured.contains(axis))
            .collect();
        if preferred.is_empty() {
            key_axes(garment.category).to_vec()
        } else {
            preferred
        }
    } else {
        Vec::new()
    };

    MissingData {
        missing_body,
        missing_garment,
        body_axes,
        garment_axes,
    }
}

fn remediation_hint(missing: &MissingData) -> String {
    let names = |axes: &[Axis]| {
        axes.iter()
            .map(|a| a.as_str().replace('_', " "))
            .collect::<Vec<_>>()
            .join(", ")
    };
    match (missing.missing_body, missing.missing_garment) {
        (true, true) => "Add your measurements and a size chart for this item to get a size".to_string(),
        (false, true) => format!(
            "This item has no usable size chart yet; add {} measurements to get a size",
            names(&missing.garment_axes)
        ),
        _ if missing.body_axes.is_empty() => "Add your measurements to get a size".to_string(),
        _ => format!("Add your {} measurement to get a size", names(&missing.body_axes)),
    }
}

/// Low: everything passes. Medium: primaries pass, something else fails, or
/// no primary axis could be compared. High: a primary axis fails.
fn risk_for(score: &SizeScore) -> Risk {
    let mut primary = score.primary().peekable();
    let has_primary = primary.peek().is_some();
    let primaries_pass = primary.all(|c| c.passes);
    let others_pass = score.non_primary().all(|c| c.passes);

    match (primaries_pass, others_pass, has_primary) {
        (false, _, _) => Risk::High,
        (true, true, true) => Risk::Low,
        _ => Risk::Medium,
    }
}

fn insights_for(score: &SizeScore, options: &FitOptions) -> Vec<String> {
    let mut insights = Vec::with_capacity(options.max_insights);

    if let Some(qualifier) = bias_qualifier(score, options) {
        insights.push(qualifier);
    }

    let mut ordered: Vec<&AxisComparison> = score.comparisons.iter().collect();
    ordered.sort_by(|a, b| b.ease.abs().total_cmp(&a.ease.abs()));
    insights.extend(ordered.into_iter().map(describe));

    insights.truncate(options.max_insights);
    insights
}

/// "Runs small" / "runs large" when enough primary axes are off the same way.
fn bias_qualifier(score: &SizeScore, options: &FitOptions) -> Option<String> {
    let threshold = options.bias_threshold_in;
    let under: Vec<Axis> = score
        .primary()
        .filter(|c| c.ease <= -threshold)
        .map(|c| c.axis)
        .collect();
    let over: Vec<Axis> = score
        .primary()
        .filter(|c| c.ease >= c.band.max + threshold)
        .map(|c| c.axis)
        .collect();

    let list = |axes: &[Axis]| axes.iter().map(|a| a.as_str()).collect::<Vec<_>>().join(" and ");
    let min_axes = options.bias_min_axes.max(1);

    if under.len() >= min_axes && under.len() >= over.len() {
        Some(format!(
            "Runs small: {} measures at least {:.1}\" under you at the {}; consider sizing up",
            score.size,
            threshold,
            list(&under)
        ))
    } else if over.len() >= min_axes {
        Some(format!(
            "Runs large: {} has at least {:.1}\" more room than this fit needs at the {}; consider sizing down",
            score.size,
            threshold,
            list(&over)
        ))
    } else {
        None
    }
}

fn describe(c: &AxisComparison) -> String {
    let amount = c.ease.abs();
    let label = c.axis.label();
    if c.ease < c.band.min {
        if c.ease < 0.0 {
            format!("{label}: {amount:.1}\" smaller than you, likely tight")
        } else {
            format!("{label}: only {amount:.1}\" of room, may feel tight")
        }
    } else if c.ease > c.band.max {
        format!("{label}: {amount:.1}\" of room, expect a loose fit")
    } else if c.ease < 0.0 {
        format!("{label}: {amount:.1}\" under your measurement, fabric stretch should cover it")
    } else if amount < 0.05 {
        format!("{label}: matches your measurement, close fit")
    } else {
        format!("{label}: {amount:.1}\" of room, comfortable")
    }
}
