//! Size chart resolution
//!
//! Catalog feeds, brand reference tables and OCR/manual entry all describe
//! sizes differently. This module folds them into one ordered list of
//! [`SizeChartEntry`] values in inches, keyed by canonical [`Axis`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::constants::weights;
use crate::error::EngineError;
use crate::measurement::{cm_to_inches, parse_measurement, positive};

/// Canonical garment measurement axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Chest,
    Waist,
    Hips,
    Shoulder,
    Sleeve,
    Inseam,
    Rise,
    Thigh,
    LegOpening,
    Length,
}

/// Aliases seen in catalogs and OCR output, matched after lowercasing and
/// stripping spaces, dashes and underscores.
const AXIS_ALIASES: &[(&str, Axis)] = &[
    ("chest", Axis::Chest),
    ("bust", Axis::Chest),
    ("pittopit", Axis::Chest),
    ("waist", Axis::Waist),
    ("waistband", Axis::Waist),
    ("hips", Axis::Hips),
    ("hip", Axis::Hips),
    ("seat", Axis::Hips),
    ("shoulder", Axis::Shoulder),
    ("shoulders", Axis::Shoulder),
    ("shoulderwidth", Axis::Shoulder),
    ("sleeve", Axis::Sleeve),
    ("sleevelength", Axis::Sleeve),
    ("arm", Axis::Sleeve),
    ("inseam", Axis::Inseam),
    ("insideleg", Axis::Inseam),
    ("rise", Axis::Rise),
    ("frontrise", Axis::Rise),
    ("thigh", Axis::Thigh),
    ("legopening", Axis::LegOpening),
    ("hem", Axis::LegOpening),
    ("legwidth", Axis::LegOpening),
    ("length", Axis::Length),
    ("bodylength", Axis::Length),
    ("totallength", Axis::Length),
];

impl Axis {
    pub const ALL: [Axis; 10] = [
        Axis::Chest,
        Axis::Waist,
        Axis::Hips,
        Axis::Shoulder,
        Axis::Sleeve,
        Axis::Inseam,
        Axis::Rise,
        Axis::Thigh,
        Axis::LegOpening,
        Axis::Length,
    ];

    /// Resolve a free-form axis name, `None` when it is not a known axis.
    pub fn parse(name: &str) -> Option<Axis> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        AXIS_ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, axis)| *axis)
    }

    /// Chest, waist and hips.
    pub fn is_primary(self) -> bool {
        matches!(self, Axis::Chest | Axis::Waist | Axis::Hips)
    }

    /// Scoring weight with the default constants.
    pub fn default_weight(self) -> f64 {
        match self {
            Axis::Chest | Axis::Waist | Axis::Hips => weights::PRIMARY,
            Axis::Shoulder | Axis::Sleeve | Axis::Inseam => weights::SECONDARY,
            Axis::Rise | Axis::Thigh | Axis::LegOpening | Axis::Length => weights::TERTIARY,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Chest => "chest",
            Axis::Waist => "waist",
            Axis::Hips => "hips",
            Axis::Shoulder => "shoulder",
            Axis::Sleeve => "sleeve",
            Axis::Inseam => "inseam",
            Axis::Rise => "rise",
            Axis::Thigh => "thigh",
            Axis::LegOpening => "leg_opening",
            Axis::Length => "length",
        }
    }

    /// Capitalized label for insight text.
    pub fn label(self) -> &'static str {
        match self {
            Axis::Chest => "Chest",
            Axis::Waist => "Waist",
            Axis::Hips => "Hips",
            Axis::Shoulder => "Shoulders",
            Axis::Sleeve => "Sleeves",
            Axis::Inseam => "Inseam",
            Axis::Rise => "Rise",
            Axis::Thigh => "Thigh",
            Axis::LegOpening => "Leg opening",
            Axis::Length => "Length",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Axis::parse(s).ok_or_else(|| EngineError::invalid("axis", s))
    }
}

/// Unit the raw chart values were written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartUnit {
    #[default]
    Inches,
    Centimeters,
}

impl ChartUnit {
    fn to_inches(self, value: f64) -> f64 {
        match self {
            ChartUnit::Inches => value,
            ChartUnit::Centimeters => cm_to_inches(value),
        }
    }
}

/// One size row in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeChartEntry {
    /// Size label as printed by the brand ("S", "32x30", "EU 38")
    pub size: String,
    /// Inches per canonical axis; most garments cover only a few axes
    pub measurements: BTreeMap<Axis, f64>,
}

impl SizeChartEntry {
    pub fn new(size: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            measurements: BTreeMap::new(),
        }
    }

    /// Builder-style helper, mostly for tests and fixtures.
    pub fn with(mut self, axis: Axis, inches: f64) -> Self {
        self.measurements.insert(axis, inches);
        self
    }

    pub fn get(&self, axis: Axis) -> Option<f64> {
        self.measurements.get(&axis).copied()
    }
}

/// Normalize a raw size chart into ordered entries.
///
/// Accepted shapes:
/// - `[{"size": "S", "measurements": {"waist": 27}}]`, or flat rows
///   `[{"size": "S", "waist": 27}]`
/// - axis-keyed `{"waist": {"S": 27, "M": 29}}`
/// - size-keyed `{"S": {"waist": 27}, "M": {"waist": 29}}`
///
/// Values may be numbers, numeric strings or ranges ("34-36", midpoint
/// taken). Unknown axes and unreadable values are dropped. Sizes with no
/// usable measurement are kept so their labels survive.
pub fn normalize_size_chart(raw: &Value, unit: ChartUnit) -> Vec<SizeChartEntry> {
    match raw {
        Value::Array(rows) => rows.iter().filter_map(|row| normalize_row(row, unit)).collect(),
        Value::Object(map) if looks_axis_keyed(map) => normalize_axis_keyed(map, unit),
        Value::Object(map) => normalize_size_keyed(map, unit),
        Value::Null => Vec::new(),
        other => {
            debug!(kind = json_kind(other), "size chart is neither a list nor an object");
            Vec::new()
        }
    }
}

/// Size labels in chart order.
pub fn size_labels(chart: &[SizeChartEntry]) -> Vec<String> {
    chart.iter().map(|entry| entry.size.clone()).collect()
}

/// Axes measured by at least one size, in canonical order.
pub fn chart_axes(chart: &[SizeChartEntry]) -> Vec<Axis> {
    Axis::ALL
        .into_iter()
        .filter(|axis| chart.iter().any(|entry| entry.measurements.contains_key(axis)))
        .collect()
}

fn normalize_row(row: &Value, unit: ChartUnit) -> Option<SizeChartEntry> {
    let Value::Object(fields) = row else {
        debug!(kind = json_kind(row), "skipping size chart row that is not an object");
        return None;
    };

    let size = ["size", "label", "name"]
        .iter()
        .find_map(|key| fields.get(*key))
        .and_then(label_of);
    let Some(size) = size else {
        debug!("skipping size chart row without a size label");
        return None;
    };

    let mut entry = SizeChartEntry::new(size);
    match fields.get("measurements") {
        Some(Value::Object(measurements)) => collect_measurements(&mut entry, measurements, unit),
        _ => collect_measurements(&mut entry, fields, unit),
    }
    Some(entry)
}

fn normalize_axis_keyed(map: &Map<String, Value>, unit: ChartUnit) -> Vec<SizeChartEntry> {
    let mut entries: Vec<SizeChartEntry> = Vec::new();
    for (axis_name, sizes) in map {
        let Some(axis) = Axis::parse(axis_name) else {
            debug!(axis = axis_name.as_str(), "dropping unknown size chart axis");
            continue;
        };
        let Value::Object(sizes) = sizes else {
            continue;
        };
        for (size, value) in sizes {
            let position = match entries.iter().position(|e| &e.size == size) {
                Some(position) => position,
                None => {
                    entries.push(SizeChartEntry::new(size.clone()));
                    entries.len() - 1
                }
            };
            if let Some(inches) = value_in_inches(value, unit) {
                entries[position].measurements.insert(axis, inches);
            }
        }
    }
    entries
}

fn normalize_size_keyed(map: &Map<String, Value>, unit: ChartUnit) -> Vec<SizeChartEntry> {
    map.iter()
        .map(|(size, axes)| {
            let mut entry = SizeChartEntry::new(size.clone());
            if let Value::Object(axes) = axes {
                collect_measurements(&mut entry, axes, unit);
            }
            entry
        })
        .collect()
}

/// An object is axis-keyed when every key names an axis and every value is
/// itself an object of sizes.
fn looks_axis_keyed(map: &Map<String, Value>) -> bool {
    !map.is_empty()
        && map
            .iter()
            .all(|(key, value)| Axis::parse(key).is_some() && value.is_object())
}

fn collect_measurements(entry: &mut SizeChartEntry, fields: &Map<String, Value>, unit: ChartUnit) {
    for (name, value) in fields {
        let Some(axis) = Axis::parse(name) else {
            continue;
        };
        match value_in_inches(value, unit) {
            Some(inches) => {
                entry.measurements.insert(axis, inches);
            }
            None => debug!(size = entry.size.as_str(), axis = %axis, "dropping unreadable measurement"),
        }
    }
}

fn value_in_inches(value: &Value, unit: ChartUnit) -> Option<f64> {
    let raw = match value {
        Value::Number(n) => n.as_f64().and_then(positive),
        Value::String(s) => parse_range(s),
        _ => None,
    }?;
    positive(unit.to_inches(raw))
}

/// "34", "34-36", "34 – 36", "34 to 36"; ranges resolve to their midpoint.
fn parse_range(text: &str) -> Option<f64> {
    let normalized = text.replace(['–', '—'], "-").replace(" to ", "-");
    match normalized.split_once('-') {
        Some((low, high)) => {
            let low = parse_measurement(low)?;
            let high = parse_measurement(high)?;
            positive((low + high) / 2.0)
        }
        None => parse_measurement(&normalized),
    }
}

fn label_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
