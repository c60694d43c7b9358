//! Canonicalization of heterogeneous measurement inputs into inches
//!
//! Profiles reach the engine with legacy centimeter fields, newer inch
//! fields, numbers typed as strings, and heights written as "5.4" (five
//! feet four). Everything leaves this module as inches or `None`. A zero
//! is never used to mean "absent".

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::units::{CM_PER_INCH, HEIGHT_CM_FLOOR, HEIGHT_FEET_CEILING};

/// A numeric field as stored by clients: a JSON number or a typed-in string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    /// Numeric value, `None` when malformed, non-finite or non-positive.
    pub fn value(&self) -> Option<f64> {
        match self {
            RawNumber::Number(v) => positive(*v),
            RawNumber::Text(s) => parse_measurement(s),
        }
    }
}

/// Keep only finite, strictly positive values.
pub fn positive(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Convert centimeters to inches.
pub fn cm_to_inches(cm: f64) -> f64 {
    cm / CM_PER_INCH
}

/// Pick the canonical inch value for one body axis.
///
/// An explicit inch field is trusted outright when it holds a usable value.
/// Otherwise the legacy field is assumed to be centimeters.
pub fn resolve_inches(explicit_in: Option<f64>, legacy_cm: Option<f64>) -> Option<f64> {
    explicit_in
        .and_then(positive)
        .or_else(|| legacy_cm.and_then(positive).map(cm_to_inches))
        .and_then(positive)
}

/// Lenient numeric parse for a single typed-in measurement.
///
/// Trailing unit words and quote marks are ignored ("32 in", `32"`), and a
/// lone comma is read as a decimal separator. The number is returned in
/// whatever unit it was written in.
pub fn parse_measurement(raw: &str) -> Option<f64> {
    let trimmed = raw
        .trim()
        .trim_end_matches(|c: char| c.is_alphabetic() || c == '"' || c == '\'' || c.is_whitespace());
    if trimmed.is_empty() {
        return None;
    }

    let normalized = if trimmed.contains('.') {
        trimmed.replace(',', "")
    } else {
        trimmed.replace(',', ".")
    };

    match normalized.parse::<f64>() {
        Ok(v) => positive(v),
        Err(_) => {
            warn!(input = raw, "ignoring malformed measurement");
            None
        }
    }
}

/// Parse a height string into inches.
///
/// Accepted forms:
/// - feet/inch marks: `5'4"`, `5 ft 4 in`, `5ft`
/// - explicit units: `163 cm`, `64 in`, `64"`
/// - bare numbers: below 10 is feet.inches (`5.4` is 64, `5.11` is 71),
///   100 and above is centimeters, anything in between is inches
pub fn parse_height(raw: &str) -> Option<f64> {
    let text = raw.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }

    if let Some(inches) = parse_feet_marks(&text) {
        return positive(inches);
    }

    if let Some(number) = text.strip_suffix("cm") {
        return parse_measurement(number).map(cm_to_inches).and_then(positive);
    }

    if text.ends_with('"') || text.ends_with("in") || text.ends_with("inches") {
        return parse_measurement(&text);
    }

    let value = parse_measurement(&text)?;
    if value >= HEIGHT_CM_FLOOR {
        positive(cm_to_inches(value))
    } else if value < HEIGHT_FEET_CEILING {
        parse_feet_dot_inches(&text)
    } else {
        Some(value)
    }
}

/// `5'4"` / `5 ft 4 in` / `5 feet`
fn parse_feet_marks(text: &str) -> Option<f64> {
    let (feet, rest) = ["feet", "ft", "'"]
        .iter()
        .find_map(|mark| text.split_once(mark))?;

    let feet = parse_measurement(feet)?;
    let rest = rest
        .trim()
        .trim_end_matches(|c: char| c.is_alphabetic() || c == '"' || c.is_whitespace());
    let inches = if rest.is_empty() {
        0.0
    } else {
        rest.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0 && *v < 12.0)?
    };

    Some(feet * 12.0 + inches)
}

/// `5.4` means five feet four inches; digits after the dot are whole inches.
fn parse_feet_dot_inches(text: &str) -> Option<f64> {
    let (feet, inches) = match text.split_once(['.', ',']) {
        Some((feet, inches)) => (feet, inches),
        None => (text, ""),
    };

    let feet: u32 = feet.trim().parse().ok()?;
    let inches: u32 = if inches.is_empty() {
        0
    } else {
        match inches.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                warn!(input = text, "ignoring malformed feet.inches height");
                return None;
            }
        }
    };

    if inches >= 12 {
        warn!(input = text, "inches part of a feet.inches height must be below 12");
        return None;
    }

    positive(f64::from(feet * 12 + inches))
}
