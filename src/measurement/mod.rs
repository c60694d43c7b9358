//! Measurement normalization
//!
//! Turns whatever the profile store hands us into inches.

pub mod normalize;

pub use normalize::{cm_to_inches, parse_height, parse_measurement, positive, resolve_inches, RawNumber};
