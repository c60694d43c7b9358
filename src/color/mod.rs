//! Color conversion, naming and garment photo analysis
//!
//! This module handles color space conversions, maps measured colors onto
//! named families, and extracts the dominant color of a garment photo.

pub mod cache;
pub mod conversion;
pub mod dominant;
pub mod naming;

pub use cache::DominantColorCache;
pub use conversion::ColorConverter;
pub use dominant::{pick_pixel, DominantColor, DominantColorDetector};
pub use naming::{family_from_hex, family_from_name, nearest_named, ColorFamily, ColorTier, NamedColor, Temperature};
