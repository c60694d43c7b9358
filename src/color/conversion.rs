//! Color space conversion utilities
//!
//! Provides the conversions the detector and the color evaluator share:
//! - 8-bit RGB to CIE Lab (D65) for perceptual clustering
//! - Lab back to 8-bit RGB with gamut clamping
//! - Hex parsing and formatting
//! - ΔE76 and plain RGB Euclidean distance

use palette::{FromColor, IntoColor, Lab, Srgb};

use crate::{EngineError, Result};

/// Color converter for garment photos and catalog hex values
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorConverter;

impl ColorConverter {
    pub fn new() -> Self {
        Self
    }

    /// Convert RGB (0-255) to Lab color space (D65)
    pub fn rgb_to_lab(&self, rgb: [u8; 3]) -> Lab {
        let srgb = Srgb::new(
            f32::from(rgb[0]) / 255.0,
            f32::from(rgb[1]) / 255.0,
            f32::from(rgb[2]) / 255.0,
        );
        Lab::from_color(srgb)
    }

    /// Convert Lab to 8-bit RGB, clamped to the sRGB gamut
    pub fn lab_to_rgb(&self, lab: Lab) -> [u8; 3] {
        let srgb: Srgb = lab.into_color();
        [
            unit_to_byte(srgb.red),
            unit_to_byte(srgb.green),
            unit_to_byte(srgb.blue),
        ]
    }

    /// Chroma (distance from the neutral axis) of a Lab color
    pub fn chroma(&self, lab: Lab) -> f32 {
        (lab.a * lab.a + lab.b * lab.b).sqrt()
    }

    /// Format 8-bit RGB as an uppercase hex string (e.g. "#FF0000")
    pub fn rgb_to_hex(&self, rgb: [u8; 3]) -> String {
        format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
    }

    /// Parse a hex color string into 8-bit RGB
    ///
    /// Accepts "#RRGGBB", "RRGGBB" and the short "#RGB" form.
    ///
    /// # Errors
    ///
    /// Returns `ColorConversionError` if the string is not a hex color
    pub fn hex_to_rgb(&self, hex: &str) -> Result<[u8; 3]> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(EngineError::ColorConversionError {
                message: format!("Invalid hex color: {hex}"),
            });
        }

        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            n => {
                return Err(EngineError::ColorConversionError {
                    message: format!("Invalid hex color: expected 3 or 6 digits, got {n}"),
                })
            }
        };

        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&expanded[range], 16).map_err(|e| EngineError::ColorConversionError {
                message: format!("Invalid {name} value: {e}"),
            })
        };

        Ok([channel(0..2, "red")?, channel(2..4, "green")?, channel(4..6, "blue")?])
    }

    /// True when a string parses as a hex color
    pub fn is_hex(&self, text: &str) -> bool {
        let t = text.trim();
        t.starts_with('#') && self.hex_to_rgb(t).is_ok()
    }

    /// Delta E (CIE76): Euclidean distance in Lab
    pub fn delta_e(&self, lab1: Lab, lab2: Lab) -> f32 {
        let dl = lab1.l - lab2.l;
        let da = lab1.a - lab2.a;
        let db = lab1.b - lab2.b;
        (dl * dl + da * da + db * db).sqrt()
    }

    /// Euclidean distance between two 8-bit RGB colors
    pub fn rgb_distance(&self, a: [u8; 3], b: [u8; 3]) -> f32 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| {
                let d = f32::from(*x) - f32::from(*y);
                d * d
            })
            .sum::<f32>()
            .sqrt()
    }
}

fn unit_to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
