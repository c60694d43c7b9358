//! Named colors and color families
//!
//! Two ordered tables drive naming:
//! - [`NAMED_COLORS`]: the fixed palette a measured RGB snaps to (nearest by
//!   Euclidean RGB distance)
//! - [`NAME_RULES`]: keyword patterns that classify free-text color names,
//!   evaluated top to bottom so "navy blue" lands on navy before blue

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::conversion::ColorConverter;

/// Coarse color family used for suitability comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorFamily {
    Black,
    White,
    Cream,
    Beige,
    Camel,
    Brown,
    Gray,
    Navy,
    Blue,
    LightBlue,
    Teal,
    Turquoise,
    Green,
    Emerald,
    Olive,
    Yellow,
    Mustard,
    Orange,
    Rust,
    Coral,
    Peach,
    Red,
    Burgundy,
    Pink,
    Lavender,
    Purple,
    Plum,
}

/// Neutrals pair with anything; chromatics carry the outfit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTier {
    Neutral,
    Chromatic,
}

/// Warmth of a family, compared against the user's undertone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Temperature {
    Warm,
    Cool,
    Balanced,
}

impl ColorFamily {
    pub fn tier(self) -> ColorTier {
        use ColorFamily::*;
        match self {
            Black | White | Cream | Beige | Camel | Brown | Gray | Navy => ColorTier::Neutral,
            _ => ColorTier::Chromatic,
        }
    }

    pub fn temperature(self) -> Temperature {
        use ColorFamily::*;
        match self {
            Cream | Beige | Camel | Brown | Olive | Yellow | Mustard | Orange | Rust | Coral
            | Peach | Turquoise => Temperature::Warm,
            Black | White | Gray | Navy | Blue | LightBlue | Emerald | Burgundy | Pink
            | Lavender | Purple | Plum => Temperature::Cool,
            Teal | Green | Red => Temperature::Balanced,
        }
    }

    pub fn label(self) -> &'static str {
        use ColorFamily::*;
        match self {
            Black => "black",
            White => "white",
            Cream => "cream",
            Beige => "beige",
            Camel => "camel",
            Brown => "brown",
            Gray => "gray",
            Navy => "navy",
            Blue => "blue",
            LightBlue => "light blue",
            Teal => "teal",
            Turquoise => "turquoise",
            Green => "green",
            Emerald => "emerald",
            Olive => "olive",
            Yellow => "yellow",
            Mustard => "mustard",
            Orange => "orange",
            Rust => "rust",
            Coral => "coral",
            Peach => "peach",
            Red => "red",
            Burgundy => "burgundy",
            Pink => "pink",
            Lavender => "lavender",
            Purple => "purple",
            Plum => "plum",
        }
    }
}

impl fmt::Display for ColorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedColor {
    pub name: &'static str,
    pub rgb: [u8; 3],
    pub family: ColorFamily,
}

const fn named(name: &'static str, rgb: [u8; 3], family: ColorFamily) -> NamedColor {
    NamedColor { name, rgb, family }
}

/// Fixed garment palette.
pub const NAMED_COLORS: &[NamedColor] = &[
    named("black", [0, 0, 0], ColorFamily::Black),
    named("charcoal", [54, 69, 79], ColorFamily::Gray),
    named("gray", [128, 128, 128], ColorFamily::Gray),
    named("light gray", [200, 200, 200], ColorFamily::Gray),
    named("white", [255, 255, 255], ColorFamily::White),
    named("ivory", [255, 255, 240], ColorFamily::Cream),
    named("cream", [255, 253, 208], ColorFamily::Cream),
    named("beige", [245, 245, 220], ColorFamily::Beige),
    named("khaki", [195, 176, 145], ColorFamily::Beige),
    named("tan", [210, 180, 140], ColorFamily::Camel),
    named("camel", [193, 154, 107], ColorFamily::Camel),
    named("brown", [139, 69, 19], ColorFamily::Brown),
    named("chocolate", [92, 58, 33], ColorFamily::Brown),
    named("navy", [0, 0, 128], ColorFamily::Navy),
    named("midnight blue", [25, 25, 112], ColorFamily::Navy),
    named("cobalt", [0, 71, 171], ColorFamily::Blue),
    named("royal blue", [65, 105, 225], ColorFamily::Blue),
    named("blue", [0, 0, 255], ColorFamily::Blue),
    named("denim", [21, 96, 189], ColorFamily::Blue),
    named("sky blue", [135, 206, 235], ColorFamily::LightBlue),
    named("powder blue", [176, 224, 230], ColorFamily::LightBlue),
    named("teal", [0, 128, 128], ColorFamily::Teal),
    named("turquoise", [64, 224, 208], ColorFamily::Turquoise),
    named("green", [0, 128, 0], ColorFamily::Green),
    named("forest green", [34, 139, 34], ColorFamily::Green),
    named("mint", [152, 255, 152], ColorFamily::Green),
    named("emerald", [80, 200, 120], ColorFamily::Emerald),
    named("olive", [128, 128, 0], ColorFamily::Olive),
    named("sage", [154, 168, 120], ColorFamily::Olive),
    named("yellow", [255, 220, 0], ColorFamily::Yellow),
    named("mustard", [225, 173, 1], ColorFamily::Mustard),
    named("orange", [255, 140, 0], ColorFamily::Orange),
    named("rust", [183, 65, 14], ColorFamily::Rust),
    named("coral", [255, 127, 80], ColorFamily::Coral),
    named("peach", [255, 218, 185], ColorFamily::Peach),
    named("red", [255, 0, 0], ColorFamily::Red),
    named("crimson", [220, 20, 60], ColorFamily::Red),
    named("burgundy", [128, 0, 32], ColorFamily::Burgundy),
    named("maroon", [128, 0, 0], ColorFamily::Burgundy),
    named("pink", [255, 192, 203], ColorFamily::Pink),
    named("hot pink", [255, 105, 180], ColorFamily::Pink),
    named("lilac", [200, 162, 200], ColorFamily::Lavender),
    named("purple", [128, 0, 128], ColorFamily::Purple),
    named("violet", [143, 0, 255], ColorFamily::Purple),
    named("plum", [142, 69, 133], ColorFamily::Plum),
];

/// Keyword rules for free-text color names, first match wins.
///
/// Patterns match whole words (or word sequences) of the normalized name.
pub const NAME_RULES: &[(&[&str], ColorFamily)] = &[
    (&["navy", "midnight"], ColorFamily::Navy),
    (&["burgundy", "maroon", "wine", "oxblood", "bordeaux", "merlot"], ColorFamily::Burgundy),
    (&["mustard", "ochre"], ColorFamily::Mustard),
    (&["rust", "terracotta", "brick", "copper"], ColorFamily::Rust),
    (&["coral", "salmon"], ColorFamily::Coral),
    (&["peach", "apricot"], ColorFamily::Peach),
    (&["teal", "petrol"], ColorFamily::Teal),
    (&["turquoise", "aqua", "cyan"], ColorFamily::Turquoise),
    (&["emerald", "jade"], ColorFamily::Emerald),
    (&["olive", "army", "sage", "khaki green"], ColorFamily::Olive),
    (&["lavender", "lilac", "mauve", "periwinkle"], ColorFamily::Lavender),
    (&["plum", "eggplant", "aubergine"], ColorFamily::Plum),
    (&["purple", "violet", "grape"], ColorFamily::Purple),
    (&["pink", "fuchsia", "magenta", "blush", "rose"], ColorFamily::Pink),
    (&["sky", "baby blue", "powder", "light blue", "ice blue", "pale blue"], ColorFamily::LightBlue),
    (&["blue", "cobalt", "denim", "indigo", "sapphire", "azure"], ColorFamily::Blue),
    (&["camel", "tan", "caramel", "cognac"], ColorFamily::Camel),
    (&["beige", "khaki", "sand", "nude", "taupe", "stone", "oatmeal"], ColorFamily::Beige),
    (&["cream", "ivory", "ecru", "off white", "vanilla", "bone"], ColorFamily::Cream),
    (&["brown", "chocolate", "coffee", "mocha", "chestnut", "espresso"], ColorFamily::Brown),
    (&["charcoal", "gray", "grey", "silver", "heather", "slate"], ColorFamily::Gray),
    (&["black", "jet", "onyx", "ebony"], ColorFamily::Black),
    (&["white", "snow", "optic"], ColorFamily::White),
    (&["red", "crimson", "scarlet", "cherry", "ruby"], ColorFamily::Red),
    (&["green", "forest", "mint", "lime", "kelly"], ColorFamily::Green),
    (&["yellow", "lemon", "gold", "canary"], ColorFamily::Yellow),
    (&["orange", "tangerine", "pumpkin"], ColorFamily::Orange),
];

/// Lowercase, punctuation to spaces, padded so patterns match whole words.
fn normalize_name(name: &str) -> String {
    let words: Vec<String> = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    format!(" {} ", words.join(" "))
}

/// Classify a free-text color name ("Navy Blue", "off-white", "#000080").
pub fn family_from_name(name: &str) -> Option<ColorFamily> {
    let converter = ColorConverter::new();
    if converter.is_hex(name) {
        return converter.hex_to_rgb(name).ok().map(|rgb| nearest_named(rgb).family);
    }

    let normalized = normalize_name(name);
    if normalized.trim().is_empty() {
        return None;
    }
    NAME_RULES
        .iter()
        .find(|(patterns, _)| {
            patterns
                .iter()
                .any(|pattern| normalized.contains(&format!(" {pattern} ")))
        })
        .map(|(_, family)| *family)
}

/// Nearest palette entry by Euclidean RGB distance; ties keep table order.
pub fn nearest_named(rgb: [u8; 3]) -> &'static NamedColor {
    let converter = ColorConverter::new();
    let mut best = &NAMED_COLORS[0];
    let mut best_distance = f32::INFINITY;
    for candidate in NAMED_COLORS {
        let distance = converter.rgb_distance(rgb, candidate.rgb);
        if distance < best_distance {
            best = candidate;
            best_distance = distance;
        }
    }
    best
}

/// Family for a hex string, `None` when it is not a valid hex color.
pub fn family_from_hex(hex: &str) -> Option<ColorFamily> {
    ColorConverter::new()
        .hex_to_rgb(hex)
        .ok()
        .map(|rgb| nearest_named(rgb).family)
}
