//! Palette extraction: the inverse utility.
//!
//! Enumerates the distinct colors of an image and serializes them as a
//! palette document. Counts are tallied per color during the scan but only
//! the color list is part of the output contract; consumers treat the
//! document as a set.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::colorspace::ColorMode;
use crate::PixelBuffer;

/// A serializable palette document: a JSON array of 3-element arrays.
/// RGB palettes carry integer triplets, alternate-space palettes carry the
/// real-valued components.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PaletteDoc {
    Rgb(Vec<[u8; 3]>),
    Components(Vec<[f32; 3]>),
}

impl PaletteDoc {
    pub fn len(&self) -> usize {
        match self {
            Self::Rgb(v) => v.len(),
            Self::Components(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_json(&self) -> String {
        // Serializing plain numeric arrays cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Tally the distinct RGB colors in `buffer`, alpha ignored.
/// BTreeMap keys keep the enumeration deterministic.
pub fn color_counts(buffer: &PixelBuffer) -> BTreeMap<[u8; 3], u32> {
    let mut counts = BTreeMap::new();
    for p in buffer.pixels() {
        *counts.entry([p.r, p.g, p.b]).or_insert(0) += 1;
    }
    counts
}

/// Extract the distinct colors of `buffer` as a palette document, converted
/// to `mode`'s components when an alternate space is active.
pub fn extract(buffer: &PixelBuffer, mode: ColorMode) -> PaletteDoc {
    let colors = color_counts(buffer);
    match mode {
        ColorMode::Rgb => PaletteDoc::Rgb(colors.into_keys().collect()),
        ColorMode::Hsv | ColorMode::Hls => PaletteDoc::Components(
            colors
                .into_keys()
                .map(|[r, g, b]| mode.to_components(r, g, b))
                .collect(),
        ),
    }
}
