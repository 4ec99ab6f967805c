//! Palette storage, built-in sets, and palette-document loading.
//!
//! A palette is an ordered list of 3-channel triplets expressed in the
//! active color space. Palette documents are plain JSON arrays of
//! 3-element numeric arrays; any array of triplets is accepted, there is
//! no schema version.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::colorspace::ColorMode;
use crate::error::PhixelError;

/// Original Game Boy DMG greens, darkest first.
const GAMEBOY: [[u8; 3]; 4] = [
    [0x0f, 0x38, 0x0f],
    [0x30, 0x62, 0x30],
    [0x8b, 0xac, 0x0f],
    [0x9b, 0xbc, 0x0f],
];

/// Commodore 64 (VIC-II) colors.
const COMMODORE64: [[u8; 3]; 16] = [
    [0x00, 0x00, 0x00],
    [0xff, 0xff, 0xff],
    [0x88, 0x00, 0x00],
    [0xaa, 0xff, 0xee],
    [0xcc, 0x44, 0xcc],
    [0x00, 0xcc, 0x55],
    [0x00, 0x00, 0xaa],
    [0xee, 0xee, 0x77],
    [0xdd, 0x88, 0x55],
    [0x66, 0x44, 0x00],
    [0xff, 0x77, 0x77],
    [0x33, 0x33, 0x33],
    [0x77, 0x77, 0x77],
    [0xaa, 0xff, 0x66],
    [0x00, 0x88, 0xff],
    [0xbb, 0xbb, 0xbb],
];

/// Names accepted by [`Palette::builtin`].
pub const BUILTIN_NAMES: [&str; 4] = ["gameboy", "commodore64", "grayscale", "sega"];

/// An ordered, fixed set of allowed output colors.
///
/// Entries live in the active color space: raw 0..=255 channels for RGB
/// palettes, normalized components for HSV/HLS palettes.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    entries: Vec<[f32; 3]>,
}

impl Palette {
    pub fn new(entries: Vec<[f32; 3]>) -> Self {
        Self { entries }
    }

    /// Build an RGB-space palette from integer channel triplets.
    pub fn from_rgb(colors: &[[u8; 3]]) -> Self {
        Self {
            entries: colors
                .iter()
                .map(|c| [c[0] as f32, c[1] as f32, c[2] as f32])
                .collect(),
        }
    }

    /// Look up a named built-in set. Built-ins are RGB-space palettes.
    pub fn builtin(name: &str) -> Result<Self, PhixelError> {
        match name {
            "gameboy" => Ok(Self::from_rgb(&GAMEBOY)),
            "commodore64" => Ok(Self::from_rgb(&COMMODORE64)),
            // 16 evenly spaced gray levels
            "grayscale" => Ok(Self::new((0..16).map(|i| [(i * 17) as f32; 3]).collect())),
            // Sega Master System: 2 bits per channel, the full 64-color range
            "sega" => {
                let mut entries = Vec::with_capacity(64);
                for r in 0..4u32 {
                    for g in 0..4u32 {
                        for b in 0..4u32 {
                            entries.push([(r * 85) as f32, (g * 85) as f32, (b * 85) as f32]);
                        }
                    }
                }
                Ok(Self::new(entries))
            }
            other => Err(PhixelError::UnknownPalette(other.to_string())),
        }
    }

    /// Parse a palette document: a JSON array of 3-element numeric arrays.
    /// Integer and real triplets both parse; values are taken verbatim as
    /// components in whatever space the document was authored for.
    pub fn from_json(doc: &str) -> Result<Self, PhixelError> {
        let entries: Vec<[f32; 3]> = serde_json::from_str(doc)?;
        Ok(Self { entries })
    }

    /// Load a palette document from disk.
    pub fn from_path(path: &Path) -> Result<Self, PhixelError> {
        let doc = fs::read_to_string(path).map_err(|source| PhixelError::PaletteRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&doc)
    }

    /// Re-express an RGB-space palette in `mode`'s components. Identity in
    /// RGB mode. Carries built-ins into an alternate-space run; custom
    /// documents are assumed to already be in the active space.
    pub fn into_mode(self, mode: ColorMode) -> Self {
        if mode == ColorMode::Rgb {
            return self;
        }
        Self {
            entries: self
                .entries
                .into_iter()
                .map(|c| {
                    mode.to_components(c[0].round() as u8, c[1].round() as u8, c[2].round() as u8)
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[[f32; 3]] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where a run's palette comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteSource {
    /// A named built-in set.
    Builtin(String),
    /// A palette document on disk.
    Custom(PathBuf),
    /// No quantization; blocks keep their averaged color.
    None,
}

/// Resolve a palette source for a run in the given mode.
///
/// Load failures degrade to no-palette with a logged warning rather than
/// aborting: a pass-through pixelation is preferred over no output.
pub fn resolve_palette(source: &PaletteSource, mode: ColorMode) -> Option<Palette> {
    let loaded = match source {
        PaletteSource::None => return None,
        PaletteSource::Builtin(name) => Palette::builtin(name).map(|p| p.into_mode(mode)),
        PaletteSource::Custom(path) => Palette::from_path(path),
    };
    match loaded {
        Ok(palette) if palette.is_empty() => {
            warn!("loaded palette is empty, running without quantization");
            None
        }
        Ok(palette) => Some(palette),
        Err(err) => {
            warn!("no palette loaded ({err}), running without quantization");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integer_triplets() {
        let p = Palette::from_json("[[1, 2, 3], [255, 0, 128]]").unwrap();
        assert_eq!(p.entries(), &[[1.0, 2.0, 3.0], [255.0, 0.0, 128.0]]);
    }

    #[test]
    fn parses_real_triplets() {
        let p = Palette::from_json("[[0.5, 0.25, 1.0]]").unwrap();
        assert_eq!(p.entries(), &[[0.5, 0.25, 1.0]]);
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(Palette::from_json("{\"colors\": []}").is_err());
        assert!(Palette::from_json("[[1, 2]]").is_err());
        assert!(Palette::from_json("not json").is_err());
    }

    #[test]
    fn builtin_lookup() {
        assert_eq!(Palette::builtin("gameboy").unwrap().len(), 4);
        assert_eq!(Palette::builtin("sega").unwrap().len(), 64);
        assert!(matches!(
            Palette::builtin("vectrex"),
            Err(PhixelError::UnknownPalette(_))
        ));
    }

    #[test]
    fn builtin_into_hsv_normalizes_entries() {
        let p = Palette::builtin("grayscale")
            .unwrap()
            .into_mode(ColorMode::Hsv);
        for entry in p.entries() {
            // Grays: hue and saturation collapse to zero, value spans [0, 1]
            assert_eq!(entry[0], 0.0);
            assert_eq!(entry[1], 0.0);
            assert!((0.0..=1.0).contains(&entry[2]));
        }
    }

    #[test]
    fn unknown_builtin_resolves_to_no_palette() {
        let source = PaletteSource::Builtin("vectrex".into());
        assert!(resolve_palette(&source, ColorMode::Rgb).is_none());
    }

    #[test]
    fn missing_custom_file_resolves_to_no_palette() {
        let source = PaletteSource::Custom(PathBuf::from("/nonexistent/palette.json"));
        assert!(resolve_palette(&source, ColorMode::Rgb).is_none());
    }
}
