#![forbid(unsafe_code)]

//! phixel — turn photos into palette-quantized pixel art.
//!
//! The pipeline partitions an image into fixed-size blocks, reduces each
//! block to its average color (optionally snapped to the nearest entry of a
//! fixed palette), and writes that color back across the block. Cropping to
//! a block-size multiple and post-pixelation resizing bracket the pass;
//! palette extraction is an independent path that turns an image into a
//! palette document.

pub mod colorspace;
pub mod error;
pub mod extract;
pub mod frame;
pub mod matcher;
pub mod palette;
pub mod reduce;

pub use colorspace::ColorMode;
pub use error::PhixelError;
pub use extract::PaletteDoc;
pub use frame::Anchor;
pub use palette::{Palette, PaletteSource};

use rgb::RGBA;

/// Configuration for one pixelation pass.
#[derive(Debug, Clone)]
pub struct PixelateConfig {
    /// Edge length of the square reduction blocks (>= 1).
    pub block_size: u32,
    /// Color space blocks are averaged and matched in.
    pub mode: ColorMode,
    /// Per-channel weights for the HSV/HLS distance metric. Equal weights
    /// by default; the RGB metric ignores them.
    pub channel_weights: [f32; 3],
}

impl Default for PixelateConfig {
    fn default() -> Self {
        Self {
            block_size: 8,
            mode: ColorMode::Rgb,
            channel_weights: [1.0; 3],
        }
    }
}

impl PixelateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block_size(mut self, n: u32) -> Self {
        self.block_size = n;
        self
    }

    pub fn mode(mut self, mode: ColorMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn channel_weights(mut self, weights: [f32; 3]) -> Self {
        self.channel_weights = weights;
        self
    }
}

/// An owned RGBA pixel grid, mutated in place by the pipeline stage that
/// currently holds it and handed off by value between stages.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<RGBA<u8>>,
}

impl PixelBuffer {
    /// Wrap a pixel vector, validating that it fills `width` x `height`.
    pub fn new(width: u32, height: u32, pixels: Vec<RGBA<u8>>) -> Result<Self, PhixelError> {
        if width == 0 || height == 0 {
            return Err(PhixelError::ZeroDimension);
        }
        if pixels.len() != (width as usize) * (height as usize) {
            return Err(PhixelError::DimensionMismatch {
                len: pixels.len(),
                width,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A buffer filled with a single color. Test and fixture helper.
    pub fn filled(width: u32, height: u32, pixel: RGBA<u8>) -> Result<Self, PhixelError> {
        Self::new(
            width,
            height,
            vec![pixel; (width as usize) * (height as usize)],
        )
    }

    pub fn from_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|p| RGBA {
                r: p.0[0],
                g: p.0[1],
                b: p.0[2],
                a: p.0[3],
            })
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn into_image(self) -> image::RgbaImage {
        let mut img = image::RgbaImage::new(self.width, self.height);
        for (src, dst) in self.pixels.iter().zip(img.pixels_mut()) {
            *dst = image::Rgba([src.r, src.g, src.b, src.a]);
        }
        img
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[RGBA<u8>] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [RGBA<u8>] {
        &mut self.pixels
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> RGBA<u8> {
        self.pixels[(y as usize) * (self.width as usize) + x as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, pixel: RGBA<u8>) {
        self.pixels[(y as usize) * (self.width as usize) + x as usize] = pixel;
    }
}

/// Pixelate a buffer in place: average every block in the configured color
/// space and, when a palette is given, snap the average to its nearest
/// entry. See [`reduce::reduce`].
pub fn pixelate(
    buffer: &mut PixelBuffer,
    palette: Option<&Palette>,
    config: &PixelateConfig,
) -> Result<(), PhixelError> {
    reduce::reduce(buffer, palette, config)
}
