//! Framing: cropping to a block-size multiple and output resizing.
//!
//! Crop runs before the pixelation pass so every block is full-size;
//! resize runs after it. Both hand back a new owned buffer — no stage
//! keeps a reference to a buffer it has passed on.

use image::imageops::FilterType;
use log::warn;

use crate::error::PhixelError;
use crate::PixelBuffer;

/// Which corner of the image survives a crop; the excess margin comes off
/// the opposite side(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Crop `buffer` down to the largest `block_size` multiple it contains.
///
/// The new dimensions are `floor(dim / block_size) * block_size`. An image
/// smaller than one block in either direction has nothing to keep and is a
/// configuration error.
pub fn crop_to_blocks(
    buffer: PixelBuffer,
    block_size: u32,
    anchor: Anchor,
) -> Result<PixelBuffer, PhixelError> {
    if block_size == 0 {
        return Err(PhixelError::InvalidBlockSize);
    }
    let (width, height) = (buffer.width(), buffer.height());
    let new_width = (width / block_size) * block_size;
    let new_height = (height / block_size) * block_size;
    if new_width == 0 || new_height == 0 {
        return Err(PhixelError::CropTooSmall { block_size });
    }
    if new_width == width && new_height == height {
        return Ok(buffer);
    }

    let (x0, y0) = match anchor {
        Anchor::TopLeft => (0, 0),
        Anchor::TopRight => (width - new_width, 0),
        Anchor::BottomLeft => (0, height - new_height),
        Anchor::BottomRight => (width - new_width, height - new_height),
    };

    let mut pixels = Vec::with_capacity((new_width as usize) * (new_height as usize));
    for y in y0..y0 + new_height {
        for x in x0..x0 + new_width {
            pixels.push(buffer.get(x, y));
        }
    }
    PixelBuffer::new(new_width, new_height, pixels)
}

/// Resample `buffer` to exact pixel dimensions via the image collaborator.
pub fn resize(buffer: PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer, PhixelError> {
    if width == 0 || height == 0 {
        return Err(PhixelError::InvalidResizeTarget(format!("{width}x{height}")));
    }
    let img = buffer.into_image();
    let resized = image::imageops::resize(&img, width, height, FilterType::Triangle);
    Ok(PixelBuffer::from_image(resized))
}

/// Parse a `WIDTHxHEIGHT` dimension spec such as `120x80`.
pub fn parse_dimensions(spec: &str) -> Result<(u32, u32), PhixelError> {
    let bad = || PhixelError::InvalidResizeTarget(spec.to_string());
    let (w, h) = spec.trim().split_once(['x', 'X']).ok_or_else(bad)?;
    let width = w.trim().parse::<u32>().map_err(|_| bad())?;
    let height = h.trim().parse::<u32>().map_err(|_| bad())?;
    if width == 0 || height == 0 {
        return Err(bad());
    }
    Ok((width, height))
}

/// Resize to a `WIDTHxHEIGHT` spec, falling back to the untouched buffer.
///
/// A malformed spec or a failed resample is reported as a warning and the
/// original buffer comes back unchanged — an un-resized output beats no
/// output.
pub fn resize_with_fallback(buffer: PixelBuffer, spec: &str) -> PixelBuffer {
    let target = match parse_dimensions(spec) {
        Ok(dims) => dims,
        Err(err) => {
            warn!("failed to resize image ({err}), keeping original dimensions");
            return buffer;
        }
    };
    let fallback = buffer.clone();
    match resize(buffer, target.0, target.1) {
        Ok(resized) => resized,
        Err(err) => {
            warn!("failed to resize image ({err}), keeping original dimensions");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgb::RGBA;

    /// 10x10 buffer where each pixel encodes its coordinates.
    fn coords() -> PixelBuffer {
        let pixels = (0..10u32)
            .flat_map(|y| (0..10u32).map(move |x| RGBA::new(x as u8, y as u8, 0, 255)))
            .collect();
        PixelBuffer::new(10, 10, pixels).unwrap()
    }

    #[test]
    fn crop_top_left_keeps_origin_region() {
        let cropped = crop_to_blocks(coords(), 3, Anchor::TopLeft).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (9, 9));
        assert_eq!(cropped.get(0, 0), RGBA::new(0, 0, 0, 255));
        assert_eq!(cropped.get(8, 8), RGBA::new(8, 8, 0, 255));
    }

    #[test]
    fn crop_bottom_right_keeps_far_region() {
        let cropped = crop_to_blocks(coords(), 3, Anchor::BottomRight).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (9, 9));
        assert_eq!(cropped.get(0, 0), RGBA::new(1, 1, 0, 255));
        assert_eq!(cropped.get(8, 8), RGBA::new(9, 9, 0, 255));
    }

    #[test]
    fn crop_mixed_anchors_trim_one_axis_each() {
        let cropped = crop_to_blocks(coords(), 3, Anchor::TopRight).unwrap();
        assert_eq!(cropped.get(0, 0), RGBA::new(1, 0, 0, 255));
        let cropped = crop_to_blocks(coords(), 3, Anchor::BottomLeft).unwrap();
        assert_eq!(cropped.get(0, 0), RGBA::new(0, 1, 0, 255));
    }

    #[test]
    fn crop_is_noop_on_exact_multiple() {
        let buffer = coords();
        let cropped = crop_to_blocks(buffer.clone(), 5, Anchor::BottomRight).unwrap();
        assert_eq!(cropped, buffer);
    }

    #[test]
    fn crop_smaller_than_block_fails() {
        assert!(matches!(
            crop_to_blocks(coords(), 11, Anchor::TopLeft),
            Err(PhixelError::CropTooSmall { block_size: 11 })
        ));
    }

    #[test]
    fn resize_produces_requested_dimensions() {
        let resized = resize(coords(), 4, 7).unwrap();
        assert_eq!((resized.width(), resized.height()), (4, 7));
    }

    #[test]
    fn resize_rejects_zero_target() {
        assert!(resize(coords(), 0, 7).is_err());
    }

    #[test]
    fn parse_dimension_specs() {
        assert_eq!(parse_dimensions("120x80").unwrap(), (120, 80));
        assert_eq!(parse_dimensions(" 3X4 ").unwrap(), (3, 4));
        assert!(parse_dimensions("120").is_err());
        assert!(parse_dimensions("axb").is_err());
        assert!(parse_dimensions("0x10").is_err());
        assert!(parse_dimensions("10x-1").is_err());
    }

    #[test]
    fn malformed_spec_falls_back_to_original() {
        let buffer = coords();
        let out = resize_with_fallback(buffer.clone(), "not-dimensions");
        assert_eq!(out, buffer);
    }

    #[test]
    fn valid_spec_resizes() {
        let out = resize_with_fallback(coords(), "5x5");
        assert_eq!((out.width(), out.height()), (5, 5));
    }
}
