//! Block reduction: the pixelation pass itself.
//!
//! The buffer is partitioned into a ceil(w/B) x ceil(h/B) grid of blocks;
//! blocks on the right and bottom edges truncate to the remaining pixels.
//! Each block collapses to one color — the per-channel average taken in the
//! active color space — optionally snapped to the nearest palette entry,
//! then written back across the whole block.

use rgb::RGBA;

use crate::colorspace::ColorMode;
use crate::error::PhixelError;
use crate::matcher::{self, MemoTable};
use crate::palette::Palette;
use crate::{PixelBuffer, PixelateConfig};

/// Pixelate `buffer` in place.
///
/// Alpha is averaged separately from color and never enters the color
/// space conversions or the palette match. An empty palette is treated the
/// same as no palette at all; the matcher is only invoked with entries to
/// scan. The memo cache lives and dies with this call.
pub fn reduce(
    buffer: &mut PixelBuffer,
    palette: Option<&Palette>,
    config: &PixelateConfig,
) -> Result<(), PhixelError> {
    if config.block_size == 0 {
        return Err(PhixelError::InvalidBlockSize);
    }
    let palette = palette.filter(|p| !p.is_empty());
    let mode = config.mode;
    let block = config.block_size;

    let (width, height) = (buffer.width(), buffer.height());
    let blocks_x = width.div_ceil(block);
    let blocks_y = height.div_ceil(block);
    let mut memo = MemoTable::new();

    for bx in 0..blocks_x {
        let x0 = bx * block;
        let x1 = (x0 + block).min(width);
        for by in 0..blocks_y {
            let y0 = by * block;
            let y1 = (y0 + block).min(height);

            let mut sums = [0.0f64; 3];
            let mut alpha_sum = 0u64;
            let mut count = 0u64;
            for y in y0..y1 {
                for x in x0..x1 {
                    let p = buffer.get(x, y);
                    let c = mode.to_components(p.r, p.g, p.b);
                    sums[0] += c[0] as f64;
                    sums[1] += c[1] as f64;
                    sums[2] += c[2] as f64;
                    alpha_sum += p.a as u64;
                    count += 1;
                }
            }
            // Unreachable under the partition rule; skip rather than divide by zero.
            if count == 0 {
                continue;
            }

            let mut avg = [
                (sums[0] / count as f64) as f32,
                (sums[1] / count as f64) as f32,
                (sums[2] / count as f64) as f32,
            ];
            if mode == ColorMode::Rgb {
                // RGB averages round to whole channel values before matching,
                // so identical blocks share a canonical memo key.
                avg = [avg[0].round(), avg[1].round(), avg[2].round()];
            }
            let alpha = ((alpha_sum as f64 / count as f64).round() as i64).clamp(0, 255) as u8;

            let resolved = match palette {
                Some(p) => matcher::closest(avg, p, &mut memo, mode, config.channel_weights),
                None => avg,
            };
            let (r, g, b) = mode.to_rgb(resolved);

            let out = RGBA::new(r, g, b, alpha);
            for y in y0..y1 {
                for x in x0..x1 {
                    buffer.set(x, y, out);
                }
            }
        }
    }
    Ok(())
}
