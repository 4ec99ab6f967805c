//! Memoized nearest-palette-color search.
//!
//! Block averaging produces the same handful of colors over and over on
//! flat regions, so resolved matches are cached. The cache is owned by a
//! single pixelation pass and discarded with it — the matching function is
//! pure, so a hit and a miss are indistinguishable to callers.

use std::collections::HashMap;

use crate::colorspace::ColorMode;
use crate::palette::Palette;

/// Cache of resolved palette matches, keyed by the exact bit patterns of
/// the query color's components in the active space.
#[derive(Debug, Default)]
pub struct MemoTable {
    resolved: HashMap<[u32; 3], [f32; 3]>,
}

impl MemoTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(color: [f32; 3]) -> [u32; 3] {
        [color[0].to_bits(), color[1].to_bits(), color[2].to_bits()]
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.resolved.len()
    }
}

/// Find the palette entry closest to `color` under `mode`'s distance.
///
/// Ties break to the first minimal-distance entry in palette order. The
/// returned triplet is a copy; the cache is never handed out by reference.
///
/// The palette must be non-empty — callers gate on that before invoking
/// (the no-palette mode bypasses matching entirely).
pub fn closest(
    color: [f32; 3],
    palette: &Palette,
    memo: &mut MemoTable,
    mode: ColorMode,
    weights: [f32; 3],
) -> [f32; 3] {
    debug_assert!(!palette.is_empty());
    let key = MemoTable::key(color);
    if let Some(&hit) = memo.resolved.get(&key) {
        return hit;
    }

    let mut best = palette.entries()[0];
    let mut best_dist = mode.distance(color, best, weights);
    for &entry in &palette.entries()[1..] {
        let dist = mode.distance(color, entry, weights);
        if dist < best_dist {
            best = entry;
            best_dist = dist;
        }
    }

    memo.resolved.insert(key, best);
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    const EQUAL: [f32; 3] = [1.0, 1.0, 1.0];

    fn rgb_palette() -> Palette {
        Palette::from_rgb(&[[0, 0, 0], [255, 0, 0], [0, 255, 0], [255, 255, 255]])
    }

    #[test]
    fn picks_nearest_in_rgb() {
        let mut memo = MemoTable::new();
        let got = closest([250.0, 10.0, 5.0], &rgb_palette(), &mut memo, ColorMode::Rgb, EQUAL);
        assert_eq!(got, [255.0, 0.0, 0.0]);
    }

    #[test]
    fn tie_breaks_to_first_palette_entry() {
        // Both entries are equidistant from the query; the first wins.
        let palette = Palette::from_rgb(&[[10, 0, 0], [30, 0, 0]]);
        let mut memo = MemoTable::new();
        let got = closest([20.0, 0.0, 0.0], &palette, &mut memo, ColorMode::Rgb, EQUAL);
        assert_eq!(got, [10.0, 0.0, 0.0]);
    }

    #[test]
    fn memo_hit_matches_memo_miss() {
        let palette = rgb_palette();
        let color = [100.0, 180.0, 90.0];
        let mut memo = MemoTable::new();
        let miss = closest(color, &palette, &mut memo, ColorMode::Rgb, EQUAL);
        assert_eq!(memo.len(), 1);
        let hit = closest(color, &palette, &mut memo, ColorMode::Rgb, EQUAL);
        assert_eq!(memo.len(), 1);
        assert_eq!(miss, hit);

        let mut cold = MemoTable::new();
        assert_eq!(closest(color, &palette, &mut cold, ColorMode::Rgb, EQUAL), miss);
    }

    #[test]
    fn distinct_colors_get_distinct_keys() {
        let palette = rgb_palette();
        let mut memo = MemoTable::new();
        closest([0.0, 0.0, 0.0], &palette, &mut memo, ColorMode::Rgb, EQUAL);
        closest([0.0, 0.0, 1.0], &palette, &mut memo, ColorMode::Rgb, EQUAL);
        assert_eq!(memo.len(), 2);
    }

    #[test]
    fn hsv_weights_steer_the_match() {
        // Query sits between a hue-true dark entry and a hue-off bright one.
        let palette = Palette::new(vec![[0.0, 1.0, 0.2], [0.4, 1.0, 0.9]]);
        let query = [0.05, 1.0, 0.85];

        let mut memo = MemoTable::new();
        let hue_heavy = closest(query, &palette, &mut memo, ColorMode::Hsv, [10.0, 1.0, 1.0]);
        assert_eq!(hue_heavy, [0.0, 1.0, 0.2]);

        let mut memo = MemoTable::new();
        let value_heavy = closest(query, &palette, &mut memo, ColorMode::Hsv, [1.0, 1.0, 10.0]);
        assert_eq!(value_heavy, [0.4, 1.0, 0.9]);
    }
}
