//! RGB ↔ HSV/HLS conversion and per-space color distance.
//!
//! Colors travel through the pipeline as `[f32; 3]` component triplets in
//! the active space: raw channel values (0..=255) in RGB mode, normalized
//! `[0, 1]` channels in HSV/HLS mode. Alpha never passes through here.

/// The color space a run operates in. Selected once at pipeline
/// construction; carries the conversion and distance functions so nothing
/// re-dispatches per pixel on a string flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Rgb,
    Hsv,
    Hls,
}

impl ColorMode {
    /// Convert an RGB channel triplet into this space's components.
    ///
    /// RGB mode is the identity (channels as f32). HSV/HLS components are
    /// each normalized to `[0, 1]`; hue wraps rather than clamps.
    pub fn to_components(self, r: u8, g: u8, b: u8) -> [f32; 3] {
        match self {
            Self::Rgb => [r as f32, g as f32, b as f32],
            Self::Hsv => {
                let (h, s, v) = rgb_to_hsv(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
                [h, s, v]
            }
            Self::Hls => {
                let (h, l, s) = rgb_to_hls(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
                [h, l, s]
            }
        }
    }

    /// Convert components in this space back to RGB channels.
    ///
    /// Round-tripping `to_components` → `to_rgb` reproduces each channel
    /// within ±1.
    pub fn to_rgb(self, c: [f32; 3]) -> (u8, u8, u8) {
        match self {
            Self::Rgb => (channel(c[0] / 255.0), channel(c[1] / 255.0), channel(c[2] / 255.0)),
            Self::Hsv => {
                let (r, g, b) = hsv_to_rgb(c[0], c[1], c[2]);
                (channel(r), channel(g), channel(b))
            }
            Self::Hls => {
                let (r, g, b) = hls_to_rgb(c[0], c[1], c[2]);
                (channel(r), channel(g), channel(b))
            }
        }
    }

    /// Distance between two component triplets in this space.
    ///
    /// RGB uses the sum of squared channel differences. The alternate
    /// spaces use a weighted sum of absolute channel differences; the
    /// per-channel weights are caller-supplied (equal weighting by
    /// default, but not baked in).
    pub fn distance(self, a: [f32; 3], b: [f32; 3], weights: [f32; 3]) -> f32 {
        match self {
            Self::Rgb => {
                let dr = a[0] - b[0];
                let dg = a[1] - b[1];
                let db = a[2] - b[2];
                dr * dr + dg * dg + db * db
            }
            Self::Hsv | Self::Hls => {
                weights[0] * (a[0] - b[0]).abs()
                    + weights[1] * (a[1] - b[1]).abs()
                    + weights[2] * (a[2] - b[2]).abs()
            }
        }
    }
}

/// Scale a normalized channel back to 0..=255, rounding to nearest.
#[inline]
fn channel(c: f32) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}

// --- HSV (hexcone model) ---

fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let maxc = r.max(g).max(b);
    let minc = r.min(g).min(b);
    let v = maxc;
    if maxc == minc {
        return (0.0, 0.0, v);
    }
    let delta = maxc - minc;
    let s = delta / maxc;
    (hue(r, g, b, maxc, delta), s, v)
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    if s == 0.0 {
        return (v, v, v);
    }
    let h = h.rem_euclid(1.0) * 6.0;
    let i = h.floor();
    let f = h - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match i as u32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

// --- HLS (double hexcone model) ---

fn rgb_to_hls(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let maxc = r.max(g).max(b);
    let minc = r.min(g).min(b);
    let l = (minc + maxc) / 2.0;
    if maxc == minc {
        return (0.0, l, 0.0);
    }
    let delta = maxc - minc;
    let s = if l <= 0.5 {
        delta / (maxc + minc)
    } else {
        delta / (2.0 - maxc - minc)
    };
    (hue(r, g, b, maxc, delta), l, s)
}

fn hls_to_rgb(h: f32, l: f32, s: f32) -> (f32, f32, f32) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hls_component(m1, m2, h + 1.0 / 3.0),
        hls_component(m1, m2, h),
        hls_component(m1, m2, h - 1.0 / 3.0),
    )
}

fn hls_component(m1: f32, m2: f32, hue: f32) -> f32 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

/// Hue in [0, 1) from the dominant-channel sextant. Shared by both models.
fn hue(r: f32, g: f32, b: f32, maxc: f32, delta: f32) -> f32 {
    let rc = (maxc - r) / delta;
    let gc = (maxc - g) / delta;
    let bc = (maxc - b) / delta;
    let h = if maxc == r {
        bc - gc
    } else if maxc == g {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    (h / 6.0).rem_euclid(1.0)
}
