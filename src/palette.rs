//! Shared RGBA colours and colour helpers
//!
//! Colours are linear `[r, g, b, a]` in 0..=1, the layout the vertex buffer uses.

pub type Rgba = [f32; 4];

pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
pub const OVERLAY: Rgba = [0.0, 0.0, 0.0, 0.7];
pub const BACKGROUND: Rgba = [0.02, 0.02, 0.05, 1.0];

/// Particle colours
pub const HIT: Rgba = [1.0, 0.0, 0.0, 1.0]; // #ff0000
pub const TREASURE_SPARK: Rgba = [1.0, 0.8, 0.0, 1.0]; // #ffcc00
pub const HEALTH_SPARK: Rgba = [0.0, 1.0, 0.0, 1.0]; // #00ff00
pub const SPEED_SPARK: Rgba = [0.0, 0.667, 1.0, 1.0]; // #00aaff
pub const INVINCIBLE_SPARK: Rgba = [1.0, 1.0, 0.0, 1.0]; // #ffff00

/// Parse `#rgb` or `#rrggbb` into an opaque colour
pub fn hex(s: &str) -> Option<Rgba> {
    let digits = s.strip_prefix('#')?;
    let channel = |h: &str| u8::from_str_radix(h, 16).ok().map(|v| v as f32 / 255.0);
    match digits.len() {
        3 => {
            let mut out = [1.0; 4];
            for (i, c) in digits.chars().enumerate() {
                let pair: String = [c, c].iter().collect();
                out[i] = channel(&pair)?;
            }
            Some(out)
        }
        6 => Some([
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
            1.0,
        ]),
        _ => None,
    }
}

/// Replace the alpha channel
#[inline]
pub fn with_alpha(c: Rgba, alpha: f32) -> Rgba {
    [c[0], c[1], c[2], alpha.clamp(0.0, 1.0)]
}

/// Rotate hue by `degrees`, matching the CSS `hue-rotate()` filter matrix
pub fn hue_rotate(c: Rgba, degrees: f32) -> Rgba {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let m = [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ];
    let mut out = [0.0, 0.0, 0.0, c[3]];
    for (row, o) in m.iter().zip(out.iter_mut()) {
        *o = (row[0] * c[0] + row[1] * c[1] + row[2] * c[2]).clamp(0.0, 1.0);
    }
    out
}
