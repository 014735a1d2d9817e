//! Class colours and line patterns
//!
//! Latent classes get colours from a fixed colour-blind friendly palette;
//! beyond its length, colours are sampled from viridis. Black is reserved
//! for the Total curve and never handed out to a class.

use serde::{Deserialize, Serialize};

/// A color in RGBA format (0.0 to 1.0)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Opaque black, used for Total
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    /// Create a color from RGB (alpha = 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from hex string (e.g., "#FF5733" or "FF5733")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()? as f32 / 255.0;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()? as f32 / 255.0;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()? as f32 / 255.0;

        Some(Self::rgb(r, g, b))
    }

    /// Convert to hex string (alpha dropped)
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }

    /// 8-bit RGB channels
    pub fn to_rgb8(&self) -> [u8; 3] {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b)]
    }

    /// Same color with another opacity
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha.clamp(0.0, 1.0);
        self
    }

    /// Check for pure black, ignoring alpha
    pub fn is_black(&self) -> bool {
        self.to_rgb8() == [0, 0, 0]
    }

    /// Linear interpolation between two colors
    pub fn lerp(a: &Color, b: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }
}

/// Okabe-Ito palette without its black entry
const BASE_PALETTE: [&str; 7] = [
    "#E69F00", "#56B4E9", "#009E73", "#F0E442", "#0072B2", "#D55E00", "#CC79A7",
];

/// Viridis stops
const VIRIDIS: [(f32, f32, f32); 11] = [
    (0.267, 0.005, 0.329),
    (0.282, 0.141, 0.458),
    (0.254, 0.265, 0.530),
    (0.207, 0.372, 0.553),
    (0.164, 0.471, 0.558),
    (0.128, 0.567, 0.551),
    (0.135, 0.659, 0.518),
    (0.267, 0.749, 0.441),
    (0.478, 0.821, 0.318),
    (0.741, 0.873, 0.150),
    (0.993, 0.906, 0.144),
];

fn viridis(t: f32) -> Color {
    let t = t.clamp(0.0, 1.0) * (VIRIDIS.len() - 1) as f32;
    let i = (t.floor() as usize).min(VIRIDIS.len() - 2);
    let (r0, g0, b0) = VIRIDIS[i];
    let (r1, g1, b1) = VIRIDIS[i + 1];
    Color::lerp(&Color::rgb(r0, g0, b0), &Color::rgb(r1, g1, b1), t - i as f32)
}

/// `n` distinct, deterministic, non-black class colours
pub fn get_palette(n: usize) -> Vec<Color> {
    if n <= BASE_PALETTE.len() {
        return BASE_PALETTE[..n]
            .iter()
            .filter_map(|hex| Color::from_hex(hex))
            .collect();
    }
    (0..n)
        .map(|i| viridis(i as f32 / (n - 1) as f32))
        .collect()
}

/// Outline pattern of a curve
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinePattern {
    Solid,
    Dashed,
    Dotted,
    DotDash,
    LongDash,
    TwoDash,
}

impl LinePattern {
    /// Non-solid patterns, cycled through for classes in black-and-white
    pub const CLASS_PATTERNS: [LinePattern; 5] = [
        LinePattern::Dashed,
        LinePattern::Dotted,
        LinePattern::DotDash,
        LinePattern::LongDash,
        LinePattern::TwoDash,
    ];

    /// Pattern of the `i`-th latent class
    pub fn for_class(i: usize) -> Self {
        Self::CLASS_PATTERNS[i % Self::CLASS_PATTERNS.len()]
    }

    /// Dash length and gap in pixels (`None` for solid)
    pub fn dash(&self) -> Option<(u32, u32)> {
        match self {
            LinePattern::Solid => None,
            LinePattern::Dashed => Some((6, 4)),
            LinePattern::Dotted => Some((2, 3)),
            LinePattern::DotDash => Some((2, 7)),
            LinePattern::LongDash => Some((14, 4)),
            LinePattern::TwoDash => Some((9, 6)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        let color = Color::from_hex("#FF0000").unwrap();
        assert!((color.r - 1.0).abs() < 0.01);
        assert!(color.g.abs() < 0.01);
        assert!(Color::from_hex("#12345").is_none());
    }

    #[test]
    fn test_color_to_hex_roundtrip() {
        assert_eq!(Color::from_hex("#56B4E9").unwrap().to_hex(), "#56B4E9");
    }

    #[test]
    fn test_palette_is_deterministic() {
        assert_eq!(get_palette(4), get_palette(4));
        assert_eq!(get_palette(3).len(), 3);
        assert!(get_palette(0).is_empty());
    }

    #[test]
    fn test_palette_never_black() {
        for n in [1, 2, 7, 8, 20] {
            let palette = get_palette(n);
            assert_eq!(palette.len(), n);
            assert!(palette.iter().all(|c| !c.is_black()));
        }
    }

    #[test]
    fn test_large_palette_is_distinct() {
        let hex: Vec<String> = get_palette(12).iter().map(Color::to_hex).collect();
        for (i, a) in hex.iter().enumerate() {
            assert!(hex[i + 1..].iter().all(|b| a != b));
        }
    }

    #[test]
    fn test_class_patterns_are_not_solid() {
        for i in 0..10 {
            assert_ne!(LinePattern::for_class(i), LinePattern::Solid);
            assert!(LinePattern::for_class(i).dash().is_some());
        }
        assert_ne!(LinePattern::for_class(0), LinePattern::for_class(1));
    }
}
