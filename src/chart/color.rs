//! Color mapping utilities for the charts.

use std::fmt;

use crate::{analysis::Region, need::NeedCategory};

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rgb {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

impl Rgb {
    pub(crate) const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear blend toward `other`; `t` is clamped to [0, 1].
    pub(crate) fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    /// Format as CSS hex: #rrggbb
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

pub(crate) const DEEP_BLUE: Rgb  = Rgb::new(0x1a, 0x23, 0x7e);
pub(crate) const LIGHT_BLUE: Rgb = Rgb::new(0x42, 0xa5, 0xf5);
pub(crate) const YELLOW: Rgb     = Rgb::new(0xff, 0xeb, 0x3b);
pub(crate) const ORANGE: Rgb     = Rgb::new(0xff, 0x98, 0x00);
pub(crate) const DEEP_RED: Rgb   = Rgb::new(0xb7, 0x1c, 0x1c);
pub(crate) const GREEN: Rgb      = Rgb::new(0x4c, 0xaf, 0x50);
pub(crate) const SKY: Rgb        = Rgb::new(0x64, 0xb5, 0xf6);
pub(crate) const PINK: Rgb       = Rgb::new(0xe9, 0x1e, 0x63);
pub(crate) const NO_DATA: Rgb    = Rgb::new(0x44, 0x44, 0x44);

/// Five-stop blue-yellow-red scale over need index 0..=100.
const NEED_SCALE: [(f64, Rgb); 5] = [
    (0.0,  DEEP_BLUE),
    (0.25, LIGHT_BLUE),
    (0.5,  YELLOW),
    (0.75, ORANGE),
    (1.0,  DEEP_RED),
];

/// Choropleth fill for a need index; values outside 0..=100 are clamped.
pub(crate) fn need_color(index: f64) -> Rgb {
    if !index.is_finite() { return NO_DATA }

    let t = (index / 100.0).clamp(0.0, 1.0);
    NEED_SCALE.windows(2)
        .find(|stops| t <= stops[1].0)
        .map(|stops| {
            let ((lo, from), (hi, to)) = (stops[0], stops[1]);
            from.lerp(to, (t - lo) / (hi - lo))
        })
        .unwrap_or(DEEP_RED)
}

/// Two-stop orange-red ramp for `value` relative to `[min, max]`.
pub(crate) fn bar_color(value: f64, min: f64, max: f64) -> Rgb {
    let range = max - min;
    let t = if range > 0.0 { (value - min) / range } else { 0.5 };
    ORANGE.lerp(DEEP_RED, t)
}

pub(crate) fn category_color(category: NeedCategory) -> Rgb {
    match category {
        NeedCategory::Low      => DEEP_BLUE,
        NeedCategory::Moderate => YELLOW,
        NeedCategory::High     => ORANGE,
        NeedCategory::Critical => DEEP_RED,
    }
}

pub(crate) fn region_color(region: Region) -> Rgb {
    match region {
        Region::Border          => DEEP_RED,
        Region::WestTexas       => ORANGE,
        Region::Central         => YELLOW,
        Region::GulfCoastUrban  => GREEN,
        Region::NorthTexasUrban => DEEP_BLUE,
    }
}
