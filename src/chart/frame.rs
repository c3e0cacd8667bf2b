//! Plot areas, linear scales and axis drawing shared by the xy charts.

use std::io::Write;

use anyhow::Result;

use crate::common::SvgWriter;

/// Linear mapping from a data domain onto a pixel range.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl Scale {
    pub(crate) fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Map a data value to pixels; a zero-width domain maps to the middle of the range.
    pub(crate) fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 { return (r0 + r1) / 2.0 }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }
}

/// Rectangular plot area in SVG pixels.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    pub(crate) left: f64,
    pub(crate) top: f64,
    pub(crate) width: f64,
    pub(crate) height: f64,
}

impl Frame {
    #[inline] pub(crate) fn right(&self) -> f64 { self.left + self.width }
    #[inline] pub(crate) fn bottom(&self) -> f64 { self.top + self.height }

    pub(crate) fn x_scale(&self, domain: (f64, f64)) -> Scale {
        Scale::new(domain, (self.left, self.right()))
    }

    /// Y grows upward in data space.
    pub(crate) fn y_scale(&self, domain: (f64, f64)) -> Scale {
        Scale::new(domain, (self.bottom(), self.top))
    }
}

/// Roughly `target` evenly spaced ticks on 1/2/5 x 10^k steps covering `[min, max]`.
pub(crate) fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !(min.is_finite() && max.is_finite()) || max <= min || target == 0 {
        return if min.is_finite() { vec![min] } else { Vec::new() };
    }

    let raw = (max - min) / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0].iter()
        .map(|m| m * magnitude)
        .find(|&s| s >= raw)
        .unwrap_or(10.0 * magnitude);

    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

/// Horizontal grid lines with labels on the left edge.
pub(crate) fn write_y_axis(
    writer: &mut SvgWriter,
    frame: &Frame,
    scale: &Scale,
    ticks: &[f64],
    label: impl Fn(f64) -> String,
) -> Result<()> {
    for &tick in ticks {
        let y = scale.map(tick);
        writeln!(writer, r#"<line class="grid" x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}"/>"#, frame.left, frame.right())?;
        writer.write_text(frame.left - 6.0, y + 4.0, "tick", "end", &label(tick))?;
    }
    Ok(())
}

/// Vertical grid lines with labels under the bottom edge.
pub(crate) fn write_x_axis(
    writer: &mut SvgWriter,
    frame: &Frame,
    scale: &Scale,
    ticks: &[f64],
    label: impl Fn(f64) -> String,
) -> Result<()> {
    for &tick in ticks {
        let x = scale.map(tick);
        writeln!(writer, r#"<line class="grid" x1="{x:.1}" y1="{:.1}" x2="{x:.1}" y2="{:.1}"/>"#, frame.top, frame.bottom())?;
        writer.write_text(x, frame.bottom() + 16.0, "tick", "middle", &label(tick))?;
    }
    Ok(())
}

/// Axis titles; the y title is rotated along the left edge.
pub(crate) fn write_axis_titles(writer: &mut SvgWriter, frame: &Frame, x_title: &str, y_title: &str) -> Result<()> {
    if !x_title.is_empty() {
        writer.write_text(frame.left + frame.width / 2.0, frame.bottom() + 38.0, "axis-title", "middle", x_title)?;
    }
    if !y_title.is_empty() {
        let (x, y) = (frame.left - 48.0, frame.top + frame.height / 2.0);
        writeln!(
            writer,
            r#"<text class="axis-title" x="{x:.1}" y="{y:.1}" text-anchor="middle" transform="rotate(-90 {x:.1} {y:.1})">{}</text>"#,
            crate::common::escape_xml(y_title),
        )?;
    }
    Ok(())
}

/// Thousands separators for whole dollar amounts, e.g. 57445 -> "57,445".
pub(crate) fn thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 { out.push('-') }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 { out.push(',') }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_map_endpoints_and_flip_y() {
        let frame = Frame { left: 50.0, top: 20.0, width: 200.0, height: 100.0 };
        let x = frame.x_scale((0.0, 100.0));
        let y = frame.y_scale((0.0, 60.0));
        assert_eq!(x.map(0.0), 50.0);
        assert_eq!(x.map(100.0), 250.0);
        assert_eq!(y.map(0.0), 120.0);
        assert_eq!(y.map(60.0), 20.0);
        assert_eq!(Scale::new((3.0, 3.0), (0.0, 10.0)).map(3.0), 5.0);
    }

    #[test]
    fn ticks_use_round_steps() {
        assert_eq!(nice_ticks(0.0, 60.0, 6), vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
        assert_eq!(nice_ticks(0.0, 105.0, 5), vec![0.0, 50.0, 100.0]);
        assert_eq!(nice_ticks(2020.0, 2024.0, 4), vec![2020.0, 2021.0, 2022.0, 2023.0, 2024.0]);
        assert_eq!(nice_ticks(5.0, 5.0, 4), vec![5.0]);
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(thousands(57445.0), "57,445");
        assert_eq!(thousands(1234567.4), "1,234,567");
        assert_eq!(thousands(999.0), "999");
        assert_eq!(thousands(-1200.0), "-1,200");
    }
}
