use std::io::Write;

use anyhow::Result;

use crate::{
    analysis,
    chart::{color, frame::{self, Frame}, Chart, BACKGROUND, BASE_CSS},
    common::{self, SvgWriter},
    need::{CountyNeed, NeedCategory},
};

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 500.0;
const PLOT: Frame = Frame { left: 90.0, top: 80.0, width: 700.0, height: 340.0 };

/// Median household income vs need index, one point per county colored by
/// category, with a dashed least-squares trend line.
pub fn scatter_chart(needs: &[CountyNeed]) -> Result<Chart> {
    let mut writer = SvgWriter::new();
    writer.write_header(WIDTH, HEIGHT, BACKGROUND)?;
    writer.write_styles(BASE_CSS)?;

    writer.write_text(WIDTH / 2.0, 30.0, "panel-title", "middle", "The Resource Gap: Higher Need = Lower Income")?;
    writer.write_text(WIDTH / 2.0, 50.0, "subtitle", "middle",
        "Counties with the greatest telehealth need have the fewest resources to access it")?;

    let incomes = needs.iter().map(|n| n.median_income as f64);
    let (lo, hi) = incomes.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let (lo, hi) = if lo.is_finite() { (lo, hi) } else { (0.0, 1.0) };
    let pad = ((hi - lo) * 0.05).max(1000.0);

    let x = PLOT.x_scale((lo - pad, hi + pad));
    let y = PLOT.y_scale((0.0, 105.0));

    frame::write_y_axis(&mut writer, &PLOT, &y, &frame::nice_ticks(0.0, 100.0, 5), |v| format!("{v:.0}"))?;
    frame::write_x_axis(&mut writer, &PLOT, &x, &frame::nice_ticks(lo - pad, hi + pad, 6), |v| format!("${}", frame::thousands(v)))?;
    frame::write_axis_titles(&mut writer, &PLOT, "Median Household Income", "Telehealth Need Index")?;

    let mut legend = Vec::new();
    for category in NeedCategory::ALL {
        let members = needs.iter().filter(|n| n.category == category).collect::<Vec<_>>();
        if members.is_empty() { continue }

        let fill = color::category_color(category);
        writeln!(writer, r#"<g class="category" fill="{fill}" fill-opacity="0.8" stroke="white" stroke-width="1">"#)?;
        for need in members {
            writeln!(writer, r#"<circle cx="{:.1}" cy="{:.1}" r="5"><title>{}&#10;Median Income: ${}&#10;Need Index: {:.1}</title></circle>"#,
                x.map(need.median_income as f64), y.map(need.need_index),
                common::escape_xml(&need.name), frame::thousands(need.median_income as f64), need.need_index)?;
        }
        writeln!(writer, "</g>")?;
        legend.push((category.label(), fill.to_string(), false));
    }

    let points = needs.iter().map(|n| (n.median_income as f64, n.need_index)).collect::<Vec<_>>();
    if let Some(fit) = analysis::linear_fit(&points) {
        writeln!(writer,
            r#"<line class="trend" x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="rgba(255,255,255,0.5)" stroke-width="2" stroke-dasharray="6,4"/>"#,
            x.map(lo), y.map(fit.at(lo)), x.map(hi), y.map(fit.at(hi)))?;
        legend.push(("Trend", "rgba(255,255,255,0.5)".to_string(), true));
    }

    // Legend
    let legend_x = PLOT.right() + 30.0;
    writer.write_text(legend_x, PLOT.top, "label", "start", "Need Category")?;
    for (i, (label, fill, dashed)) in legend.iter().enumerate() {
        let ly = PLOT.top + 22.0 + i as f64 * 20.0;
        if *dashed {
            writeln!(writer, r#"<line x1="{legend_x:.1}" y1="{ly:.1}" x2="{:.1}" y2="{ly:.1}" stroke="{fill}" stroke-width="2" stroke-dasharray="4,3"/>"#, legend_x + 14.0)?;
        } else {
            writeln!(writer, r#"<circle cx="{:.1}" cy="{ly:.1}" r="5" fill="{fill}" stroke="white"/>"#, legend_x + 7.0)?;
        }
        writer.write_text(legend_x + 22.0, ly + 4.0, "tick", "start", label)?;
    }

    writer.write_footer()?;

    Ok(Chart {
        slug: "need_vs_income".to_string(),
        title: "The Resource Gap".to_string(),
        svg: writer.into_string()?,
        controls: String::new(),
    })
}
