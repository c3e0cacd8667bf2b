use std::io::Write;

use anyhow::Result;

use crate::{
    analysis::RegionStats,
    chart::{color, frame::{self, Frame}, Chart, BACKGROUND, BASE_CSS},
    common::{self, SvgWriter},
};

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 400.0;
const PLOT: Frame = Frame { left: 80.0, top: 80.0, width: 780.0, height: 250.0 };

/// Average need index per region, in the order given, with value labels.
pub fn regional_chart(stats: &[RegionStats]) -> Result<Chart> {
    let mut writer = SvgWriter::new();
    writer.write_header(WIDTH, HEIGHT, BACKGROUND)?;
    writer.write_styles(BASE_CSS)?;

    writer.write_text(WIDTH / 2.0, 30.0, "panel-title", "middle", "Regional Disparities in Telehealth Need")?;
    writer.write_text(WIDTH / 2.0, 50.0, "subtitle", "middle", "Border and rural regions show highest need indices")?;

    let top = stats.iter().filter_map(|s| s.avg_need).fold(0.0, f64::max);
    let top = (top * 1.15).max(10.0);
    let y = PLOT.y_scale((0.0, top));
    frame::write_y_axis(&mut writer, &PLOT, &y, &frame::nice_ticks(0.0, top, 5), |v| format!("{v:.0}"))?;
    frame::write_axis_titles(&mut writer, &PLOT, "", "Average Need Index")?;

    if !stats.is_empty() {
        let band = PLOT.width / stats.len() as f64;
        for (i, region) in stats.iter().enumerate() {
            let center = PLOT.left + band * (i as f64 + 0.5);
            writer.write_text(center, PLOT.bottom() + 18.0, "label", "middle", region.region.label())?;

            let Some(avg) = region.avg_need else {
                writer.write_text(center, PLOT.bottom() - 6.0, "tick", "middle", "n/a")?;
                continue;
            };
            let (bar_top, bar_width) = (y.map(avg), band * 0.6);
            writeln!(writer,
                r#"<rect class="bar" x="{:.1}" y="{bar_top:.1}" width="{bar_width:.1}" height="{:.1}" fill="{}"><title>{}&#10;Avg Need Index: {avg:.1}&#10;Counties: {}</title></rect>"#,
                center - bar_width / 2.0, PLOT.bottom() - bar_top, color::region_color(region.region),
                common::escape_xml(region.region.label()), region.counties)?;
            writer.write_text(center, bar_top - 6.0, "label", "middle", &format!("{avg:.0}"))?;
        }
    }

    writer.write_footer()?;

    Ok(Chart {
        slug: "regional".to_string(),
        title: "Regional Disparities".to_string(),
        svg: writer.into_string()?,
        controls: String::new(),
    })
}
