use std::{collections::HashMap, io::Write};

use anyhow::Result;
use geo::{Coord, Rect};
use serde::Serialize;

use crate::{
    analysis,
    chart::{color, frame::{self, Frame}, Chart, BACKGROUND, BASE_CSS},
    common::{self, SvgWriter},
    geom,
    load::{CountyShape, Subgroup, TelehealthTrends, TrendSeries},
    need::CountyNeed,
    types::CountyId,
};

const WIDTH: f64 = 1400.0;
const HEIGHT: f64 = 1000.0;
const TOP_COUNT: usize = 10;

const TITLE: &str = "THE TELEHEALTH PARADOX";
const SUBTITLE: &str = "Counties with highest healthcare need face greatest access barriers, \
    yet low-income populations adopt telehealth at higher rates when available";

const MAP_BOX: Frame = Frame { left: 20.0, top: 110.0, width: 600.0, height: 780.0 };
const TIMELINE: Frame = Frame { left: 790.0, top: 140.0, width: 570.0, height: 300.0 };
const BARS: Frame = Frame { left: 900.0, top: 560.0, width: 460.0, height: 370.0 };

const COVID_YEARS: (f64, f64) = (2020.0, 2021.0);
const TIMELINE_PCT: (f64, f64) = (0.0, 60.0);

/// Fit of lon/lat bounds into the map box, with longitude scaled by cos(latitude).
struct MapFit {
    min_x: f64,
    max_y: f64,
    aspect: f64,
    scale: f64,
    left: f64,
    top: f64,
}

impl MapFit {
    fn new(bounds: Rect<f64>, area: &Frame) -> Self {
        let mid_lat = (bounds.min().y + bounds.max().y) / 2.0;
        let aspect = mid_lat.to_radians().cos().max(0.1);
        let (w, h) = (bounds.width() * aspect, bounds.height());
        let scale = if w > 0.0 && h > 0.0 {
            (area.width / w).min(area.height / h)
        } else {
            1.0
        };

        Self {
            min_x: bounds.min().x,
            max_y: bounds.max().y,
            aspect,
            scale,
            left: area.left + (area.width - w * scale) / 2.0,
            top: area.top + (area.height - h * scale) / 2.0,
        }
    }

    /// lon/lat -> SVG coords (Y down)
    fn project(&self, coord: &Coord<f64>) -> (f64, f64) {
        (
            self.left + (coord.x - self.min_x) * self.aspect * self.scale,
            self.top + (self.max_y - coord.y) * self.scale,
        )
    }
}

/// Entry in the county search list, positioned in SVG coordinates.
#[derive(Debug, Serialize)]
struct SearchEntry {
    name: String,
    x: f64,
    y: f64,
    summary: String,
}

/// The main dashboard: need choropleth with top-10 markers and county search,
/// Medicare-only vs dual-eligible telehealth timeline, and top-10 bar chart.
pub fn dashboard_chart(counties: &[CountyShape], needs: &[CountyNeed], trends: &TelehealthTrends) -> Result<Chart> {
    let mut writer = SvgWriter::new();
    writer.write_header(WIDTH, HEIGHT, BACKGROUND)?;
    writer.write_styles(BASE_CSS)?;

    writer.write_text(WIDTH / 2.0, 36.0, "title", "middle", TITLE)?;
    writeln!(writer, r#"<text id="subtitle" class="subtitle" x="{:.1}" y="60.0" text-anchor="middle">{}</text>"#,
        WIDTH / 2.0, common::escape_xml(SUBTITLE))?;

    let search = write_map(&mut writer, counties, needs)?;
    write_timeline(&mut writer, &trends.medicare_only, &trends.dual)?;
    write_top_bars(&mut writer, needs)?;

    writer.write_footer()?;

    Ok(Chart {
        slug: "dashboard".to_string(),
        title: "The Telehealth Paradox".to_string(),
        svg: writer.into_string()?,
        controls: search_controls(&search)?,
    })
}

/// Choropleth, colorbar, top-10 markers and the (hidden) search highlight ring.
/// Returns the search entries for counties that have data and a centroid.
fn write_map(writer: &mut SvgWriter, counties: &[CountyShape], needs: &[CountyNeed]) -> Result<Vec<SearchEntry>> {
    writer.write_text(MAP_BOX.left + MAP_BOX.width / 2.0, MAP_BOX.top - 12.0, "panel-title", "middle",
        "County Telehealth Need Index")?;

    let Some(bounds) = geom::bounds(counties.iter().map(|c| &c.shape)) else {
        writer.write_text(MAP_BOX.left + MAP_BOX.width / 2.0, MAP_BOX.top + MAP_BOX.height / 2.0, "label", "middle",
            "No county geometry available")?;
        return Ok(Vec::new());
    };
    let fit = MapFit::new(bounds, &MAP_BOX);
    let project = move |coord: &Coord<f64>| fit.project(coord);

    let mut by_id: HashMap<&CountyId, &CountyNeed> = HashMap::new();
    for need in needs {
        by_id.entry(&need.id).or_insert(need);
    }

    // Counties
    writeln!(writer, r#"<g id="counties">"#)?;
    for county in counties {
        let path = common::multipolygon_to_path(&county.shape, &project);
        if path.is_empty() { continue }

        let (fill, hover) = match by_id.get(&county.id) {
            Some(need) => (
                color::need_color(need.need_index),
                format!(
                    "{}\nNeed Index: {:.1}\nUninsured: {:.1}%\nPoverty: {:.1}%\nMedian Income: ${}",
                    need.name, need.need_index, need.uninsured_pct, need.poverty_rate,
                    frame::thousands(need.median_income as f64),
                ),
            ),
            None => (color::NO_DATA, format!("{}\nNo data", county.name)),
        };
        writeln!(writer, r#"<path class="county" fill-rule="evenodd" fill="{fill}" d="{path}"><title>{}</title></path>"#,
            common::escape_xml(&hover))?;
    }
    writeln!(writer, "</g>")?;

    write_colorbar(writer)?;

    let centroids = geom::MercatorCentroids::new()?;
    let shapes: HashMap<&CountyId, &CountyShape> = counties.iter().map(|c| (&c.id, c)).collect();

    // Top-10 markers
    writeln!(writer, r#"<g id="top-markers">"#)?;
    for need in analysis::top_n(needs, TOP_COUNT) {
        let Some(county) = shapes.get(&need.id) else { continue };
        let Some(center) = centroids.centroid(&county.shape)? else { continue };
        let (x, y) = project(&center.0);
        let tag = need.name.chars().take(3).collect::<String>().to_uppercase();
        writeln!(writer, r##"<circle cx="{x:.1}" cy="{y:.1}" r="5" fill="#ffffff" stroke="#000000" stroke-width="2"/>"##)?;
        writer.write_text(x, y - 8.0, "small", "middle", &tag)?;
    }
    writeln!(writer, "</g>")?;

    // Search entries, sorted by name
    let mut search = Vec::new();
    for need in needs {
        let Some(county) = shapes.get(&need.id) else { continue };
        let Some(center) = centroids.centroid(&county.shape)? else { continue };
        let (x, y) = project(&center.0);
        search.push(SearchEntry {
            name: need.name.clone(),
            x,
            y,
            summary: format!(
                "{} County - Need: {:.0} | Uninsured: {:.1}% | Poverty: {:.1}%",
                need.name, need.need_index, need.uninsured_pct, need.poverty_rate,
            ),
        });
    }
    search.sort_by(|a, b| a.name.cmp(&b.name));

    writeln!(writer, r#"<circle id="highlight" cx="0" cy="0" r="12" fill="none" stroke="cyan" stroke-width="3" visibility="hidden"/>"#)?;

    let note_y = MAP_BOX.bottom() + 30.0;
    writer.write_text(MAP_BOX.left, note_y, "note", "start", "Need Index = Uninsured Rate + Poverty Rate (normalized)")?;
    writer.write_text(MAP_BOX.left, note_y + 14.0, "note", "start", "Higher values indicate counties where telehealth")?;
    writer.write_text(MAP_BOX.left, note_y + 28.0, "note", "start", "could have the greatest positive impact")?;

    Ok(search)
}

/// Vertical gradient bar for the need scale with Low / 50 / High ticks.
fn write_colorbar(writer: &mut SvgWriter) -> Result<()> {
    let (x, top, width, height) = (MAP_BOX.right() + 20.0, MAP_BOX.top + 200.0, 12.0, 380.0);

    writeln!(writer, r#"<defs><linearGradient id="need-scale" x1="0" y1="1" x2="0" y2="0">"#)?;
    for stop in [0.0, 25.0, 50.0, 75.0, 100.0] {
        writeln!(writer, r#"<stop offset="{}%" stop-color="{}"/>"#, stop, color::need_color(stop))?;
    }
    writeln!(writer, "</linearGradient></defs>")?;
    writeln!(writer, r#"<rect x="{x:.1}" y="{top:.1}" width="{width:.1}" height="{height:.1}" fill="url(#need-scale)"/>"#)?;

    writer.write_text(x, top - 24.0, "label", "start", "Need")?;
    writer.write_text(x, top - 10.0, "label", "start", "Index")?;
    for (value, label) in [(0.0, "Low"), (50.0, "50"), (100.0, "High")] {
        let y = top + height * (1.0 - value / 100.0);
        writer.write_text(x + width + 4.0, y + 3.0, "tick", "start", label)?;
    }
    Ok(())
}

/// Medicare-only vs dual-eligible annual lines with the gap band and COVID-19 band.
/// Empty series draw nothing.
fn write_timeline(writer: &mut SvgWriter, medicare_only: &TrendSeries, dual: &TrendSeries) -> Result<()> {
    let years = medicare_only.points.iter().chain(&dual.points).map(|p| p.year as f64);
    let (first, last) = years.fold(COVID_YEARS, |(lo, hi), y| (lo.min(y), hi.max(y)));

    let span = match medicare_only.year_span().or(dual.year_span()) {
        Some(_) => format!("Telehealth Adoption ({first:.0}-{last:.0})"),
        None => "Telehealth Adoption".to_string(),
    };
    writer.write_text(TIMELINE.left + TIMELINE.width / 2.0, TIMELINE.top - 30.0, "panel-title", "middle", &span)?;

    let x = TIMELINE.x_scale((first - 0.3, last + 0.3));
    let y = TIMELINE.y_scale(TIMELINE_PCT);

    frame::write_y_axis(writer, &TIMELINE, &y, &frame::nice_ticks(TIMELINE_PCT.0, TIMELINE_PCT.1, 6), |v| format!("{v:.0}%"))?;
    let year_ticks = (first as i32..=last as i32).map(f64::from).collect::<Vec<_>>();
    frame::write_x_axis(writer, &TIMELINE, &x, &year_ticks, |v| format!("{v:.0}"))?;
    frame::write_axis_titles(writer, &TIMELINE, "", "% Using Telehealth")?;

    writeln!(writer, r#"<clipPath id="timeline-clip"><rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}"/></clipPath>"#,
        TIMELINE.left, TIMELINE.top, TIMELINE.width, TIMELINE.height)?;
    writeln!(writer, r#"<g clip-path="url(#timeline-clip)">"#)?;

    // COVID-19 band
    let (covid_left, covid_right) = (x.map(COVID_YEARS.0), x.map(COVID_YEARS.1));
    writeln!(writer,
        r#"<rect x="{covid_left:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="rgba(255,180,50,0.2)" stroke="rgba(255,180,50,0.6)" stroke-width="2"/>"#,
        TIMELINE.top, covid_right - covid_left, TIMELINE.height)?;

    // Gap band over the years both series cover
    let shared = medicare_only.points.iter()
        .filter_map(|p| dual.pct_in(p.year).map(|d| (p.year as f64, p.telehealth_pct, d)))
        .collect::<Vec<_>>();
    if shared.len() >= 2 {
        let outline = shared.iter().map(|&(year, _, d)| (x.map(year), y.map(d)))
            .chain(shared.iter().rev().map(|&(year, m, _)| (x.map(year), y.map(m))))
            .collect::<Vec<_>>();
        writeln!(writer, r#"<polygon points="{}" fill="rgba(233,30,99,0.15)" stroke="none"/>"#,
            common::points_to_polyline(&outline))?;
    }

    for (series, stroke, width, radius) in [(medicare_only, color::SKY, 2.0, 4.0), (dual, color::PINK, 3.0, 5.0)] {
        write_series(writer, series, &x, &y, stroke, width, radius)?;
    }
    writeln!(writer, "</g>")?;

    writer.write_text((covid_left + covid_right) / 2.0, TIMELINE.top + 16.0, "label", "middle", "COVID-19")?;
    writer.write_text((covid_left + covid_right) / 2.0, TIMELINE.top + 28.0, "tick", "middle", "Peak Impact")?;

    if !shared.is_empty() {
        let gap = shared.iter().map(|&(_, m, d)| d - m).sum::<f64>() / shared.len() as f64;
        let (note_x, note_y) = (TIMELINE.right() - 8.0, TIMELINE.bottom() - 40.0);
        writer.write_text(note_x, note_y, "label", "end", "THE PARADOX")?;
        writer.write_text(note_x, note_y + 14.0, "tick", "end",
            &format!("Low-income (dual) use differs by {gap:+.1} pts on average"))?;
    }

    // Legend
    let legend_y = TIMELINE.top - 12.0;
    for (i, (subgroup, stroke)) in [(Subgroup::MedicareOnly, color::SKY), (Subgroup::Dual, color::PINK)].into_iter().enumerate() {
        let lx = TIMELINE.left + 10.0 + i as f64 * 170.0;
        writeln!(writer, r#"<line x1="{lx:.1}" y1="{legend_y:.1}" x2="{:.1}" y2="{legend_y:.1}" stroke="{stroke}" stroke-width="3"/>"#, lx + 20.0)?;
        writer.write_text(lx + 26.0, legend_y + 4.0, "tick", "start", subgroup.label())?;
    }
    Ok(())
}

fn write_series(
    writer: &mut SvgWriter,
    series: &TrendSeries,
    x: &frame::Scale,
    y: &frame::Scale,
    stroke: color::Rgb,
    width: f64,
    radius: f64,
) -> Result<()> {
    if series.is_empty() { return Ok(()) }

    let points = series.points.iter()
        .map(|p| (x.map(p.year as f64), y.map(p.telehealth_pct)))
        .collect::<Vec<_>>();
    writeln!(writer, r#"<polyline class="series" points="{}" fill="none" stroke="{stroke}" stroke-width="{width}"/>"#,
        common::points_to_polyline(&points))?;

    for (point, &(px, py)) in series.points.iter().zip(&points) {
        writeln!(writer, r#"<circle cx="{px:.1}" cy="{py:.1}" r="{radius}" fill="{stroke}"><title>{}: {:.1}% ({})</title></circle>"#,
            point.year, point.telehealth_pct, common::escape_xml(series.subgroup.label()))?;
    }
    Ok(())
}

/// Horizontal bars for the ten highest-need counties, highest on top.
fn write_top_bars(writer: &mut SvgWriter, needs: &[CountyNeed]) -> Result<()> {
    writer.write_text(BARS.left + BARS.width / 2.0, BARS.top - 16.0, "panel-title", "middle",
        "Top 10 Highest Need Counties")?;

    let top = analysis::top_n(needs, TOP_COUNT);
    let x = BARS.x_scale((0.0, 105.0));
    frame::write_x_axis(writer, &BARS, &x, &frame::nice_ticks(0.0, 100.0, 5), |v| format!("{v:.0}"))?;
    frame::write_axis_titles(writer, &BARS, "Need Index", "")?;

    if top.is_empty() { return Ok(()) }

    let (min, max) = top.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), n| {
        (lo.min(n.need_index), hi.max(n.need_index))
    });
    let band = BARS.height / top.len() as f64;

    for (i, need) in top.iter().enumerate() {
        let y = BARS.top + i as f64 * band + band * 0.15;
        let height = band * 0.7;
        let right = x.map(need.need_index.clamp(0.0, 105.0));
        let fill = color::bar_color(need.need_index, min, max);

        writeln!(writer,
            r##"<rect class="bar" x="{:.1}" y="{y:.1}" width="{:.1}" height="{height:.1}" fill="{fill}" stroke="#ffffff" stroke-width="1"><title>{}&#10;Need Index: {:.1}</title></rect>"##,
            BARS.left, (right - BARS.left).max(0.0), common::escape_xml(&need.name), need.need_index)?;
        writer.write_text(BARS.left - 8.0, y + height / 2.0 + 4.0, "label", "end", &need.name)?;
        writer.write_text(right - 4.0, y + height / 2.0 + 4.0, "label", "end", &format!("{:.0}", need.need_index))?;
    }
    Ok(())
}

/// `<select>` listing every searchable county plus the script that moves the
/// highlight ring and rewrites the subtitle.
fn search_controls(entries: &[SearchEntry]) -> Result<String> {
    let mut html = String::from(r#"<select id="county-search"><option value="">-- Search County --</option>"#);
    for (i, entry) in entries.iter().enumerate() {
        html.push_str(&format!(r#"<option value="{i}">{}</option>"#, common::escape_xml(&entry.name)));
    }
    html.push_str("</select>\n");

    let data = serde_json::to_string(entries)?.replace("</", "<\\/");
    let subtitle = serde_json::to_string(SUBTITLE)?;
    html.push_str(&format!(
        "<script>\n\
         const counties = {data};\n\
         const defaultSubtitle = {subtitle};\n\
         document.getElementById('county-search').addEventListener('change', (event) => {{\n\
         \x20 const ring = document.getElementById('highlight');\n\
         \x20 const subtitle = document.getElementById('subtitle');\n\
         \x20 const county = counties[event.target.value];\n\
         \x20 if (!county) {{\n\
         \x20   ring.setAttribute('visibility', 'hidden');\n\
         \x20   subtitle.textContent = defaultSubtitle;\n\
         \x20   return;\n\
         \x20 }}\n\
         \x20 ring.setAttribute('cx', county.x);\n\
         \x20 ring.setAttribute('cy', county.y);\n\
         \x20 ring.setAttribute('visibility', 'visible');\n\
         \x20 subtitle.textContent = county.summary;\n\
         }});\n\
         </script>"
    ));
    Ok(html)
}
