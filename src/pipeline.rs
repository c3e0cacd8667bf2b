//! Load, analyze, render and report: the end-to-end run.

use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::{
    analysis::{self, CountyPlacement, NeedSummary, RegionStats},
    chart::{self, Chart},
    config::Config,
    load::{self, CountyShape, PovertyLoad, TelehealthTrends, UninsuredRecord},
    need::{self, CountyNeed, JoinReport},
    report,
};

/// How many counties the top list and map markers cover.
pub const TOP_COUNT: usize = 10;

/// Everything read from disk.
#[derive(Debug, Clone)]
pub struct Sources {
    pub counties: Vec<CountyShape>,
    pub uninsured: Vec<UninsuredRecord>,
    pub poverty: PovertyLoad,
    pub telehealth: TelehealthTrends,
}

/// Derived county and regional figures.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub needs: Vec<CountyNeed>,
    pub join: JoinReport,
    pub summary: Option<NeedSummary>,
    pub regions: Vec<RegionStats>,
}

impl Analysis {
    pub fn top(&self) -> Vec<&CountyNeed> {
        analysis::top_n(&self.needs, TOP_COUNT)
    }
}

/// Read all four sources. Any missing or malformed source aborts the run.
pub fn load_sources(config: &Config) -> Result<Sources> {
    Ok(Sources {
        counties: load::load_counties(config)?,
        uninsured: load::load_uninsured(config)?,
        poverty: load::load_poverty(config)?,
        telehealth: load::load_telehealth(config)?,
    })
}

/// Join, score and aggregate.
pub fn analyze(sources: &Sources) -> Analysis {
    let (joined, join) = need::join_sources(&sources.uninsured, &sources.poverty.records);
    let needs = need::compute_need_index(joined);
    let summary = NeedSummary::of(&needs);

    let placements = CountyPlacement::place_all(&sources.counties, &needs);
    let unplaced = placements.iter().filter(|p| p.need.is_none()).count();
    if unplaced > 0 { info!("[analyze] {unplaced} county geometries have no need data") }
    let regions = analysis::regional_stats(&placements);

    Analysis { needs, join, summary, regions }
}

/// Build the three charts in display order.
pub fn render(sources: &Sources, analysis: &Analysis) -> Result<Vec<Chart>> {
    Ok(vec![
        chart::dashboard_chart(&sources.counties, &analysis.needs, &sources.telehealth)?,
        chart::scatter_chart(&analysis.needs)?,
        chart::regional_chart(&analysis.regions)?,
    ])
}

/// Directory for chart pages: the requested one, or a fresh temporary
/// directory that outlives the process.
pub fn output_dir(requested: Option<PathBuf>) -> Result<PathBuf> {
    match requested {
        Some(dir) => Ok(dir),
        None => Ok(tempfile::Builder::new()
            .prefix("telehealth-need-")
            .tempdir()
            .context("Failed to create a temporary chart directory")?
            .keep()),
    }
}

/// Full run, printing the console report to `out`.
pub fn run(config: &Config, out_dir: Option<PathBuf>, charts: bool, out: &mut impl Write) -> Result<()> {
    report::write_banner(out, &config.state.name)?;

    let sources = load_sources(config)?;
    report::write_load_counts(
        out,
        sources.counties.len(),
        sources.uninsured.len(),
        sources.poverty.records.len(),
        &sources.telehealth.medicare_only,
    )?;

    let analysis = analyze(&sources);
    report::write_join(out, &analysis.join)?;
    if analysis.needs.is_empty() { warn!("[analyze] no county matched across the uninsured and poverty sources") }
    report::write_need_summary(out, analysis.summary.as_ref())?;
    report::write_categories(out, &analysis::category_counts(&analysis.needs))?;
    report::write_top(out, &analysis.top())?;

    if charts {
        let dir = output_dir(out_dir)?;
        let written = render(&sources, &analysis)?
            .iter()
            .map(|chart| Ok::<_, anyhow::Error>((chart.title.clone(), chart.show(&dir)?)))
            .collect::<Result<Vec<_>>>()?;
        report::write_chart_paths(out, &written)?;
    }

    report::write_key_findings(out)?;
    report::write_regional_table(out, &analysis.regions)?;
    out.flush()?;
    Ok(())
}
