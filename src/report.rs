//! Console summary printed to stdout.

use std::{io::Write, path::PathBuf};

use anyhow::Result;

use crate::{
    analysis::{NeedSummary, RegionStats},
    load::TrendSeries,
    need::{CountyNeed, JoinReport, NeedCategory},
};

const RULE: &str = "=================================================================";

const KEY_FINDINGS: &str = "
===================================================================
  THE TELEHEALTH PARADOX - KEY FINDINGS
===================================================================

  1. THE NEED MAP
     Counties colored by \"Telehealth Need Index\" - a composite of
     uninsured rate and poverty rate. Red/orange counties would
     benefit MOST from expanded telehealth access.

  2. THE PARADOX
     State-level data shows low-income (dual-eligible) populations
     actually USE telehealth at HIGHER rates than others when they
     have access. The demand exists - access is the barrier.

  3. THE RESOURCE GAP
     Counties with highest need have lowest median incomes,
     creating a vicious cycle: those who need telehealth most
     can least afford the technology/broadband to access it.

  4. REGIONAL PATTERNS
     Border regions and rural West Texas show highest need,
     while urban metros (DFW, Houston) show lowest need.

  POLICY IMPLICATION:
  Telehealth infrastructure investment in high-need counties
  could have outsized impact on healthcare equity.

===================================================================
";

pub fn write_banner(out: &mut impl Write, state: &str) -> Result<()> {
    writeln!(out, "\n{RULE}")?;
    writeln!(out, "  THE TELEHEALTH PARADOX: {state} County Analysis")?;
    writeln!(out, "{RULE}\n")?;
    Ok(())
}

/// Record counts per source and the telehealth year span.
pub fn write_load_counts(
    out: &mut impl Write,
    geometries: usize,
    uninsured: usize,
    poverty: usize,
    telehealth: &TrendSeries,
) -> Result<()> {
    writeln!(out, "Loading data...")?;
    writeln!(out, "  - {geometries} county geometries")?;
    writeln!(out, "  - {uninsured} county uninsured records")?;
    writeln!(out, "  - {poverty} county poverty records")?;
    match telehealth.year_span() {
        Some((first, last)) => writeln!(out, "  - Telehealth data: {first}-{last} ({} annual records)", telehealth.len())?,
        None => writeln!(out, "  - Telehealth data: no annual records")?,
    }
    Ok(())
}

pub fn write_join(out: &mut impl Write, report: &JoinReport) -> Result<()> {
    writeln!(out, "\nCalculating Telehealth Need Index...")?;
    writeln!(
        out,
        "  - {} counties joined ({} uninsured-only and {} poverty-only rows dropped)",
        report.matched, report.uninsured_dropped, report.poverty_dropped,
    )?;
    Ok(())
}

pub fn write_need_summary(out: &mut impl Write, summary: Option<&NeedSummary>) -> Result<()> {
    writeln!(out, "\nNeed Index Summary:")?;
    match summary {
        Some(s) => {
            writeln!(out, "  - Range: {:.1} to {:.1}", s.min, s.max)?;
            writeln!(out, "  - Mean: {:.1}", s.mean)?;
            writeln!(out, "  - Median: {:.1}", s.median)?;
        }
        None => writeln!(out, "  - no counties joined")?,
    }
    Ok(())
}

pub fn write_categories(out: &mut impl Write, counts: &[(NeedCategory, usize)]) -> Result<()> {
    writeln!(out, "\nNeed Categories:")?;
    for (category, count) in counts {
        writeln!(out, "  {:<15}{count:>5}", category.label())?;
    }
    Ok(())
}

/// One line per county: `name: index (Unins: x%, Pov: y%)`.
pub fn write_top(out: &mut impl Write, top: &[&CountyNeed]) -> Result<()> {
    writeln!(out, "\nTop {} Highest Need Counties:", top.len())?;
    for need in top {
        writeln!(
            out,
            "  {}: {:.1} (Unins: {:.1}%, Pov: {:.1}%)",
            need.name, need.need_index, need.uninsured_pct, need.poverty_rate,
        )?;
    }
    Ok(())
}

pub fn write_chart_paths(out: &mut impl Write, charts: &[(String, PathBuf)]) -> Result<()> {
    writeln!(out, "\nBuilding visualizations...")?;
    for (title, path) in charts {
        writeln!(out, "  - {title}: {}", path.display())?;
    }
    Ok(())
}

pub fn write_key_findings(out: &mut impl Write) -> Result<()> {
    write!(out, "{KEY_FINDINGS}")?;
    Ok(())
}

/// Fixed-width regional table; missing means print as "-".
pub fn write_regional_table(out: &mut impl Write, stats: &[RegionStats]) -> Result<()> {
    fn cell(value: Option<f64>) -> String {
        value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
    }

    writeln!(out, "\nRegional Statistics:")?;
    writeln!(
        out,
        "{:<20}{:>10}{:>15}{:>13}{:>12}{:>10}",
        "region", "Avg Need", "Avg Uninsured", "Avg Poverty", "Avg Income", "Counties",
    )?;
    for region in stats {
        writeln!(
            out,
            "{:<20}{:>10}{:>15}{:>13}{:>12}{:>10}",
            region.region.label(),
            cell(region.avg_need),
            cell(region.avg_uninsured),
            cell(region.avg_poverty),
            cell(region.avg_income),
            region.counties,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analysis::Region, load::{Subgroup, TrendPoint}, types::CountyId};

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn load_counts_show_year_span_or_its_absence() {
        let series = TrendSeries {
            subgroup: Subgroup::MedicareOnly,
            points: (2020..=2024).map(|year| TrendPoint { year, telehealth_pct: 30.0 }).collect(),
        };
        let text = render(|out| write_load_counts(out, 254, 254, 253, &series));
        assert!(text.contains("  - 254 county geometries"));
        assert!(text.contains("  - 253 county poverty records"));
        assert!(text.contains("Telehealth data: 2020-2024 (5 annual records)"));

        let empty = TrendSeries { subgroup: Subgroup::MedicareOnly, points: Vec::new() };
        let text = render(|out| write_load_counts(out, 0, 0, 0, &empty));
        assert!(text.contains("Telehealth data: no annual records"));
    }

    #[test]
    fn summary_and_top_lines_use_one_decimal() {
        let summary = NeedSummary { min: 0.0, max: 100.0, mean: 41.234, median: 39.96 };
        let text = render(|out| write_need_summary(out, Some(&summary)));
        assert!(text.contains("  - Range: 0.0 to 100.0"));
        assert!(text.contains("  - Mean: 41.2"));
        assert!(text.contains("  - Median: 40.0"));

        let starr = CountyNeed {
            id: CountyId::padded("48427"),
            name: "Starr".to_string(),
            uninsured_pct: 30.14,
            poverty_rate: 31.96,
            child_poverty_rate: 40.0,
            median_income: 35_000,
            uninsured_norm: 1.0,
            poverty_norm: 1.0,
            need_index: 100.0,
            category: NeedCategory::Critical,
        };
        let text = render(|out| write_top(out, &[&starr]));
        assert!(text.contains("  Starr: 100.0 (Unins: 30.1%, Pov: 32.0%)"));
    }

    #[test]
    fn regional_table_marks_missing_means() {
        let stats = vec![RegionStats {
            region: Region::Central,
            avg_need: None,
            avg_uninsured: None,
            avg_poverty: None,
            avg_income: None,
            counties: 3,
        }];
        let text = render(|out| write_regional_table(out, &stats));
        let row = text.lines().find(|l| l.starts_with("Central Texas")).unwrap();
        assert!(row.contains(" -"));
        assert!(row.trim_end().ends_with('3'));
    }

    #[test]
    fn chart_paths_are_listed_for_opening() {
        let charts = vec![
            ("Dashboard".to_string(), PathBuf::from("/tmp/charts/dashboard.html")),
            ("Regional Need".to_string(), PathBuf::from("/tmp/charts/regional.html")),
        ];
        let text = render(|out| write_chart_paths(out, &charts));
        assert!(text.contains("  - Dashboard: /tmp/charts/dashboard.html"));
        assert!(text.contains("  - Regional Need: /tmp/charts/regional.html"));
    }

    #[test]
    fn banner_names_the_state() {
        let text = render(|out| write_banner(out, "Texas"));
        assert!(text.contains("THE TELEHEALTH PARADOX: Texas County Analysis"));
    }
}
