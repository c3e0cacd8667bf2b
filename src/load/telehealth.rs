use std::fmt;

use anyhow::{Context, Result};
use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::{common, config::{Config, StateProfile}};

const GEO_COLUMN: &str = "Bene_Geo_Desc";
const QUARTER_COLUMN: &str = "quarter";
const YEAR_COLUMN: &str = "Year";
const FRACTION_COLUMN: &str = "Pct_Telehealth";
const ENROLLMENT_COLUMN: &str = "Bene_Mdcd_Mdcr_Enrl_Stus";
const RURALITY_COLUMN: &str = "Bene_RUCA_Desc";

/// Categorical columns that each profile holds at the "All" aggregate (minus its split column).
const BREAKDOWN_COLUMNS: [&str; 6] = [
    "Bene_Race_Desc",
    "Bene_Sex_Desc",
    "Bene_Mdcr_Entlmt_Stus",
    "Bene_Age_Desc",
    RURALITY_COLUMN,
    ENROLLMENT_COLUMN,
];

const ANNUAL_QUARTER: &str = "Overall";
const AGGREGATE: &str = "All";

/// Beneficiary subgroup compared in the telehealth timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subgroup {
    /// Medicare only: higher-income proxy.
    MedicareOnly,
    /// Medicare & Medicaid dual enrollment: low-income proxy.
    Dual,
    Rural,
    Urban,
}

impl Subgroup {
    pub const ALL: [Subgroup; 4] = [Subgroup::MedicareOnly, Subgroup::Dual, Subgroup::Rural, Subgroup::Urban];

    /// Column this subgroup splits on, and the value selecting it.
    fn split(&self) -> (&'static str, &'static str) {
        match self {
            Subgroup::MedicareOnly => (ENROLLMENT_COLUMN, "Medicare Only"),
            Subgroup::Dual         => (ENROLLMENT_COLUMN, "Medicare & Medicaid"),
            Subgroup::Rural        => (RURALITY_COLUMN, "Rural"),
            Subgroup::Urban        => (RURALITY_COLUMN, "Urban"),
        }
    }

    /// Legend label.
    pub fn label(&self) -> &'static str {
        match self {
            Subgroup::MedicareOnly => "Medicare Only",
            Subgroup::Dual         => "Low-Income (Dual)",
            Subgroup::Rural        => "Rural",
            Subgroup::Urban        => "Urban",
        }
    }
}

impl fmt::Display for Subgroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Share of beneficiaries using telehealth in one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub year: i32,
    pub telehealth_pct: f64,
}

/// Annual telehealth usage for one subgroup, ordered by year.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub subgroup: Subgroup,
    pub points: Vec<TrendPoint>,
}

impl TrendSeries {
    #[inline] pub fn is_empty(&self) -> bool { self.points.is_empty() }

    #[inline] pub fn len(&self) -> usize { self.points.len() }

    /// First and last year covered, if any.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        Some((self.points.first()?.year, self.points.last()?.year))
    }

    /// Usage in a given year, if present.
    pub fn pct_in(&self, year: i32) -> Option<f64> {
        self.points.iter().find(|p| p.year == year).map(|p| p.telehealth_pct)
    }
}

/// The four independent state-level series.
#[derive(Debug, Clone, PartialEq)]
pub struct TelehealthTrends {
    pub medicare_only: TrendSeries,
    pub dual: TrendSeries,
    pub rural: TrendSeries,
    pub urban: TrendSeries,
}

impl TelehealthTrends {
    pub fn get(&self, subgroup: Subgroup) -> &TrendSeries {
        match subgroup {
            Subgroup::MedicareOnly => &self.medicare_only,
            Subgroup::Dual         => &self.dual,
            Subgroup::Rural        => &self.rural,
            Subgroup::Urban        => &self.urban,
        }
    }
}

/// Load the state's annual telehealth series from the CMS trend extract.
pub fn load_telehealth(config: &Config) -> Result<TelehealthTrends> {
    common::require_file_exists(&config.telehealth)?;
    let df = common::read_csv_file_as_strings(&config.telehealth, 0)?;
    let trends = trends_from_dataframe(df, &config.state)
        .with_context(|| format!("Malformed telehealth extract: {}", config.telehealth.display()))?;

    info!(
        "[load_telehealth] annual points: medicare_only={} dual={} rural={} urban={}",
        trends.medicare_only.len(), trends.dual.len(), trends.rural.len(), trends.urban.len(),
    );
    Ok(trends)
}

/// Filter to the state's annual rows and split into the four subgroup series.
/// A combination with no rows yields an empty series.
pub fn trends_from_dataframe(df: DataFrame, state: &StateProfile) -> Result<TelehealthTrends> {
    for name in [GEO_COLUMN, QUARTER_COLUMN, YEAR_COLUMN, FRACTION_COLUMN].into_iter().chain(BREAKDOWN_COLUMNS) {
        df.column(name)
            .with_context(|| format!("missing column {name:?}"))?;
    }

    let annual = df.lazy()
        .filter(col(GEO_COLUMN).eq(lit(state.name.as_str()))
            .and(col(QUARTER_COLUMN).eq(lit(ANNUAL_QUARTER))))
        .collect()?;

    Ok(TelehealthTrends {
        medicare_only: subgroup_series(&annual, Subgroup::MedicareOnly)?,
        dual: subgroup_series(&annual, Subgroup::Dual)?,
        rural: subgroup_series(&annual, Subgroup::Rural)?,
        urban: subgroup_series(&annual, Subgroup::Urban)?,
    })
}

/// Select one subgroup: its split column equals the subgroup value, every other
/// breakdown column equals "All". Fractions are scaled to percentages.
fn subgroup_series(annual: &DataFrame, subgroup: Subgroup) -> Result<TrendSeries> {
    let (split_column, value) = subgroup.split();

    let predicate = BREAKDOWN_COLUMNS.iter()
        .filter(|&&name| name != split_column)
        .fold(col(split_column).eq(lit(value)), |acc, &name| acc.and(col(name).eq(lit(AGGREGATE))));

    let subset = annual.clone().lazy()
        .filter(predicate)
        .collect()?;

    let years = subset.column(YEAR_COLUMN)?.str()?;
    let fractions = subset.column(FRACTION_COLUMN)?.str()?;

    let mut points = years.into_iter().zip(fractions)
        .filter_map(|(year, fraction)| {
            let point = parse_year(year?).zip(fraction?.trim().parse::<f64>().ok())
                .map(|(year, fraction)| TrendPoint { year, telehealth_pct: fraction * 100.0 });
            if point.is_none() { debug!("[load_telehealth] dropping unparsable {subgroup} row") }
            point
        })
        .collect::<Vec<_>>();
    // Stable sort: the first row in file order wins for a repeated year.
    points.sort_by_key(|p| p.year);
    let before = points.len();
    points.dedup_by_key(|p| p.year);
    if points.len() < before {
        warn!("[load_telehealth] dropped {} duplicate {subgroup} year rows", before - points.len());
    }

    Ok(TrendSeries { subgroup, points })
}

/// Years arrive as "2021" or occasionally "2021.0".
fn parse_year(text: &str) -> Option<i32> {
    let text = text.trim();
    text.parse::<i32>().ok()
        .or_else(|| text.parse::<f64>().ok().filter(|y| y.fract() == 0.0).map(|y| y as i32))
}
