use std::fmt;

use crate::{need::JoinedCounty, types::CountyId};

/// Ordinal need bucket over the 0-100 index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NeedCategory {
    Low,
    Moderate,
    High,
    Critical,
}

impl NeedCategory {
    pub const ALL: [NeedCategory; 4] = [
        NeedCategory::Low,
        NeedCategory::Moderate,
        NeedCategory::High,
        NeedCategory::Critical,
    ];

    /// Fixed-width buckets: [0,25] Low, (25,50] Moderate, (50,75] High, (75,100] Critical.
    pub fn from_index(index: f64) -> Self {
        if index <= 25.0 {
            NeedCategory::Low
        } else if index <= 50.0 {
            NeedCategory::Moderate
        } else if index <= 75.0 {
            NeedCategory::High
        } else {
            NeedCategory::Critical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NeedCategory::Low      => "Low Need",
            NeedCategory::Moderate => "Moderate Need",
            NeedCategory::High     => "High Need",
            NeedCategory::Critical => "Critical Need",
        }
    }
}

impl fmt::Display for NeedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Min-max normalization context over one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    /// Range of the values, or None if there are none.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(MinMax { min: v, max: v }),
            Some(MinMax { min, max }) => Some(MinMax { min: min.min(v), max: max.max(v) }),
        })
    }

    /// `(x - min) / (max - min)`; a degenerate range maps every value to 0.5.
    pub fn normalize(&self, x: f64) -> f64 {
        let range = self.max - self.min;
        if range > 0.0 { (x - self.min) / range } else { 0.5 }
    }
}

/// Equal-weight combination of the two normalized components, scaled to 0-100.
#[inline]
pub fn need_index(uninsured_norm: f64, poverty_norm: f64) -> f64 {
    (uninsured_norm + poverty_norm) / 2.0 * 100.0
}

/// A joined county annotated with its need index.
#[derive(Debug, Clone, PartialEq)]
pub struct CountyNeed {
    pub id: CountyId,
    pub name: String,
    pub uninsured_pct: f64,
    pub poverty_rate: f64,
    pub child_poverty_rate: f64,
    pub median_income: i64,
    pub uninsured_norm: f64,
    pub poverty_norm: f64,
    pub need_index: f64,
    pub category: NeedCategory,
}

/// Normalize uninsured and poverty rates across all joined counties, combine
/// them into the need index and bucket it. Order is preserved.
pub fn compute_need_index(joined: Vec<JoinedCounty>) -> Vec<CountyNeed> {
    let (Some(uninsured), Some(poverty)) = (
        MinMax::of(joined.iter().map(|c| c.uninsured_pct)),
        MinMax::of(joined.iter().map(|c| c.poverty_rate)),
    ) else {
        return Vec::new();
    };

    joined.into_iter()
        .map(|county| {
            let uninsured_norm = uninsured.normalize(county.uninsured_pct);
            let poverty_norm = poverty.normalize(county.poverty_rate);
            let index = need_index(uninsured_norm, poverty_norm);
            CountyNeed {
                id: county.id,
                name: county.name,
                uninsured_pct: county.uninsured_pct,
                poverty_rate: county.poverty_rate,
                child_poverty_rate: county.child_poverty_rate,
                median_income: county.median_income,
                uninsured_norm,
                poverty_norm,
                need_index: index,
                category: NeedCategory::from_index(index),
            }
        })
        .collect()
}
