use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::{load::{PovertyRecord, UninsuredRecord}, types::CountyId};

/// A county present in both the uninsured and the poverty tables.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedCounty {
    pub id: CountyId,
    pub name: String,
    pub uninsured_pct: f64,
    pub poverty_rate: f64,
    pub child_poverty_rate: f64,
    pub median_income: i64,
}

/// Row accounting for the inner join, so coverage shrinkage is visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinReport {
    pub matched: usize,
    /// Uninsured rows with no poverty row.
    pub uninsured_dropped: usize,
    /// Poverty rows with no uninsured row.
    pub poverty_dropped: usize,
}

impl JoinReport {
    #[inline] pub fn dropped(&self) -> usize { self.uninsured_dropped + self.poverty_dropped }
}

/// Inner join on county id, in uninsured-table order. Duplicate keys pair up
/// like a relational join; unmatched rows on either side are counted and dropped.
pub fn join_sources(uninsured: &[UninsuredRecord], poverty: &[PovertyRecord]) -> (Vec<JoinedCounty>, JoinReport) {
    let mut by_id: HashMap<&CountyId, Vec<&PovertyRecord>> = HashMap::new();
    for record in poverty {
        by_id.entry(&record.id).or_default().push(record);
    }

    let mut report = JoinReport::default();
    let mut joined = Vec::with_capacity(uninsured.len());
    for left in uninsured {
        match by_id.get(&left.id) {
            Some(matches) => joined.extend(matches.iter().map(|right| JoinedCounty {
                id: left.id.clone(),
                name: left.name.clone(),
                uninsured_pct: left.uninsured_pct,
                poverty_rate: right.poverty_rate,
                child_poverty_rate: right.child_poverty_rate,
                median_income: right.median_income,
            })),
            None => report.uninsured_dropped += 1,
        }
    }

    let uninsured_ids = uninsured.iter().map(|r| &r.id).collect::<HashSet<_>>();
    report.poverty_dropped = poverty.iter().filter(|r| !uninsured_ids.contains(&r.id)).count();
    report.matched = joined.len();

    info!(
        "[join] {} counties matched; dropped {} uninsured-only and {} poverty-only rows",
        report.matched, report.uninsured_dropped, report.poverty_dropped,
    );
    (joined, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uninsured(id: &str, pct: f64) -> UninsuredRecord {
        UninsuredRecord { id: CountyId::padded(id), name: format!("C{id}"), uninsured_pct: pct }
    }

    fn poverty(id: &str, rate: f64) -> PovertyRecord {
        PovertyRecord {
            id: CountyId::padded(id),
            name: format!("P{id}"),
            poverty_rate: rate,
            child_poverty_rate: rate * 1.5,
            median_income: 50_000,
        }
    }

    #[test]
    fn only_shared_keys_survive_and_drops_are_counted() {
        let (joined, report) = join_sources(
            &[uninsured("48005", 20.0), uninsured("48001", 10.0), uninsured("48099", 5.0)],
            &[poverty("48001", 12.0), poverty("48005", 18.0), poverty("48201", 15.0), poverty("48203", 11.0)],
        );

        // Left order is preserved.
        assert_eq!(joined.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(), vec!["48005", "48001"]);
        assert_eq!(joined[0].name, "C48005");
        assert_eq!(joined[0].poverty_rate, 18.0);
        assert_eq!(report, JoinReport { matched: 2, uninsured_dropped: 1, poverty_dropped: 2 });
        assert_eq!(report.dropped(), 3);
    }

    #[test]
    fn empty_side_drops_everything() {
        let (joined, report) = join_sources(&[uninsured("48001", 10.0)], &[]);
        assert!(joined.is_empty());
        assert_eq!(report.uninsured_dropped, 1);
        assert_eq!(report.matched, 0);
    }
}
