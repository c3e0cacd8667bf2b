use std::{cmp::Ordering, collections::HashMap, fmt};

use geo::Point;

use crate::{geom, load::CountyShape, need::CountyNeed, types::CountyId};

/// Coarse geographic bucket assigned from a county centroid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Border,
    WestTexas,
    NorthTexasUrban,
    GulfCoastUrban,
    Central,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Border,
        Region::WestTexas,
        Region::NorthTexasUrban,
        Region::GulfCoastUrban,
        Region::Central,
    ];

    /// Threshold rules, checked in order: southern border, far west,
    /// DFW metro, Houston/gulf metro, everything else.
    pub fn classify(lon: f64, lat: f64) -> Self {
        if lat < 28.0 {
            Region::Border
        } else if lon < -102.0 {
            Region::WestTexas
        } else if lon > -96.0 && lat > 32.0 {
            Region::NorthTexasUrban
        } else if lon > -96.0 && lat < 30.0 {
            Region::GulfCoastUrban
        } else {
            Region::Central
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Region::Border          => "Border Region",
            Region::WestTexas       => "West Texas",
            Region::NorthTexasUrban => "North Texas Urban",
            Region::GulfCoastUrban  => "Gulf Coast Urban",
            Region::Central         => "Central Texas",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A county geometry with its (optional) need row, centroid and region.
#[derive(Debug, Clone)]
pub struct CountyPlacement<'a> {
    pub county: &'a CountyShape,
    pub need: Option<&'a CountyNeed>,
    pub centroid: Option<Point<f64>>,
    pub region: Region,
}

impl<'a> CountyPlacement<'a> {
    /// Left join of geometries to need rows; counties without a centroid fall into Central.
    pub fn place_all(counties: &'a [CountyShape], needs: &'a [CountyNeed]) -> Vec<Self> {
        let mut by_id: HashMap<&CountyId, &CountyNeed> = HashMap::new();
        for need in needs {
            by_id.entry(&need.id).or_insert(need);
        }

        counties.iter()
            .map(|county| {
                let centroid = geom::planar_centroid(&county.shape);
                let region = centroid
                    .map(|c| Region::classify(c.x(), c.y()))
                    .unwrap_or(Region::Central);
                CountyPlacement { county, need: by_id.get(&county.id).copied(), centroid, region }
            })
            .collect()
    }
}

/// Per-region averages. Means cover counties that have need data and are
/// rounded to one decimal; `counties` counts every county geometry in the region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionStats {
    pub region: Region,
    pub avg_need: Option<f64>,
    pub avg_uninsured: Option<f64>,
    pub avg_poverty: Option<f64>,
    pub avg_income: Option<f64>,
    pub counties: usize,
}

/// Aggregate placements by region, highest average need first (regions without data last).
pub fn regional_stats(placements: &[CountyPlacement]) -> Vec<RegionStats> {
    fn mean_1dp(values: &[f64]) -> Option<f64> {
        if values.is_empty() { return None }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    }

    let mut stats = Region::ALL.iter()
        .filter_map(|&region| {
            let members = placements.iter().filter(|p| p.region == region).collect::<Vec<_>>();
            if members.is_empty() { return None }

            let needs = members.iter().filter_map(|p| p.need).collect::<Vec<_>>();
            let column = |f: fn(&CountyNeed) -> f64| needs.iter().map(|n| f(n)).collect::<Vec<_>>();

            Some(RegionStats {
                region,
                avg_need: mean_1dp(&column(|n| n.need_index)),
                avg_uninsured: mean_1dp(&column(|n| n.uninsured_pct)),
                avg_poverty: mean_1dp(&column(|n| n.poverty_rate)),
                avg_income: mean_1dp(&column(|n| n.median_income as f64)),
                counties: members.len(),
            })
        })
        .collect::<Vec<_>>();

    stats.sort_by(|a, b| match (a.avg_need, b.avg_need) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::need::NeedCategory;
    use geo::{polygon, MultiPolygon};

    fn county(id: &str, lon: f64, lat: f64) -> CountyShape {
        CountyShape {
            id: CountyId::padded(id),
            name: id.to_string(),
            shape: MultiPolygon(vec![polygon![
                (x: lon - 0.1, y: lat - 0.1), (x: lon + 0.1, y: lat - 0.1),
                (x: lon + 0.1, y: lat + 0.1), (x: lon - 0.1, y: lat + 0.1),
            ]]),
        }
    }

    fn need(id: &str, index: f64, income: i64) -> CountyNeed {
        CountyNeed {
            id: CountyId::padded(id),
            name: id.to_string(),
            uninsured_pct: index / 4.0,
            poverty_rate: index / 5.0,
            child_poverty_rate: index / 3.0,
            median_income: income,
            uninsured_norm: 0.0,
            poverty_norm: 0.0,
            need_index: index,
            category: NeedCategory::from_index(index),
        }
    }

    #[test]
    fn classification_rules_apply_in_order() {
        assert_eq!(Region::classify(-97.5, 26.1), Region::Border);     // Brownsville
        assert_eq!(Region::classify(-106.4, 31.8), Region::WestTexas); // El Paso
        assert_eq!(Region::classify(-95.0, 27.5), Region::Border);     // lat wins over lon
        assert_eq!(Region::classify(-95.5, 32.8), Region::NorthTexasUrban);
        assert_eq!(Region::classify(-95.4, 29.8), Region::GulfCoastUrban); // Houston
        assert_eq!(Region::classify(-95.5, 31.0), Region::Central);
        assert_eq!(Region::classify(-97.7, 30.3), Region::Central);    // Austin
    }

    #[test]
    fn regional_means_cover_counties_with_data() {
        let counties = vec![
            county("48061", -97.5, 26.1),
            county("48215", -98.2, 26.4),
            county("48141", -106.4, 31.8),
            county("48453", -97.7, 30.3),
            county("48999", -106.0, 31.0), // geometry only
        ];
        let needs = vec![
            need("48061", 80.0, 40_000),
            need("48215", 70.0, 45_000),
            need("48141", 60.0, 50_000),
            need("48453", 10.0, 85_000),
        ];

        let placements = CountyPlacement::place_all(&counties, &needs);
        assert!(placements[4].need.is_none());

        let stats = regional_stats(&placements);
        assert_eq!(stats.iter().map(|s| s.region).collect::<Vec<_>>(),
            vec![Region::Border, Region::WestTexas, Region::Central]);

        assert_eq!(stats[0].avg_need, Some(75.0));
        assert_eq!(stats[0].avg_income, Some(42_500.0));
        assert_eq!(stats[0].counties, 2);

        // The geometry-only county counts but does not move the mean.
        assert_eq!(stats[1].avg_need, Some(60.0));
        assert_eq!(stats[1].counties, 2);
    }

    #[test]
    fn region_without_data_sorts_last() {
        let counties = vec![county("48001", -95.5, 31.0), county("48141", -106.4, 31.8)];
        let needs = vec![need("48141", 20.0, 50_000)];
        let stats = regional_stats(&CountyPlacement::place_all(&counties, &needs));

        assert_eq!(stats[0].region, Region::WestTexas);
        assert_eq!(stats[1].region, Region::Central);
        assert_eq!(stats[1].avg_need, None);
        assert_eq!(stats[1].counties, 1);
    }
}
