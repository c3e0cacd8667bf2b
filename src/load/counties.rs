use std::collections::BTreeMap;

use anyhow::{Context, Result};
use geo::MultiPolygon;
use tracing::info;

use crate::{common, config::Config, geom, types::CountyId};

/// One county-subdivision polygon as read from the boundary file.
#[derive(Debug, Clone)]
pub struct Subdivision {
    pub state_fp: String,
    pub county_fp: String,
    pub name: String,
    pub shape: MultiPolygon<f64>,
}

/// One dissolved county polygon in WGS84 lon/lat.
#[derive(Debug, Clone)]
pub struct CountyShape {
    pub id: CountyId,
    pub name: String,
    pub shape: MultiPolygon<f64>,
}

/// Load county geometries: read subdivisions, keep the configured state,
/// dissolve to one shape per county and reproject to EPSG:4326.
pub fn load_counties(config: &Config) -> Result<Vec<CountyShape>> {
    let path = &config.shapefile;
    common::require_file_exists(path)?;

    let subdivisions = common::read_shapefile(path)?
        .into_iter()
        .map(|(shape, record)| Ok::<_, anyhow::Error>(Subdivision {
            state_fp: common::get_character_field(&record, "STATEFP")?,
            county_fp: common::get_character_field(&record, "COUNTYFP")?,
            name: common::get_character_field(&record, "NAME")?,
            shape: common::shape_to_multipolygon(shape)?,
        }))
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("Malformed boundary file: {}", path.display()))?;
    let read = subdivisions.len();

    let mut counties = dissolve_subdivisions(&config.state.fips, subdivisions);

    let epsg = common::epsg_from_prj(path);
    if epsg != Some(4326) {
        let reprojector = geom::Reprojector::new(geom::geographic_proj4(epsg), geom::WGS84_LONLAT)?;
        for county in &mut counties {
            county.shape = reprojector.shape(&county.shape)
                .with_context(|| format!("Failed to reproject county {}", county.id))?;
        }
    }

    info!("[load_counties] {read} subdivisions -> {} counties (source EPSG {:?})", counties.len(), epsg);
    Ok(counties)
}

/// Merge every subdivision of the given state into one shape per county,
/// sorted by county id. The name is taken from the first subdivision seen.
pub fn dissolve_subdivisions(state_fips: &str, subdivisions: Vec<Subdivision>) -> Vec<CountyShape> {
    let mut groups: BTreeMap<CountyId, (String, Vec<MultiPolygon<f64>>)> = BTreeMap::new();

    for subdivision in subdivisions.into_iter().filter(|s| s.state_fp == state_fips) {
        let id = CountyId::from_parts(&subdivision.state_fp, &subdivision.county_fp);
        groups.entry(id)
            .or_insert_with(|| (subdivision.name, Vec::new()))
            .1.push(subdivision.shape);
    }

    groups.into_iter()
        .map(|(id, (name, shapes))| CountyShape { id, name, shape: geom::union_all(shapes) })
        .collect()
}
