use anyhow::{anyhow, Context, Result};
use geo::{Centroid, Coord, MapCoords, MultiPolygon, Point};
use proj4rs::{proj::Proj as Proj4, transform::transform};

pub(crate) const NAD83_LONLAT: &str = "+proj=longlat +datum=NAD83 +no_defs +type=crs";
pub(crate) const WGS84_LONLAT: &str = "+proj=longlat +datum=WGS84 +no_defs +type=crs";
pub(crate) const WEB_MERCATOR: &str =
    "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs +type=crs";

/// PROJ.4 string for a geographic source CRS; NAD83 lon/lat when the EPSG code is unknown.
#[inline]
pub(crate) fn geographic_proj4(epsg: Option<u32>) -> &'static str {
    match epsg {
        Some(4326) => WGS84_LONLAT,
        _          => NAD83_LONLAT,
    }
}

/// Coordinate transform between two PROJ.4 definitions.
/// Geographic ends take and return degrees; projected ends use meters.
pub(crate) struct Reprojector {
    from: Proj4,
    to: Proj4,
    from_degrees: bool,
    to_degrees: bool,
}

impl Reprojector {
    pub(crate) fn new(from: &str, to: &str) -> Result<Self> {
        Ok(Self {
            from: Proj4::from_proj_string(from)
                .with_context(|| anyhow!("failed to build source PROJ.4: {from}"))?,
            to: Proj4::from_proj_string(to)
                .with_context(|| anyhow!("failed to build target PROJ.4: {to}"))?,
            from_degrees: from.contains("+proj=longlat"),
            to_degrees: to.contains("+proj=longlat"),
        })
    }

    /// Transform a single coordinate.
    pub(crate) fn coord(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let mut point = if self.from_degrees {
            (coord.x.to_radians(), coord.y.to_radians(), 0.0)
        } else {
            (coord.x, coord.y, 0.0)
        };
        transform(&self.from, &self.to, &mut point)
            .map_err(|e| anyhow!("CRS transform failed at ({}, {}): {e:?}", coord.x, coord.y))?;

        Ok(if self.to_degrees {
            Coord { x: point.0.to_degrees(), y: point.1.to_degrees() }
        } else {
            Coord { x: point.0, y: point.1 }
        })
    }

    /// Transform every coordinate of a shape.
    pub(crate) fn shape(&self, shape: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
        shape.try_map_coords(|coord| self.coord(coord))
    }
}

/// Centroids computed in Web Mercator (EPSG:3857) and reported back in WGS84 lon/lat,
/// which keeps marker positions stable for large, oddly shaped counties.
pub(crate) struct MercatorCentroids {
    forward: Reprojector,
    inverse: Reprojector,
}

impl MercatorCentroids {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            forward: Reprojector::new(WGS84_LONLAT, WEB_MERCATOR)?,
            inverse: Reprojector::new(WEB_MERCATOR, WGS84_LONLAT)?,
        })
    }

    /// Centroid of a lon/lat shape, or None for an empty shape.
    pub(crate) fn centroid(&self, shape: &MultiPolygon<f64>) -> Result<Option<Point<f64>>> {
        let projected = self.forward.shape(shape)?;
        projected.centroid()
            .map(|point| self.inverse.coord(point.0).map(Point::from))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    #[test]
    fn nad83_to_wgs84_is_nearly_identity() {
        let reprojector = Reprojector::new(NAD83_LONLAT, WGS84_LONLAT).unwrap();
        let out = reprojector.coord(Coord { x: -97.75, y: 30.25 }).unwrap();
        assert!((out.x + 97.75).abs() < 1e-3);
        assert!((out.y - 30.25).abs() < 1e-3);
    }

    #[test]
    fn mercator_round_trip_preserves_degrees() {
        let forward = Reprojector::new(WGS84_LONLAT, WEB_MERCATOR).unwrap();
        let inverse = Reprojector::new(WEB_MERCATOR, WGS84_LONLAT).unwrap();
        let meters = forward.coord(Coord { x: -100.0, y: 31.0 }).unwrap();
        assert!(meters.x < -1.0e7); // roughly -11.1 million meters
        let back = inverse.coord(meters).unwrap();
        assert!((back.x + 100.0).abs() < 1e-6);
        assert!((back.y - 31.0).abs() < 1e-6);
    }

    #[test]
    fn mercator_centroid_of_small_square_is_its_center() {
        let centroids = MercatorCentroids::new().unwrap();
        let square = MultiPolygon(vec![polygon![
            (x: -100.1, y: 30.9), (x: -99.9, y: 30.9), (x: -99.9, y: 31.1), (x: -100.1, y: 31.1),
        ]]);
        let center = centroids.centroid(&square).unwrap().unwrap();
        assert!((center.x() + 100.0).abs() < 1e-6);
        assert!((center.y() - 31.0).abs() < 1e-2);

        assert!(centroids.centroid(&MultiPolygon(vec![])).unwrap().is_none());
    }

    #[test]
    fn unknown_epsg_defaults_to_nad83() {
        assert_eq!(geographic_proj4(None), NAD83_LONLAT);
        assert_eq!(geographic_proj4(Some(4269)), NAD83_LONLAT);
        assert_eq!(geographic_proj4(Some(4326)), WGS84_LONLAT);
    }
}
