use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use shapefile::{dbase::{FieldValue, Record}, PolygonRing, Reader, Shape};

/// Reads all shapes + attribute records from a given `.shp` file path.
pub(crate) fn read_shapefile(path: &Path) -> Result<Vec<(Shape, Record)>> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("Failed to open shapefile: {}", path.display()))?;

    let mut items = Vec::with_capacity(reader.shape_count()?);
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result
            .with_context(|| format!("Error reading shape+record in {}", path.display()))?;
        items.push((shape, record));
    }
    Ok(items)
}

/// Get the value of a character field from a Record.
pub(crate) fn get_character_field(record: &Record, field: &str) -> Result<String> {
    match record.get(field) {
        Some(FieldValue::Character(Some(s))) => Ok(s.trim().to_string()),
        _ => bail!("missing or invalid character field: {}", field)
    }
}

/// Coerce a generic shape into an owned multipolygon, raising error if different shape.
pub(crate) fn shape_to_multipolygon(shape: Shape) -> Result<MultiPolygon<f64>> {
    match shape {
        Shape::Polygon(polygon) => Ok(shp_to_geo(&polygon)),
        other => bail!("found non-Polygon shape in layer: {:?}", other.shapetype())
    }
}

/// Convert shapefile::Polygon to geo::MultiPolygon<f64>.
/// Shapefile stores each outer ring followed by its holes.
pub(crate) fn shp_to_geo(polygon: &shapefile::Polygon) -> MultiPolygon<f64> {
    fn to_line_string(points: &[shapefile::Point]) -> LineString<f64> {
        let mut coords = points.iter()
            .map(|pt| Coord { x: pt.x, y: pt.y })
            .collect::<Vec<_>>();
        if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
            if first != last { coords.push(first) }
        }
        LineString(coords)
    }

    let mut polys = Vec::new();
    let mut exterior: Option<LineString<f64>> = None;
    let mut holes = Vec::new();

    for ring in polygon.rings() {
        match ring {
            PolygonRing::Outer(points) => {
                if let Some(ext) = exterior.take() {
                    polys.push(Polygon::new(ext, std::mem::take(&mut holes)));
                }
                exterior = Some(to_line_string(points));
            }
            PolygonRing::Inner(points) => holes.push(to_line_string(points)),
        }
    }
    if let Some(ext) = exterior {
        polys.push(Polygon::new(ext, holes));
    }

    MultiPolygon(polys)
}

/// Guess the EPSG code of a shapefile from its `.prj` sidecar (WKT).
/// Returns None when the sidecar is missing or the datum is not recognized.
pub(crate) fn epsg_from_prj(shp_path: &Path) -> Option<u32> {
    let wkt = fs::read_to_string(shp_path.with_extension("prj")).ok()?;
    if wkt.contains("WGS_1984") || wkt.contains("WGS 84") {
        Some(4326)
    } else if wkt.contains("North_American_1983") || wkt.contains("NAD83") {
        Some(4269)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    fn square(x0: f64, y0: f64, size: f64) -> Vec<shapefile::Point> {
        // Clockwise, as shapefiles store outer rings.
        vec![
            shapefile::Point::new(x0, y0),
            shapefile::Point::new(x0, y0 + size),
            shapefile::Point::new(x0 + size, y0 + size),
            shapefile::Point::new(x0 + size, y0),
            shapefile::Point::new(x0, y0),
        ]
    }

    #[test]
    fn outer_rings_start_new_polygons_and_holes_attach() {
        let mut hole = square(1.0, 1.0, 1.0);
        hole.reverse();
        let polygon = shapefile::Polygon::with_rings(vec![
            PolygonRing::Outer(square(0.0, 0.0, 4.0)),
            PolygonRing::Inner(hole),
            PolygonRing::Outer(square(10.0, 10.0, 1.0)),
        ]);

        let mp = shp_to_geo(&polygon);
        assert_eq!(mp.0.len(), 2);
        assert_eq!(mp.0[0].interiors().len(), 1);
        assert!(mp.0[1].interiors().is_empty());
        assert!((mp.unsigned_area() - (16.0 - 1.0 + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn epsg_is_read_from_prj_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let shp = dir.path().join("counties.shp");
        assert_eq!(epsg_from_prj(&shp), None);

        fs::write(dir.path().join("counties.prj"),
            r#"GEOGCS["GCS_North_American_1983",DATUM["D_North_American_1983"]]"#).unwrap();
        assert_eq!(epsg_from_prj(&shp), Some(4269));

        fs::write(dir.path().join("counties.prj"),
            r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984"]]"#).unwrap();
        assert_eq!(epsg_from_prj(&shp), Some(4326));
    }

    #[test]
    fn missing_shapefile_is_fatal() {
        let Err(err) = read_shapefile(Path::new("/definitely/missing.shp")) else {
            panic!("reading a missing shapefile succeeded");
        };
        assert!(format!("{err:#}").contains("missing.shp"));
    }
}
