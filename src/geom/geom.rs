use geo::{BooleanOps, BoundingRect, Centroid, Coord, MultiPolygon, Point, Rect};

/// Compute the bounding rectangle of all MultiPolygons.
pub(crate) fn bounds<'a>(shapes: impl IntoIterator<Item = &'a MultiPolygon<f64>>) -> Option<Rect<f64>> {
    shapes.into_iter()
        .filter_map(|polygon| polygon.bounding_rect())
        .reduce(|a, b| Rect::new(
            Coord {
                x: a.min().x.min(b.min().x),
                y: a.min().y.min(b.min().y),
            },
            Coord {
                x: a.max().x.max(b.max().x),
                y: a.max().y.max(b.max().y),
            }
        ))
}

/// Compute the union of all MultiPolygons into a single MultiPolygon.
/// This may be slow for large numbers of complex polygons.
pub(crate) fn union_all(shapes: impl IntoIterator<Item = MultiPolygon<f64>>) -> MultiPolygon<f64> {
    shapes.into_iter()
        .reduce(|a, b| a.union(&b))
        .unwrap_or_else(|| MultiPolygon(vec![]))
}

/// Area-weighted centroid in the shape's own coordinates (lon/lat for county shapes).
#[inline]
pub(crate) fn planar_centroid(shape: &MultiPolygon<f64>) -> Option<Point<f64>> {
    shape.centroid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Area};

    fn unit_square(x: f64, y: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: x, y: y), (x: x + 1.0, y: y), (x: x + 1.0, y: y + 1.0), (x: x, y: y + 1.0),
        ]])
    }

    #[test]
    fn bounds_cover_every_shape() {
        let shapes = [unit_square(0.0, 0.0), unit_square(3.0, -2.0)];
        let rect = bounds(&shapes).unwrap();
        assert_eq!(rect.min(), Coord { x: 0.0, y: -2.0 });
        assert_eq!(rect.max(), Coord { x: 4.0, y: 1.0 });
        assert!(bounds(&[]).is_none());
    }

    #[test]
    fn union_merges_adjacent_squares() {
        let merged = union_all([unit_square(0.0, 0.0), unit_square(1.0, 0.0)]);
        assert!((merged.unsigned_area() - 2.0).abs() < 1e-9);
        assert_eq!(merged.0.len(), 1);

        let centroid = planar_centroid(&merged).unwrap();
        assert!((centroid.x() - 1.0).abs() < 1e-9);
        assert!((centroid.y() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn union_of_nothing_is_empty() {
        assert!(union_all(Vec::new()).0.is_empty());
    }
}
