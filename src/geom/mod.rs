mod geom;
mod proj;

pub(crate) use geom::{bounds, planar_centroid, union_all};
pub(crate) use proj::{geographic_proj4, MercatorCentroids, Reprojector, WGS84_LONLAT};
