//! Source loaders. Each owns its file handle for the duration of the read and
//! returns typed rows; none of them mutates another loader's output.

mod counties;
mod poverty;
mod telehealth;
mod uninsured;

pub use counties::{dissolve_subdivisions, load_counties, CountyShape, Subdivision};
pub use poverty::{load_poverty, parse_poverty, parse_poverty_line, PovertyLoad, PovertyRecord};
pub use telehealth::{load_telehealth, trends_from_dataframe, Subgroup, TelehealthTrends, TrendPoint, TrendSeries};
pub use uninsured::{load_uninsured, uninsured_from_dataframe, UninsuredRecord, SAHIE_COLUMNS, SAHIE_PREAMBLE_ROWS};
