mod regions;
mod stats;

pub use regions::{regional_stats, CountyPlacement, Region, RegionStats};
pub use stats::{category_counts, linear_fit, top_n, LinearFit, NeedSummary};
