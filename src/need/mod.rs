mod index;
mod join;

pub use index::{compute_need_index, need_index, CountyNeed, MinMax, NeedCategory};
pub use join::{join_sources, JoinReport, JoinedCounty};
