#![doc = "Telehealth need analysis: county need index, regional breakdown and charts"]
pub mod analysis;
pub mod chart;
pub mod cli;
mod common;
mod config;
mod geom;
pub mod load;
pub mod need;
pub mod pipeline;
pub mod report;
mod types;

#[doc(inline)]
pub use config::{Config, StateProfile};

#[doc(inline)]
pub use types::CountyId;
