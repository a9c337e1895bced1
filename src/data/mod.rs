//! Data module - CSV loading, reshaping and filtering

mod filter;
mod loader;
mod model;
mod reshaper;

pub use filter::{FilterDimension, FilterEngine, FilterOptions, FilterSelection, FilteredViews};
pub use loader::CaseLoader;
pub use model::{CaseRecord, CaseTable, Location, Period, COVERED_AGENCIES};
pub use reshaper::Reshaper;
