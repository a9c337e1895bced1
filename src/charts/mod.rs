//! Charts module - Chart specification and rendering

mod plotter;
mod spec;

pub use plotter::{ChartPlotter, GroupedBars};
pub use spec::ChartSpec;
