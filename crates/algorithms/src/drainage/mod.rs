//! Drainage network discretization
//!
//! Converts vector stream geometry into the grids the enforcement
//! strategies consume: a marker grid (uniform markers, or per-line
//! sequence tags in hierarchical mode) and, on top of that, a
//! topological order grid.

mod hierarchy;
mod rasterize;

pub use hierarchy::drainage_hierarchy;
pub use rasterize::rasterize_drainage;

use streamburn_core::raster::Raster;

/// Distinct positive values present in a drainage grid, ascending.
///
/// Both the hierarchy builder and the order-grouped strategies process
/// cells grouped by these values, smallest first (upstream to downstream).
pub(crate) fn distinct_positive_values(grid: &Raster<i32>) -> Vec<i32> {
    let mut values: Vec<i32> = grid.data().iter().copied().filter(|&v| v > 0).collect();
    values.sort_unstable();
    values.dedup();
    values
}
