//! Gradient-based optimized flow enforcement
//!
//! Instead of lowering the drainage cell itself, GBOFE adjusts the
//! neighbor lying toward the drainage network's higher-order direction,
//! so corrections propagate outward from the stream into the terrain.
//! Per cell it resolves two failure modes: pits (no downhill neighbor,
//! fixed by leveling the max-order neighbors to the cell) and downhill
//! paths flatter than the required gradient (fixed by deepening the
//! chosen neighbor to `e - (max_slope + gradient) * distance`).
//!
//! Cells are processed grouped by ascending order value; a resolved
//! cell's drainage entry is cleared so later cells no longer see it as
//! a reference, which is also what keeps each cell resolved at most
//! once per pass.

use crate::drainage::distinct_positive_values;
use crate::enforcement::{validate_gradient, validate_inputs, FlowEnforcement};
use streamburn_core::raster::{d8, Raster};
use streamburn_core::Result;

/// One neighbor under consideration while resolving a cell.
///
/// Rebuilt fresh for every processed cell; never persisted.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    row: usize,
    col: usize,
    /// D8 direction slot, for the cardinal/diagonal distance factor
    dir: usize,
    /// Elevation drop per unit distance from the cell toward this
    /// neighbor; positive means downhill
    slope: f64,
    order: i32,
}

/// Gradient-based optimized flow enforcement
#[derive(Debug, Clone)]
pub struct Gbofe {
    gradient: f64,
}

impl Gbofe {
    /// Create the strategy; the gradient must be strictly positive.
    pub fn new(gradient: f64) -> Result<Self> {
        Ok(Self {
            gradient: validate_gradient(gradient)?,
        })
    }

    fn process_cell(
        &self,
        dem: &mut Raster<f64>,
        drainage: &mut Raster<i32>,
        row: usize,
        col: usize,
        current_order: i32,
        resolution: f64,
    ) {
        let elevations = d8::neighbors(dem, row, col);
        let orders = d8::neighbors(drainage, row, col);
        // Safe: callers pass in-grid positions
        let e = unsafe { dem.get_unchecked(row, col) };

        // No drainage neighbor at all: nothing to reference, retire the cell
        let max_neighbor_order = orders.iter().map(|n| n.value).max().unwrap_or(0);
        if max_neighbor_order == 0 {
            unsafe { drainage.set_unchecked(row, col, 0) };
            return;
        }

        // All three lists apply the same in-grid filter, so they zip
        // position for position
        let slope_values = d8::slopes(&elevations, e, resolution);
        let mut candidates: Vec<Candidate> = elevations
            .iter()
            .zip(orders.iter())
            .zip(slope_values)
            .map(|((en, on), slope)| Candidate {
                row: en.row,
                col: en.col,
                dir: en.dir,
                slope,
                order: on.value,
            })
            .collect();

        // Same-order siblings never serve as a correction reference
        candidates.retain(|c| c.order != current_order);
        if candidates.is_empty() {
            unsafe { drainage.set_unchecked(row, col, 0) };
            return;
        }

        // Of the higher-order neighbors keep only the nearest one, so the
        // correction cannot jump arbitrarily far downstream
        let min_superior = candidates
            .iter()
            .map(|c| c.order)
            .filter(|&o| o > current_order)
            .min();
        if let Some(min_superior) = min_superior {
            candidates.retain(|c| c.order <= current_order || c.order == min_superior);
        }

        let max_order = candidates.iter().map(|c| c.order).max().unwrap();
        let max_order_set: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| c.order == max_order)
            .map(|(i, _)| i)
            .collect();

        // NaN slopes never win; with no finite slope at all this folds to
        // -inf and the pit branch runs
        let max_slope = candidates
            .iter()
            .map(|c| c.slope)
            .filter(|s| !s.is_nan())
            .fold(f64::NEG_INFINITY, f64::max);

        if max_slope <= 0.0 {
            // Local pit: level the max-order neighbors to the cell
            for &i in &max_order_set {
                let c = &candidates[i];
                unsafe { dem.set_unchecked(c.row, c.col, e) };
            }
            unsafe { drainage.set_unchecked(row, col, 0) };
            return;
        }

        let max_slope_count = candidates.iter().filter(|c| c.slope == max_slope).count();
        let corrected_slope = max_slope + self.gradient;

        if max_order_set.len() == 1 {
            let c = &candidates[max_order_set[0]];
            // Correct unless this neighbor already uniquely holds the
            // steepest descent
            if c.slope != max_slope || max_slope_count > 1 {
                let target = e - corrected_slope * d8::distance_factor(c.dir, resolution);
                unsafe {
                    dem.set_unchecked(c.row, c.col, target);
                    drainage.set_unchecked(row, col, 0);
                }
            }
        } else {
            let has_max_slope = max_order_set
                .iter()
                .any(|&i| candidates[i].slope == max_slope);
            if !has_max_slope || max_order_set.len() < max_slope_count {
                for &i in &max_order_set {
                    let c = &candidates[i];
                    let target = e - corrected_slope * d8::distance_factor(c.dir, resolution);
                    unsafe { dem.set_unchecked(c.row, c.col, target) };
                }
                unsafe { drainage.set_unchecked(row, col, 0) };
            }
        }
        // In both remaining branches the cell stays active and untouched
    }
}

impl FlowEnforcement for Gbofe {
    fn name(&self) -> &'static str {
        "gbofe"
    }

    fn apply(
        &self,
        dem: &Raster<f64>,
        drainage: &Raster<i32>,
        resolution: f64,
    ) -> Result<Raster<f64>> {
        validate_inputs(dem, drainage, resolution)?;

        let (rows, cols) = dem.shape();
        let mut corrected = dem.clone();
        let mut drainage_state = drainage.clone();

        // Groups come from the input grid; membership is re-read from the
        // mutated copy so retired cells drop out
        for value in distinct_positive_values(drainage) {
            let mut cells: Vec<(usize, usize)> = Vec::new();
            for row in 0..rows {
                for col in 0..cols {
                    if unsafe { drainage_state.get_unchecked(row, col) } == value {
                        cells.push((row, col));
                    }
                }
            }

            for (row, col) in cells {
                self.process_cell(
                    &mut corrected,
                    &mut drainage_state,
                    row,
                    col,
                    value,
                    resolution,
                );
            }
        }

        Ok(corrected)
    }
}
