//! Excavation methods
//!
//! Both variants lower each drainage cell to the minimum of its neighbor
//! elevations minus the gradient; they differ in what that minimum is
//! read from. [`Excavation`] reads the pristine input for every cell and
//! writes all corrections afterwards, so cells never see each other's
//! updates. [`ExcavationHierarchical`] walks drainage order levels
//! upstream to downstream and reads the progressively corrected grid,
//! letting earlier corrections deepen later ones.

use crate::drainage::distinct_positive_values;
use crate::enforcement::{
    min_finite_neighbor, validate_gradient, validate_inputs, FlowEnforcement, DRAINAGE_THRESHOLD,
};
use streamburn_core::raster::{d8, Raster};
use streamburn_core::Result;

/// Batch excavation against the unmodified elevation snapshot
#[derive(Debug, Clone)]
pub struct Excavation {
    gradient: f64,
}

impl Excavation {
    /// Create the strategy; the gradient must be strictly positive.
    pub fn new(gradient: f64) -> Result<Self> {
        Ok(Self {
            gradient: validate_gradient(gradient)?,
        })
    }
}

impl FlowEnforcement for Excavation {
    fn name(&self) -> &'static str {
        "excavation"
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

        // Read phase: every minimum comes from the input snapshot, so
        // mutually adjacent drainage cells cannot contaminate each other.
        let mut updates: Vec<(usize, usize, f64)> = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                if unsafe { drainage.get_unchecked(row, col) } < DRAINAGE_THRESHOLD {
                    continue;
                }
                let records = d8::neighbors(dem, row, col);
                // A cell with no finite neighbor has no excavation target
                if let Some(min) = min_finite_neighbor(&records) {
                    updates.push((row, col, min - self.gradient));
                }
            }
        }

        // Write phase
        for (row, col, value) in updates {
            // Safe: positions came from the scan above
            unsafe { corrected.set_unchecked(row, col, value) };
        }

        Ok(corrected)
    }
}

/// Excavation by ascending drainage order, reading live corrections
#[derive(Debug, Clone)]
pub struct ExcavationHierarchical {
    gradient: f64,
}

impl ExcavationHierarchical {
    /// Create the strategy; the gradient must be strictly positive.
    pub fn new(gradient: f64) -> Result<Self> {
        Ok(Self {
            gradient: validate_gradient(gradient)?,
        })
    }
}

impl FlowEnforcement for ExcavationHierarchical {
    fn name(&self) -> &'static str {
        "excavation-hierarchical"
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

        // Ascending order values: upstream cells first. Within a value
        // the row-major scan fixes the traversal, and each write lands
        // before the next cell reads.
        for value in distinct_positive_values(drainage) {
            for row in 0..rows {
                for col in 0..cols {
                    if unsafe { drainage.get_unchecked(row, col) } != value {
                        continue;
                    }
                    let records = d8::neighbors(&corrected, row, col);
                    if let Some(min) = min_finite_neighbor(&records) {
                        // Safe: row/col iterate the grid shape
                        unsafe { corrected.set_unchecked(row, col, min - self.gradient) };
                    }
                }
            }
        }

        Ok(corrected)
    }
}
