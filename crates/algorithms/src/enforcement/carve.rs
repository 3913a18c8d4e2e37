//! Carve method
//!
//! The r.carve approach: lower every drainage cell by the gradient,
//! leaving the rest of the grid untouched. No neighbor interaction, so
//! the result is independent of traversal order. Reapplying the method
//! subtracts the gradient again; it is deliberately not idempotent.

use crate::enforcement::{validate_gradient, validate_inputs, FlowEnforcement, DRAINAGE_THRESHOLD};
use streamburn_core::raster::Raster;
use streamburn_core::Result;

/// Direct gradient carving
#[derive(Debug, Clone)]
pub struct Carve {
    gradient: f64,
}

impl Carve {
    /// Create the strategy; the gradient must be strictly positive.
    pub fn new(gradient: f64) -> Result<Self> {
        Ok(Self {
            gradient: validate_gradient(gradient)?,
        })
    }
}

impl FlowEnforcement for Carve {
    fn name(&self) -> &'static str {
        "carve"
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

        for row in 0..rows {
            for col in 0..cols {
                if unsafe { drainage.get_unchecked(row, col) } < DRAINAGE_THRESHOLD {
                    continue;
                }
                // Safe: row/col iterate the grid shape
                unsafe {
                    let value = corrected.get_unchecked(row, col);
                    corrected.set_unchecked(row, col, value - self.gradient);
                }
            }
        }

        Ok(corrected)
    }
}
