//! Processing orchestrator
//!
//! Sequences one correction run: rasterize the stream network, build
//! the drainage hierarchy when hierarchical processing is requested,
//! normalize no-data, apply the selected strategy and package the
//! result. A run is a pure function of its inputs; any failure means no
//! output was produced.

use crate::drainage::{drainage_hierarchy, rasterize_drainage};
use crate::enforcement::Method;
use streamburn_core::raster::Raster;
use streamburn_core::vector::StreamNetwork;
use streamburn_core::{Error, Result};
use tracing::debug;

/// Orchestrates a flow-enforcement run over one DEM and stream network
#[derive(Debug, Clone)]
pub struct FlowProcessor {
    dem: Raster<f64>,
    streams: StreamNetwork,
}

impl FlowProcessor {
    /// Create a processor for the given elevation grid and stream network
    pub fn new(dem: Raster<f64>, streams: StreamNetwork) -> Self {
        Self { dem, streams }
    }

    /// The input elevation grid
    pub fn dem(&self) -> &Raster<f64> {
        &self.dem
    }

    /// The input stream network
    pub fn streams(&self) -> &StreamNetwork {
        &self.streams
    }

    /// Prepare the working grids for a strategy.
    ///
    /// Rasterizes the drainage network (adding the hierarchy in
    /// hierarchical mode) and returns it together with a copy of the DEM
    /// whose no-data cells are normalized to NaN. The processor's own
    /// inputs are left untouched.
    pub fn prepare(&self, hierarchical: bool) -> Result<(Raster<f64>, Raster<i32>)> {
        debug!(hierarchical, "rasterizing drainage network");
        let markers = rasterize_drainage(&self.dem, &self.streams, hierarchical)?;

        let drainage = if hierarchical {
            debug!("building drainage hierarchy");
            drainage_hierarchy(&markers)
        } else {
            markers
        };

        let mut dem = self.dem.clone();
        dem.normalize_nodata();

        Ok((dem, drainage))
    }

    /// Run one correction pass and package the corrected grid.
    ///
    /// The gradient is validated when the strategy is built, before any
    /// grid work happens. Strategy-internal failures are re-raised as
    /// `Processing` with the method name as context.
    pub fn run(&self, method: Method, gradient: f64, hierarchical: bool) -> Result<ProcessingResult> {
        let strategy = method.strategy(gradient)?;
        let (dem, drainage) = self.prepare(hierarchical)?;

        debug!(method = strategy.name(), gradient, "applying flow enforcement");
        let corrected = strategy
            .apply(&dem, &drainage, self.dem.cell_size())
            .map_err(|e| Error::processing(strategy.name(), e))?;
        debug!("flow enforcement complete");

        Ok(ProcessingResult { corrected })
    }
}

/// Corrected elevation grid, ready for the persistence collaborator.
///
/// Shape, transform, CRS and no-data convention match the input DEM.
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    corrected: Raster<f64>,
}

impl ProcessingResult {
    /// Borrow the corrected grid
    pub fn raster(&self) -> &Raster<f64> {
        &self.corrected
    }

    /// Hand the corrected grid over
    pub fn into_raster(self) -> Raster<f64> {
        self.corrected
    }
}
