//! # streamburn algorithms
//!
//! Flow enforcement ("stream burning") for digital elevation grids:
//! correcting a DEM so a known drainage network flows monotonically
//! downhill through it.
//!
//! - **drainage**: rasterize stream polylines into a marker grid and,
//!   for hierarchical processing, derive a drainage-order grid from it
//! - **enforcement**: the four correction strategies (Carve, Excavation,
//!   Excavation-Hierarchical, GBOFE) and the processing orchestrator
//!
//! Everything runs as a single deterministic sequential pass; strategies
//! never mutate their inputs.

pub mod drainage;
pub mod enforcement;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::drainage::{drainage_hierarchy, rasterize_drainage};
    pub use crate::enforcement::{
        Carve, Excavation, ExcavationHierarchical, FlowEnforcement, FlowProcessor, Gbofe, Method,
        ProcessingResult,
    };
    pub use streamburn_core::prelude::*;
}
