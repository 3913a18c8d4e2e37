//! # streamburn core
//!
//! Core types for the streamburn flow-enforcement toolkit.
//!
//! This crate provides:
//! - `Raster<T>`: generic georeferenced grid type
//! - `GeoTransform`: affine transformation for georeferencing
//! - `CRS`: coordinate reference system descriptor
//! - the D8 neighbor model (ordered neighbors, slopes, distance factors)
//! - `StreamNetwork`: ordered drainage polylines
//!
//! File I/O, reprojection and any interactive surface live outside this
//! workspace; grids and geometries arrive already materialized.

pub mod crs;
pub mod error;
pub mod raster;
pub mod vector;

pub use crs::CRS;
pub use error::{Error, Result};
pub use raster::{GeoTransform, Raster, RasterElement};
pub use vector::StreamNetwork;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::CRS;
    pub use crate::error::{Error, Result};
    pub use crate::raster::{GeoTransform, Raster, RasterElement};
    pub use crate::vector::StreamNetwork;
}
