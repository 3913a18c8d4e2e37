//! Grid data structures and the D8 neighbor model

pub mod d8;
mod element;
mod geotransform;
mod grid;

pub use d8::{distance_factor, neighbors, slopes, Neighbor, D8_OFFSETS};
pub use element::RasterElement;
pub use geotransform::GeoTransform;
pub use grid::Raster;
