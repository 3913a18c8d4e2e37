//! Stream network geometry
//!
//! An ordered collection of polyline geometries with an optional CRS
//! descriptor, as handed in by the collaborator layer. Only `LineString`
//! and `MultiLineString` geometries participate in rasterization; other
//! variants are silently skipped by consumers.

use crate::crs::CRS;
use geo_types::Geometry;

/// Ordered set of drainage polylines
#[derive(Debug, Clone, Default)]
pub struct StreamNetwork {
    /// Polyline geometries in input order
    pub geometries: Vec<Geometry<f64>>,
    /// Coordinate reference of the geometries, if known
    pub crs: Option<CRS>,
}

impl StreamNetwork {
    /// Create an empty network
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a network from geometries, without a CRS
    pub fn from_geometries(geometries: Vec<Geometry<f64>>) -> Self {
        Self {
            geometries,
            crs: None,
        }
    }

    /// Attach a CRS descriptor
    pub fn with_crs(mut self, crs: CRS) -> Self {
        self.crs = Some(crs);
        self
    }

    /// Append a geometry
    pub fn push(&mut self, geometry: Geometry<f64>) {
        self.geometries.push(geometry);
    }

    /// Number of geometries
    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    /// Whether the network holds no geometries
    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    /// Iterate over the geometries in input order
    pub fn iter(&self) -> impl Iterator<Item = &Geometry<f64>> {
        self.geometries.iter()
    }
}

impl IntoIterator for StreamNetwork {
    type Item = Geometry<f64>;
    type IntoIter = std::vec::IntoIter<Geometry<f64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.geometries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::LineString;

    #[test]
    fn test_network_push_and_iter() {
        let mut network = StreamNetwork::new();
        assert!(network.is_empty());

        network.push(Geometry::LineString(LineString::from(vec![
            (0.0, 0.0),
            (10.0, 0.0),
        ])));
        network.push(Geometry::LineString(LineString::from(vec![
            (0.0, 5.0),
            (0.0, 15.0),
        ])));

        assert_eq!(network.len(), 2);
        assert_eq!(network.iter().count(), 2);
    }
}
