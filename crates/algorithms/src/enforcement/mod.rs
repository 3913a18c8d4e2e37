//! Flow-enforcement strategies
//!
//! Four interchangeable algorithms correct an elevation grid against a
//! drainage/order grid: Carve, Excavation, Excavation-Hierarchical and
//! GBOFE. All share the same contract: a private copy of the elevation
//! grid is corrected and returned, the caller's inputs are never
//! mutated, and the required gradient is validated when the strategy is
//! built, not when it runs.

mod carve;
mod excavation;
mod gbofe;
mod processor;

pub use carve::Carve;
pub use excavation::{Excavation, ExcavationHierarchical};
pub use gbofe::Gbofe;
pub use processor::{FlowProcessor, ProcessingResult};

use std::fmt;
use std::str::FromStr;
use streamburn_core::raster::{Neighbor, Raster};
use streamburn_core::{Error, Result};

/// Cells with a drainage value at or above this take part in a pass.
pub(crate) const DRAINAGE_THRESHOLD: i32 = 1;

/// A flow-enforcement algorithm.
///
/// `apply` reads the elevation grid, the drainage/order grid and the
/// grid resolution, and produces a corrected elevation grid of the same
/// shape and metadata. An error means no usable output was produced;
/// partial results never escape.
pub trait FlowEnforcement {
    /// Method identifier, as accepted by [`Method::from_str`]
    fn name(&self) -> &'static str;

    /// Apply the correction and return a new elevation grid
    fn apply(
        &self,
        dem: &Raster<f64>,
        drainage: &Raster<i32>,
        resolution: f64,
    ) -> Result<Raster<f64>>;
}

/// The four available correction methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Subtract the gradient directly under the drainage network
    Carve,
    /// Excavate to minimum neighbor elevation, batch semantics
    Excavation,
    /// Excavate by ascending drainage order, reading live corrections
    ExcavationHierarchical,
    /// Gradient-based optimized flow enforcement
    Gbofe,
}

impl Method {
    /// Build the strategy for this method.
    ///
    /// Fails with `InvalidParameter` when the gradient is not strictly
    /// positive.
    pub fn strategy(self, gradient: f64) -> Result<Box<dyn FlowEnforcement>> {
        Ok(match self {
            Method::Carve => Box::new(Carve::new(gradient)?),
            Method::Excavation => Box::new(Excavation::new(gradient)?),
            Method::ExcavationHierarchical => Box::new(ExcavationHierarchical::new(gradient)?),
            Method::Gbofe => Box::new(Gbofe::new(gradient)?),
        })
    }

    /// Stable identifier for the method
    pub fn identifier(&self) -> &'static str {
        match self {
            Method::Carve => "carve",
            Method::Excavation => "excavation",
            Method::ExcavationHierarchical => "excavation-hierarchical",
            Method::Gbofe => "gbofe",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Method::Carve => "Direct gradient carving (r.carve)",
            Method::Excavation => "Normal excavation",
            Method::ExcavationHierarchical => "Normal excavation, hierarchical",
            Method::Gbofe => "Gradient-based optimized flow enforcement (GBOFE)",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "carve" => Ok(Method::Carve),
            "excavation" => Ok(Method::Excavation),
            "excavation-hierarchical" => Ok(Method::ExcavationHierarchical),
            "gbofe" => Ok(Method::Gbofe),
            other => Err(Error::InvalidParameter {
                name: "method",
                value: other.to_string(),
                reason: "expected one of carve, excavation, excavation-hierarchical, gbofe"
                    .to_string(),
            }),
        }
    }
}

/// Validate the gradient/depth parameter shared by every strategy.
///
/// Rejects non-finite values along with anything not strictly positive.
pub(crate) fn validate_gradient(gradient: f64) -> Result<f64> {
    if !gradient.is_finite() || gradient <= 0.0 {
        return Err(Error::InvalidParameter {
            name: "gradient",
            value: gradient.to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }
    Ok(gradient)
}

/// Validate the grids and resolution before a strategy touches a cell.
pub(crate) fn validate_inputs(
    dem: &Raster<f64>,
    drainage: &Raster<i32>,
    resolution: f64,
) -> Result<()> {
    let (er, ec) = dem.shape();
    let (ar, ac) = drainage.shape();
    if (er, ec) != (ar, ac) {
        return Err(Error::ShapeMismatch { er, ec, ar, ac });
    }
    if !resolution.is_finite() || resolution <= 0.0 {
        return Err(Error::InvalidParameter {
            name: "resolution",
            value: resolution.to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }
    Ok(())
}

/// Minimum finite elevation among neighbor records, skipping NaN.
///
/// NaN neighbors never register as a minimum candidate; `None` when no
/// finite neighbor exists.
pub(crate) fn min_finite_neighbor(records: &[Neighbor<f64>]) -> Option<f64> {
    let min = records
        .iter()
        .map(|n| n.value)
        .filter(|v| !v.is_nan())
        .fold(f64::INFINITY, f64::min);
    if min.is_finite() {
        Some(min)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_roundtrip() {
        for method in [
            Method::Carve,
            Method::Excavation,
            Method::ExcavationHierarchical,
            Method::Gbofe,
        ] {
            let parsed: Method = method.identifier().parse().unwrap();
            assert_eq!(parsed, method);
        }
    }

    #[test]
    fn test_unknown_method_rejected() {
        let result = Method::from_str("priority-flood");
        assert!(matches!(result, Err(Error::InvalidParameter { .. })));
    }

    #[test]
    fn test_gradient_validation() {
        assert!(validate_gradient(0.5).is_ok());
        assert!(validate_gradient(0.0).is_err());
        assert!(validate_gradient(-1.0).is_err());
        assert!(validate_gradient(f64::NAN).is_err());
    }

    #[test]
    fn test_shape_mismatch_detected() {
        let dem: Raster<f64> = Raster::new(5, 5);
        let drainage: Raster<i32> = Raster::new(5, 4);
        let result = validate_inputs(&dem, &drainage, 10.0);
        assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn test_factory_rejects_bad_gradient() {
        for method in [
            Method::Carve,
            Method::Excavation,
            Method::ExcavationHierarchical,
            Method::Gbofe,
        ] {
            assert!(method.strategy(-0.1).is_err(), "{method}");
            assert!(method.strategy(1.0).is_ok(), "{method}");
        }
    }
}
