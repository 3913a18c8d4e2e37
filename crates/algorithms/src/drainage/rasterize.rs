//! Drainage network rasterization
//!
//! Samples stream polylines at one point per cell of ground distance and
//! burns the samples into a marker grid aligned with the elevation grid.
//! Features are burned shortest first with replace semantics, so where
//! streams overlap a cell the longest one keeps it.

use geo::line_measures::LengthMeasurable;
use geo::{Euclidean, Geometry, LineInterpolatePoint, LineString, Point};
use streamburn_core::raster::Raster;
use streamburn_core::vector::StreamNetwork;
use streamburn_core::{Error, Result};
use tracing::debug;

/// Total Euclidean length of a geometry; non-linear variants measure 0.
fn geometry_length(geom: &Geometry<f64>) -> f64 {
    match geom {
        Geometry::LineString(ls) => ls.length(&Euclidean),
        Geometry::MultiLineString(mls) => mls.0.iter().map(|ls| ls.length(&Euclidean)).sum(),
        _ => 0.0,
    }
}

/// Sample a line at distances linearly spaced from 1.0 to its length,
/// one point per `resolution` of ground distance (at least two).
///
/// The first sample sits one ground unit down the line, not at its
/// start; fractions are clamped so degenerate lines collapse onto
/// their endpoints.
fn sample_line(line: &LineString<f64>, resolution: f64) -> Vec<Point<f64>> {
    let length = line.length(&Euclidean);
    let n_points = ((length / resolution) as usize + 1).max(2);

    (0..n_points)
        .filter_map(|i| {
            let dist = 1.0 + (length - 1.0) * i as f64 / (n_points - 1) as f64;
            let fraction = if length > 0.0 {
                (dist / length).clamp(0.0, 1.0)
            } else {
                0.0
            };
            line.line_interpolate_point(fraction)
        })
        .collect()
}

/// Rasterize a stream network onto the template grid.
///
/// Every sampled point is burned into the cell containing it with
/// last-write-wins semantics. In hierarchical mode a point carries its
/// 0-based sequence index along its line (so each line's first sample
/// carries 0, which downstream code treats as "no drainage"); otherwise
/// every point carries the uniform marker 1. Geometries other than
/// (multi-)lines are silently skipped, as are points falling outside
/// the grid.
///
/// The output inherits the template's transform and CRS, with 0 as the
/// "no drainage" fill.
///
/// # Errors
/// `InvalidParameter` when the template resolution is not positive,
/// `CrsMismatch` when both sides carry a CRS and they differ (the core
/// validates but never reprojects).
pub fn rasterize_drainage(
    template: &Raster<f64>,
    streams: &StreamNetwork,
    hierarchical: bool,
) -> Result<Raster<i32>> {
    let resolution = template.cell_size();
    if !(resolution > 0.0) {
        return Err(Error::InvalidParameter {
            name: "resolution",
            value: resolution.to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }

    if let (Some(raster_crs), Some(vector_crs)) = (template.crs(), streams.crs.as_ref()) {
        if !raster_crs.is_equivalent(vector_crs) {
            return Err(Error::CrsMismatch(
                raster_crs.identifier(),
                vector_crs.identifier(),
            ));
        }
    }

    // Shortest features first: under overlap, later (longer) streams
    // overwrite earlier ones.
    let mut ordered: Vec<&Geometry<f64>> = streams.iter().collect();
    ordered.sort_by(|a, b| {
        geometry_length(a)
            .partial_cmp(&geometry_length(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let (rows, cols) = template.shape();
    let mut output = template.with_same_meta::<i32>();

    let mut burned = 0usize;
    for geom in ordered {
        let lines: Vec<&LineString<f64>> = match geom {
            Geometry::LineString(ls) => vec![ls],
            Geometry::MultiLineString(mls) => mls.0.iter().collect(),
            _ => continue,
        };

        for line in lines {
            for (seq, point) in sample_line(line, resolution).into_iter().enumerate() {
                let value = if hierarchical { seq as i32 } else { 1 };

                let (col_f, row_f) = template.geo_to_pixel(point.x(), point.y());
                if !col_f.is_finite() || !row_f.is_finite() {
                    continue;
                }
                let (row_i, col_i) = (row_f.floor(), col_f.floor());
                if row_i < 0.0 || col_i < 0.0 || row_i >= rows as f64 || col_i >= cols as f64 {
                    continue;
                }

                // Safe: bounds checked above
                unsafe { output.set_unchecked(row_i as usize, col_i as usize, value) };
                burned += 1;
            }
        }
    }

    debug!(
        features = streams.len(),
        points = burned,
        hierarchical,
        "rasterized drainage network"
    );

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::MultiLineString;
    use streamburn_core::GeoTransform;

    /// 5x5 grid, 10 m cells, origin at (0, 50): cell centers at
    /// x = 5..45, y = 45..5.
    fn template_5x5() -> Raster<f64> {
        let mut dem = Raster::filled(5, 5, 100.0);
        dem.set_transform(GeoTransform::new(0.0, 50.0, 10.0, -10.0));
        dem
    }

    fn middle_column_line() -> Geometry<f64> {
        // Runs down the center of column 2, from row 0 to row 4
        Geometry::LineString(LineString::from(vec![(25.0, 45.0), (25.0, 5.0)]))
    }

    #[test]
    fn test_straight_line_marks_full_column() {
        let template = template_5x5();
        let streams = StreamNetwork::from_geometries(vec![middle_column_line()]);

        let markers = rasterize_drainage(&template, &streams, false).unwrap();

        for row in 0..5 {
            for col in 0..5 {
                let expected = if col == 2 { 1 } else { 0 };
                assert_eq!(
                    markers.get(row, col).unwrap(),
                    expected,
                    "cell ({row},{col})"
                );
            }
        }
    }

    #[test]
    fn test_hierarchical_tags_are_sequence_indices() {
        let template = template_5x5();
        let streams = StreamNetwork::from_geometries(vec![middle_column_line()]);

        let markers = rasterize_drainage(&template, &streams, true).unwrap();

        // Line length 40, resolution 10: 5 samples tagged 0..4 top to bottom
        for row in 0..5 {
            assert_eq!(markers.get(row, 2).unwrap(), row as i32, "row {row}");
        }
    }

    #[test]
    fn test_longer_line_wins_overlapped_cells() {
        let template = template_5x5();
        // Both lines run down column 2 into row 4; the long one is listed
        // first, so burning in input order would let the short one's tags
        // survive. Sorting ascending by length burns the long one last.
        let long = Geometry::LineString(LineString::from(vec![(25.0, 45.0), (25.0, 5.0)]));
        let short = Geometry::LineString(LineString::from(vec![(25.0, 25.0), (25.0, 5.0)]));
        let streams = StreamNetwork::from_geometries(vec![long, short]);

        let markers = rasterize_drainage(&template, &streams, true).unwrap();

        // Long line tags rows 2..4 with 2..4; the short one would have
        // left 0..2 there.
        assert_eq!(markers.get(2, 2).unwrap(), 2);
        assert_eq!(markers.get(3, 2).unwrap(), 3);
        assert_eq!(markers.get(4, 2).unwrap(), 4);
    }

    #[test]
    fn test_multiline_parts_all_sampled() {
        let template = template_5x5();
        let mls = Geometry::MultiLineString(MultiLineString::new(vec![
            LineString::from(vec![(5.0, 45.0), (45.0, 45.0)]),
            LineString::from(vec![(5.0, 5.0), (45.0, 5.0)]),
        ]));
        let streams = StreamNetwork::from_geometries(vec![mls]);

        let markers = rasterize_drainage(&template, &streams, false).unwrap();

        for col in 0..5 {
            assert_eq!(markers.get(0, col).unwrap(), 1, "top row col {col}");
            assert_eq!(markers.get(4, col).unwrap(), 1, "bottom row col {col}");
        }
        assert_eq!(markers.get(2, 2).unwrap(), 0);
    }

    #[test]
    fn test_non_line_geometry_skipped() {
        let template = template_5x5();
        let streams = StreamNetwork::from_geometries(vec![Geometry::Point(Point::new(25.0, 25.0))]);

        let markers = rasterize_drainage(&template, &streams, false).unwrap();
        assert!(markers.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_points_outside_grid_skipped() {
        let template = template_5x5();
        // Line mostly west of the grid, entering at column 0
        let streams = StreamNetwork::from_geometries(vec![Geometry::LineString(LineString::from(
            vec![(-100.0, 25.0), (5.0, 25.0)],
        ))]);

        let markers = rasterize_drainage(&template, &streams, false).unwrap();

        let total: i32 = markers.data().iter().sum();
        assert!(total >= 1, "in-grid portion must be burned");
        assert_eq!(markers.get(2, 0).unwrap(), 1);
    }

    #[test]
    fn test_crs_mismatch_rejected() {
        use streamburn_core::CRS;

        let mut template = template_5x5();
        template.set_crs(Some(CRS::from_epsg(32718)));
        let streams = StreamNetwork::from_geometries(vec![middle_column_line()])
            .with_crs(CRS::from_epsg(4326));

        let result = rasterize_drainage(&template, &streams, false);
        assert!(matches!(result, Err(Error::CrsMismatch(_, _))));
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let mut template = template_5x5();
        template.set_transform(GeoTransform::new(0.0, 50.0, 0.0, 0.0));
        let streams = StreamNetwork::from_geometries(vec![middle_column_line()]);

        let result = rasterize_drainage(&template, &streams, false);
        assert!(matches!(result, Err(Error::InvalidParameter { .. })));
    }
}
