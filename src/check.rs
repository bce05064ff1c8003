use crate::borders::ExtractedBorders;
use crate::error::{GeneralizeError, Result};
use geo::EuclideanLength;
use geo_types::{Geometry, Polygon};
use log::info;

/// Absolute tolerance for the length-conservation check.
pub const LENGTH_TOLERANCE: f64 = 1e-6;

/// Verifies that each feature's boundary was decomposed without loss:
/// perimeter must equal unshared length plus the sum of shared border
/// lengths. A violation means the extraction (or the geometry engine under
/// it) is buggy, so it aborts the run.
pub fn check_lengths(shapes: &[Polygon<f64>], borders: &ExtractedBorders) -> Result<()> {
    info!("checking lengths...");

    for (feature, shape) in shapes.iter().enumerate() {
        let shared_len: f64 = borders.shared[feature].iter().map(geometry_length).sum();
        let unshared_len = borders.unshared[feature].euclidean_length();
        let error = (perimeter(shape) - unshared_len - shared_len).abs();

        if error >= LENGTH_TOLERANCE {
            return Err(GeneralizeError::LengthMismatch {
                feature,
                error,
                tolerance: LENGTH_TOLERANCE,
            });
        }
    }
    Ok(())
}

/// Total boundary length, interior rings included.
pub fn perimeter(poly: &Polygon<f64>) -> f64 {
    let ext = poly.exterior().euclidean_length();
    let int: f64 = poly
        .interiors()
        .iter()
        .map(|r| r.euclidean_length())
        .sum();
    ext + int
}

/// Length of linear geometry; anything without length measures zero.
pub fn geometry_length(geom: &Geometry<f64>) -> f64 {
    match geom {
        Geometry::LineString(ls) => ls.euclidean_length(),
        Geometry::MultiLineString(mls) => mls.euclidean_length(),
        _ => 0.0,
    }
}
