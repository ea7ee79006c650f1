use nalgebra::Point3;

/// Decimal places kept for lengths and angles derived from coordinates.
pub const DERIVED_PRECISION: i32 = 3;

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Euclidean distance between two points, rounded to three decimals.
pub fn bond_length(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    round_to(nalgebra::distance(a, b), DERIVED_PRECISION)
}

/// Angle `left - center - right` in degrees, rounded to three decimals.
///
/// Returns `None` if either outer point coincides with the center.
pub fn bond_angle(left: &Point3<f64>, center: &Point3<f64>, right: &Point3<f64>) -> Option<f64> {
    let v1 = left - center;
    let v2 = right - center;
    let norms = v1.norm() * v2.norm();
    if norms == 0.0 {
        return None;
    }
    let cosine = (v1.dot(&v2) / norms).clamp(-1.0, 1.0);
    Some(round_to(cosine.acos().to_degrees(), DERIVED_PRECISION))
}
