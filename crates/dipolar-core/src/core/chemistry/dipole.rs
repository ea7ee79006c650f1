use std::f64::consts::PI;

/// Speed of light in vacuum, m/s.
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Converts Debye per cubic Angstrom to coulomb per square meter.
pub const DEBYE_PER_CUBIC_ANGSTROM_TO_SI: f64 = 1.0e9 / SPEED_OF_LIGHT;

/// Bond dipole estimate: `|EN(a) - EN(b)| * length`.
pub fn bond_dipole(electronegativity_a: f64, electronegativity_b: f64, length: f64) -> f64 {
    (electronegativity_a - electronegativity_b).abs() * length
}

/// Magnitude of the vector sum of two bond dipoles separated by `angle_degrees`,
/// via the law of cosines.
pub fn resultant_dipole(mu1: f64, mu2: f64, angle_degrees: f64) -> f64 {
    let squared = mu1 * mu1 + mu2 * mu2 - 2.0 * mu1 * mu2 * angle_degrees.to_radians().cos();
    // Rounding can push a colinear cancellation a hair below zero.
    squared.max(0.0).sqrt()
}

/// Geometric mean of `values`, or `None` when there are none.
///
/// Any zero member makes the mean zero.
pub fn geometric_mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (product, count) = values
        .into_iter()
        .fold((1.0_f64, 0_usize), |(p, n), v| (p * v, n + 1));
    if count == 0 {
        None
    } else {
        Some(product.powf(1.0 / count as f64))
    }
}

pub fn sphere_volume(radius: f64) -> f64 {
    4.0 / 3.0 * PI * radius.powi(3)
}

/// Polarization estimate: the aggregate dipole spread over a sphere of `radius`
/// Angstroms, in C/m^2.
///
/// Returns `None` unless `radius` is a finite positive number and `aggregate_dipole`
/// is finite.
pub fn polarization(aggregate_dipole: f64, radius: f64) -> Option<f64> {
    if !radius.is_finite() || radius <= 0.0 || !aggregate_dipole.is_finite() {
        return None;
    }
    Some(DEBYE_PER_CUBIC_ANGSTROM_TO_SI * aggregate_dipole / sphere_volume(radius))
}
