use crate::core::chemistry::dipole;
use crate::core::models::angle::AngleLedger;
use crate::core::models::group::GroupCollection;
use serde::Serialize;
use tracing::warn;

/// Aggregate values derived from the group collection and radius.
///
/// `None` means "no value": the caller should render a placeholder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Derived {
    /// Geometric mean of the grouped angle dipoles, in Debye.
    pub aggregate_dipole: Option<f64>,
    /// Aggregate dipole over a sphere of the configured radius, in C/m^2.
    pub polarization: Option<f64>,
}

/// Recomputes [`Derived`] from scratch.
///
/// The aggregate is undefined when the group is empty. A group member without a matching
/// angle would indicate a broken cascade; it makes the aggregate undefined rather than
/// silently shrinking the mean.
pub fn recalculate(angles: &AngleLedger, group: &GroupCollection, radius: Option<f64>) -> Derived {
    let mut dipoles = Vec::with_capacity(group.len());
    for member in group.iter() {
        match angles.find(member) {
            Some(angle) => dipoles.push(angle.dipole),
            None => {
                warn!("Group member {} has no matching angle; aggregate undefined.", member);
                return Derived::default();
            }
        }
    }

    let aggregate_dipole = dipole::geometric_mean(dipoles);
    let polarization = aggregate_dipole
        .zip(radius)
        .and_then(|(mu, r)| dipole::polarization(mu, r));

    Derived {
        aggregate_dipole,
        polarization,
    }
}
