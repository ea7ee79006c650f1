//! Planning of cascading deletions.
//!
//! Removing a bond invalidates every angle built on it; removing an angle invalidates
//! every group member referencing it. A [`CascadePlan`] collects the complete set of
//! positions to drop across all three collections before anything is touched, so the
//! result depends only on the set of requested positions, never on their order, and
//! each collection is renumbered exactly once.

use crate::core::models::angle::{AngleKey, AngleLedger};
use crate::core::models::atom::Atom;
use crate::core::models::bond::{BondKey, BondLedger};
use crate::core::models::group::GroupCollection;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadePlan {
    pub bonds: BTreeSet<usize>,
    pub angles: BTreeSet<usize>,
    pub groups: BTreeSet<usize>,
}

impl CascadePlan {
    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty() && self.angles.is_empty() && self.groups.is_empty()
    }
}

/// What a delete actually removed, in former ledger order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CascadeReport {
    pub bonds: Vec<BondKey>,
    pub angles: Vec<AngleKey>,
    pub groups: Vec<AngleKey>,
    /// Atoms no longer referenced by any remaining bond.
    pub atoms: Vec<Atom>,
}

/// Plans removal of the bonds at `bond_indices` plus every dependent angle and group.
pub fn plan_bond_removal(
    bond_indices: &BTreeSet<usize>,
    bonds: &BondLedger,
    angles: &AngleLedger,
    group: &GroupCollection,
) -> CascadePlan {
    let doomed_bonds: Vec<&BondKey> = bond_indices
        .iter()
        .filter_map(|&i| bonds.get(i).map(|(key, _)| key))
        .collect();

    let angle_indices: BTreeSet<usize> = angles
        .keys()
        .enumerate()
        .filter(|(_, angle)| doomed_bonds.iter().any(|bond| angle.uses_bond(bond)))
        .map(|(i, _)| i)
        .collect();

    let mut plan = plan_angle_removal(&angle_indices, angles, group);
    plan.bonds = doomed_bonds
        .iter()
        .filter_map(|key| bonds.position(key))
        .collect();
    plan
}

/// Plans removal of the angles at `angle_indices` plus every group member using them.
pub fn plan_angle_removal(
    angle_indices: &BTreeSet<usize>,
    angles: &AngleLedger,
    group: &GroupCollection,
) -> CascadePlan {
    let doomed_angles: Vec<&AngleKey> = angle_indices
        .iter()
        .filter_map(|&i| angles.get(i).map(|(key, _)| key))
        .collect();

    let groups = doomed_angles
        .iter()
        .flat_map(|&key| group.positions_of(key))
        .collect();

    CascadePlan {
        bonds: BTreeSet::new(),
        angles: doomed_angles
            .iter()
            .filter_map(|key| angles.position(key))
            .collect(),
        groups,
    }
}

/// Atoms from `candidates` that no bond in `bonds` references any more.
pub fn orphaned_atoms<'a>(
    candidates: impl IntoIterator<Item = &'a Atom>,
    bonds: &BondLedger,
) -> Vec<Atom> {
    let mut orphans: Vec<Atom> = Vec::new();
    for atom in candidates {
        if !bonds.keys().any(|key| key.contains(atom)) && !orphans.contains(atom) {
            orphans.push(atom.clone());
        }
    }
    orphans
}
