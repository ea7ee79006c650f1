use super::cascade::{self, CascadePlan, CascadeReport};
use super::error::ProjectError;
use super::recompute::{self, Derived};
use super::resolver::{Conflict, DuplicateResolver, Resolution};
use crate::core::chemistry::dipole;
use crate::core::chemistry::electronegativity::ElectronegativityTable;
use crate::core::models::angle::{Angle, AngleKey, AngleLedger};
use crate::core::models::atom::{Atom, UnknownElementError};
use crate::core::models::bond::{Bond, BondKey, BondLedger};
use crate::core::models::group::GroupCollection;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// How an add call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AddStatus {
    /// A new record was appended.
    Inserted,
    /// An existing record was overwritten in place after the resolver agreed.
    Overwritten,
    /// A record already existed and the resolver chose to keep it.
    Kept,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AddOutcome {
    /// Ledger position of the affected record.
    pub index: usize,
    /// Dipole stored for the record once the call returned.
    pub dipole: f64,
    pub status: AddStatus,
}

/// A molecular fragment under construction.
///
/// Owns the atom registry, the bond ledger, the angle ledger, the group collection and
/// the radius, and maintains these invariants across every mutation:
///
/// - at most one bond per unordered atom pair and one angle per vertex-anchored triple,
/// - every angle's two adjacent bonds exist,
/// - every group member names an existing angle,
/// - the atom registry holds exactly the atoms referenced by some bond,
/// - ledger positions are dense,
/// - [`Derived`] values reflect the current state.
///
/// Failed operations leave the project unchanged.
#[derive(Debug, Clone)]
pub struct Project {
    table: Arc<ElectronegativityTable>,
    atoms: Vec<Atom>,
    bonds: BondLedger,
    angles: AngleLedger,
    group: GroupCollection,
    radius: Option<f64>,
    derived: Derived,
}

impl Project {
    pub fn new(table: Arc<ElectronegativityTable>) -> Self {
        Self {
            table,
            atoms: Vec::new(),
            bonds: BondLedger::new(),
            angles: AngleLedger::new(),
            group: GroupCollection::new(),
            radius: None,
            derived: Derived::default(),
        }
    }

    /// Empties every collection and the radius, keeping the electronegativity table.
    pub fn reset(&mut self) {
        self.atoms.clear();
        self.bonds.clear();
        self.angles.clear();
        self.group.clear();
        self.radius = None;
        self.derived = Derived::default();
    }

    pub fn table(&self) -> &Arc<ElectronegativityTable> {
        &self.table
    }

    /// Atoms in the order bonds first introduced them.
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &BondLedger {
        &self.bonds
    }

    pub fn angles(&self) -> &AngleLedger {
        &self.angles
    }

    pub fn group(&self) -> &GroupCollection {
        &self.group
    }

    /// Angles available for group selection, in ledger order.
    pub fn angle_keys(&self) -> impl Iterator<Item = &AngleKey> {
        self.angles.keys()
    }

    pub fn radius(&self) -> Option<f64> {
        self.radius
    }

    pub fn derived(&self) -> Derived {
        self.derived
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty() && self.group.is_empty()
    }

    pub fn parse_atom(&self, token: &str) -> Result<Atom, ProjectError> {
        Ok(self.table.parse_atom(token)?)
    }

    pub fn set_radius(&mut self, radius: Option<f64>) -> Derived {
        self.radius = radius;
        self.recalculate()
    }

    /// Refreshes the aggregate dipole and polarization estimate.
    pub fn recalculate(&mut self) -> Derived {
        self.derived = recompute::recalculate(&self.angles, &self.group, self.radius);
        self.derived
    }

    /// Dipole that [`Project::add_bond`] would store, without touching the project.
    pub fn preview_bond_dipole(
        &self,
        a1: &Atom,
        a2: &Atom,
        length: f64,
    ) -> Result<f64, ProjectError> {
        let en1 = self.electronegativity(a1)?;
        let en2 = self.electronegativity(a2)?;
        Ok(dipole::bond_dipole(en1, en2, length))
    }

    /// Dipole that [`Project::add_angle`] would store, or `None` if either adjacent bond
    /// is missing or the angle is not a finite number.
    pub fn preview_angle_dipole(
        &self,
        a1: &Atom,
        a2: &Atom,
        a3: &Atom,
        degrees: f64,
    ) -> Option<f64> {
        if !degrees.is_finite() {
            return None;
        }
        let mu1 = self.bond_dipole_between(a1, a2)?;
        let mu2 = self.bond_dipole_between(a2, a3)?;
        Some(dipole::resultant_dipole(mu1, mu2, degrees))
    }

    /// Dipole of the bond between `a` and `b`, in either orientation.
    pub fn bond_dipole_between(&self, a: &Atom, b: &Atom) -> Option<f64> {
        self.bonds
            .find(&BondKey::new(a.clone(), b.clone()))
            .map(|bond| bond.dipole)
    }

    /// Adds a bond, or resolves a duplicate through `resolver`.
    ///
    /// Both atoms join the atom registry. Overwriting a bond also refreshes the dipoles
    /// of the angles built on it.
    ///
    /// # Errors
    ///
    /// - [`ProjectError::SelfBond`] if `a1 == a2`.
    /// - [`ProjectError::InvalidNumeric`] unless `length` is finite and positive.
    /// - [`ProjectError::UnknownElement`] if an element is missing from the table.
    pub fn add_bond<R>(
        &mut self,
        a1: Atom,
        a2: Atom,
        length: f64,
        resolver: &R,
    ) -> Result<AddOutcome, ProjectError>
    where
        R: DuplicateResolver + ?Sized,
    {
        if a1 == a2 {
            return Err(ProjectError::SelfBond(a1));
        }
        if !length.is_finite() || length <= 0.0 {
            return Err(ProjectError::InvalidNumeric {
                field: "bond length",
                value: length,
                expected: "a finite positive number",
            });
        }
        let proposed = Bond::new(length, self.preview_bond_dipole(&a1, &a2, length)?);

        self.register_atom(&a1);
        self.register_atom(&a2);
        let key = BondKey::new(a1, a2);

        let outcome = match self.bonds.insert(key.clone(), proposed) {
            Ok(index) => {
                debug!("Added bond {} (d = {}, mu = {:.3})", key, length, proposed.dipole);
                AddOutcome {
                    index,
                    dipole: proposed.dipole,
                    status: AddStatus::Inserted,
                }
            }
            Err(index) => self.resolve_bond(index, proposed, resolver)?,
        };

        self.recalculate();
        Ok(outcome)
    }

    fn resolve_bond<R>(
        &mut self,
        index: usize,
        proposed: Bond,
        resolver: &R,
    ) -> Result<AddOutcome, ProjectError>
    where
        R: DuplicateResolver + ?Sized,
    {
        let (stored_key, existing) = self.bonds.get(index).ok_or(ProjectError::IndexOutOfRange {
            ledger: "bond",
            index,
            len: self.bonds.len(),
        })?;
        let stored_key = stored_key.clone();
        let existing = *existing;

        let resolution = resolver.resolve(&Conflict::Bond {
            key: &stored_key,
            existing: &existing,
            proposed: &proposed,
        });
        match resolution {
            Resolution::Overwrite => {
                self.bonds.replace(index, proposed);
                self.refresh_angles_using(&stored_key);
                debug!("Overwrote bond {} (d = {})", stored_key, proposed.length);
                Ok(AddOutcome {
                    index,
                    dipole: proposed.dipole,
                    status: AddStatus::Overwritten,
                })
            }
            Resolution::Keep => Ok(AddOutcome {
                index,
                dipole: existing.dipole,
                status: AddStatus::Kept,
            }),
        }
    }

    /// Adds the angle `a1 - a2 - a3` (vertex `a2`), or resolves a duplicate.
    ///
    /// # Errors
    ///
    /// - [`ProjectError::InvalidNumeric`] unless `degrees` is finite.
    /// - [`ProjectError::MissingAdjacentBond`] naming the first missing pair, checking
    ///   `a1 - a2` before `a2 - a3`.
    pub fn add_angle<R>(
        &mut self,
        a1: Atom,
        a2: Atom,
        a3: Atom,
        degrees: f64,
        resolver: &R,
    ) -> Result<AddOutcome, ProjectError>
    where
        R: DuplicateResolver + ?Sized,
    {
        if !degrees.is_finite() {
            return Err(ProjectError::InvalidNumeric {
                field: "angle",
                value: degrees,
                expected: "a finite number of degrees",
            });
        }
        let mu1 = self.adjacent_dipole(&a1, &a2)?;
        let mu2 = self.adjacent_dipole(&a2, &a3)?;
        let proposed = Angle::new(degrees, dipole::resultant_dipole(mu1, mu2, degrees));
        let key = AngleKey::new(a1, a2, a3);

        let outcome = match self.angles.insert(key.clone(), proposed) {
            Ok(index) => {
                debug!("Added angle {} ({} deg, mu = {:.3})", key, degrees, proposed.dipole);
                AddOutcome {
                    index,
                    dipole: proposed.dipole,
                    status: AddStatus::Inserted,
                }
            }
            Err(index) => self.resolve_angle(index, proposed, resolver)?,
        };

        self.recalculate();
        Ok(outcome)
    }

    fn resolve_angle<R>(
        &mut self,
        index: usize,
        proposed: Angle,
        resolver: &R,
    ) -> Result<AddOutcome, ProjectError>
    where
        R: DuplicateResolver + ?Sized,
    {
        let (stored_key, existing) =
            self.angles.get(index).ok_or(ProjectError::IndexOutOfRange {
                ledger: "angle",
                index,
                len: self.angles.len(),
            })?;
        let resolution = resolver.resolve(&Conflict::Angle {
            key: stored_key,
            existing,
            proposed: &proposed,
        });
        let existing = *existing;

        match resolution {
            Resolution::Overwrite => {
                self.angles.replace(index, proposed);
                debug!("Overwrote angle at {} ({} deg)", index, proposed.degrees);
                Ok(AddOutcome {
                    index,
                    dipole: proposed.dipole,
                    status: AddStatus::Overwritten,
                })
            }
            Resolution::Keep => Ok(AddOutcome {
                index,
                dipole: existing.dipole,
                status: AddStatus::Kept,
            }),
        }
    }

    /// Appends `a1 - a2 - a3` to the group collection and returns its position.
    ///
    /// # Errors
    ///
    /// [`ProjectError::MissingAngle`] if no such angle (in either orientation) exists.
    pub fn add_group(&mut self, a1: Atom, a2: Atom, a3: Atom) -> Result<usize, ProjectError> {
        let key = AngleKey::new(a1, a2, a3);
        if !self.angles.contains(&key) {
            return Err(ProjectError::MissingAngle(key));
        }
        debug!("Added {} to the molecule group", key);
        let index = self.group.push(key);
        self.recalculate();
        Ok(index)
    }

    pub fn delete_bond_at(&mut self, index: usize) -> Result<CascadeReport, ProjectError> {
        self.delete_bonds_at(&[index])
    }

    /// Deletes the bonds at `indices`, every angle built on them and every group member
    /// referencing those angles, then prunes atoms no bond references any more.
    ///
    /// The outcome depends only on the set of positions, not their order or repetition.
    ///
    /// # Errors
    ///
    /// [`ProjectError::IndexOutOfRange`] if any position is invalid; nothing is removed.
    pub fn delete_bonds_at(&mut self, indices: &[usize]) -> Result<CascadeReport, ProjectError> {
        let positions = checked_positions(indices, self.bonds.len(), "bond")?;
        let plan = cascade::plan_bond_removal(&positions, &self.bonds, &self.angles, &self.group);
        Ok(self.apply(plan))
    }

    pub fn delete_angle_at(&mut self, index: usize) -> Result<CascadeReport, ProjectError> {
        self.delete_angles_at(&[index])
    }

    /// Deletes the angles at `indices` and every group member referencing them.
    ///
    /// # Errors
    ///
    /// [`ProjectError::IndexOutOfRange`] if any position is invalid; nothing is removed.
    pub fn delete_angles_at(&mut self, indices: &[usize]) -> Result<CascadeReport, ProjectError> {
        let positions = checked_positions(indices, self.angles.len(), "angle")?;
        let plan = cascade::plan_angle_removal(&positions, &self.angles, &self.group);
        Ok(self.apply(plan))
    }

    pub fn delete_group_at(&mut self, index: usize) -> Result<CascadeReport, ProjectError> {
        self.delete_groups_at(&[index])
    }

    pub fn delete_groups_at(&mut self, indices: &[usize]) -> Result<CascadeReport, ProjectError> {
        let groups = checked_positions(indices, self.group.len(), "group")?;
        Ok(self.apply(CascadePlan {
            groups,
            ..CascadePlan::default()
        }))
    }

    /// Removes dependents before the records they depend on, renumbering each
    /// collection once.
    fn apply(&mut self, plan: CascadePlan) -> CascadeReport {
        let groups = self.group.remove_indices(&plan.groups);
        let angles: Vec<AngleKey> = self
            .angles
            .remove_indices(&plan.angles)
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        let bonds: Vec<BondKey> = self
            .bonds
            .remove_indices(&plan.bonds)
            .into_iter()
            .map(|(key, _)| key)
            .collect();

        let endpoints = bonds.iter().flat_map(|key| [key.first(), key.second()]);
        let atoms = cascade::orphaned_atoms(endpoints, &self.bonds);
        self.atoms.retain(|atom| !atoms.contains(atom));

        debug!(
            "Removed {} bond(s), {} angle(s), {} group member(s), {} atom(s)",
            bonds.len(),
            angles.len(),
            groups.len(),
            atoms.len()
        );
        self.recalculate();

        CascadeReport {
            bonds,
            angles,
            groups,
            atoms,
        }
    }

    fn electronegativity(&self, atom: &Atom) -> Result<f64, ProjectError> {
        self.table.electronegativity(atom.element()).ok_or_else(|| {
            ProjectError::UnknownElement(UnknownElementError {
                symbol: atom.element().symbol().to_string(),
            })
        })
    }

    fn adjacent_dipole(&self, a: &Atom, b: &Atom) -> Result<f64, ProjectError> {
        self.bond_dipole_between(a, b)
            .ok_or_else(|| ProjectError::MissingAdjacentBond {
                first: a.clone(),
                second: b.clone(),
            })
    }

    fn register_atom(&mut self, atom: &Atom) {
        if !self.atoms.contains(atom) {
            self.atoms.push(atom.clone());
        }
    }

    fn refresh_angles_using(&mut self, bond: &BondKey) {
        let updates: Vec<(usize, Angle)> = self
            .angles
            .iter()
            .enumerate()
            .filter(|(_, (key, _))| key.uses_bond(bond))
            .filter_map(|(i, (key, angle))| {
                let mu1 = self.bond_dipole_between(key.first(), key.vertex())?;
                let mu2 = self.bond_dipole_between(key.vertex(), key.third())?;
                Some((
                    i,
                    Angle::new(
                        angle.degrees,
                        dipole::resultant_dipole(mu1, mu2, angle.degrees),
                    ),
                ))
            })
            .collect();
        for (i, angle) in updates {
            self.angles.replace(i, angle);
        }
    }
}

fn checked_positions(
    indices: &[usize],
    len: usize,
    ledger: &'static str,
) -> Result<BTreeSet<usize>, ProjectError> {
    indices
        .iter()
        .map(|&index| {
            if index < len {
                Ok(index)
            } else {
                Err(ProjectError::IndexOutOfRange { ledger, index, len })
            }
        })
        .collect()
}
