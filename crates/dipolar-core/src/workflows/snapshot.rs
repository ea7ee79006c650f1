use crate::core::models::angle::AngleKey;
use crate::core::models::atom::Atom;
use crate::core::models::bond::BondKey;
use crate::engine::project::Project;
use crate::engine::recompute::Derived;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BondRow {
    pub index: usize,
    pub bond: BondKey,
    pub length: f64,
    pub dipole: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AngleRow {
    pub index: usize,
    pub angle: AngleKey,
    pub degrees: f64,
    pub dipole: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub index: usize,
    pub angle: AngleKey,
    /// `None` only if the member lost its angle, which the cascade rules prevent.
    pub dipole: Option<f64>,
}

/// Everything a front end needs to render a project's tables and summary values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<BondRow>,
    pub angles: Vec<AngleRow>,
    pub group: Vec<GroupRow>,
    pub radius: Option<f64>,
    #[serde(flatten)]
    pub derived: Derived,
}

impl From<&Project> for Snapshot {
    fn from(project: &Project) -> Self {
        let bonds = project
            .bonds()
            .iter()
            .enumerate()
            .map(|(index, (key, bond))| BondRow {
                index,
                bond: key.clone(),
                length: bond.length,
                dipole: bond.dipole,
            })
            .collect();

        let angles = project
            .angles()
            .iter()
            .enumerate()
            .map(|(index, (key, angle))| AngleRow {
                index,
                angle: key.clone(),
                degrees: angle.degrees,
                dipole: angle.dipole,
            })
            .collect();

        let group = project
            .group()
            .iter()
            .enumerate()
            .map(|(index, key)| GroupRow {
                index,
                angle: key.clone(),
                dipole: project.angles().find(key).map(|angle| angle.dipole),
            })
            .collect();

        Self {
            atoms: project.atoms().to_vec(),
            bonds,
            angles,
            group,
            radius: project.radius(),
            derived: project.derived(),
        }
    }
}
