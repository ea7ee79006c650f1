use super::atom::Atom;
use super::bond::BondKey;
use super::ledger::Ledger;
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies a bond angle `first - vertex - third`.
///
/// The vertex is fixed; the two outer atoms are interchangeable, so `(a1, a2, a3)` and
/// `(a3, a2, a1)` compare and hash as the same angle.
#[derive(Debug, Clone, Eq)]
pub struct AngleKey {
    first: Atom,
    vertex: Atom,
    third: Atom,
}

impl AngleKey {
    pub fn new(first: Atom, vertex: Atom, third: Atom) -> Self {
        Self {
            first,
            vertex,
            third,
        }
    }

    pub fn first(&self) -> &Atom {
        &self.first
    }

    pub fn vertex(&self) -> &Atom {
        &self.vertex
    }

    pub fn third(&self) -> &Atom {
        &self.third
    }

    /// The bond between the first atom and the vertex.
    pub fn left_bond(&self) -> BondKey {
        BondKey::new(self.first.clone(), self.vertex.clone())
    }

    /// The bond between the vertex and the third atom.
    pub fn right_bond(&self) -> BondKey {
        BondKey::new(self.vertex.clone(), self.third.clone())
    }

    /// Whether `bond` is one of the two bonds adjacent to the vertex.
    pub fn uses_bond(&self, bond: &BondKey) -> bool {
        self.left_bond() == *bond || self.right_bond() == *bond
    }

    fn canonical(&self) -> (&Atom, &Atom, &Atom) {
        if self.first <= self.third {
            (&self.first, &self.vertex, &self.third)
        } else {
            (&self.third, &self.vertex, &self.first)
        }
    }
}

impl PartialEq for AngleKey {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Hash for AngleKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for AngleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.first, self.vertex, self.third)
    }
}

impl Serialize for AngleKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Planar angle and the resultant dipole of its two adjacent bond dipoles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Angle {
    pub degrees: f64,
    pub dipole: f64,
}

impl Angle {
    pub fn new(degrees: f64, dipole: f64) -> Self {
        Self { degrees, dipole }
    }
}

pub type AngleLedger = Ledger<AngleKey, Angle>;
