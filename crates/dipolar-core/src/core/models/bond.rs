use super::atom::Atom;
use super::ledger::Ledger;
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies a bond by its two endpoint atoms, independent of orientation.
///
/// `BondKey::new(a, b) == BondKey::new(b, a)`, and both hash identically, so a ledger
/// keyed by `BondKey` never holds two bonds for the same unordered pair. The key still
/// remembers the orientation it was built with for display and export.
#[derive(Debug, Clone, Eq)]
pub struct BondKey {
    first: Atom,
    second: Atom,
}

impl BondKey {
    pub fn new(first: Atom, second: Atom) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> &Atom {
        &self.first
    }

    pub fn second(&self) -> &Atom {
        &self.second
    }

    pub fn contains(&self, atom: &Atom) -> bool {
        self.first == *atom || self.second == *atom
    }

    fn canonical(&self) -> (&Atom, &Atom) {
        if self.first <= self.second {
            (&self.first, &self.second)
        } else {
            (&self.second, &self.first)
        }
    }
}

impl PartialEq for BondKey {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Hash for BondKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for BondKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.first, self.second)
    }
}

impl Serialize for BondKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Measured and derived properties of a single bond.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bond {
    /// Bond length in Angstroms.
    pub length: f64,
    /// Bond dipole in Debye: electronegativity difference times length.
    pub dipole: f64,
}

impl Bond {
    pub fn new(length: f64, dipole: f64) -> Self {
        Self { length, dipole }
    }
}

pub type BondLedger = Ledger<BondKey, Bond>;
