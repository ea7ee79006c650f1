use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// An element symbol drawn from the configured electronegativity table.
///
/// Instances are only handed out by
/// [`ElectronegativityTable`](crate::core::chemistry::electronegativity::ElectronegativityTable),
/// so every `AtomType` in use is guaranteed to have an electronegativity. Equality and
/// hashing are by symbol string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AtomType(String);

impl AtomType {
    pub(crate) fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn symbol(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A chemical atom within a fragment: an element plus a free-form label.
///
/// The label disambiguates several atoms of the same element (`H1` vs `H2`); it may be
/// empty (`O`). Atoms have no lifecycle of their own: they exist while some bond
/// references them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom {
    element: AtomType,
    label: String,
}

impl Atom {
    pub fn new(element: AtomType, label: &str) -> Self {
        Self {
            element,
            label: label.to_string(),
        }
    }

    pub fn element(&self) -> &AtomType {
        &self.element
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for Atom {
    /// Serializes as `<symbol><label>`, e.g. `H1` or `O`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.element, self.label)
    }
}

impl Serialize for Atom {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("'{symbol}' is not a configured element symbol")]
pub struct UnknownElementError {
    pub symbol: String,
}
