use crate::core::models::angle::AngleKey;
use crate::core::models::atom::{Atom, UnknownElementError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectError {
    #[error(transparent)]
    UnknownElement(#[from] UnknownElementError),

    #[error("Bond {first} - {second} does not exist; add it before the angle")]
    MissingAdjacentBond { first: Atom, second: Atom },

    #[error("Angle {0} does not exist")]
    MissingAngle(AngleKey),

    #[error("A bond needs two distinct atoms, got {0} at both ends")]
    SelfBond(Atom),

    #[error("Invalid {field}: {value} (expected {expected})")]
    InvalidNumeric {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("{ledger} index {index} is out of range (length {len})")]
    IndexOutOfRange {
        ledger: &'static str,
        index: usize,
        len: usize,
    },
}
