//! # Core Module
//!
//! Stateless data types and algorithms shared by the rest of the library.
//!
//! - **Molecular Records** ([`models`]) - Atoms, bonds, angles, the group list and the
//!   ordered ledger that stores them
//! - **Chemistry** ([`chemistry`]) - Electronegativity table loading and dipole formulas
//! - **Utilities** ([`utils`]) - Cartesian geometry used by the CML importer

pub mod chemistry;
pub mod models;
pub mod utils;
