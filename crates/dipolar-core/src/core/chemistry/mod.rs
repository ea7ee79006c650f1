//! Chemistry knowledge used by the dipole model.
//!
//! [`electronegativity`] holds the configured element table; [`dipole`] holds the pure
//! formulas that turn electronegativities, lengths and angles into dipole estimates.

pub mod dipole;
pub mod electronegativity;
