//! # Dipolar Core Library
//!
//! Estimates the net dipole moment of a molecular fragment from user-entered bond and
//! bond-angle data, using a simplified vector model of electronegativity differences.
//!
//! ## Architectural Philosophy
//!
//! The library is split into four layers with a strict dependency direction:
//!
//! - **[`core`]: The Foundation.** Stateless building blocks: atom identity, the ordered
//!   ledger container, bond/angle/group records, the electronegativity table, pure dipole
//!   formulas and Cartesian geometry helpers.
//!
//! - **[`engine`]: The Logic Core.** The stateful [`engine::project::Project`], which keeps
//!   the bond, angle and group collections mutually consistent under insertion,
//!   duplicate-merge and cascading removal, and recomputes the derived aggregate values.
//!
//! - **[`io`]: File Codecs.** Reads and writes the flat line-oriented project format and
//!   imports CML geometry, deriving bonds and angles from 3D coordinates.
//!
//! - **[`workflows`]: The Public API.** The [`workflows::session::Session`] a front end
//!   drives: new/open/save plus every mutator, each returning a renderable snapshot.

pub mod core;
pub mod engine;
pub mod io;
pub mod workflows;
