//! # Core Models Module
//!
//! Records that describe a molecular fragment the way a user builds it up: bond by bond,
//! angle by angle, and group by group.
//!
//! ## Key Components
//!
//! - [`atom`] - Element symbol plus free-form label identity
//! - [`ledger`] - Insertion-ordered collection with a key-to-position index
//! - [`bond`] - Orientation-independent bond keys and bond records
//! - [`angle`] - Vertex-anchored angle keys and angle records
//! - [`group`] - The ordered list of angles that represents the molecule
//!
//! ## Usage
//!
//! ```ignore
//! use dipolar::core::chemistry::electronegativity::ElectronegativityTable;
//! use dipolar::core::models::bond::BondKey;
//!
//! let table = ElectronegativityTable::builtin();
//! let o = table.parse_atom("O")?;
//! let h1 = table.parse_atom("H1")?;
//! assert_eq!(BondKey::new(o.clone(), h1.clone()), BondKey::new(h1, o));
//! ```

pub mod angle;
pub mod atom;
pub mod bond;
pub mod group;
pub mod ledger;
