//! # Engine Module
//!
//! The stateful layer. A [`project::Project`] owns the atom registry, the bond and angle
//! ledgers, the group collection and the radius, and keeps them consistent:
//!
//! - duplicate bonds/angles are routed through a [`resolver::DuplicateResolver`] instead of
//!   being silently merged or rejected,
//! - deletions are planned as a whole by [`cascade`] before anything is removed, so no
//!   downstream record is ever left referencing a deleted one,
//! - derived values are refreshed by [`recompute`] after every mutation.
//!
//! All operations are synchronous and assume a single caller driving them serially.

pub mod cascade;
pub mod error;
pub mod project;
pub mod recompute;
pub mod resolver;
