//! # Workflows Module
//!
//! The entry points a front end drives. A [`session::Session`] owns one project plus its
//! file and unsaved-changes state, and every operation returns a [`snapshot::Snapshot`]
//! carrying the ledgers and derived values to render.

pub mod session;
pub mod snapshot;
