pub mod convert;
pub mod report;
pub mod table;

use crate::error::Result;
use dipolar::core::chemistry::electronegativity::ElectronegativityTable;
use dipolar::workflows::session::Session;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Loads (or creates) the table at `table_path` and opens `input` against it.
fn open_session(table_path: &Path, input: &Path, radius: Option<f64>) -> Result<Session> {
    let table = Arc::new(ElectronegativityTable::load_or_create(table_path)?);
    info!(
        "Using {} electronegativity entries from {:?}.",
        table.len(),
        table_path
    );

    let mut session = Session::new(table);
    session.open_project(input)?;
    if radius.is_some() {
        session.set_radius(radius);
    }
    Ok(session)
}
