use crate::cli::{OutputFormat, ReportArgs};
use crate::error::{CliError, Result};
use crate::render;
use dipolar::workflows::snapshot::Snapshot;
use std::path::Path;

pub fn run(args: ReportArgs, table_path: &Path) -> Result<()> {
    let session = super::open_session(table_path, &args.input, args.radius)?;
    print!("{}", format_snapshot(&session.snapshot(), args.format)?);
    Ok(())
}

fn format_snapshot(snapshot: &Snapshot, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => render::report(snapshot)
            .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to render report: {}", e))),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(snapshot)?)),
    }
}
