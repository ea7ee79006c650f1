use crate::cli::{TableArgs, TableCommands};
use crate::error::{CliError, Result};
use dipolar::core::chemistry::electronegativity::ElectronegativityTable;
use std::path::Path;
use tracing::info;

pub fn run(args: TableArgs, table_path: &Path) -> Result<()> {
    match args.command {
        TableCommands::Show => {
            print!("{}", handle_show(table_path)?);
        }
        TableCommands::Path => {
            println!("{}", display_path(table_path));
        }
        TableCommands::Init { force } => {
            handle_init(table_path, force)?;
            println!("Wrote default electronegativity table to {}", display_path(table_path));
        }
    }
    Ok(())
}

fn handle_show(table_path: &Path) -> Result<String> {
    let table = ElectronegativityTable::load_or_create(table_path)?;
    let mut out = format!("# {}\n", display_path(table_path));
    out.push_str(&table.to_toml_string());
    Ok(out)
}

fn handle_init(table_path: &Path, force: bool) -> Result<()> {
    if table_path.exists() && !force {
        return Err(CliError::AlreadyExists {
            path: table_path.to_path_buf(),
        });
    }
    ElectronegativityTable::write_default(table_path)?;
    info!("Initialized electronegativity table at {:?}.", table_path);
    Ok(())
}

fn display_path(path: &Path) -> String {
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn show_creates_and_prints_default_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config").join("electroneg.toml");

        let shown = handle_show(&path).unwrap();
        assert!(path.exists());
        assert!(shown.contains("H = 2.2"));
        assert!(shown.contains("O = 3.44"));
        assert!(shown.contains("S = 2.58"));
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("electroneg.toml");
        fs::write(&path, "F = 3.98\n").unwrap();

        assert!(matches!(handle_init(&path, false), Err(CliError::AlreadyExists { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "F = 3.98\n");

        handle_init(&path, true).unwrap();
        let table = ElectronegativityTable::load(&path).unwrap();
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn show_reports_invalid_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("electroneg.toml");
        fs::write(&path, "H = \"high\"\n").unwrap();
        assert!(matches!(handle_show(&path), Err(CliError::Table(_))));
    }
}
