use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

pub const DEFAULT_TABLE_PATH: &str = "config/electroneg.toml";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Dipolar CLI - estimate the net dipole moment and polarization of a molecular fragment from its bonds and bond angles.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Electronegativity table to use; created with built-in defaults if missing.
    #[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_TABLE_PATH)]
    pub table: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open a project (text or CML) and print its bonds, angles, group and derived values.
    Report(ReportArgs),
    /// Open a project (text or CML) and save it in the text project format.
    Convert(ConvertArgs),
    /// Inspect or initialize the electronegativity table.
    Table(TableArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Arguments for the `report` subcommand.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Project file to open. Files ending in `.cml` are read as CML geometry.
    #[arg(required = true, value_name = "INPUT")]
    pub input: PathBuf,

    /// Override the molecular radius in Angstroms used for the polarization estimate.
    #[arg(short, long, value_name = "FLOAT", value_parser = parse_radius)]
    pub radius: Option<f64>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Project file to open. Files ending in `.cml` are read as CML geometry.
    #[arg(required = true, value_name = "INPUT")]
    pub input: PathBuf,

    /// Destination for the text project file.
    #[arg(required = true, value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Set the molecular radius in Angstroms stored in the output.
    #[arg(short, long, value_name = "FLOAT", value_parser = parse_radius)]
    pub radius: Option<f64>,
}

/// Arguments for the `table` subcommand.
#[derive(Args, Debug)]
pub struct TableArgs {
    #[command(subcommand)]
    pub command: TableCommands,
}

#[derive(Subcommand, Debug)]
pub enum TableCommands {
    /// Print the electronegativity table in use.
    Show,
    /// Print the path of the electronegativity table.
    Path,
    /// Write the built-in electronegativity table.
    Init {
        /// Overwrite an existing table.
        #[arg(long)]
        force: bool,
    },
}

fn parse_radius(value: &str) -> Result<f64, String> {
    let radius: f64 = value
        .trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if radius.is_finite() && radius >= 0.0 {
        Ok(radius)
    } else {
        Err(format!("radius must be a finite non-negative number, got {}", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_apply_to_subcommands() {
        let cli = Cli::try_parse_from([
            "dipolar", "report", "water.txt", "-vv", "--table", "t.toml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.table, PathBuf::from("t.toml"));
        match cli.command {
            Commands::Report(args) => {
                assert_eq!(args.input, PathBuf::from("water.txt"));
                assert_eq!(args.format, OutputFormat::Text);
                assert_eq!(args.radius, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn table_path_defaults_to_config_dir() {
        let cli = Cli::try_parse_from(["dipolar", "table", "path"]).unwrap();
        assert_eq!(cli.table, PathBuf::from(DEFAULT_TABLE_PATH));
    }

    #[test]
    fn radius_accepts_either_decimal_separator() {
        assert_eq!(parse_radius("1.5"), Ok(1.5));
        assert_eq!(parse_radius("1,5"), Ok(1.5));
        assert!(parse_radius("-1").is_err());
        assert!(parse_radius("wide").is_err());
        assert!(parse_radius("inf").is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["dipolar", "-q", "-v", "table", "show"]).is_err());
    }
}
