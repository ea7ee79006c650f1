use dipolar::core::chemistry::electronegativity::TableLoadError;
use dipolar::workflows::session::SessionError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Electronegativity table error: {0}")]
    Table(#[from] TableLoadError),

    #[error("Refusing to overwrite '{path}'; pass --force to replace it", path = path.display())]
    AlreadyExists { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
