//! # File Codecs
//!
//! Two formats are supported:
//!
//! - the line-oriented project format ([`text::TextFile`]), read and written; it stores
//!   bonds, angles, the molecule group and the radius, and replays them through the
//!   normal [`Project`] mutators on import,
//! - CML geometry ([`cml::CmlFile`]), read only; bonds and angles are derived from the
//!   atom coordinates and every angle with a non-zero dipole joins the group.

pub mod cml;
pub mod error;
pub mod text;
pub mod traits;

use self::cml::CmlFile;
use self::error::CodecError;
use self::text::TextFile;
use self::traits::{ProjectReader, ProjectWriter};
use crate::core::chemistry::electronegativity::ElectronegativityTable;
use crate::engine::project::Project;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Text,
    Cml,
}

impl FileFormat {
    /// `.cml` (any case) selects CML; every other path is treated as the text format.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("cml") => Self::Cml,
            _ => Self::Text,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Cml => "CML",
        }
    }
}

/// Reads `path` with the codec selected by its extension.
pub fn read_project(
    path: &Path,
    table: Arc<ElectronegativityTable>,
) -> Result<Project, CodecError> {
    match FileFormat::from_path(path) {
        FileFormat::Text => TextFile::read_from_path(path, table),
        FileFormat::Cml => CmlFile::read_from_path(path, table),
    }
}

/// Writes `project` to `path` in the text format.
///
/// # Errors
///
/// [`CodecError::UnsupportedFormat`] if `path` names a CML file, which is import-only.
pub fn write_project(project: &Project, path: &Path) -> Result<(), CodecError> {
    match FileFormat::from_path(path) {
        FileFormat::Text => TextFile::write_to_path(project, path),
        FileFormat::Cml => Err(CodecError::UnsupportedFormat {
            format: FileFormat::Cml.name(),
            operation: "written",
        }),
    }
}
