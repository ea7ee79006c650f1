use super::error::CodecError;
use crate::core::chemistry::electronegativity::ElectronegativityTable;
use crate::engine::project::Project;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

/// A file format a [`Project`] can be built from.
///
/// Readers always construct a fresh project against `table`. On error the partially built
/// project is dropped, so a caller's existing project is never half-overwritten.
pub trait ProjectReader {
    /// Reads a project from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::CorruptedFile`] for structural problems,
    /// [`CodecError::UnknownElement`] for element symbols missing from `table`, and
    /// [`CodecError::Io`] if reading fails.
    fn read_from(
        reader: &mut impl BufRead,
        table: Arc<ElectronegativityTable>,
    ) -> Result<Project, CodecError>;

    /// Reads a project from a file path.
    fn read_from_path<P: AsRef<Path>>(
        path: P,
        table: Arc<ElectronegativityTable>,
    ) -> Result<Project, CodecError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader, table)
    }
}

/// A file format a [`Project`] can be written to.
pub trait ProjectWriter {
    fn write_to(project: &Project, writer: &mut impl Write) -> Result<(), CodecError>;

    /// Writes a project to a file path, replacing any existing file.
    ///
    /// A failure mid-write can leave a truncated file behind.
    fn write_to_path<P: AsRef<Path>>(project: &Project, path: P) -> Result<(), CodecError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(project, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
