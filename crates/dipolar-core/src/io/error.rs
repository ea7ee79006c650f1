use crate::core::models::atom::UnknownElementError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Corrupted file ({location}): {reason}")]
    CorruptedFile { location: String, reason: String },

    #[error("Unknown element type: {0}")]
    UnknownElement(#[from] UnknownElementError),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("{format} files cannot be {operation}")]
    UnsupportedFormat {
        format: &'static str,
        operation: &'static str,
    },
}

impl CodecError {
    pub(crate) fn corrupted_at_line(line: usize, reason: impl Into<String>) -> Self {
        Self::CorruptedFile {
            location: format!("line {}", line),
            reason: reason.into(),
        }
    }

    pub(crate) fn corrupted(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CorruptedFile {
            location: location.into(),
            reason: reason.into(),
        }
    }
}
