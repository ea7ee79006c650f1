//! The line-oriented project format.
//!
//! ```text
//! Bonds
//! O - H1<TAB>0.96
//!
//! Angles
//! H1 - O - H2<TAB>104.5
//!
//! Molecule
//! H1 - O - H2
//!
//! Radius
//! 1.5
//! ```
//!
//! Numbers are written with `.` as the decimal separator. The reader also accepts `,`,
//! which older files written under a comma locale use.

use super::error::CodecError;
use super::traits::{ProjectReader, ProjectWriter};
use crate::core::chemistry::electronegativity::ElectronegativityTable;
use crate::core::models::atom::Atom;
use crate::engine::error::ProjectError;
use crate::engine::project::Project;
use crate::engine::resolver::{Conflict, Resolution};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::{info, warn};

const BONDS_HEADER: &str = "Bonds";
const ANGLES_HEADER: &str = "Angles";
const MOLECULE_HEADER: &str = "Molecule";
const RADIUS_HEADER: &str = "Radius";
const ATOM_SEPARATOR: &str = " - ";
const FIELD_SEPARATOR: char = '\t';

pub struct TextFile;

impl ProjectReader for TextFile {
    fn read_from(
        reader: &mut impl BufRead,
        table: Arc<ElectronegativityTable>,
    ) -> Result<Project, CodecError> {
        let mut lines = NumberedLines::new(reader);
        let mut project = Project::new(table);

        lines.expect_header(BONDS_HEADER)?;
        for (number, line) in lines.section_body()? {
            let (atoms, value) = split_record(&line, number)?;
            let [a1, a2] = parse_atoms::<2>(&project, atoms, number)?;
            let length = parse_decimal(value, number)?;
            project
                .add_bond(a1, a2, length, &later_wins)
                .map_err(|e| into_codec_error(e, number))?;
        }

        lines.expect_header(ANGLES_HEADER)?;
        for (number, line) in lines.section_body()? {
            let (atoms, value) = split_record(&line, number)?;
            let [a1, a2, a3] = parse_atoms::<3>(&project, atoms, number)?;
            let degrees = parse_decimal(value, number)?;
            project
                .add_angle(a1, a2, a3, degrees, &later_wins)
                .map_err(|e| into_codec_error(e, number))?;
        }

        lines.expect_header(MOLECULE_HEADER)?;
        for (number, line) in lines.section_body()? {
            let [a1, a2, a3] = parse_atoms::<3>(&project, &line, number)?;
            project
                .add_group(a1, a2, a3)
                .map_err(|e| into_codec_error(e, number))?;
        }

        lines.expect_header(RADIUS_HEADER)?;
        let mut radius_section = lines.section_body()?.into_iter();
        let radius = match radius_section.next() {
            Some((number, line)) => Some(parse_decimal(&line, number)?),
            None => None,
        };
        if let Some((number, _)) = radius_section.next() {
            warn!("Ignoring content after the radius, starting at line {}.", number);
        }
        if let Some(number) = lines.next_non_blank()? {
            warn!("Ignoring content after the Radius section, starting at line {}.", number);
        }
        project.set_radius(radius);

        info!(
            "Read project: {} bond(s), {} angle(s), {} group member(s).",
            project.bonds().len(),
            project.angles().len(),
            project.group().len()
        );
        Ok(project)
    }
}

impl ProjectWriter for TextFile {
    fn write_to(project: &Project, writer: &mut impl Write) -> Result<(), CodecError> {
        writeln!(writer, "{}", BONDS_HEADER)?;
        for (key, bond) in project.bonds().iter() {
            writeln!(writer, "{}{}{}", key, FIELD_SEPARATOR, bond.length)?;
        }
        writeln!(writer)?;

        writeln!(writer, "{}", ANGLES_HEADER)?;
        for (key, angle) in project.angles().iter() {
            writeln!(writer, "{}{}{}", key, FIELD_SEPARATOR, angle.degrees)?;
        }
        writeln!(writer)?;

        writeln!(writer, "{}", MOLECULE_HEADER)?;
        for key in project.group().iter() {
            writeln!(writer, "{}", key)?;
        }
        writeln!(writer)?;

        writeln!(writer, "{}", RADIUS_HEADER)?;
        writeln!(writer, "{}", project.radius().unwrap_or(0.0))?;
        Ok(())
    }
}

/// Duplicate records in a file are not expected; if one appears the later line wins.
fn later_wins(conflict: &Conflict<'_>) -> Resolution {
    match conflict {
        Conflict::Bond { key, .. } => {
            warn!("Bond {} appears twice; keeping the later value.", key)
        }
        Conflict::Angle { key, .. } => {
            warn!("Angle {} appears twice; keeping the later value.", key)
        }
    }
    Resolution::Overwrite
}

fn into_codec_error(error: ProjectError, line: usize) -> CodecError {
    match error {
        ProjectError::UnknownElement(e) => CodecError::UnknownElement(e),
        other => CodecError::corrupted_at_line(line, other.to_string()),
    }
}

fn split_record(line: &str, number: usize) -> Result<(&str, &str), CodecError> {
    let mut fields = line.split(FIELD_SEPARATOR);
    match (fields.next(), fields.next(), fields.next()) {
        (Some(atoms), Some(value), None) => Ok((atoms, value)),
        _ => Err(CodecError::corrupted_at_line(
            number,
            format!(
                "expected '<atoms>{}<number>', got '{}'",
                FIELD_SEPARATOR.escape_default(),
                line
            ),
        )),
    }
}

fn parse_atoms<const N: usize>(
    project: &Project,
    text: &str,
    number: usize,
) -> Result<[Atom; N], CodecError> {
    let tokens: Vec<&str> = text.split(ATOM_SEPARATOR).collect();
    if tokens.len() != N || tokens.iter().any(|t| t.trim().is_empty()) {
        return Err(CodecError::corrupted_at_line(
            number,
            format!(
                "expected {} atoms separated by '{}', got '{}'",
                N, ATOM_SEPARATOR, text
            ),
        ));
    }
    let atoms = tokens
        .iter()
        .map(|token| project.parse_atom(token))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| into_codec_error(e, number))?;
    atoms
        .try_into()
        .map_err(|_| CodecError::corrupted_at_line(number, format!("expected {} atoms", N)))
}

fn parse_decimal(text: &str, number: usize) -> Result<f64, CodecError> {
    let trimmed = text.trim();
    trimmed.replace(',', ".").parse::<f64>().map_err(|_| {
        CodecError::corrupted_at_line(number, format!("'{}' is not a number", trimmed))
    })
}

/// Line iterator that strips `\r` and remembers 1-based line numbers.
struct NumberedLines<'a, R: BufRead> {
    reader: &'a mut R,
    number: usize,
    buf: String,
}

impl<'a, R: BufRead> NumberedLines<'a, R> {
    fn new(reader: &'a mut R) -> Self {
        Self {
            reader,
            number: 0,
            buf: String::new(),
        }
    }

    fn next_line(&mut self) -> Result<Option<(usize, String)>, CodecError> {
        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            return Ok(None);
        }
        self.number += 1;
        let mut line = self.buf.trim_end_matches(['\n', '\r']);
        if self.number == 1 {
            line = line.strip_prefix('\u{feff}').unwrap_or(line);
        }
        let line = line.to_string();
        Ok(Some((self.number, line)))
    }

    fn next_non_blank(&mut self) -> Result<Option<usize>, CodecError> {
        while let Some((number, line)) = self.next_line()? {
            if !line.trim().is_empty() {
                return Ok(Some(number));
            }
        }
        Ok(None)
    }

    /// Skips blank lines, then requires `header` on the next line.
    fn expect_header(&mut self, header: &str) -> Result<(), CodecError> {
        loop {
            match self.next_line()? {
                Some((_, line)) if line.trim().is_empty() => continue,
                Some((_, line)) if line.trim() == header => return Ok(()),
                Some((number, line)) => {
                    return Err(CodecError::corrupted_at_line(
                        number,
                        format!("expected section '{}', got '{}'", header, line),
                    ));
                }
                None => {
                    return Err(CodecError::corrupted(
                        "end of file",
                        format!("missing section '{}'", header),
                    ));
                }
            }
        }
    }

    /// Lines up to the next blank line or the end of input.
    fn section_body(&mut self) -> Result<Vec<(usize, String)>, CodecError> {
        let mut body = Vec::new();
        while let Some((number, line)) = self.next_line()? {
            if line.trim().is_empty() {
                break;
            }
            body.push((number, line));
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    const WATER: &str = "Bonds\n\
        O - H1\t0.96\n\
        O - H2\t0.96\n\
        \n\
        Angles\n\
        H1 - O - H2\t104.5\n\
        \n\
        Molecule\n\
        H1 - O - H2\n\
        \n\
        Radius\n\
        1.5\n";

    fn table() -> Arc<ElectronegativityTable> {
        Arc::new(ElectronegativityTable::builtin())
    }

    fn read(content: &str) -> Result<Project, CodecError> {
        TextFile::read_from(&mut Cursor::new(content.as_bytes()), table())
    }

    fn write(project: &Project) -> String {
        let mut out = Vec::new();
        TextFile::write_to(project, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn reads_water_project() {
        let project = read(WATER).unwrap();
        assert_eq!(project.bonds().len(), 2);
        assert_eq!(project.angles().len(), 1);
        assert_eq!(project.group().len(), 1);
        assert_eq!(project.radius(), Some(1.5));
        assert!(project.derived().aggregate_dipole.is_some());
        assert!(project.derived().polarization.is_some());
    }

    #[test]
    fn round_trip_reproduces_the_file() {
        assert_eq!(write(&read(WATER).unwrap()), WATER);
    }

    #[test]
    fn round_trip_preserves_orientation_and_group_repeats() {
        let content = "Bonds\n\
            H1 - O\t1\n\
            O - H2\t0.958\n\
            \n\
            Angles\n\
            H2 - O - H1\t104.45\n\
            \n\
            Molecule\n\
            H1 - O - H2\n\
            H2 - O - H1\n\
            \n\
            Radius\n\
            0\n";
        assert_eq!(write(&read(content).unwrap()), content);
    }

    #[test]
    fn empty_project_round_trips() {
        let empty = "Bonds\n\nAngles\n\nMolecule\n\nRadius\n0\n";
        let project = read(empty).unwrap();
        assert!(project.is_empty());
        assert_eq!(write(&project), empty);
    }

    #[test]
    fn unset_radius_is_written_as_zero() {
        let project = Project::new(table());
        assert!(write(&project).ends_with("Radius\n0\n"));
    }

    #[test]
    fn accepts_comma_decimals_and_crlf() {
        let content = WATER.replace("0.96", "0,96").replace("104.5", "104,5").replace('\n', "\r\n");
        let project = read(&content).unwrap();
        assert_eq!(project.bonds().get(0).unwrap().1.length, 0.96);
        assert_eq!(project.angles().get(0).unwrap().1.degrees, 104.5);
        assert_eq!(write(&project), WATER);
    }

    #[test]
    fn leading_byte_order_mark_is_ignored() {
        let project = read(&format!("\u{feff}{}", WATER)).unwrap();
        assert_eq!(project.bonds().len(), 2);
        assert_eq!(write(&project), WATER);
    }

    #[test]
    fn missing_radius_value_means_unset() {
        let content = "Bonds\n\nAngles\n\nMolecule\n\nRadius\n";
        assert_eq!(read(content).unwrap().radius(), None);
    }

    #[test]
    fn wrong_section_marker_is_corrupted() {
        let content = WATER.replace("Angles", "Angels");
        match read(&content).unwrap_err() {
            CodecError::CorruptedFile { location, .. } => assert_eq!(location, "line 5"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_field_is_corrupted() {
        let content = WATER.replace("104.5", "wide");
        match read(&content).unwrap_err() {
            CodecError::CorruptedFile { location, reason } => {
                assert_eq!(location, "line 6");
                assert!(reason.contains("wide"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_section_is_corrupted() {
        let content = "Bonds\nO - H1\t0.96\n";
        assert!(matches!(
            read(content).unwrap_err(),
            CodecError::CorruptedFile { location, .. } if location == "end of file"
        ));
    }

    #[test]
    fn malformed_record_is_corrupted() {
        for bad in ["O - H1 0.96", "O - H1\t0.96\t1", "O\t0.96", "O - \t0.96"] {
            let content = WATER.replace("O - H1\t0.96", bad);
            assert!(
                matches!(read(&content).unwrap_err(), CodecError::CorruptedFile { .. }),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn angle_before_its_bonds_is_corrupted() {
        let content = "Bonds\nO - H1\t0.96\n\nAngles\nH1 - O - H2\t104.5\n\nMolecule\n\nRadius\n0\n";
        match read(content).unwrap_err() {
            CodecError::CorruptedFile { location, reason } => {
                assert_eq!(location, "line 5");
                assert!(reason.contains("O - H2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_element_is_reported_by_symbol() {
        let content = WATER.replace("O - H2", "O - Xe2");
        match read(&content).unwrap_err() {
            CodecError::UnknownElement(e) => assert_eq!(e.symbol, "X"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_bond_keeps_later_value() {
        let content = WATER.replace("O - H2\t0.96", "H1 - O\t1.1");
        let err = read(&content).unwrap_err();
        // The angle still needs O - H2, which is now missing.
        assert!(matches!(err, CodecError::CorruptedFile { .. }));

        let content = "Bonds\nO - H1\t0.96\nH1 - O\t1.1\n\nAngles\n\nMolecule\n\nRadius\n0\n";
        let project = read(content).unwrap();
        assert_eq!(project.bonds().len(), 1);
        assert_eq!(project.bonds().get(0).unwrap().1.length, 1.1);
    }

    #[test]
    fn path_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("water.txt");
        let project = read(WATER).unwrap();

        TextFile::write_to_path(&project, &path).unwrap();
        let reloaded = TextFile::read_from_path(&path, table()).unwrap();
        assert_eq!(write(&reloaded), WATER);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), WATER);
    }
}
