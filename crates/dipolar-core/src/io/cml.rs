use super::error::CodecError;
use super::traits::ProjectReader;
use crate::core::chemistry::electronegativity::ElectronegativityTable;
use crate::core::models::atom::Atom;
use crate::core::utils::geometry;
use crate::engine::error::ProjectError;
use crate::engine::project::Project;
use crate::engine::resolver::Resolution;
use nalgebra::Point3;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::{BTreeMap, HashMap};
use std::io::BufRead;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Read-only importer for Chemical Markup Language geometry.
///
/// Only `<atom id elementType x3 y3 z3>` and `<bond atomRefs2>` elements are consumed;
/// namespaces and every other element are ignored. Atoms are relabelled
/// `<symbol><n>` with `n` counting atoms of that element from 0 in declaration order.
pub struct CmlFile;

#[derive(Debug)]
struct CmlAtom {
    id: String,
    atom: Atom,
    position: Point3<f64>,
}

#[derive(Debug, Default)]
struct CmlDocument {
    atoms: Vec<CmlAtom>,
    bonds: Vec<(String, String)>,
}

impl ProjectReader for CmlFile {
    fn read_from(
        reader: &mut impl BufRead,
        table: Arc<ElectronegativityTable>,
    ) -> Result<Project, CodecError> {
        let document = parse_document(reader, &table)?;
        let mut project = Project::new(table);

        let index_of: HashMap<&str, usize> = document
            .atoms
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id.as_str(), i))
            .collect();
        if index_of.len() != document.atoms.len() {
            return Err(CodecError::corrupted("atomArray", "duplicate atom id"));
        }

        let mut partners: Vec<Vec<usize>> = vec![Vec::new(); document.atoms.len()];
        for (id1, id2) in &document.bonds {
            let location = || format!("bond '{} {}'", id1, id2);
            let (i, j) = match (index_of.get(id1.as_str()), index_of.get(id2.as_str())) {
                (Some(&i), Some(&j)) => (i, j),
                _ => return Err(CodecError::corrupted(location(), "references an undeclared atom")),
            };
            if i == j {
                warn!("Skipping bond of atom '{}' to itself.", id1);
                continue;
            }
            if partners[i].contains(&j) {
                debug!("Skipping repeated bond {} - {}.", id1, id2);
                continue;
            }
            partners[i].push(j);
            partners[j].push(i);

            let (a, b) = (&document.atoms[i], &document.atoms[j]);
            let length = geometry::bond_length(&a.position, &b.position);
            project
                .add_bond(a.atom.clone(), b.atom.clone(), length, &Resolution::Keep)
                .map_err(|e| into_codec_error(e, location()))?;
        }

        for (center, neighbours) in partners.iter().enumerate() {
            let vertex = &document.atoms[center];
            for (n, &i) in neighbours.iter().enumerate() {
                for &j in &neighbours[n + 1..] {
                    let (left, right) = (&document.atoms[i], &document.atoms[j]);
                    let Some(degrees) =
                        geometry::bond_angle(&left.position, &vertex.position, &right.position)
                    else {
                        warn!(
                            "Skipping angle {} - {} - {}: coincident coordinates.",
                            left.atom, vertex.atom, right.atom
                        );
                        continue;
                    };
                    let location = || format!("angle at atom '{}'", vertex.id);
                    let outcome = project
                        .add_angle(
                            left.atom.clone(),
                            vertex.atom.clone(),
                            right.atom.clone(),
                            degrees,
                            &Resolution::Keep,
                        )
                        .map_err(|e| into_codec_error(e, location()))?;
                    if outcome.dipole != 0.0 {
                        project
                            .add_group(left.atom.clone(), vertex.atom.clone(), right.atom.clone())
                            .map_err(|e| into_codec_error(e, location()))?;
                    }
                }
            }
        }

        info!(
            "Imported CML geometry: {} atom(s), {} bond(s), {} angle(s), {} grouped.",
            document.atoms.len(),
            project.bonds().len(),
            project.angles().len(),
            project.group().len()
        );
        Ok(project)
    }
}

fn parse_document<R: BufRead>(
    reader: R,
    table: &ElectronegativityTable,
) -> Result<CmlDocument, CodecError> {
    let mut xml_reader = Reader::from_reader(reader);
    xml_reader.trim_text(true);

    let mut document = CmlDocument::default();
    let mut counters: BTreeMap<String, usize> = BTreeMap::new();
    let mut buf = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                match e.local_name().as_ref() {
                    b"atom" => document.atoms.push(parse_atom(e, table, &mut counters)?),
                    b"bond" => document.bonds.push(parse_bond(e)?),
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(CodecError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(document)
}

fn parse_atom(
    e: &BytesStart,
    table: &ElectronegativityTable,
    counters: &mut BTreeMap<String, usize>,
) -> Result<CmlAtom, CodecError> {
    let id = get_attr(e, b"id", "atom")?;
    let location = format!("atom '{}'", id);
    let symbol = get_attr(e, b"elementType", &location)?;
    let element = table.atom_type(&symbol)?;

    let counter = counters.entry(symbol).or_insert(0);
    let atom = Atom::new(element, &counter.to_string());
    *counter += 1;

    let position = Point3::new(
        get_attr_f64(e, b"x3", &location)?,
        get_attr_f64(e, b"y3", &location)?,
        get_attr_f64(e, b"z3", &location)?,
    );
    Ok(CmlAtom { id, atom, position })
}

fn parse_bond(e: &BytesStart) -> Result<(String, String), CodecError> {
    let refs = get_attr(e, b"atomRefs2", "bond")?;
    let mut ids = refs.split_whitespace();
    match (ids.next(), ids.next(), ids.next()) {
        (Some(a), Some(b), None) => Ok((a.to_string(), b.to_string())),
        _ => Err(CodecError::corrupted(
            format!("bond '{}'", refs),
            "atomRefs2 must name exactly two atoms",
        )),
    }
}

fn get_attr(e: &BytesStart, name: &[u8], location: &str) -> Result<String, CodecError> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == name {
            return Ok(String::from_utf8_lossy(&attr.value).to_string());
        }
    }
    Err(CodecError::corrupted(
        location,
        format!("missing attribute '{}'", String::from_utf8_lossy(name)),
    ))
}

fn get_attr_f64(e: &BytesStart, name: &[u8], location: &str) -> Result<f64, CodecError> {
    let value = get_attr(e, name, location)?;
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CodecError::corrupted(
            location,
            format!(
                "attribute '{}' is not a number: '{}'",
                String::from_utf8_lossy(name),
                value
            ),
        )),
    }
}

fn into_codec_error(error: ProjectError, location: String) -> CodecError {
    match error {
        ProjectError::UnknownElement(e) => CodecError::UnknownElement(e),
        other => CodecError::corrupted(location, other.to_string()),
    }
}
