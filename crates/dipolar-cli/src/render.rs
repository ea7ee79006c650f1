use dipolar::workflows::snapshot::Snapshot;
use std::fmt::{self, Write};

const PLACEHOLDER: &str = "-";

/// Formats a snapshot as plain-text tables followed by the derived values.
pub fn report(snapshot: &Snapshot) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(out, "Bonds ({})", snapshot.bonds.len())?;
    let width = column_width(snapshot.bonds.iter().map(|r| r.bond.to_string()), "Bond");
    writeln!(
        out,
        "  {:>3}  {:<width$}  {:>10}  {:>10}",
        "#", "Bond", "Length", "Dipole"
    )?;
    for row in &snapshot.bonds {
        writeln!(
            out,
            "  {:>3}  {:<width$}  {:>10.3}  {:>10.3}",
            row.index,
            row.bond.to_string(),
            row.length,
            row.dipole
        )?;
    }

    writeln!(out, "\nAngles ({})", snapshot.angles.len())?;
    let width = column_width(snapshot.angles.iter().map(|r| r.angle.to_string()), "Angle");
    writeln!(
        out,
        "  {:>3}  {:<width$}  {:>10}  {:>10}",
        "#", "Angle", "Degrees", "Dipole"
    )?;
    for row in &snapshot.angles {
        writeln!(
            out,
            "  {:>3}  {:<width$}  {:>10.3}  {:>10.3}",
            row.index,
            row.angle.to_string(),
            row.degrees,
            row.dipole
        )?;
    }

    writeln!(out, "\nMolecule ({})", snapshot.group.len())?;
    for row in &snapshot.group {
        let dipole = row
            .dipole
            .map_or_else(|| PLACEHOLDER.to_string(), |mu| format!("{:.3}", mu));
        writeln!(out, "  {:>3}  {}  ({})", row.index, row.angle, dipole)?;
    }

    let radius = snapshot
        .radius
        .map_or_else(|| PLACEHOLDER.to_string(), |r| format!("{} A", r));
    let aggregate = snapshot
        .derived
        .aggregate_dipole
        .map_or_else(|| PLACEHOLDER.to_string(), |mu| format!("{:.3} D", mu));
    let polarization = snapshot
        .derived
        .polarization
        .map_or_else(|| PLACEHOLDER.to_string(), |p| format!("{:.4e} C/m^2", p));

    writeln!(out, "\nRadius:           {}", radius)?;
    writeln!(out, "Aggregate dipole: {}", aggregate)?;
    writeln!(out, "Polarization:     {}", polarization)?;
    Ok(out)
}

fn column_width(cells: impl Iterator<Item = String>, header: &str) -> usize {
    cells.map(|c| c.len()).max().unwrap_or(0).max(header.len())
}
