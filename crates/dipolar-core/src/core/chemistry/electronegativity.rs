use crate::core::models::atom::{Atom, AtomType, UnknownElementError};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Built-in Pauling electronegativities written out when no table file exists.
pub const DEFAULT_ELECTRONEGATIVITIES: [(&str, f64); 6] = [
    ("H", 2.2),
    ("C", 2.55),
    ("N", 3.04),
    ("O", 3.44),
    ("P", 2.19),
    ("S", 2.58),
];

/// The closed set of element symbols a project may use, with their electronegativities.
///
/// Constructed once and never mutated afterwards; share it with `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectronegativityTable {
    values: BTreeMap<String, f64>,
}

#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid element symbol '{0}' (expected an uppercase letter followed by lowercase letters)")]
    InvalidSymbol(String),
    #[error("Electronegativity for '{symbol}' must be a finite number, got {value}")]
    InvalidValue { symbol: String, value: f64 },
    #[error("Electronegativity table defines no elements")]
    Empty,
}

impl ElectronegativityTable {
    /// Builds a table from `(symbol, electronegativity)` pairs.
    ///
    /// # Errors
    ///
    /// Fails if the set is empty, a symbol is not of the form `X` / `Xy`, or a value is
    /// not finite.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, TableLoadError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut values = BTreeMap::new();
        for (symbol, value) in pairs {
            let symbol = symbol.into();
            if !is_valid_symbol(&symbol) {
                return Err(TableLoadError::InvalidSymbol(symbol));
            }
            if !value.is_finite() {
                return Err(TableLoadError::InvalidValue { symbol, value });
            }
            values.insert(symbol, value);
        }
        if values.is_empty() {
            return Err(TableLoadError::Empty);
        }
        Ok(Self { values })
    }

    pub fn builtin() -> Self {
        Self {
            values: DEFAULT_ELECTRONEGATIVITIES
                .iter()
                .map(|(symbol, value)| (symbol.to_string(), *value))
                .collect(),
        }
    }

    /// Parses a `Symbol = value` TOML document.
    ///
    /// Values written with a decimal comma (`H = 2,2`) are accepted as well; the document
    /// is re-read with those commas turned into points when the strict parse fails.
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, TableLoadError> {
        let raw: BTreeMap<String, f64> = match toml::from_str(content) {
            Ok(raw) => raw,
            Err(e) => {
                let normalized = normalize_decimal_commas(content)
                    .and_then(|fixed| toml::from_str(&fixed).ok());
                match normalized {
                    Some(raw) => {
                        warn!(
                            "Electronegativity table {} uses decimal commas; read them as points.",
                            origin
                        );
                        raw
                    }
                    None => {
                        return Err(TableLoadError::Toml {
                            path: origin.to_string(),
                            source: e,
                        });
                    }
                }
            }
        };
        Self::from_pairs(raw)
    }

    pub fn load(path: &Path) -> Result<Self, TableLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| TableLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let table = Self::from_toml_str(&content, &path.to_string_lossy())?;
        debug!(
            "Loaded {} electronegativity entries from {:?}",
            table.len(),
            path
        );
        Ok(table)
    }

    /// Loads the table at `path`, writing the built-in defaults there first if the file
    /// does not exist yet.
    pub fn load_or_create(path: &Path) -> Result<Self, TableLoadError> {
        if !path.exists() {
            info!(
                "No electronegativity table at {:?}; writing built-in defaults.",
                path
            );
            Self::write_default(path)?;
        }
        Self::load(path)
    }

    /// Writes the built-in table to `path`, creating parent directories as needed.
    pub fn write_default(path: &Path) -> Result<(), TableLoadError> {
        let io_err = |e| TableLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, default_table_source()).map_err(io_err)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(s, v)| (s.as_str(), *v))
    }

    /// Resolves a symbol to its [`AtomType`].
    pub fn atom_type(&self, symbol: &str) -> Result<AtomType, UnknownElementError> {
        if self.values.contains_key(symbol) {
            Ok(AtomType::new(symbol))
        } else {
            Err(UnknownElementError {
                symbol: symbol.to_string(),
            })
        }
    }

    pub fn electronegativity(&self, atom_type: &AtomType) -> Option<f64> {
        self.values.get(atom_type.symbol()).copied()
    }

    /// Splits a token such as `H1` or `Ocarbonyl` into element symbol and label.
    ///
    /// The longest configured symbol that prefixes the token wins, so with a table
    /// holding both `C` and `Cl`, `Cl2` is chlorine with label `2`.
    pub fn parse_atom(&self, token: &str) -> Result<Atom, UnknownElementError> {
        let token = token.trim();
        let symbol = self
            .values
            .keys()
            .filter(|symbol| token.starts_with(symbol.as_str()))
            .max_by_key(|symbol| symbol.len())
            .ok_or_else(|| UnknownElementError {
                symbol: token.chars().next().map(String::from).unwrap_or_default(),
            })?;
        Ok(Atom::new(AtomType::new(symbol.as_str()), &token[symbol.len()..]))
    }

    /// Renders the table in the same `Symbol = value` format it is loaded from.
    pub fn to_toml_string(&self) -> String {
        let mut out = String::new();
        for (symbol, value) in &self.values {
            out.push_str(&format!("{} = {}\n", symbol, format_toml_float(*value)));
        }
        out
    }
}

impl Default for ElectronegativityTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn is_valid_symbol(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => chars.all(|c| c.is_ascii_lowercase()),
        _ => false,
    }
}

fn format_toml_float(value: f64) -> String {
    // TOML floats need a fractional part; `2` would deserialize as an integer literal.
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Rewrites `Symbol = 2,55` as `Symbol = 2.55`, leaving comments and other lines alone.
///
/// Returns `None` when no value needed rewriting.
fn normalize_decimal_commas(content: &str) -> Option<String> {
    let mut changed = false;
    let mut out = String::with_capacity(content.len());
    for line in content.lines() {
        let (body, comment) = match line.find('#') {
            Some(at) => line.split_at(at),
            None => (line, ""),
        };
        match body.split_once('=') {
            Some((key, value)) if is_comma_decimal(value.trim()) => {
                out.push_str(key);
                out.push('=');
                out.push_str(&value.replacen(',', ".", 1));
                out.push_str(comment);
                changed = true;
            }
            _ => out.push_str(line),
        }
        out.push('\n');
    }
    changed.then_some(out)
}

fn is_comma_decimal(value: &str) -> bool {
    let value = value.strip_prefix(['+', '-']).unwrap_or(value);
    match value.split_once(',') {
        Some((whole, frac)) => {
            !whole.is_empty()
                && !frac.is_empty()
                && whole.chars().all(|c| c.is_ascii_digit())
                && frac.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

pub fn default_table_source() -> String {
    let mut out =
        String::from("# This file is generated automatically\n# Electronegativity of atoms\n");
    for (symbol, value) in DEFAULT_ELECTRONEGATIVITIES {
        out.push_str(&format!("{} = {}\n", symbol, format_toml_float(value)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn builtin_table_has_default_values() {
        let table = ElectronegativityTable::builtin();
        assert_eq!(table.len(), 6);
        let o = table.atom_type("O").unwrap();
        assert_eq!(table.electronegativity(&o), Some(3.44));
        let h = table.atom_type("H").unwrap();
        assert_eq!(table.electronegativity(&h), Some(2.2));
    }

    #[test]
    fn atom_type_rejects_unknown_symbol() {
        let table = ElectronegativityTable::builtin();
        let err = table.atom_type("Xe").unwrap_err();
        assert_eq!(err.symbol, "Xe");
    }

    #[test]
    fn parse_atom_splits_symbol_and_label() {
        let table = ElectronegativityTable::builtin();
        let h1 = table.parse_atom("H1").unwrap();
        assert_eq!(h1.element().symbol(), "H");
        assert_eq!(h1.label(), "1");

        let o = table.parse_atom(" O ").unwrap();
        assert_eq!(o.element().symbol(), "O");
        assert_eq!(o.label(), "");
    }

    #[test]
    fn parse_atom_prefers_longest_symbol() {
        let table = ElectronegativityTable::from_pairs([("C", 2.55), ("Cl", 3.16)]).unwrap();
        let cl = table.parse_atom("Cl2").unwrap();
        assert_eq!(cl.element().symbol(), "Cl");
        assert_eq!(cl.label(), "2");
        let c = table.parse_atom("C2").unwrap();
        assert_eq!(c.element().symbol(), "C");
    }

    #[test]
    fn parse_atom_fails_for_unconfigured_element() {
        let table = ElectronegativityTable::builtin();
        let err = table.parse_atom("F1").unwrap_err();
        assert_eq!(err.symbol, "F");
        assert!(table.parse_atom("").is_err());
    }

    #[test]
    fn from_pairs_validates_symbols_and_values() {
        assert!(matches!(
            ElectronegativityTable::from_pairs([("h", 2.2)]),
            Err(TableLoadError::InvalidSymbol(_))
        ));
        assert!(matches!(
            ElectronegativityTable::from_pairs([("H", f64::NAN)]),
            Err(TableLoadError::InvalidValue { .. })
        ));
        assert!(matches!(
            ElectronegativityTable::from_pairs(Vec::<(String, f64)>::new()),
            Err(TableLoadError::Empty)
        ));
    }

    #[test]
    fn load_parses_toml_with_comments_and_integer_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("electroneg.toml");
        let mut file = File::create(&path).unwrap();
        writeln!(
            file,
            r#"
            # Electronegativity of atoms
            H = 2.2   # hydrogen
            F = 4
            "#
        )
        .unwrap();

        let table = ElectronegativityTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);
        let f = table.atom_type("F").unwrap();
        assert_eq!(table.electronegativity(&f), Some(4.0));
    }

    #[test]
    fn load_reports_toml_errors_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "H = not-a-number\n").unwrap();

        let err = ElectronegativityTable::load(&path).unwrap_err();
        match err {
            TableLoadError::Toml { path: p, .. } => assert!(p.ends_with("broken.toml")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn load_or_create_accepts_decimal_comma_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config").join("electroneg.toml");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            "#This text is generated automatically\n#Electronegativity of atoms\n\
             H = 2,2\nC = 2,55\nN = 3,04\nO = 3,44\nP = 2,19\nS = 2,58",
        )
        .unwrap();

        let table = ElectronegativityTable::load_or_create(&path).unwrap();
        assert_eq!(table, ElectronegativityTable::builtin());
    }

    #[test]
    fn decimal_comma_fallback_keeps_comments_and_point_values() {
        let table =
            ElectronegativityTable::from_toml_str("F = 3,98 # fluorine\nCl = 3.16\n", "inline")
                .unwrap();
        let f = table.atom_type("F").unwrap();
        let cl = table.atom_type("Cl").unwrap();
        assert_eq!(table.electronegativity(&f), Some(3.98));
        assert_eq!(table.electronegativity(&cl), Some(3.16));
    }

    #[test]
    fn decimal_comma_fallback_still_reports_other_errors() {
        let err =
            ElectronegativityTable::from_toml_str("H = 2,2\nO = high\n", "inline").unwrap_err();
        assert!(matches!(err, TableLoadError::Toml { .. }));
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let err = ElectronegativityTable::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, TableLoadError::Io { .. }));
    }

    #[test]
    fn load_or_create_writes_defaults_when_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config").join("electroneg.toml");

        let table = ElectronegativityTable::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(table, ElectronegativityTable::builtin());

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# This file is generated automatically"));
        assert!(written.contains("O = 3.44"));
    }

    #[test]
    fn load_or_create_keeps_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("electroneg.toml");
        std::fs::write(&path, "Si = 1.9\n").unwrap();

        let table = ElectronegativityTable::load_or_create(&path).unwrap();
        assert_eq!(table.symbols().collect::<Vec<_>>(), vec!["Si"]);
    }

    #[test]
    fn to_toml_string_round_trips() {
        let table = ElectronegativityTable::from_pairs([("H", 2.2), ("F", 4.0)]).unwrap();
        let reparsed =
            ElectronegativityTable::from_toml_str(&table.to_toml_string(), "memory").unwrap();
        assert_eq!(reparsed, table);
    }
}
