use crate::cli::ConvertArgs;
use crate::error::Result;
use std::path::Path;
use tracing::info;

pub fn run(args: ConvertArgs, table_path: &Path) -> Result<()> {
    let mut session = super::open_session(table_path, &args.input, args.radius)?;
    let written = session.save_project(Some(&args.output))?;

    let snapshot = session.snapshot();
    info!(
        "Converted {:?}: {} bond(s), {} angle(s), {} group member(s).",
        args.input,
        snapshot.bonds.len(),
        snapshot.angles.len(),
        snapshot.group.len()
    );
    println!("Wrote {}", written.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use dipolar::io::error::CodecError;
    use dipolar::workflows::session::SessionError;
    use std::fs;
    use tempfile::tempdir;

    const CO2: &str = r#"<molecule xmlns="http://www.xml-cml.org/schema"><atomArray>
        <atom id="a1" elementType="O" x3="-1.16" y3="0" z3="0"/>
        <atom id="a2" elementType="C" x3="0" y3="0" z3="0"/>
        <atom id="a3" elementType="O" x3="1.16" y3="0" z3="0"/>
      </atomArray><bondArray>
        <bond atomRefs2="a1 a2"/><bond atomRefs2="a2 a3"/>
      </bondArray></molecule>"#;

    #[test]
    fn converts_cml_to_text_project() {
        let dir = tempdir().unwrap();
        let table = dir.path().join("config").join("electroneg.toml");
        let input = dir.path().join("co2.cml");
        let output = dir.path().join("co2.txt");
        fs::write(&input, CO2).unwrap();

        let args = ConvertArgs {
            input,
            output: output.clone(),
            radius: Some(1.6),
        };
        run(args, &table).unwrap();

        assert!(table.exists(), "missing table is created with defaults");
        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "Bonds\nO0 - C0\t1.16\nC0 - O1\t1.16\n\n\
             Angles\nO0 - C0 - O1\t180\n\n\
             Molecule\nO0 - C0 - O1\n\n\
             Radius\n1.6\n"
        );
    }

    #[test]
    fn refuses_cml_output() {
        let dir = tempdir().unwrap();
        let table = dir.path().join("electroneg.toml");
        let input = dir.path().join("co2.cml");
        fs::write(&input, CO2).unwrap();

        let args = ConvertArgs {
            input,
            output: dir.path().join("copy.cml"),
            radius: None,
        };
        let err = run(args, &table).unwrap_err();
        assert!(matches!(
            err,
            CliError::Session(SessionError::Codec(CodecError::UnsupportedFormat { .. }))
        ));
    }
}
