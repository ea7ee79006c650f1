use super::snapshot::Snapshot;
use crate::core::chemistry::electronegativity::ElectronegativityTable;
use crate::engine::cascade::CascadeReport;
use crate::engine::error::ProjectError;
use crate::engine::project::{AddOutcome, AddStatus, Project};
use crate::engine::resolver::DuplicateResolver;
use crate::io::error::CodecError;
use crate::io::{self, FileFormat};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("The project has not been saved yet; a file path is required")]
    NoSavedPath,
}

/// The result of a mutation together with the state to render afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Change<T> {
    pub outcome: T,
    pub snapshot: Snapshot,
}

/// One open project as a front end sees it.
///
/// Wraps a [`Project`] with the file it belongs to and an unsaved-changes flag. Atoms are
/// passed as tokens such as `H1` and resolved against the session's electronegativity
/// table.
#[derive(Debug, Clone)]
pub struct Session {
    project: Project,
    saved_path: Option<PathBuf>,
    dirty: bool,
}

impl Session {
    pub fn new(table: Arc<ElectronegativityTable>) -> Self {
        Self {
            project: Project::new(table),
            saved_path: None,
            dirty: false,
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn saved_path(&self) -> Option<&Path> {
        self.saved_path.as_deref()
    }

    /// Whether the project changed since it was created, opened or saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(&self.project)
    }

    /// Discards the current project and forgets its file.
    pub fn new_project(&mut self) -> Snapshot {
        self.project.reset();
        self.saved_path = None;
        self.dirty = false;
        self.snapshot()
    }

    /// Replaces the current project with the contents of `path`.
    ///
    /// The current project is discarded first; if reading fails the session is left
    /// holding an empty project. Text files become the save target, CML files do not.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn open_project(&mut self, path: &Path) -> Result<Snapshot, SessionError> {
        self.new_project();
        let project = io::read_project(path, self.project.table().clone())?;
        self.project = project;
        if FileFormat::from_path(path) == FileFormat::Text {
            self.saved_path = Some(path.to_path_buf());
        }
        info!("Opened project from '{}'.", path.display());
        Ok(self.snapshot())
    }

    /// Writes the project in the text format to `path`, or to the remembered file if
    /// `path` is `None`, and returns the path written.
    #[instrument(skip_all)]
    pub fn save_project(&mut self, path: Option<&Path>) -> Result<PathBuf, SessionError> {
        let target = path
            .map(Path::to_path_buf)
            .or_else(|| self.saved_path.clone())
            .ok_or(SessionError::NoSavedPath)?;
        io::write_project(&self.project, &target)?;
        info!("Saved project to '{}'.", target.display());
        self.saved_path = Some(target.clone());
        self.dirty = false;
        Ok(target)
    }

    pub fn set_radius(&mut self, radius: Option<f64>) -> Snapshot {
        if self.project.radius() != radius {
            self.dirty = true;
        }
        self.project.set_radius(radius);
        self.snapshot()
    }

    pub fn recalculate(&mut self) -> Snapshot {
        self.project.recalculate();
        self.snapshot()
    }

    pub fn preview_bond_dipole(
        &self,
        a1: &str,
        a2: &str,
        length: f64,
    ) -> Result<f64, SessionError> {
        let a1 = self.project.parse_atom(a1)?;
        let a2 = self.project.parse_atom(a2)?;
        Ok(self.project.preview_bond_dipole(&a1, &a2, length)?)
    }

    pub fn preview_angle_dipole(
        &self,
        a1: &str,
        a2: &str,
        a3: &str,
        degrees: f64,
    ) -> Result<Option<f64>, SessionError> {
        let a1 = self.project.parse_atom(a1)?;
        let a2 = self.project.parse_atom(a2)?;
        let a3 = self.project.parse_atom(a3)?;
        Ok(self.project.preview_angle_dipole(&a1, &a2, &a3, degrees))
    }

    pub fn add_bond<R>(
        &mut self,
        a1: &str,
        a2: &str,
        length: f64,
        resolver: &R,
    ) -> Result<Change<AddOutcome>, SessionError>
    where
        R: DuplicateResolver + ?Sized,
    {
        let a1 = self.project.parse_atom(a1)?;
        let a2 = self.project.parse_atom(a2)?;
        let outcome = self.project.add_bond(a1, a2, length, resolver)?;
        Ok(self.added(outcome))
    }

    pub fn add_angle<R>(
        &mut self,
        a1: &str,
        a2: &str,
        a3: &str,
        degrees: f64,
        resolver: &R,
    ) -> Result<Change<AddOutcome>, SessionError>
    where
        R: DuplicateResolver + ?Sized,
    {
        let a1 = self.project.parse_atom(a1)?;
        let a2 = self.project.parse_atom(a2)?;
        let a3 = self.project.parse_atom(a3)?;
        let outcome = self.project.add_angle(a1, a2, a3, degrees, resolver)?;
        Ok(self.added(outcome))
    }

    pub fn add_group(
        &mut self,
        a1: &str,
        a2: &str,
        a3: &str,
    ) -> Result<Change<usize>, SessionError> {
        let a1 = self.project.parse_atom(a1)?;
        let a2 = self.project.parse_atom(a2)?;
        let a3 = self.project.parse_atom(a3)?;
        let outcome = self.project.add_group(a1, a2, a3)?;
        self.dirty = true;
        Ok(self.changed(outcome))
    }

    pub fn delete_bond_at(&mut self, index: usize) -> Result<Change<CascadeReport>, SessionError> {
        self.delete_bonds_at(&[index])
    }

    pub fn delete_bonds_at(
        &mut self,
        indices: &[usize],
    ) -> Result<Change<CascadeReport>, SessionError> {
        let report = self.project.delete_bonds_at(indices)?;
        Ok(self.removed(report))
    }

    pub fn delete_angle_at(&mut self, index: usize) -> Result<Change<CascadeReport>, SessionError> {
        self.delete_angles_at(&[index])
    }

    pub fn delete_angles_at(
        &mut self,
        indices: &[usize],
    ) -> Result<Change<CascadeReport>, SessionError> {
        let report = self.project.delete_angles_at(indices)?;
        Ok(self.removed(report))
    }

    pub fn delete_group_at(&mut self, index: usize) -> Result<Change<CascadeReport>, SessionError> {
        self.delete_groups_at(&[index])
    }

    pub fn delete_groups_at(
        &mut self,
        indices: &[usize],
    ) -> Result<Change<CascadeReport>, SessionError> {
        let report = self.project.delete_groups_at(indices)?;
        Ok(self.removed(report))
    }

    fn added(&mut self, outcome: AddOutcome) -> Change<AddOutcome> {
        if outcome.status != AddStatus::Kept {
            self.dirty = true;
        }
        self.changed(outcome)
    }

    fn removed(&mut self, report: CascadeReport) -> Change<CascadeReport> {
        if !report.bonds.is_empty() || !report.angles.is_empty() || !report.groups.is_empty() {
            self.dirty = true;
        }
        self.changed(report)
    }

    fn changed<T>(&self, outcome: T) -> Change<T> {
        Change {
            outcome,
            snapshot: self.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::resolver::Resolution;
    use std::fs;
    use tempfile::tempdir;

    const WATER: &str = "Bonds\nO - H1\t0.96\nO - H2\t0.96\n\nAngles\nH1 - O - H2\t104.5\n\nMolecule\nH1 - O - H2\n\nRadius\n1.5\n";

    fn session() -> Session {
        Session::new(Arc::new(ElectronegativityTable::builtin()))
    }

    fn water(session: &mut Session) {
        session.add_bond("O", "H1", 0.96, &Resolution::Keep).unwrap();
        session.add_bond("O", "H2", 0.96, &Resolution::Keep).unwrap();
        session.add_angle("H1", "O", "H2", 104.5, &Resolution::Keep).unwrap();
        session.add_group("H1", "O", "H2").unwrap();
    }

    #[test]
    fn mutators_return_fresh_snapshots() {
        let mut s = session();
        let change = s.add_bond("O", "H1", 0.96, &Resolution::Keep).unwrap();
        assert_eq!(change.outcome.status, AddStatus::Inserted);
        assert_eq!(change.snapshot.bonds.len(), 1);
        assert_eq!(change.snapshot.atoms.len(), 2);

        s.add_bond("O", "H2", 0.96, &Resolution::Keep).unwrap();
        s.add_angle("H1", "O", "H2", 104.5, &Resolution::Keep).unwrap();
        let change = s.add_group("H2", "O", "H1").unwrap();
        assert_eq!(change.outcome, 0);
        assert!(change.snapshot.derived.aggregate_dipole.is_some());

        let change = s.delete_bond_at(0).unwrap();
        assert_eq!(change.outcome.angles.len(), 1);
        assert!(change.snapshot.angles.is_empty());
        assert!(change.snapshot.group.is_empty());
        assert_eq!(change.snapshot, s.snapshot());
    }

    #[test]
    fn unknown_token_is_rejected() {
        let mut s = session();
        let err = s.add_bond("Xe", "H1", 1.0, &Resolution::Keep).unwrap_err();
        assert!(matches!(err, SessionError::Project(ProjectError::UnknownElement(_))));
        assert!(!s.is_dirty());
    }

    #[test]
    fn dirty_flag_tracks_unsaved_changes() {
        let dir = tempdir().unwrap();
        let mut s = session();
        assert!(!s.is_dirty());

        water(&mut s);
        assert!(s.is_dirty());

        s.save_project(Some(&dir.path().join("water.txt"))).unwrap();
        assert!(!s.is_dirty());

        s.add_bond("H1", "O", 2.0, &Resolution::Keep).unwrap();
        assert!(!s.is_dirty(), "keeping an existing bond changes nothing");

        s.set_radius(Some(1.5));
        assert!(s.is_dirty());

        s.new_project();
        assert!(!s.is_dirty());
        assert!(s.project().is_empty());
    }

    #[test]
    fn save_without_path_needs_a_remembered_file() {
        let dir = tempdir().unwrap();
        let mut s = session();
        water(&mut s);

        assert!(matches!(s.save_project(None), Err(SessionError::NoSavedPath)));

        let path = dir.path().join("water.txt");
        assert_eq!(s.save_project(Some(&path)).unwrap(), path);
        assert_eq!(s.saved_path(), Some(path.as_path()));

        s.set_radius(Some(1.5));
        assert_eq!(s.save_project(None).unwrap(), path);
        assert_eq!(fs::read_to_string(&path).unwrap(), WATER);
    }

    #[test]
    fn open_text_project_remembers_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("water.txt");
        fs::write(&path, WATER).unwrap();

        let mut s = session();
        let snapshot = s.open_project(&path).unwrap();
        assert_eq!(snapshot.bonds.len(), 2);
        assert_eq!(snapshot.radius, Some(1.5));
        assert!(snapshot.derived.polarization.is_some());
        assert_eq!(s.saved_path(), Some(path.as_path()));
        assert!(!s.is_dirty());
    }

    #[test]
    fn open_cml_does_not_become_save_target() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("co.cml");
        fs::write(
            &path,
            r#"<molecule><atomArray>
                 <atom id="a1" elementType="C" x3="0" y3="0" z3="0"/>
                 <atom id="a2" elementType="O" x3="1.128" y3="0" z3="0"/>
               </atomArray><bondArray><bond atomRefs2="a1 a2"/></bondArray></molecule>"#,
        )
        .unwrap();

        let mut s = session();
        let snapshot = s.open_project(&path).unwrap();
        assert_eq!(snapshot.bonds[0].length, 1.128);
        assert_eq!(s.saved_path(), None);
        assert!(matches!(s.save_project(None), Err(SessionError::NoSavedPath)));
    }

    #[test]
    fn failed_open_leaves_an_empty_project() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.txt");
        fs::write(&path, "Bonds\nO - H1\t0.96\n\nAngels\n").unwrap();

        let mut s = session();
        water(&mut s);
        let err = s.open_project(&path).unwrap_err();
        assert!(matches!(err, SessionError::Codec(CodecError::CorruptedFile { .. })));
        assert!(s.project().is_empty());
        assert_eq!(s.saved_path(), None);
    }

    #[test]
    fn previews_resolve_tokens() {
        let mut s = session();
        water(&mut s);
        assert!((s.preview_bond_dipole("O", "H3", 1.0).unwrap() - 1.24).abs() < 1e-9);
        assert!(s.preview_angle_dipole("H1", "O", "H2", 90.0).unwrap().is_some());
        assert_eq!(s.preview_angle_dipole("H1", "O", "H3", 90.0).unwrap(), None);
        assert!(s.preview_bond_dipole("Q", "H", 1.0).is_err());
    }

    #[test]
    fn out_of_range_delete_is_an_error() {
        let mut s = session();
        water(&mut s);
        let before = s.snapshot();
        assert!(matches!(
            s.delete_angle_at(3),
            Err(SessionError::Project(ProjectError::IndexOutOfRange { .. }))
        ));
        assert_eq!(s.snapshot(), before);
    }
}
