use crate::core::models::angle::{Angle, AngleKey};
use crate::core::models::bond::{Bond, BondKey};

/// What to do when an add targets a bond or angle that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Overwrite the stored values in place; the ledger position is unchanged.
    Overwrite,
    /// Leave the existing record untouched.
    Keep,
}

/// The existing record and the values an add would replace it with.
#[derive(Debug, Clone, Copy)]
pub enum Conflict<'a> {
    Bond {
        key: &'a BondKey,
        existing: &'a Bond,
        proposed: &'a Bond,
    },
    Angle {
        key: &'a AngleKey,
        existing: &'a Angle,
        proposed: &'a Angle,
    },
}

/// Decision point for duplicate adds.
///
/// A front end typically implements this by asking the user; batch callers can pass a
/// fixed [`Resolution`]. Closures taking `&Conflict` also qualify.
pub trait DuplicateResolver {
    fn resolve(&self, conflict: &Conflict<'_>) -> Resolution;
}

impl DuplicateResolver for Resolution {
    fn resolve(&self, _conflict: &Conflict<'_>) -> Resolution {
        *self
    }
}

impl<F> DuplicateResolver for F
where
    F: Fn(&Conflict<'_>) -> Resolution,
{
    fn resolve(&self, conflict: &Conflict<'_>) -> Resolution {
        self(conflict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::{Atom, AtomType};

    fn conflict_parts() -> (BondKey, Bond, Bond) {
        let key = BondKey::new(
            Atom::new(AtomType::new("O"), ""),
            Atom::new(AtomType::new("H"), "1"),
        );
        (key, Bond::new(0.96, 1.19), Bond::new(1.0, 1.24))
    }

    #[test]
    fn fixed_resolution_ignores_conflict_details() {
        let (key, existing, proposed) = conflict_parts();
        let conflict = Conflict::Bond {
            key: &key,
            existing: &existing,
            proposed: &proposed,
        };
        assert_eq!(Resolution::Keep.resolve(&conflict), Resolution::Keep);
        assert_eq!(Resolution::Overwrite.resolve(&conflict), Resolution::Overwrite);
    }

    #[test]
    fn closures_can_inspect_the_conflict() {
        let (key, existing, proposed) = conflict_parts();
        let conflict = Conflict::Bond {
            key: &key,
            existing: &existing,
            proposed: &proposed,
        };
        let longer_wins = |c: &Conflict<'_>| match c {
            Conflict::Bond {
                existing, proposed, ..
            } if proposed.length > existing.length => Resolution::Overwrite,
            _ => Resolution::Keep,
        };
        assert_eq!(longer_wins.resolve(&conflict), Resolution::Overwrite);
    }
}
