use super::angle::AngleKey;
use std::collections::BTreeSet;

/// The ordered list of angles whose dipoles make up the whole-molecule estimate.
///
/// Members reference angles by key rather than by ledger position, so angle renumbering
/// never invalidates them. The same angle may appear more than once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupCollection {
    members: Vec<AngleKey>,
}

impl GroupCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AngleKey> {
        self.members.get(index)
    }

    pub fn push(&mut self, key: AngleKey) -> usize {
        self.members.push(key);
        self.members.len() - 1
    }

    /// Positions of every member referencing `key`.
    pub fn positions_of<'a>(&'a self, key: &'a AngleKey) -> impl Iterator<Item = usize> + 'a {
        self.members
            .iter()
            .enumerate()
            .filter(move |(_, member)| *member == key)
            .map(|(i, _)| i)
    }

    pub fn remove_indices(&mut self, indices: &BTreeSet<usize>) -> Vec<AngleKey> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.members.len());
        for (i, member) in std::mem::take(&mut self.members).into_iter().enumerate() {
            if indices.contains(&i) {
                removed.push(member);
            } else {
                kept.push(member);
            }
        }
        self.members = kept;
        removed
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &AngleKey> {
        self.members.iter()
    }
}
