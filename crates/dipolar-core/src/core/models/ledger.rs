use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

/// An insertion-ordered collection of records with a secondary key-to-position index.
///
/// Positions are dense: the first record is at `0`, and removals renumber every later
/// record so no gaps remain. The key type decides what counts as a duplicate through its
/// `Eq`/`Hash` implementations, which is how bond and angle keys get orientation-free
/// lookup. The stored key keeps the orientation it was first inserted with.
#[derive(Debug, Clone)]
pub struct Ledger<K, V> {
    entries: Vec<(K, V)>,
    positions: HashMap<K, usize>,
}

impl<K, V> Default for Ledger<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> Ledger<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the position of the record whose key equals `key`.
    pub fn position(&self, key: &K) -> Option<usize> {
        self.positions.get(key).copied()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.positions.contains_key(key)
    }

    pub fn get(&self, index: usize) -> Option<(&K, &V)> {
        self.entries.get(index).map(|(k, v)| (k, v))
    }

    pub fn find(&self, key: &K) -> Option<&V> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    /// Appends a record under a new key.
    ///
    /// # Errors
    ///
    /// Returns `Err(existing_index)` without modifying the ledger if an equal key is
    /// already present.
    pub fn insert(&mut self, key: K, value: V) -> Result<usize, usize> {
        if let Some(existing) = self.position(&key) {
            return Err(existing);
        }
        let index = self.entries.len();
        self.positions.insert(key.clone(), index);
        self.entries.push((key, value));
        Ok(index)
    }

    /// Replaces the value at `index` in place, keeping its key and position.
    pub fn replace(&mut self, index: usize, value: V) -> Option<V> {
        self.entries
            .get_mut(index)
            .map(|(_, slot)| std::mem::replace(slot, value))
    }

    /// Removes every record whose position is in `indices` and renumbers once.
    ///
    /// Out-of-range positions are ignored. The removed records are returned in their
    /// former ledger order.
    pub fn remove_indices(&mut self, indices: &BTreeSet<usize>) -> Vec<(K, V)> {
        if indices.is_empty() {
            return Vec::new();
        }
        let mut removed = Vec::with_capacity(indices.len());
        let mut kept = Vec::with_capacity(self.entries.len().saturating_sub(indices.len()));
        for (i, entry) in std::mem::take(&mut self.entries).into_iter().enumerate() {
            if indices.contains(&i) {
                removed.push(entry);
            } else {
                kept.push(entry);
            }
        }
        self.entries = kept;
        self.reindex();
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    fn reindex(&mut self) {
        self.positions.clear();
        for (i, (key, _)) in self.entries.iter().enumerate() {
            self.positions.insert(key.clone(), i);
        }
    }
}
