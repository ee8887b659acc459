//! Insertion-ordered set of tile coordinates.

use std::collections::HashSet;

use crate::hex::Offset;

/// A set of tile coordinates that remembers insertion order.
///
/// Every "first found" tie-break in the engine walks one of these, so order
/// must survive removals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileSet {
    order: Vec<Offset>,
    members: HashSet<Offset>,
}

impl TileSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a coordinate. Returns `false` if it was already present.
    pub fn insert(&mut self, coord: Offset) -> bool {
        if self.members.insert(coord) {
            self.order.push(coord);
            true
        } else {
            false
        }
    }

    /// Remove a coordinate, keeping the order of the rest. Returns `false` if absent.
    pub fn remove(&mut self, coord: Offset) -> bool {
        if !self.members.remove(&coord) {
            return false;
        }
        if let Some(idx) = self.order.iter().position(|&c| c == coord) {
            self.order.remove(idx);
        }
        true
    }

    /// Membership test.
    #[must_use]
    pub fn contains(&self, coord: Offset) -> bool {
        self.members.contains(&coord)
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// First inserted member still present.
    #[must_use]
    pub fn first(&self) -> Option<Offset> {
        self.order.first().copied()
    }

    /// Members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Offset> + '_ {
        self.order.iter().copied()
    }

    /// Members in insertion order, as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Offset] {
        &self.order
    }
}

impl<'a> IntoIterator for &'a TileSet {
    type Item = Offset;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Offset>>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter().copied()
    }
}
