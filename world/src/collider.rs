//! Grid-cell colliders.

use std::collections::HashSet;

use canvas_snake_core::{CellKey, ColliderTag, CollisionEvent, GridCell};

/// Named set of grid cells occupied by one entity or entity part.
///
/// Cells are stored as interned [`CellKey`] values so overlap tests are set
/// lookups. Insertion order is kept alongside the set so snapshots are
/// deterministic.
#[derive(Clone, Debug)]
pub struct SpatialCollider {
    tag: ColliderTag,
    members: HashSet<CellKey>,
    order: Vec<CellKey>,
}

impl SpatialCollider {
    /// Creates an empty collider owned by `tag`.
    #[must_use]
    pub fn new(tag: ColliderTag) -> Self {
        Self {
            tag,
            members: HashSet::new(),
            order: Vec::new(),
        }
    }

    /// Creates a collider already covering `cells`.
    #[must_use]
    pub fn with_bounds<I>(tag: ColliderTag, cells: I) -> Self
    where
        I: IntoIterator<Item = GridCell>,
    {
        let mut collider = Self::new(tag);
        collider.add_bounds(cells);
        collider
    }

    /// Tag naming the owner of this collider.
    #[must_use]
    pub const fn tag(&self) -> ColliderTag {
        self.tag
    }

    /// Merges `cells` into the bounds, skipping cells already present.
    pub fn add_bounds<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = GridCell>,
    {
        for cell in cells {
            let key = cell.key();
            if self.members.insert(key) {
                self.order.push(key);
            }
        }
    }

    /// Forgets every cell, then behaves like [`Self::add_bounds`].
    pub fn replace_bounds<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = GridCell>,
    {
        self.members.clear();
        self.order.clear();
        self.add_bounds(cells);
    }

    /// Snapshot of the occupied cells in first-insertion order.
    #[must_use]
    pub fn bounds(&self) -> &[CellKey] {
        &self.order
    }

    /// Iterator over the occupied cells decoded from their keys.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.order.iter().map(|key| key.cell())
    }

    /// Reports whether `cell` is part of the bounds.
    #[must_use]
    pub fn contains(&self, cell: GridCell) -> bool {
        self.members.contains(&cell.key())
    }

    /// Number of distinct cells covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Reports whether the collider covers no cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Tests `others` in order and reports the first one overlapping `self`.
    ///
    /// On a hit two results are appended to `out`: the first addressed to the
    /// other collider, the second addressed to `self`. Scanning stops after the
    /// first hit, so at most one pair is reported per call regardless of how
    /// many cells or colliders overlap.
    pub fn check_bounds(&self, others: &[&SpatialCollider], out: &mut Vec<CollisionEvent>) {
        let hit = others.iter().find(|other| self.overlaps(other));
        if let Some(other) = hit {
            out.push(CollisionEvent::new(other.tag, self.tag));
            out.push(CollisionEvent::new(self.tag, other.tag));
        }
    }

    fn overlaps(&self, other: &SpatialCollider) -> bool {
        other.order.iter().any(|key| self.members.contains(key))
    }
}
