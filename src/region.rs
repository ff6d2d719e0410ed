use crate::dungeon::Dungeon;
use crate::room::RoomId;
use pathfinding::prelude::dijkstra_all;
use std::collections::BTreeSet;

/// Three rings of rooms around a point of interest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    adjacent: BTreeSet<RoomId>,
    near: BTreeSet<RoomId>,
    outer: BTreeSet<RoomId>,
    all: BTreeSet<RoomId>,
}

impl Region {
    pub fn new(
        adjacent: BTreeSet<RoomId>,
        near: BTreeSet<RoomId>,
        outer: BTreeSet<RoomId>,
    ) -> Self {
        let all = adjacent
            .iter()
            .chain(near.iter())
            .chain(outer.iter())
            .copied()
            .collect();
        Region {
            adjacent,
            near,
            outer,
            all,
        }
    }

    /// Rooms one, two and three doors away from `center`.
    pub fn around(dungeon: &Dungeon, center: RoomId) -> Self {
        let reached = dijkstra_all(&center, |id: &RoomId| {
            dungeon
                .room(*id)
                .map(|room| room.neighbors().map(|(_, next)| (next, 1u32)).collect())
                .unwrap_or_else(Vec::new)
        });
        let ring = |hops: u32| {
            reached
                .iter()
                .filter(|(_, (_, cost))| *cost == hops)
                .map(|(id, _)| *id)
                .collect::<BTreeSet<_>>()
        };
        Region::new(ring(1), ring(2), ring(3))
    }

    pub fn adjacent(&self) -> &BTreeSet<RoomId> {
        &self.adjacent
    }

    pub fn near(&self) -> &BTreeSet<RoomId> {
        &self.near
    }

    pub fn outer(&self) -> &BTreeSet<RoomId> {
        &self.outer
    }

    pub fn contains(&self, room: &RoomId) -> bool {
        self.all.contains(room)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.all.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn iter(&self) -> std::collections::btree_set::Iter<'_, RoomId> {
        self.all.iter()
    }
}

impl<'a> IntoIterator for &'a Region {
    type Item = &'a RoomId;
    type IntoIter = std::collections::btree_set::Iter<'a, RoomId>;

    fn into_iter(self) -> Self::IntoIter {
        self.all.iter()
    }
}
