use crate::constants::{Direction4, DIRECTIONS};
use crate::prototypes::RoomInstantiator;
use crate::room::{Room, RoomId};
use crate::room_connection::Connection;
use crate::section::{
    grid_neighbor, Section, SectionError, SectionId, SectionIdPool, SectionPlan,
};
use log::debug;
use std::collections::BTreeMap;

/// Owns every room and section. Rooms refer to each other and to their
/// section by id.
#[derive(Debug, Clone)]
pub struct Dungeon {
    rooms: BTreeMap<RoomId, Room>,
    sections: BTreeMap<SectionId, Section>,
    room_id: RoomId,
    section_ids: SectionIdPool,
}

impl Default for Dungeon {
    fn default() -> Self {
        Dungeon::with_section_ids(SectionIdPool::new())
    }
}

impl Dungeon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_section_ids(section_ids: SectionIdPool) -> Self {
        Dungeon {
            rooms: BTreeMap::new(),
            sections: BTreeMap::new(),
            room_id: RoomId::first(),
            section_ids,
        }
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    #[inline]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(&id)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    pub fn section_of(&self, room: RoomId) -> Option<&Section> {
        self.room(room)
            .and_then(|room| self.sections.get(&room.section_id))
    }

    /// Every section connection that nothing is attached to yet, in section
    /// order.
    pub fn open_connections(&self) -> Vec<Connection> {
        self.sections
            .values()
            .flat_map(|section| section.connections().values())
            .filter(|connection| connection.is_open(self))
            .copied()
            .collect()
    }

    /// Inserts a planned section: allocates ids, wires the grid, links the
    /// junction to the connection it was planned against, then hands each
    /// room to `instantiator`.
    ///
    /// Fails without changes when the planned-against connection was closed
    /// after planning.
    pub fn commit<I: RoomInstantiator>(
        &mut self,
        plan: SectionPlan,
        instantiator: &mut I,
    ) -> Result<SectionId, SectionError> {
        if let Some(existing) = plan.junction() {
            if self.room(existing.room_id).is_none() {
                return Err(SectionError::UnknownRoom(existing.room_id));
            }
            if !existing.is_open(self) {
                return Err(SectionError::ConnectionClosed(*existing));
            }
        }
        let (layout, planned, connection_cells, junction) = plan.into_parts();
        let section_id = self.section_ids.gen_id();

        let ids: Vec<Vec<RoomId>> = planned
            .iter()
            .map(|row| row.iter().map(|_| self.room_id.gen_id()).collect())
            .collect();

        let mut prototypes = Vec::with_capacity(layout.rows * layout.columns);
        for (row, cells) in planned.into_iter().enumerate() {
            for (column, cell) in cells.into_iter().enumerate() {
                let adjacent = DIRECTIONS
                    .iter()
                    .filter_map(|dir| {
                        grid_neighbor(row, column, layout.rows, layout.columns, *dir)
                            .map(|(r, c)| (*dir, ids[r][c]))
                    })
                    .collect();
                let id = ids[row][column];
                self.rooms.insert(
                    id,
                    Room {
                        id,
                        kind: cell.kind,
                        prototype_index: cell.prototype_index,
                        position: cell.position,
                        adjacent,
                        is_connection: cell.is_connection,
                        row,
                        column,
                        section_id,
                    },
                );
                prototypes.push((id, cell.prototype));
            }
        }

        let connections: BTreeMap<Direction4, Connection> = connection_cells
            .iter()
            .map(|(dir, (row, column))| (*dir, Connection::new(ids[*row][*column], *dir)))
            .collect();

        if let Some(existing) = junction {
            let side = existing.direction.opposite();
            if let Some(own) = connections.get(&side) {
                self.link(existing.room_id, own.room_id, existing.direction);
            }
        }

        debug!(
            "committed section {:?}: {}x{} rooms, connections {:?}",
            section_id,
            layout.rows,
            layout.columns,
            connections.keys().collect::<Vec<_>>()
        );
        self.sections.insert(
            section_id,
            Section {
                id: section_id,
                rows: layout.rows,
                columns: layout.columns,
                room_size: layout.room_size,
                rooms: ids,
                connections,
            },
        );

        for (id, prototype) in prototypes {
            if let Some(room) = self.rooms.get(&id) {
                instantiator.instantiate(room, &prototype);
            }
        }
        Ok(section_id)
    }

    /// `from` gets `to` on `dir`, `to` gets `from` on the opposite side.
    fn link(&mut self, from: RoomId, to: RoomId, dir: Direction4) {
        if let Some(room) = self.rooms.get_mut(&from) {
            room.adjacent.insert(dir, to);
        }
        if let Some(room) = self.rooms.get_mut(&to) {
            room.adjacent.insert(dir.opposite(), from);
        }
    }
}
