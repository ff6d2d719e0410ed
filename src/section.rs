use crate::connection_indices::ConnectionIndices;
use crate::constants::{Direction4, DIRECTIONS};
use crate::dungeon::Dungeon;
use crate::prototypes::{RoomInstantiator, RoomPrototype, RoomPrototypes};
use crate::room::{RoomId, RoomKind};
use crate::room_connection::{Connection, ConnectionOptions};
use log::{debug, trace};
use nalgebra::Vector2;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Ord, PartialOrd, PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub struct SectionId(u64);

impl SectionId {
    pub fn inner(&self) -> u64 {
        self.0
    }
}

/// Monotonic source of section ids. Ids are never reused.
#[derive(Debug, Clone, Default)]
pub struct SectionIdPool {
    next: u64,
}

impl SectionIdPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(first: u64) -> Self {
        SectionIdPool { next: first }
    }

    pub fn gen_id(&mut self) -> SectionId {
        let ret = SectionId(self.next);
        self.next += 1;
        ret
    }

    pub fn peek(&self) -> SectionId {
        SectionId(self.next)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SectionLayout {
    pub rows: usize,
    pub columns: usize,
    pub room_size: Vector2<f32>, // width (x) and height (y) of a single room
    pub origin: Vector2<f32>,    // world position of the south-east corner room
}

impl SectionLayout {
    pub fn new(rows: usize, columns: usize, room_size: Vector2<f32>) -> Self {
        SectionLayout {
            rows,
            columns,
            room_size,
            origin: Vector2::zeros(),
        }
    }

    /// Grid position relative to the origin. Columns grow westward.
    fn cell_offset(&self, row: usize, column: usize) -> Vector2<f32> {
        Vector2::new(
            -(column as f32) * self.room_size.x,
            row as f32 * self.room_size.y,
        )
    }
}

#[derive(Debug, Error)]
pub enum SectionError {
    #[error("section grid must have at least one row and column, got {rows}x{columns}")]
    EmptyGrid { rows: usize, columns: usize },
    #[error("no room prototypes available for {0:?}")]
    MissingPrototypes(RoomKind),
    #[error("existing connection refers to unknown room {0:?}")]
    UnknownRoom(RoomId),
    #[error("no connection room on the {0:?} side to attach to the existing connection")]
    JunctionNotFound(Direction4),
    #[error("existing connection {0:?} already has a room attached")]
    ConnectionClosed(Connection),
}

#[derive(Debug, Clone)]
pub struct PlannedRoom {
    pub kind: RoomKind,
    pub prototype_index: usize,
    pub prototype: RoomPrototype,
    pub position: Vector2<f32>,
    pub is_connection: bool,
    pub row: usize,
    pub column: usize,
}

/// A fully laid out section that has not touched the dungeon yet.
#[derive(Debug, Clone)]
pub struct SectionPlan {
    layout: SectionLayout,
    rooms: Vec<Vec<PlannedRoom>>,
    connections: BTreeMap<Direction4, (usize, usize)>,
    junction: Option<Connection>,
}

impl SectionPlan {
    pub fn rooms(&self) -> &[Vec<PlannedRoom>] {
        &self.rooms
    }

    pub fn room_count(&self) -> usize {
        self.layout.rows * self.layout.columns
    }

    /// Grid cell (row, column) of the connection room on each side.
    pub fn connections(&self) -> &BTreeMap<Direction4, (usize, usize)> {
        &self.connections
    }

    /// The connection of an earlier section this plan attaches to.
    pub fn junction(&self) -> Option<&Connection> {
        self.junction.as_ref()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        SectionLayout,
        Vec<Vec<PlannedRoom>>,
        BTreeMap<Direction4, (usize, usize)>,
        Option<Connection>,
    ) {
        (self.layout, self.rooms, self.connections, self.junction)
    }

    pub fn bounds(&self) -> [Vector2<f32>; 4] {
        let last_row = &self.rooms[self.rooms.len() - 1];
        let first_row = &self.rooms[0];
        corner_bounds(
            [
                last_row[last_row.len() - 1].position,
                last_row[0].position,
                first_row[0].position,
                first_row[first_row.len() - 1].position,
            ],
            self.layout.room_size,
        )
    }

    /// Whether the plan's footprint intersects `other`, after shrinking both
    /// by `margin` on every side. Flush neighbours whose shared edge drifted
    /// by float rounding still count as touching, not overlapping.
    pub fn overlaps(&self, other: &[Vector2<f32>; 4], margin: f32) -> bool {
        let (self_min, self_max) = extent(&self.bounds());
        let (other_min, other_max) = extent(other);
        let margin = margin + self.layout.room_size.max() * OVERLAP_SLACK;
        self_min.x + margin < other_max.x - margin
            && other_min.x + margin < self_max.x - margin
            && self_min.y + margin < other_max.y - margin
            && other_min.y + margin < self_max.y - margin
    }
}

/// Fraction of a room's size absorbed as rounding error by [`SectionPlan::overlaps`].
const OVERLAP_SLACK: f32 = 1e-4;

/// A rectangular block of rooms, stored as room ids in the owning [`Dungeon`].
///
/// `rooms[row][column]`: row 0 is the south edge and column 0 the east edge.
#[derive(Debug, Clone)]
pub struct Section {
    pub(crate) id: SectionId,
    pub(crate) rows: usize,
    pub(crate) columns: usize,
    pub(crate) room_size: Vector2<f32>,
    pub(crate) rooms: Vec<Vec<RoomId>>,
    pub(crate) connections: BTreeMap<Direction4, Connection>,
}

impl Section {
    /// Plans a section and commits it to `dungeon`. Nothing is committed when
    /// an error is returned.
    pub fn build<R, I>(
        dungeon: &mut Dungeon,
        layout: SectionLayout,
        prototypes: &RoomPrototypes,
        options: ConnectionOptions,
        rng: &mut R,
        instantiator: &mut I,
    ) -> Result<SectionId, SectionError>
    where
        R: Rng,
        I: RoomInstantiator,
    {
        let plan = Section::plan(dungeon, layout, prototypes, options, rng)?;
        dungeon.commit(plan, instantiator)
    }

    pub fn plan<R: Rng>(
        dungeon: &Dungeon,
        layout: SectionLayout,
        prototypes: &RoomPrototypes,
        mut options: ConnectionOptions,
        rng: &mut R,
    ) -> Result<SectionPlan, SectionError> {
        if layout.rows == 0 || layout.columns == 0 {
            return Err(SectionError::EmptyGrid {
                rows: layout.rows,
                columns: layout.columns,
            });
        }

        let junction_side = options.force_junction();
        let indices = ConnectionIndices::new(&options, layout.columns, layout.rows, rng);
        debug!(
            "planning {}x{} section, indices {:?}",
            layout.rows, layout.columns, indices
        );

        let mut rooms = Vec::with_capacity(layout.rows);
        for row in 0..layout.rows {
            let mut cells = Vec::with_capacity(layout.columns);
            for column in 0..layout.columns {
                let kind = RoomKind::classify(row, column, layout.rows, layout.columns);
                let is_connection = kind.edge().is_some_and(|side| {
                    let along = match side {
                        Direction4::North | Direction4::South => column,
                        Direction4::East | Direction4::West => row,
                    };
                    options.is_requested(side) && indices.get(side) == Some(along)
                });
                let candidates = prototypes.get(kind);
                if candidates.is_empty() {
                    return Err(SectionError::MissingPrototypes(kind));
                }
                let prototype_index = rng.gen_range(0..candidates.len());
                cells.push(PlannedRoom {
                    kind,
                    prototype_index,
                    prototype: candidates[prototype_index].clone(),
                    position: layout.origin + layout.cell_offset(row, column),
                    is_connection,
                    row,
                    column,
                });
            }
            rooms.push(cells);
        }

        let connections = find_connections(&rooms, &options);

        let mut plan = SectionPlan {
            layout,
            rooms,
            connections,
            junction: None,
        };
        if let (Some(existing), Some(side)) = (options.existing_connection, junction_side) {
            stitch(dungeon, &mut plan, existing, side)?;
        }
        Ok(plan)
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rooms(&self) -> &[Vec<RoomId>] {
        &self.rooms
    }

    pub fn room_at(&self, row: usize, column: usize) -> Option<RoomId> {
        self.rooms.get(row)?.get(column).copied()
    }

    pub fn connections(&self) -> &BTreeMap<Direction4, Connection> {
        &self.connections
    }

    pub fn connection(&self, dir: Direction4) -> Option<&Connection> {
        self.connections.get(&dir)
    }

    pub fn flattened_rooms(&self) -> Vec<RoomId> {
        self.rooms.iter().flatten().copied().collect()
    }

    /// World corners of the grid as `[north_west, north_east, south_east,
    /// south_west]`. `None` if the corner rooms are not in `dungeon`.
    pub fn bounds(&self, dungeon: &Dungeon) -> Option<[Vector2<f32>; 4]> {
        let last_row = self.rows - 1;
        let last_column = self.columns - 1;
        let position = |row: usize, column: usize| {
            self.room_at(row, column)
                .and_then(|id| dungeon.room(id))
                .map(|room| room.position)
        };
        Some(corner_bounds(
            [
                position(last_row, last_column)?,
                position(last_row, 0)?,
                position(0, 0)?,
                position(0, last_column)?,
            ],
            self.room_size,
        ))
    }

    /// For each connection, the section on its far side, or `None` while the
    /// connection is still open.
    pub fn adjacent_sections(&self, dungeon: &Dungeon) -> BTreeMap<Direction4, Option<SectionId>> {
        self.connections
            .iter()
            .map(|(dir, connection)| {
                let neighbor = dungeon
                    .room(connection.room_id)
                    .and_then(|room| room.adjacent_room(connection.direction))
                    .and_then(|id| dungeon.room(id))
                    .map(|room| room.section_id);
                (*dir, neighbor)
            })
            .collect()
    }
}

fn find_connections(
    rooms: &[Vec<PlannedRoom>],
    options: &ConnectionOptions,
) -> BTreeMap<Direction4, (usize, usize)> {
    let rows = rooms.len();
    let columns = rooms[0].len();
    let mut connections = BTreeMap::new();
    for dir in DIRECTIONS.iter().filter(|dir| options.is_requested(**dir)) {
        let boundary: Vec<(usize, usize)> = match dir {
            Direction4::South => (0..columns).map(|c| (0, c)).collect(),
            Direction4::North => (0..columns).map(|c| (rows - 1, c)).collect(),
            Direction4::East => (0..rows).map(|r| (r, 0)).collect(),
            Direction4::West => (0..rows).map(|r| (r, columns - 1)).collect(),
        };
        // absent when the flagged cell landed on a corner
        if let Some(cell) = boundary.into_iter().find(|(r, c)| {
            let room = &rooms[*r][*c];
            room.is_connection && room.kind.edge() == Some(*dir)
        }) {
            connections.insert(*dir, cell);
        }
    }
    connections
}

/// Moves every planned room so that the junction room sits one step past the
/// existing connection room, walking outward from the junction.
fn stitch(
    dungeon: &Dungeon,
    plan: &mut SectionPlan,
    existing: Connection,
    side: Direction4,
) -> Result<(), SectionError> {
    let anchor = dungeon
        .room(existing.room_id)
        .ok_or(SectionError::UnknownRoom(existing.room_id))?;
    if !existing.is_open(dungeon) {
        return Err(SectionError::ConnectionClosed(existing));
    }
    let (junction_row, junction_column) = *plan
        .connections
        .get(&side)
        .ok_or(SectionError::JunctionNotFound(side))?;

    let room_size = plan.layout.room_size;
    let step = |dir: Direction4| dir.to_vec2().component_mul(&room_size);
    plan.rooms[junction_row][junction_column].position =
        anchor.position + step(existing.direction);

    let rows = plan.layout.rows;
    let columns = plan.layout.columns;
    let mut visited = BTreeSet::new();
    let mut stack = vec![(junction_row, junction_column)];
    visited.insert((junction_row, junction_column));
    while let Some((row, column)) = stack.pop() {
        let position = plan.rooms[row][column].position;
        for dir in DIRECTIONS {
            let Some(next) = grid_neighbor(row, column, rows, columns, *dir) else {
                continue;
            };
            if !visited.insert(next) {
                continue;
            }
            let room = &mut plan.rooms[next.0][next.1];
            room.position = position + step(*dir);
            trace!("placed ({}, {}) at {:?}", next.0, next.1, room.position);
            stack.push(next);
        }
    }

    debug!(
        "stitched {:?} side at ({}, {}) onto {:?}",
        side, junction_row, junction_column, existing
    );
    plan.junction = Some(existing);
    Ok(())
}

pub(crate) fn grid_neighbor(
    row: usize,
    column: usize,
    rows: usize,
    columns: usize,
    dir: Direction4,
) -> Option<(usize, usize)> {
    match dir {
        Direction4::North => (row + 1 < rows).then_some((row + 1, column)),
        Direction4::South => row.checked_sub(1).map(|r| (r, column)),
        Direction4::East => column.checked_sub(1).map(|c| (row, c)),
        Direction4::West => (column + 1 < columns).then_some((row, column + 1)),
    }
}

/// Corner room centres in `[nw, ne, se, sw]` order to outer grid corners.
fn corner_bounds(centres: [Vector2<f32>; 4], room_size: Vector2<f32>) -> [Vector2<f32>; 4] {
    let half = room_size / 2.0;
    [
        centres[0] + Vector2::new(-half.x, half.y),
        centres[1] + Vector2::new(half.x, half.y),
        centres[2] + Vector2::new(half.x, -half.y),
        centres[3] + Vector2::new(-half.x, -half.y),
    ]
}

fn extent(bounds: &[Vector2<f32>; 4]) -> (Vector2<f32>, Vector2<f32>) {
    let mut min = bounds[0];
    let mut max = bounds[0];
    for corner in &bounds[1..] {
        min = min.inf(corner);
        max = max.sup(corner);
    }
    (min, max)
}
