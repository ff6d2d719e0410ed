use crate::constants::Direction4;
use crate::section::SectionId;
use nalgebra::Vector2;
use std::collections::BTreeMap;

/// Structural class of a cell, decided by where it sits in its section grid.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum RoomKind {
    Inner,
    EdgeNorth,
    EdgeSouth,
    EdgeEast,
    EdgeWest,
    CornerNE,
    CornerNW,
    CornerSE,
    CornerSW,
}

impl RoomKind {
    /// Row 0 is the south edge and column 0 the east edge. Corners win over
    /// edges, south wins over north on a single row and east wins over west
    /// on a single column.
    pub fn classify(row: usize, column: usize, rows: usize, columns: usize) -> RoomKind {
        let row_edge = if row == 0 {
            Some(Direction4::South)
        } else if row + 1 == rows {
            Some(Direction4::North)
        } else {
            None
        };
        let column_edge = if column == 0 {
            Some(Direction4::East)
        } else if column + 1 == columns {
            Some(Direction4::West)
        } else {
            None
        };
        match (row_edge, column_edge) {
            (Some(Direction4::North), Some(Direction4::East)) => RoomKind::CornerNE,
            (Some(Direction4::North), Some(_)) => RoomKind::CornerNW,
            (Some(_), Some(Direction4::East)) => RoomKind::CornerSE,
            (Some(_), Some(_)) => RoomKind::CornerSW,
            (Some(Direction4::North), None) => RoomKind::EdgeNorth,
            (Some(_), None) => RoomKind::EdgeSouth,
            (None, Some(Direction4::East)) => RoomKind::EdgeEast,
            (None, Some(_)) => RoomKind::EdgeWest,
            (None, None) => RoomKind::Inner,
        }
    }

    /// The side a non-corner edge cell lies on.
    pub fn edge(&self) -> Option<Direction4> {
        match self {
            RoomKind::EdgeNorth => Some(Direction4::North),
            RoomKind::EdgeSouth => Some(Direction4::South),
            RoomKind::EdgeEast => Some(Direction4::East),
            RoomKind::EdgeWest => Some(Direction4::West),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub kind: RoomKind,
    pub prototype_index: usize,
    pub position: Vector2<f32>,
    pub adjacent: BTreeMap<Direction4, RoomId>,
    pub is_connection: bool,
    pub row: usize,
    pub column: usize,
    pub section_id: SectionId,
}

impl Room {
    pub fn adjacent_room(&self, dir: Direction4) -> Option<RoomId> {
        self.adjacent.get(&dir).copied()
    }

    pub fn neighbors(&self) -> impl Iterator<Item = (Direction4, RoomId)> + '_ {
        self.adjacent.iter().map(|(dir, id)| (*dir, *id))
    }
}

#[derive(Ord, PartialOrd, PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub struct RoomId(u64);

impl RoomId {
    pub fn first() -> Self {
        RoomId(1)
    }

    pub fn gen_id(&mut self) -> Self {
        let ret = *self;
        self.0 += 1;
        ret
    }

    pub fn inner(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(rows: usize, columns: usize) -> String {
        // north row first, west column first, so the text reads like a map
        (0..rows)
            .rev()
            .map(|row| {
                (0..columns)
                    .rev()
                    .map(|column| match RoomKind::classify(row, column, rows, columns) {
                        RoomKind::Inner => '.',
                        RoomKind::EdgeNorth => 'n',
                        RoomKind::EdgeSouth => 's',
                        RoomKind::EdgeEast => 'e',
                        RoomKind::EdgeWest => 'w',
                        RoomKind::CornerNE | RoomKind::CornerNW => 'N',
                        RoomKind::CornerSE | RoomKind::CornerSW => 'S',
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_classify_grid() {
        insta::assert_snapshot!(render(4, 5), @r"
        NnnnN
        w...e
        w...e
        SsssS
        ");
    }

    #[test]
    fn test_classify_corners() {
        assert_eq!(RoomKind::classify(3, 0, 4, 5), RoomKind::CornerNE);
        assert_eq!(RoomKind::classify(3, 4, 4, 5), RoomKind::CornerNW);
        assert_eq!(RoomKind::classify(0, 0, 4, 5), RoomKind::CornerSE);
        assert_eq!(RoomKind::classify(0, 4, 4, 5), RoomKind::CornerSW);
    }

    #[test]
    fn test_classify_degenerate_grids() {
        assert_eq!(RoomKind::classify(0, 0, 1, 1), RoomKind::CornerSE);
        assert_eq!(RoomKind::classify(0, 2, 1, 4), RoomKind::EdgeSouth);
        assert_eq!(RoomKind::classify(2, 0, 4, 1), RoomKind::EdgeEast);
    }

    #[test]
    fn test_gen_id() {
        let mut pool = RoomId::first();
        let a = pool.gen_id();
        let b = pool.gen_id();
        assert_eq!(a.inner(), 1);
        assert_eq!(b.inner(), 2);
    }
}
