use crate::constants::Direction4;
use crate::dungeon::Dungeon;
use crate::room::RoomId;

/// A room on a section boundary and the side it may join another section on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Connection {
    pub room_id: RoomId,
    pub direction: Direction4,
}

impl Connection {
    pub fn new(room_id: RoomId, direction: Direction4) -> Self {
        Connection { room_id, direction }
    }

    /// True while nothing is attached on `direction`. A room missing from the
    /// dungeon has no neighbors, so it reports open.
    pub fn is_open(&self, dungeon: &Dungeon) -> bool {
        dungeon
            .room(self.room_id)
            .and_then(|room| room.adjacent_room(self.direction))
            .is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionOptions {
    pub connect_north: bool,
    pub connect_east: bool,
    pub connect_south: bool,
    pub connect_west: bool,
    pub existing_connection: Option<Connection>,
}

impl ConnectionOptions {
    pub fn all_directions() -> Self {
        ConnectionOptions {
            connect_north: true,
            connect_east: true,
            connect_south: true,
            connect_west: true,
            existing_connection: None,
        }
    }

    pub fn attached_to(connection: Connection) -> Self {
        ConnectionOptions {
            existing_connection: Some(connection),
            ..Default::default()
        }
    }

    pub fn disable_all_directions(&mut self) {
        self.connect_north = false;
        self.connect_east = false;
        self.connect_south = false;
        self.connect_west = false;
    }

    pub fn is_requested(&self, dir: Direction4) -> bool {
        match dir {
            Direction4::North => self.connect_north,
            Direction4::East => self.connect_east,
            Direction4::South => self.connect_south,
            Direction4::West => self.connect_west,
        }
    }

    pub fn set(&mut self, dir: Direction4, connect: bool) {
        match dir {
            Direction4::North => self.connect_north = connect,
            Direction4::East => self.connect_east = connect,
            Direction4::South => self.connect_south = connect,
            Direction4::West => self.connect_west = connect,
        }
    }

    /// A section built against an existing connection always connects back
    /// toward it.
    pub(crate) fn force_junction(&mut self) -> Option<Direction4> {
        let junction = self.existing_connection?.direction.opposite();
        self.set(junction, true);
        Some(junction)
    }
}
