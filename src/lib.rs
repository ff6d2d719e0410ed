pub mod connection_indices;
pub mod constants;
pub mod dungeon;
pub mod gen;
pub mod navigation;
pub mod ordered_collection;
pub mod path;
pub mod priority_queue;
pub mod prototypes;
pub mod region;
pub mod room;
pub mod room_connection;
pub mod section;

pub use constants::{Direction4, DIRECTIONS};
pub use dungeon::Dungeon;
pub use gen::{generate_dungeon, DungeonGeneratorConfig, DungeonGeneratorError};
pub use room::{Room, RoomId, RoomKind};
pub use room_connection::{Connection, ConnectionOptions};
pub use section::{Section, SectionError, SectionId, SectionLayout};
