use crate::room::{Room, RoomKind};

/// Handle to an interchangeable visual for a room. The core only carries the
/// name through; what it maps to is up to the [`RoomInstantiator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomPrototype {
    pub name: String,
}

impl RoomPrototype {
    pub fn new(name: impl Into<String>) -> Self {
        RoomPrototype { name: name.into() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RoomPrototypes {
    pub inner: Vec<RoomPrototype>,
    pub edge_north: Vec<RoomPrototype>,
    pub edge_south: Vec<RoomPrototype>,
    pub edge_east: Vec<RoomPrototype>,
    pub edge_west: Vec<RoomPrototype>,
    pub corner_ne: Vec<RoomPrototype>,
    pub corner_nw: Vec<RoomPrototype>,
    pub corner_se: Vec<RoomPrototype>,
    pub corner_sw: Vec<RoomPrototype>,
}

impl RoomPrototypes {
    /// One prototype per category, named after the category.
    pub fn single() -> Self {
        let one = |name: &str| vec![RoomPrototype::new(name)];
        RoomPrototypes {
            inner: one("inner"),
            edge_north: one("edge_north"),
            edge_south: one("edge_south"),
            edge_east: one("edge_east"),
            edge_west: one("edge_west"),
            corner_ne: one("corner_ne"),
            corner_nw: one("corner_nw"),
            corner_se: one("corner_se"),
            corner_sw: one("corner_sw"),
        }
    }

    pub fn get(&self, kind: RoomKind) -> &[RoomPrototype] {
        match kind {
            RoomKind::Inner => &self.inner,
            RoomKind::EdgeNorth => &self.edge_north,
            RoomKind::EdgeSouth => &self.edge_south,
            RoomKind::EdgeEast => &self.edge_east,
            RoomKind::EdgeWest => &self.edge_west,
            RoomKind::CornerNE => &self.corner_ne,
            RoomKind::CornerNW => &self.corner_nw,
            RoomKind::CornerSE => &self.corner_se,
            RoomKind::CornerSW => &self.corner_sw,
        }
    }
}

/// Called once for every committed room, after its position is final.
pub trait RoomInstantiator {
    fn instantiate(&mut self, room: &Room, prototype: &RoomPrototype);
}

impl RoomInstantiator for () {
    fn instantiate(&mut self, _room: &Room, _prototype: &RoomPrototype) {}
}
