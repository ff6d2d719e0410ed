use crate::constants::Direction4;
use crate::room::RoomId;
use std::cmp::Ordering;

/// Steps taken through the room graph, most recent on top.
///
/// Paths compare by length only: two different routes of the same length are
/// equal. A missing path is best expressed as `Option<Path>`, whose ordering
/// puts `None` below every path.
#[derive(Debug, Clone, Default)]
pub struct Path {
    steps: Vec<(Direction4, RoomId)>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, dir: Direction4, room: RoomId) {
        self.steps.push((dir, room));
    }

    pub fn pop(&mut self) -> Option<(Direction4, RoomId)> {
        self.steps.pop()
    }

    /// The most recent step.
    pub fn peek(&self) -> Option<&(Direction4, RoomId)> {
        self.steps.last()
    }

    /// The oldest step.
    pub fn peek_last(&self) -> Option<&(Direction4, RoomId)> {
        self.steps.first()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Oldest step first.
    pub fn iter(&self) -> std::slice::Iter<'_, (Direction4, RoomId)> {
        self.steps.iter()
    }
}

/// The last element of `steps` becomes the top of the path.
impl From<Vec<(Direction4, RoomId)>> for Path {
    fn from(steps: Vec<(Direction4, RoomId)>) -> Self {
        Path { steps }
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
    }
}

impl Eq for Path {}

impl PartialOrd for Path {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Path {
    fn cmp(&self, other: &Self) -> Ordering {
        self.len().cmp(&other.len())
    }
}
