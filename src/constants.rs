use nalgebra::Vector2;

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum Direction4 {
    North,
    East,
    South,
    West,
}

pub const DIRECTIONS: &[Direction4; 4] = &[
    Direction4::North,
    Direction4::East,
    Direction4::South,
    Direction4::West,
];

impl Direction4 {
    pub fn opposite(&self) -> Direction4 {
        match self {
            Direction4::North => Direction4::South,
            Direction4::East => Direction4::West,
            Direction4::South => Direction4::North,
            Direction4::West => Direction4::East,
        }
    }

    pub fn is_opposite(&self, other: &Direction4) -> bool {
        self.opposite() == *other
    }

    /// Unit step in world space. North is +y, East is +x.
    pub fn to_vec2(&self) -> Vector2<f32> {
        match self {
            Direction4::North => Vector2::new(0.0, 1.0),
            Direction4::East => Vector2::new(1.0, 0.0),
            Direction4::South => Vector2::new(0.0, -1.0),
            Direction4::West => Vector2::new(-1.0, 0.0),
        }
    }
}
