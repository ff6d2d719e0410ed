use crate::constants::Direction4;
use crate::room_connection::ConnectionOptions;
use rand::Rng;

/// Which cell along each requested side is that side's connection point.
/// South and north hold column indices, east and west hold row indices.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ConnectionIndices {
    pub north: Option<usize>,
    pub east: Option<usize>,
    pub south: Option<usize>,
    pub west: Option<usize>,
}

impl ConnectionIndices {
    /// South draws from `[1, columns - 1]`, north from `[0, columns - 1]`,
    /// east and west from `[1, rows - 2]`. The ranges are kept as they were
    /// shipped even though they are not symmetric.
    pub fn new<R: Rng>(
        options: &ConnectionOptions,
        columns: usize,
        rows: usize,
        rng: &mut R,
    ) -> Self {
        let mut indices = ConnectionIndices::default();
        if options.connect_south {
            indices.south = Some(range_or_min(rng, 1, columns));
        }
        if options.connect_north {
            indices.north = Some(range_or_min(rng, 0, columns));
        }
        if options.connect_east {
            indices.east = Some(range_or_min(rng, 1, rows.saturating_sub(1)));
        }
        if options.connect_west {
            indices.west = Some(range_or_min(rng, 1, rows.saturating_sub(1)));
        }
        indices
    }

    pub fn get(&self, dir: Direction4) -> Option<usize> {
        match dir {
            Direction4::North => self.north,
            Direction4::East => self.east,
            Direction4::South => self.south,
            Direction4::West => self.west,
        }
    }
}

/// Uniform integer in `[min, max_exclusive)`, or `min` when the range is empty.
fn range_or_min<R: Rng>(rng: &mut R, min: usize, max_exclusive: usize) -> usize {
    if max_exclusive <= min {
        min
    } else {
        rng.gen_range(min..max_exclusive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_index_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let options = ConnectionOptions::all_directions();
        for _ in 0..500 {
            let indices = ConnectionIndices::new(&options, 6, 5, &mut rng);
            assert!((1..=5).contains(&indices.south.unwrap()));
            assert!((0..=5).contains(&indices.north.unwrap()));
            assert!((1..=3).contains(&indices.east.unwrap()));
            assert!((1..=3).contains(&indices.west.unwrap()));
        }
    }

    #[test]
    fn test_north_reaches_zero_and_south_never_does() {
        let mut rng = StdRng::seed_from_u64(11);
        let options = ConnectionOptions::all_directions();
        let samples = (0..500)
            .map(|_| ConnectionIndices::new(&options, 4, 4, &mut rng))
            .collect::<Vec<_>>();
        assert!(samples.iter().any(|indices| indices.north == Some(0)));
        assert!(samples.iter().all(|indices| indices.south != Some(0)));
    }

    #[test]
    fn test_unrequested_sides_are_absent() {
        let mut rng = StdRng::seed_from_u64(3);
        let options = ConnectionOptions {
            connect_south: true,
            ..Default::default()
        };
        let indices = ConnectionIndices::new(&options, 6, 6, &mut rng);
        assert!(indices.south.is_some());
        assert_eq!(indices.get(Direction4::North), None);
        assert_eq!(indices.get(Direction4::East), None);
        assert_eq!(indices.get(Direction4::West), None);
    }

    #[test]
    fn test_empty_range_yields_min() {
        let mut rng = StdRng::seed_from_u64(0);
        let options = ConnectionOptions::all_directions();
        let indices = ConnectionIndices::new(&options, 1, 2, &mut rng);
        assert_eq!(indices.south, Some(1));
        assert_eq!(indices.north, Some(0));
        assert_eq!(indices.east, Some(1));
        assert_eq!(indices.west, Some(1));
    }
}
