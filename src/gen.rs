use crate::constants::DIRECTIONS;
use crate::dungeon::Dungeon;
use crate::prototypes::{RoomInstantiator, RoomPrototypes};
use crate::room_connection::ConnectionOptions;
use crate::section::{Section, SectionError, SectionLayout};
use log::{debug, warn};
use nalgebra::Vector2;
use rand::prelude::SliceRandom;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use thiserror::Error;

pub struct DungeonGeneratorConfig {
    pub seed: Option<u64>, // Seed value for random dungeon generation
    pub room_target: usize,
    pub section_rows_range: RangeInclusive<usize>,
    pub section_columns_range: RangeInclusive<usize>,
    pub room_size: Vector2<f32>,
    pub connection_probability: f64, // Chance of requesting each non-junction side
    pub max_attempts: usize,
    pub section_margin: f32, // Overlap tolerated on each side of neighboring section bounds
}

impl Default for DungeonGeneratorConfig {
    fn default() -> Self {
        DungeonGeneratorConfig {
            seed: None,
            room_target: 60,
            section_rows_range: 3..=6,
            section_columns_range: 3..=6,
            room_size: Vector2::new(10.0, 10.0),
            connection_probability: 0.5,
            max_attempts: 200,
            section_margin: 0.0,
        }
    }
}

#[derive(Debug)]
pub struct DungeonGeneratorResult {
    pub dungeon: Dungeon,
}

#[derive(Debug, Error)]
pub enum DungeonGeneratorError {
    #[error("room target must be positive")]
    ZeroRoomTarget,
    #[error("section rows or columns range is empty or starts at zero")]
    EmptySectionRange,
    #[error("room size must be positive")]
    NonPositiveRoomSize,
    #[error("connection probability {0} is outside [0, 1]")]
    InvalidConnectionProbability(f64),
    #[error(transparent)]
    Section(#[from] SectionError),
}

pub fn generate_dungeon(
    config: DungeonGeneratorConfig,
    prototypes: &RoomPrototypes,
) -> Result<DungeonGeneratorResult, DungeonGeneratorError> {
    generate_dungeon_with(config, prototypes, &mut ())
}

/// Chains sections onto open connections until `room_target` rooms exist.
///
/// Plans whose bounds overlap an existing section, or whose junction side
/// ended up without a connection room, are discarded and count as a spent
/// attempt. When attempts run out the dungeon built so far is returned.
pub fn generate_dungeon_with<I: RoomInstantiator>(
    config: DungeonGeneratorConfig,
    prototypes: &RoomPrototypes,
    instantiator: &mut I,
) -> Result<DungeonGeneratorResult, DungeonGeneratorError> {
    // validate
    if config.room_target == 0 {
        return Err(DungeonGeneratorError::ZeroRoomTarget);
    }
    if config.section_rows_range.is_empty()
        || config.section_columns_range.is_empty()
        || *config.section_rows_range.start() == 0
        || *config.section_columns_range.start() == 0
    {
        return Err(DungeonGeneratorError::EmptySectionRange);
    }
    if config.room_size.x <= 0.0 || config.room_size.y <= 0.0 {
        return Err(DungeonGeneratorError::NonPositiveRoomSize);
    }
    if !(0.0..=1.0).contains(&config.connection_probability) {
        return Err(DungeonGeneratorError::InvalidConnectionProbability(
            config.connection_probability,
        ));
    }

    let mut rng: rand::rngs::StdRng = config
        .seed
        .map(SeedableRng::seed_from_u64)
        .unwrap_or_else(rand::rngs::StdRng::from_entropy);

    let mut dungeon = Dungeon::new();
    let anchor = SectionLayout::new(
        rng.gen_range(config.section_rows_range.clone()),
        rng.gen_range(config.section_columns_range.clone()),
        config.room_size,
    );
    Section::build(
        &mut dungeon,
        anchor,
        prototypes,
        ConnectionOptions::all_directions(),
        &mut rng,
        instantiator,
    )?;

    let mut attempts = 0;
    while dungeon.room_count() < config.room_target {
        if attempts >= config.max_attempts {
            warn!(
                "gave up after {} attempts with {} of {} rooms",
                attempts,
                dungeon.room_count(),
                config.room_target
            );
            break;
        }
        attempts += 1;

        let open = dungeon.open_connections();
        let Some(existing) = open.choose(&mut rng).copied() else {
            warn!("no open connections left at {} rooms", dungeon.room_count());
            break;
        };

        let mut options = ConnectionOptions::attached_to(existing);
        for dir in DIRECTIONS {
            if rng.gen_bool(config.connection_probability) {
                options.set(*dir, true);
            }
        }
        let layout = SectionLayout::new(
            rng.gen_range(config.section_rows_range.clone()),
            rng.gen_range(config.section_columns_range.clone()),
            config.room_size,
        );

        let plan = match Section::plan(&dungeon, layout, prototypes, options, &mut rng) {
            Ok(plan) => plan,
            Err(SectionError::JunctionNotFound(side)) => {
                debug!("attempt {}: no junction on the {:?} side", attempts, side);
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        let overlapping = dungeon.sections().any(|section| {
            section
                .bounds(&dungeon)
                .is_some_and(|bounds| plan.overlaps(&bounds, config.section_margin))
        });
        if overlapping {
            debug!("attempt {}: plan overlaps an existing section", attempts);
            continue;
        }
        debug!(
            "attempt {}: committing {} rooms",
            attempts,
            plan.room_count()
        );
        dungeon.commit(plan, instantiator)?;
    }

    debug!(
        "generated {} rooms in {} sections",
        dungeon.room_count(),
        dungeon.sections().count()
    );
    Ok(DungeonGeneratorResult { dungeon })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::find_path;
    use crate::room::RoomId;

    fn seeded(seed: u64) -> DungeonGeneratorConfig {
        DungeonGeneratorConfig {
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_generate() {
        let result = generate_dungeon(seeded(0), &RoomPrototypes::single()).unwrap();
        let dungeon = &result.dungeon;
        assert!(dungeon.room_count() > 0);

        // every section lies on one connected graph
        let start = dungeon.rooms().next().unwrap().id;
        for section in dungeon.sections() {
            let target = section.room_at(0, 0).unwrap();
            assert!(find_path(dungeon, start, target).is_some());
        }

        // no two sections share space
        let sections = dungeon.sections().collect::<Vec<_>>();
        for (i, a) in sections.iter().enumerate() {
            let a_bounds = a.bounds(dungeon).unwrap();
            let (a_min, a_max) = span(&a_bounds);
            for b in &sections[i + 1..] {
                let (b_min, b_max) = span(&b.bounds(dungeon).unwrap());
                let disjoint = a_max.x <= b_min.x
                    || b_max.x <= a_min.x
                    || a_max.y <= b_min.y
                    || b_max.y <= a_min.y;
                assert!(disjoint, "{:?} overlaps {:?}", a.id(), b.id());
            }
        }
    }

    fn span(bounds: &[Vector2<f32>; 4]) -> (Vector2<f32>, Vector2<f32>) {
        (
            bounds.iter().fold(bounds[0], |acc, p| acc.inf(p)),
            bounds.iter().fold(bounds[0], |acc, p| acc.sup(p)),
        )
    }

    #[test]
    fn test_same_seed_same_dungeon() {
        let a = generate_dungeon(seeded(77), &RoomPrototypes::single()).unwrap();
        let b = generate_dungeon(seeded(77), &RoomPrototypes::single()).unwrap();
        let layout = |dungeon: &Dungeon| {
            dungeon
                .rooms()
                .map(|room| (room.id, room.kind, room.position, room.section_id))
                .collect::<Vec<_>>()
        };
        assert_eq!(layout(&a.dungeon), layout(&b.dungeon));
    }

    #[test]
    fn test_reaches_room_target() {
        let config = DungeonGeneratorConfig {
            room_target: 40,
            max_attempts: 1000,
            ..seeded(5)
        };
        let result = generate_dungeon(config, &RoomPrototypes::single()).unwrap();
        assert!(result.dungeon.room_count() >= 40);
        assert!(result.dungeon.sections().count() > 1);
    }

    #[test]
    fn test_stitched_rooms_are_linked_both_ways() {
        let result = generate_dungeon(seeded(3), &RoomPrototypes::single()).unwrap();
        let dungeon = &result.dungeon;
        for room in dungeon.rooms() {
            for (dir, next) in room.neighbors() {
                let back: Option<RoomId> = dungeon.room(next).unwrap().adjacent_room(dir.opposite());
                assert_eq!(back, Some(room.id));
            }
        }
    }

    #[test]
    fn test_no_attempts_keeps_anchor_only() {
        let config = DungeonGeneratorConfig {
            max_attempts: 0,
            ..seeded(8)
        };
        let result = generate_dungeon(config, &RoomPrototypes::single()).unwrap();
        let dungeon = &result.dungeon;
        assert_eq!(dungeon.sections().count(), 1);
        let anchor = dungeon.sections().next().unwrap();
        assert_eq!(dungeon.room_count(), anchor.rows() * anchor.columns());
        assert!(dungeon.room_count() < 60);
    }

    #[test]
    fn test_stops_when_no_connection_is_open() {
        // a single room is a corner, so it never carries a connection
        let config = DungeonGeneratorConfig {
            section_rows_range: 1..=1,
            section_columns_range: 1..=1,
            ..seeded(2)
        };
        let result = generate_dungeon(config, &RoomPrototypes::single()).unwrap();
        let dungeon = &result.dungeon;
        assert_eq!(dungeon.room_count(), 1);
        assert_eq!(dungeon.sections().count(), 1);
        assert!(dungeon.open_connections().is_empty());
    }

    #[test]
    fn test_invalid_config() {
        let prototypes = RoomPrototypes::single();
        let zero = DungeonGeneratorConfig {
            room_target: 0,
            ..Default::default()
        };
        assert!(matches!(
            generate_dungeon(zero, &prototypes),
            Err(DungeonGeneratorError::ZeroRoomTarget)
        ));
        #[allow(clippy::reversed_empty_ranges)]
        let empty = DungeonGeneratorConfig {
            section_rows_range: 4..=2,
            ..Default::default()
        };
        assert!(matches!(
            generate_dungeon(empty, &prototypes),
            Err(DungeonGeneratorError::EmptySectionRange)
        ));
        let flat = DungeonGeneratorConfig {
            room_size: Vector2::new(0.0, 1.0),
            ..Default::default()
        };
        assert!(matches!(
            generate_dungeon(flat, &prototypes),
            Err(DungeonGeneratorError::NonPositiveRoomSize)
        ));
        let probability = DungeonGeneratorConfig {
            connection_probability: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            generate_dungeon(probability, &prototypes),
            Err(DungeonGeneratorError::InvalidConnectionProbability(_))
        ));
        assert!(matches!(
            generate_dungeon(seeded(0), &RoomPrototypes::default()),
            Err(DungeonGeneratorError::Section(
                SectionError::MissingPrototypes(_)
            ))
        ));
    }
}
