use crate::constants::Direction4;
use crate::dungeon::Dungeon;
use crate::path::Path;
use crate::priority_queue::PriorityQueue;
use crate::room::RoomId;
use log::trace;
use std::collections::{BTreeMap, BTreeSet};

/// Shortest route between two rooms, every door costing one step.
///
/// The returned path has the first step at the bottom and the arrival at
/// `to` on top. `Some` with an empty path when `from == to`, `None` when `to`
/// cannot be reached.
pub fn find_path(dungeon: &Dungeon, from: RoomId, to: RoomId) -> Option<Path> {
    dungeon.room(from)?;
    if from == to {
        return Some(Path::new());
    }

    let mut distances: BTreeMap<RoomId, f64> = BTreeMap::new();
    let mut came_from: BTreeMap<RoomId, (Direction4, RoomId)> = BTreeMap::new();
    let mut done: BTreeSet<RoomId> = BTreeSet::new();
    let mut queue = PriorityQueue::new();
    distances.insert(from, 0.0);
    queue.enqueue(from, 0.0);

    while let Some((current, distance)) = queue.dequeue_with_priority() {
        if !done.insert(current) {
            continue;
        }
        if current == to {
            return Some(rebuild(&came_from, from, to));
        }
        let Some(room) = dungeon.room(current) else {
            continue;
        };
        for (dir, next) in room.neighbors() {
            let candidate = distance + 1.0;
            if distances.get(&next).is_some_and(|known| *known <= candidate) {
                continue;
            }
            distances.insert(next, candidate);
            came_from.insert(next, (dir, current));
            queue.enqueue(next, candidate);
        }
    }
    trace!("no path from {:?} to {:?}", from, to);
    None
}

fn rebuild(came_from: &BTreeMap<RoomId, (Direction4, RoomId)>, from: RoomId, to: RoomId) -> Path {
    let mut steps = Vec::new();
    let mut current = to;
    while current != from {
        let (dir, previous) = came_from[&current];
        steps.push((dir, current));
        current = previous;
    }
    steps.reverse();
    Path::from(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prototypes::RoomPrototypes;
    use crate::room_connection::ConnectionOptions;
    use crate::section::{Section, SectionLayout};
    use nalgebra::Vector2;
    use pathfinding::prelude::bfs;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn two_sections(rng: &mut StdRng) -> Dungeon {
        let mut dungeon = Dungeon::new();
        let layout = SectionLayout::new(4, 4, Vector2::new(1.0, 1.0));
        let options = ConnectionOptions {
            connect_west: true,
            ..Default::default()
        };
        Section::build(
            &mut dungeon,
            layout,
            &RoomPrototypes::single(),
            options,
            rng,
            &mut (),
        )
        .unwrap();
        let west = dungeon.open_connections()[0];
        Section::build(
            &mut dungeon,
            layout,
            &RoomPrototypes::single(),
            ConnectionOptions::attached_to(west),
            rng,
            &mut (),
        )
        .unwrap();
        // an unreachable island
        Section::build(
            &mut dungeon,
            SectionLayout {
                origin: Vector2::new(100.0, 100.0),
                ..layout
            },
            &RoomPrototypes::single(),
            ConnectionOptions::default(),
            rng,
            &mut (),
        )
        .unwrap();
        dungeon
    }

    #[test]
    fn test_matches_breadth_first_length() {
        let mut rng = StdRng::seed_from_u64(12);
        let dungeon = two_sections(&mut rng);
        let rooms = dungeon
            .rooms()
            .filter(|room| room.section_id.inner() < 2)
            .map(|room| room.id)
            .collect::<Vec<_>>();
        for from in rooms.iter().step_by(3) {
            for to in rooms.iter().step_by(5) {
                let path = find_path(&dungeon, *from, *to).unwrap();
                let expected = bfs(
                    from,
                    |id| {
                        dungeon
                            .room(*id)
                            .unwrap()
                            .adjacent
                            .values()
                            .copied()
                            .collect::<Vec<_>>()
                    },
                    |id| id == to,
                )
                .unwrap();
                assert_eq!(path.len(), expected.len() - 1);
            }
        }
    }

    #[test]
    fn test_path_steps_follow_doors() {
        let mut rng = StdRng::seed_from_u64(13);
        let dungeon = two_sections(&mut rng);
        let first = dungeon.sections().next().unwrap();
        let last_connected = dungeon.sections().nth(1).unwrap();
        let from = first.room_at(0, 0).unwrap();
        let to = last_connected.room_at(3, 3).unwrap();
        let path = find_path(&dungeon, from, to).unwrap();

        assert_eq!(path.peek().unwrap().1, to);
        let mut current = from;
        for (dir, room) in path.iter() {
            assert_eq!(dungeon.room(current).unwrap().adjacent_room(*dir), Some(*room));
            current = *room;
        }
        assert_eq!(current, to);
    }

    #[test]
    fn test_unreachable_and_trivial() {
        let mut rng = StdRng::seed_from_u64(14);
        let dungeon = two_sections(&mut rng);
        let island = dungeon.sections().nth(2).unwrap().room_at(0, 0).unwrap();
        let home = dungeon.sections().next().unwrap().room_at(0, 0).unwrap();
        assert!(find_path(&dungeon, home, island).is_none());
        assert!(find_path(&dungeon, home, home).unwrap().is_empty());
    }
}
