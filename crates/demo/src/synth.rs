use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sched_core::Catalog;
use types::{Course, LocationId, Room};

#[derive(Clone, Copy, Debug)]
pub struct Shape {
    pub courses: usize,
    pub rooms: usize,
    pub slots: usize,
    pub locations: usize,
}

/// Random instance where roughly a third of all (course, slot) pairs are infeasible.
pub fn catalog(shape: Shape, seed: u64) -> Catalog {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let locations: Vec<LocationId> = (0..shape.locations.max(1))
        .map(|i| LocationId(format!("B{}", i + 1)))
        .collect();

    let rooms = (0..shape.rooms)
        .map(|i| Room {
            id: format!("R{:02}", i + 1).as_str().into(),
            location: locations[rng.gen_range(0..locations.len())].clone(),
        })
        .collect();

    let courses = (0..shape.courses)
        .map(|i| {
            let time_slot_values = (0..shape.slots)
                .map(|_| {
                    if rng.gen_bool(0.3) {
                        0.0
                    } else {
                        (rng.gen_range(1.0..10.0f64) * 10.0).round() / 10.0
                    }
                })
                .collect();
            Course {
                id: format!("C{:03}", i + 1).as_str().into(),
                time_slot_values,
                preferred_location: locations[rng.gen_range(0..locations.len())].clone(),
            }
        })
        .collect();

    Catalog::with_slots(courses, rooms, shape.slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_instance() {
        let shape = Shape {
            courses: 12,
            rooms: 3,
            slots: 6,
            locations: 2,
        };
        let a = catalog(shape, 1);
        let b = catalog(shape, 1);
        assert_eq!(a.courses, b.courses);
        assert_eq!(a.rooms, b.rooms);
        assert_eq!(a.slot_count, 6);
        assert!(sched_core::validate(&a).is_ok());
    }
}
