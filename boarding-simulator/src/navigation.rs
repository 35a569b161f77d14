use glam::{vec2, Vec2};

use crate::{layout::LayoutModel, spawn::SpawnAllocator};

/// Waypoints from a spawn slot to a seat.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub waypoints: Vec<Vec2>,
    /// Index of the waypoint just inside the gate exit.
    pub entry: usize,
}

impl Path {
    pub fn destination(&self) -> Vec2 {
        self.waypoints[self.waypoints.len() - 1]
    }
}

/// Where a passenger is headed and through which aisle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    /// Index into [`LayoutModel::classes`].
    pub class: usize,
    pub aisle: usize,
    pub row: u32,
    pub seat: Vec2,
}

/// Plans the walk from spawn slot `slot` to the seat.
///
/// The queue part follows the lanes of the waiting area back to the gate and
/// up the corridor. Inside the cabin the passenger walks the aisle class by
/// class, turns into the leg room of the row, then slides into the seat.
pub fn plan(layout: &LayoutModel, spawner: &SpawnAllocator, slot: usize, route: &Route) -> Path {
    let mut waypoints: Vec<Vec2> = std::iter::once(slot)
        .chain(spawner.turning_points(slot))
        .filter_map(|i| spawner.slot(i))
        .collect();

    let mut class = layout.entry_class(route.class);
    waypoints.push(layout.entry_point(class, route.aisle));
    waypoints.dedup();
    let entry = waypoints.len() - 1;

    while class < route.class {
        class += 1;
        let x = layout.aisle_x[class];
        waypoints.push(vec2(x, layout.aisle_y[class - 1][route.aisle]));
        waypoints.push(vec2(x, layout.aisle_y[class][route.aisle]));
    }

    let aisle_y = layout.aisle_y[class][route.aisle];
    let row_x = layout
        .leg_room(route.row)
        .map_or(route.seat.x, |segment| segment.midpoint());
    waypoints.push(vec2(row_x, aisle_y));
    waypoints.push(vec2(row_x, route.seat.y));
    waypoints.push(route.seat);
    waypoints.dedup();

    Path { waypoints, entry }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cabin::{CabinConfig, SeatClassKind},
        layout::SeatId,
    };

    fn route(layout: &LayoutModel, seat: SeatId) -> Route {
        let class = layout.class_index(seat.row).unwrap();
        Route {
            class,
            aisle: layout.aisle_index(class, seat.letter),
            row: seat.row,
            seat: layout.seat_center(seat).unwrap(),
        }
    }

    #[test]
    fn test_path_from_first_slot() {
        let layout = LayoutModel::new(&CabinConfig::default_cabin().unwrap(), 1350.0).unwrap();
        let spawner = SpawnAllocator::new(&layout);
        let seat = SeatId::new(30, 'E');
        let route = route(&layout, seat);
        let path = plan(&layout, &spawner, 0, &route);

        assert_eq!(path.entry, 1);
        assert_eq!(path.waypoints[0], spawner.slot(0).unwrap());
        assert_eq!(path.waypoints[1].x, layout.gate.center());
        assert_eq!(path.destination(), layout.seat_center(seat).unwrap());

        // Business entry, then two class boundaries to economy. Premium economy
        // and economy share a pattern, so the second jog has no sideways leg.
        assert_eq!(path.waypoints.len(), 2 + 3 + 3);
        assert_eq!(path.waypoints[2].x, layout.aisle_x[2]);
        assert_eq!(path.waypoints[3].y, layout.aisle_y[2][1]);
        assert_eq!(path.waypoints[4].x, layout.aisle_x[3]);
        assert_eq!(path.waypoints[4].y, layout.aisle_y[3][1]);

        // Every leg is axis aligned.
        for w in path.waypoints.windows(2) {
            assert!(w[0].x == w[1].x || w[0].y == w[1].y, "{w:?}");
        }
    }

    #[test]
    fn test_path_follows_lanes() {
        let layout = LayoutModel::new(&CabinConfig::default_cabin().unwrap(), 1350.0).unwrap();
        let spawner = SpawnAllocator::new(&layout);
        let depth = spawner.depth();
        let slot = depth + 1;
        let route = route(&layout, SeatId::new(2, 'A'));
        let path = plan(&layout, &spawner, slot, &route);

        assert_eq!(path.entry, 3);
        assert_eq!(path.waypoints[1], spawner.slot(depth).unwrap());
        assert_eq!(path.waypoints[2], spawner.slot(depth - 1).unwrap());
        assert_eq!(path.waypoints[3], layout.entry_point(0, 0));
        // First class seats are in front of the gate.
        assert!(path.destination().x < layout.gate.front);
    }

    #[test]
    fn test_path_without_first_class() {
        let mut cabin = CabinConfig::default_cabin().unwrap();
        cabin.class_mut(SeatClassKind::First).unwrap().rows = 0;
        let layout = LayoutModel::new(&cabin, 1350.0).unwrap();
        let spawner = SpawnAllocator::new(&layout);
        let route = route(&layout, SeatId::new(1, 'B'));
        let path = plan(&layout, &spawner, 0, &route);

        assert_eq!(path.waypoints[path.entry], layout.entry_point(0, 0));
        assert_eq!(path.waypoints.len(), 2 + 3);
    }
}
