use glam::{vec2, Vec2};

use crate::{
    collision::{collision_box, is_obstructed, CollisionSurface},
    layout::{LayoutModel, SeatId, PASSENGER_OUTLINE_WIDTH},
    navigation::{plan, Path, Route},
    scene::{palette, skin_tone},
    shape::{Shape, ShapeId, Style, Tag},
    spawn::{Claim, SpawnAllocator},
};

#[derive(Debug, Clone, PartialEq)]
pub enum PassengerState {
    Unspawned,
    /// Every waiting slot was taken on the last attempt.
    SpawningBlocked { holding: Vec2 },
    Spawned {
        shape: ShapeId,
        path: Path,
        /// Index of the waypoint being walked to.
        cursor: usize,
    },
    Seated { shape: ShapeId },
}

/// Coarse progress of a passenger, as shown to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Unspawned,
    SpawningBlocked,
    /// Spawned and still in front of the gate.
    Queued,
    EnRoute,
    Seated,
}

/// What a single tick did to a passenger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Spawned,
    SpawnBlocked,
    Moved,
    Blocked,
    Seated,
    Idle,
}

impl TickOutcome {
    /// Whether the passenger changed position or came into existence.
    pub fn progressed(self) -> bool {
        matches!(
            self,
            TickOutcome::Spawned | TickOutcome::Moved | TickOutcome::Seated
        )
    }
}

/// A boarding passenger.
#[derive(Debug, Clone)]
pub struct Passenger {
    pub zone: usize,
    pub seat: SeatId,
    pub route: Route,
    position: Vec2,
    state: PassengerState,
}

impl Passenger {
    /// `None` when the seat does not exist in the layout.
    pub fn new(layout: &LayoutModel, zone: usize, seat: SeatId) -> Option<Self> {
        let class = layout.class_index(seat.row)?;
        let center = layout.seat_center(seat)?;

        Some(Passenger {
            zone,
            seat,
            route: Route {
                class,
                aisle: layout.aisle_index(class, seat.letter),
                row: seat.row,
                seat: center,
            },
            position: Vec2::ZERO,
            state: PassengerState::Unspawned,
        })
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn state(&self) -> &PassengerState {
        &self.state
    }

    pub fn shape(&self) -> Option<ShapeId> {
        match self.state {
            PassengerState::Spawned { shape, .. } | PassengerState::Seated { shape } => {
                Some(shape)
            }
            _ => None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.state {
            PassengerState::Spawned { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn phase(&self) -> Phase {
        match &self.state {
            PassengerState::Unspawned => Phase::Unspawned,
            PassengerState::SpawningBlocked { .. } => Phase::SpawningBlocked,
            PassengerState::Spawned { path, cursor, .. } if *cursor <= path.entry => {
                Phase::Queued
            }
            PassengerState::Spawned { .. } => Phase::EnRoute,
            PassengerState::Seated { .. } => Phase::Seated,
        }
    }

    pub fn is_seated(&self) -> bool {
        matches!(self.state, PassengerState::Seated { .. })
    }

    /// Advances the passenger by one tick.
    pub fn tick<S: CollisionSurface + ?Sized>(
        &mut self,
        layout: &LayoutModel,
        surface: &mut S,
        spawner: &mut SpawnAllocator,
        rng: &mut fastrand::Rng,
    ) -> TickOutcome {
        match self.state {
            PassengerState::Unspawned | PassengerState::SpawningBlocked { .. } => {
                self.spawn(layout, surface, spawner, rng)
            }
            PassengerState::Spawned { .. } => self.walk(layout, surface),
            PassengerState::Seated { .. } => TickOutcome::Idle,
        }
    }

    fn spawn<S: CollisionSurface + ?Sized>(
        &mut self,
        layout: &LayoutModel,
        surface: &mut S,
        spawner: &mut SpawnAllocator,
        rng: &mut fastrand::Rng,
    ) -> TickOutcome {
        let radius = layout.passenger_radius();
        let margin = layout.collision_margin();
        let claim = spawner.claim(|slot| {
            !is_obstructed(&*surface, collision_box(slot, radius, margin), None)
        });

        let slot = match claim {
            Claim::Slot(slot) => slot,
            Claim::Blocked(holding) => {
                self.position = holding;
                self.state = PassengerState::SpawningBlocked { holding };
                return TickOutcome::SpawnBlocked;
            }
        };

        let path = plan(layout, spawner, slot, &self.route);
        let position = path.waypoints[0];
        let shape = surface.create_shape(
            Shape::Oval {
                center: position,
                radius: Vec2::splat(radius),
            },
            Style::fill(skin_tone(rng))
                .with_outline(palette::PASSENGER_OUTLINE, PASSENGER_OUTLINE_WIDTH),
            &[Tag::Passenger],
        );
        surface.raise(shape, None);

        let cursor = path
            .waypoints
            .iter()
            .take_while(|&&w| w == position)
            .count();
        self.position = position;
        self.state = if cursor >= path.waypoints.len() {
            PassengerState::Seated { shape }
        } else {
            PassengerState::Spawned {
                shape,
                path,
                cursor,
            }
        };
        TickOutcome::Spawned
    }

    /// Moves one step toward the current waypoint, larger axis first.
    fn walk<S: CollisionSurface + ?Sized>(
        &mut self,
        layout: &LayoutModel,
        surface: &mut S,
    ) -> TickOutcome {
        let PassengerState::Spawned {
            shape,
            path,
            cursor,
        } = &mut self.state
        else {
            return TickOutcome::Idle;
        };
        let shape = *shape;
        let Some(&target) = path.waypoints.get(*cursor) else {
            self.state = PassengerState::Seated { shape };
            return TickOutcome::Seated;
        };

        let step = layout.step();
        let toward = |from: f32, to: f32| {
            if (to - from).abs() <= step {
                to
            } else {
                from + step.copysign(to - from)
            }
        };
        let p = self.position;
        let horizontal = vec2(toward(p.x, target.x), p.y);
        let vertical = vec2(p.x, toward(p.y, target.y));
        let candidates = if (target.x - p.x).abs() > (target.y - p.y).abs() {
            [horizontal, vertical]
        } else {
            [vertical, horizontal]
        };

        let radius = layout.passenger_radius();
        let margin = layout.collision_margin();
        let next = candidates.into_iter().filter(|&c| c != p).find(|&c| {
            !is_obstructed(&*surface, collision_box(c, radius, margin), Some(shape))
        });
        let Some(next) = next else {
            return TickOutcome::Blocked;
        };

        surface.move_shape(shape, next - p);
        self.position = next;
        if next != target {
            return TickOutcome::Moved;
        }

        *cursor += 1;
        if *cursor < path.waypoints.len() {
            return TickOutcome::Moved;
        }
        self.state = PassengerState::Seated { shape };
        TickOutcome::Seated
    }
}
