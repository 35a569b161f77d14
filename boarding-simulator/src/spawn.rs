use glam::{vec2, Vec2};
use ndarray::Array2;

use crate::{layout::LayoutModel, util::Index};

/// Result of asking the allocator for a waiting position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Claim {
    /// Index of a free slot.
    Slot(usize),
    /// Every remaining slot is taken; holds the last slot.
    Blocked(Vec2),
}

/// Waiting positions in front of the gate.
///
/// Slots form lanes two passenger diameters apart, starting at the gate centre
/// and extending away from the cabin. Lanes are walked as a snake: down the
/// first lane, up the next. The cursor only moves forward until
/// [`SpawnAllocator::reset`].
#[derive(Debug, Clone)]
pub struct SpawnAllocator {
    /// Indexed by (lane, position in lane).
    slots: Array2<Vec2>,
    cursor: usize,
}

impl SpawnAllocator {
    pub fn new(layout: &LayoutModel) -> Self {
        let diameter = layout.passenger_diameter;
        let spacing = 2.0 * diameter;
        let origin = vec2(layout.gate.center(), layout.gate.top + diameter);

        let lanes = ((origin.x - (layout.gate.edge + diameter)) / spacing)
            .floor()
            .max(0.0) as usize
            + 1;
        let depth = ((layout.fuselage.height - diameter - origin.y) / spacing)
            .floor()
            .max(0.0) as usize
            + 1;

        Self::from_grid(origin, spacing, lanes, depth)
    }

    pub(crate) fn from_grid(origin: Vec2, spacing: f32, lanes: usize, depth: usize) -> Self {
        let slots = Array2::from_shape_fn((lanes, depth), |(lane, i)| {
            let i = if lane % 2 == 1 { depth - 1 - i } else { i };
            origin + vec2(-(lane as f32), i as f32) * spacing
        });

        SpawnAllocator { slots, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots per lane.
    pub fn depth(&self) -> usize {
        self.slots.ncols()
    }

    pub fn lanes(&self) -> usize {
        self.slots.nrows()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn slot(&self, index: usize) -> Option<Vec2> {
        let depth = self.depth();
        self.slots
            .get(Index::new(index % depth, index / depth))
            .copied()
    }

    /// All slots in snake order.
    pub fn slots(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.slots.iter().copied()
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Finds the first free slot at or after the cursor. The cursor moves past
    /// occupied slots but stays on the claimed one.
    pub fn claim(&mut self, mut is_free: impl FnMut(Vec2) -> bool) -> Claim {
        while let Some(pos) = self.slot(self.cursor) {
            if is_free(pos) {
                return Claim::Slot(self.cursor);
            }
            if self.cursor + 1 >= self.len() {
                return Claim::Blocked(pos);
            }
            self.cursor += 1;
        }

        Claim::Blocked(Vec2::ZERO)
    }

    /// Lane ends between a slot and the gate, nearest first. The end of the
    /// gate lane is left out since the walk to the cabin follows that lane.
    pub fn turning_points(&self, index: usize) -> Vec<usize> {
        let depth = self.depth();
        let mut points: Vec<usize> = (0..index)
            .step_by(depth)
            .chain((depth - 1..index).step_by(depth))
            .filter(|&i| i != 0)
            .collect();
        points.sort_unstable_by(|a, b| b.cmp(a));
        points
    }
}

#[cfg(test)]
mod tests {
    use glam::vec2;

    use super::*;

    fn allocator() -> SpawnAllocator {
        SpawnAllocator::from_grid(vec2(100.0, 10.0), 10.0, 3, 4)
    }

    #[test]
    fn test_snake_order() {
        let allocator = allocator();
        let slots: Vec<Vec2> = allocator.slots().collect();

        assert_eq!(slots.len(), 12);
        assert_eq!(slots[0], vec2(100.0, 10.0));
        assert_eq!(slots[3], vec2(100.0, 40.0));
        assert_eq!(slots[4], vec2(90.0, 40.0));
        assert_eq!(slots[7], vec2(90.0, 10.0));
        assert_eq!(slots[8], vec2(80.0, 10.0));
        assert_eq!(allocator.slot(5), Some(vec2(90.0, 30.0)));
        assert_eq!(allocator.slot(12), None);
    }

    #[test]
    fn test_claim() {
        let mut allocator = allocator();
        let taken = [vec2(100.0, 10.0), vec2(100.0, 20.0)];

        assert_eq!(allocator.claim(|p| !taken.contains(&p)), Claim::Slot(2));
        // The cursor stays on a claimed slot until it is found occupied.
        assert_eq!(allocator.cursor(), 2);
        assert_eq!(allocator.claim(|_| true), Claim::Slot(2));

        assert_eq!(allocator.claim(|_| false), Claim::Blocked(vec2(80.0, 40.0)));
        assert_eq!(allocator.cursor(), 11);
        // No rewind even when earlier slots free up.
        assert_eq!(allocator.claim(|_| true), Claim::Slot(11));

        allocator.reset();
        assert_eq!(allocator.claim(|_| true), Claim::Slot(0));
    }

    #[test]
    fn test_turning_points() {
        let allocator = allocator();

        assert!(allocator.turning_points(0).is_empty());
        assert!(allocator.turning_points(3).is_empty());
        assert_eq!(allocator.turning_points(4), vec![3]);
        assert_eq!(allocator.turning_points(6), vec![4, 3]);
        assert_eq!(allocator.turning_points(9), vec![8, 7, 4, 3]);
    }
}
