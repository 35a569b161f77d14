use super::classes::SeatLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Seat(char),
    /// Aisle index, counted from the gate side.
    Aisle(usize),
}

/// A span across the cabin, in canvas pixels. `start` is the smaller y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSegment {
    pub kind: ColumnKind,
    pub start: f32,
    pub end: f32,
}

impl ColumnSegment {
    pub fn midpoint(&self) -> f32 {
        (self.start + self.end) / 2.0
    }

    pub fn is_aisle(&self) -> bool {
        matches!(self.kind, ColumnKind::Aisle(_))
    }
}

/// Lays the seat pattern out from `top` downwards. The pattern reads left to
/// right from the far side, so the first letter ends up on the gate side.
pub(super) fn partition(
    layout: &SeatLayout,
    top: f32,
    fillable: f32,
    aisle_width: f32,
) -> Vec<ColumnSegment> {
    let aisles = layout.aisles();
    let seat_width = (fillable - aisles as f32 * aisle_width) / layout.seats() as f32;

    let mut segments = Vec::with_capacity(layout.seats() + aisles);
    let mut y = top;
    for (i, group) in layout.groups().iter().rev().enumerate() {
        if i > 0 {
            segments.push(ColumnSegment {
                kind: ColumnKind::Aisle(aisles - i),
                start: y,
                end: y + aisle_width,
            });
            y += aisle_width;
        }
        for &letter in group.iter().rev() {
            segments.push(ColumnSegment {
                kind: ColumnKind::Seat(letter),
                start: y,
                end: y + seat_width,
            });
            y += seat_width;
        }
    }

    segments
}
