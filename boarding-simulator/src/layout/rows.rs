use crate::cabin::SeatClassKind;

use super::classes::NormalizedCabin;

/// What occupies a span along the fuselage axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    GateOffset,
    Exit,
    LegRoom,
    Seat,
}

/// A span along the fuselage axis, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowSegment {
    pub kind: RowKind,
    pub class: Option<SeatClassKind>,
    /// Row number, set for leg room and seat spans.
    pub row: Option<u32>,
    pub start: f32,
    pub end: f32,
}

impl RowSegment {
    pub fn width(&self) -> f32 {
        self.end - self.start
    }

    pub fn midpoint(&self) -> f32 {
        (self.start + self.end) / 2.0
    }

    pub fn is_exit(&self) -> bool {
        self.kind == RowKind::Exit
    }
}

#[derive(Debug, Clone, Copy)]
struct Span {
    kind: RowKind,
    class: Option<SeatClassKind>,
    row: Option<u32>,
    length: f32,
}

impl Span {
    fn exit(length: f32) -> Self {
        Span {
            kind: RowKind::Exit,
            class: None,
            row: None,
            length,
        }
    }
}

/// Splits `[start, start + length]` into gate offset, exits, leg room and
/// seats, front to back. Also returns the index of the gate exit.
pub(super) fn partition(
    cabin: &NormalizedCabin,
    gateway_size: f32,
    gate_offset: f32,
    start: f32,
    length: f32,
) -> (Vec<RowSegment>, usize) {
    let first_rows = cabin
        .classes
        .first()
        .filter(|c| c.kind == SeatClassKind::First)
        .map(|c| c.rows as usize);

    let mut spans = Vec::with_capacity(cabin.total_rows() as usize * 2 + 4);
    if first_rows.is_none() {
        spans.push(Span {
            kind: RowKind::GateOffset,
            class: None,
            row: None,
            length: gate_offset,
        });
    }
    for class in &cabin.classes {
        for row in class.first_row..=class.last_row() {
            spans.push(Span {
                kind: RowKind::LegRoom,
                class: Some(class.kind),
                row: Some(row),
                length: class.leg_room,
            });
            spans.push(Span {
                kind: RowKind::Seat,
                class: Some(class.kind),
                row: Some(row),
                length: class.seat_depth,
            });
        }
    }

    let total = spans.iter().map(|s| s.length).sum::<f32>() + cabin.exits as f32 * gateway_size;
    for span in &mut spans {
        span.length /= total;
    }
    let exit = gateway_size / total;

    let gate_index = first_rows.map_or(1, |rows| rows * 2);
    spans.insert(gate_index, Span::exit(exit));

    if cabin.exits >= 2 {
        spans.push(Span::exit(exit));
    }
    if cabin.exits >= 3 {
        let index = wing_exit_index(&spans).max(gate_index + 1);
        spans.insert(index, Span::exit(exit));
    }

    let mut offset = 0.0;
    let segments = spans
        .into_iter()
        .map(|span| {
            let segment = RowSegment {
                kind: span.kind,
                class: span.class,
                row: span.row,
                start: start + offset * length,
                end: start + (offset + span.length) * length,
            };
            offset += span.length;
            segment
        })
        .collect();

    (segments, gate_index)
}

/// Insertion index of the wing exit: in front of the last span that still
/// ends before the middle of the cabin, moved forward past a seat so the exit
/// never splits a row.
fn wing_exit_index(spans: &[Span]) -> usize {
    let mut index = 0;
    let mut sum = 0.0;
    for (i, span) in spans.iter().enumerate() {
        sum += span.length;
        if sum < 0.5 {
            index = i;
        } else {
            break;
        }
    }

    if spans[index].kind == RowKind::Seat {
        index.saturating_sub(1)
    } else {
        index
    }
}
