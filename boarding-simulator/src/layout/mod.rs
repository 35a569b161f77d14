//! Cabin floor plan derived from the declarative cabin definition.
//!
//! All coordinates are canvas pixels with y growing downwards. The gate sits
//! on the lower (large y) side of the cabin.

pub mod classes;
pub mod columns;
pub mod fuselage;
pub mod rows;

use std::{fmt, str::FromStr};

use glam::{vec2, Vec2};
use log::info;
use rustc_hash::FxHashMap;

use crate::{
    cabin::{CabinConfig, SeatClassKind},
    error::LayoutError,
};
use classes::{Adjustment, SeatClass};
use columns::{ColumnKind, ColumnSegment};
use fuselage::Fuselage;
use rows::{RowKind, RowSegment};

/// Width of walls and seat outlines.
pub const WALL_WIDTH: f32 = 2.0;
/// Width of the passenger outline.
pub const PASSENGER_OUTLINE_WIDTH: f32 = 2.0;
/// Inward shrink of a passenger's collision box.
const COLLISION_MARGIN: f32 = PASSENGER_OUTLINE_WIDTH / 10.0;

/// A seat, displayed as row number followed by letter (`27C`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeatId {
    pub row: u32,
    pub letter: char,
}

impl SeatId {
    pub fn new(row: u32, letter: char) -> Self {
        SeatId { row, letter }
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.letter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSeatIdError(String);

impl fmt::Display for ParseSeatIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid seat {:?}", self.0)
    }
}

impl std::error::Error for ParseSeatIdError {}

impl FromStr for SeatId {
    type Err = ParseSeatIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeatIdError(s.to_string());
        let split = s.find(|c: char| !c.is_ascii_digit()).ok_or_else(err)?;
        let (row, letter) = s.split_at(split);
        let mut letters = letter.chars();

        match (row.parse::<u32>(), letters.next(), letters.next()) {
            (Ok(row), Some(letter), None) if row > 0 && letter.is_ascii_alphabetic() => {
                Ok(SeatId::new(row, letter.to_ascii_uppercase()))
            }
            _ => Err(err()),
        }
    }
}

/// Gate corridor and waiting area below the cabin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gate {
    /// Front boundary of the gate exit.
    pub front: f32,
    /// Rear boundary of the gate exit.
    pub rear: f32,
    /// Left edge of the waiting area.
    pub edge: f32,
    /// Bottom of the door frame on the rear wall of the corridor.
    pub door: f32,
    /// Upper wall of the waiting area.
    pub top: f32,
}

impl Gate {
    pub fn center(&self) -> f32 {
        (self.front + self.rear) / 2.0
    }
}

/// Immutable cabin geometry shared by every component of a simulation.
#[derive(Debug, Clone)]
pub struct LayoutModel {
    pub classes: Vec<SeatClass>,
    pub aisles: usize,
    pub exits: usize,
    pub adjustments: Vec<Adjustment>,
    pub fuselage: Fuselage,
    pub gate: Gate,
    /// Fuselage-axis partition, front to back.
    pub rows: Vec<RowSegment>,
    /// Cross-axis partition of each class, top to bottom.
    pub columns: Vec<Vec<ColumnSegment>>,
    pub passenger_diameter: f32,
    /// Pixel width of exits and aisles.
    pub gateway_width: f32,
    /// Front edge of the cabin floor.
    pub cabin_front: f32,
    /// Rear edge of the cabin floor.
    pub cabin_rear: f32,
    /// Aisle x key point of each class: the middle of its first leg room.
    pub aisle_x: Vec<f32>,
    /// Aisle y key points of each class, indexed from the gate side.
    pub aisle_y: Vec<Vec<f32>>,
    seats: FxHashMap<SeatId, Vec2>,
    seat_list: Vec<SeatId>,
    leg_rooms: Vec<usize>,
}

impl LayoutModel {
    pub fn new(cabin: &CabinConfig, window_width: f32) -> Result<Self, LayoutError> {
        let normalized = classes::normalize(cabin)?;
        let rear_class = normalized
            .classes
            .last()
            .ok_or(LayoutError::NoSeatingClass)?;

        let (x0, x1) = fuselage::cabin_span(window_width);
        let (rows, gate_index) = rows::partition(
            &normalized,
            cabin.gateway_size,
            cabin.gate_offset,
            x0 + WALL_WIDTH / 2.0,
            x1 - x0 - WALL_WIDTH / 2.0,
        );

        let gate_exit = rows[gate_index];
        let gateway_width = gate_exit.width();
        let passenger_diameter = gateway_width / cabin.gateway_size;

        let plane_width = (normalized.aisles as f32 * cabin.gateway_size
            + rear_class.layout.seats() as f32 * rear_class.seat_depth)
            * passenger_diameter;
        let fuselage = Fuselage::new(window_width, plane_width);

        let door = fuselage.door_level();
        let gate = Gate {
            front: gate_exit.start,
            rear: gate_exit.end,
            edge: WALL_WIDTH / 2.0,
            door,
            top: door - 0.75 * passenger_diameter,
        };

        let has_first = gate_index > 1;
        let cabin_front = if has_first {
            rows[0].start + WALL_WIDTH / 2.0
        } else {
            gate.front
        };
        let cabin_rear = rows[rows.len() - 1].end - WALL_WIDTH / 2.0;

        let fillable = fuselage.y1_inner - fuselage.y0_inner;
        let columns: Vec<Vec<ColumnSegment>> = normalized
            .classes
            .iter()
            .map(|class| {
                columns::partition(&class.layout, fuselage.y0_inner, fillable, gateway_width)
            })
            .collect();

        let mut leg_rooms = vec![0; normalized.total_rows() as usize + 1];
        for (i, segment) in rows.iter().enumerate() {
            if let (RowKind::LegRoom, Some(row)) = (segment.kind, segment.row) {
                leg_rooms[row as usize] = i;
            }
        }

        let aisle_x = normalized
            .classes
            .iter()
            .map(|class| rows[leg_rooms[class.first_row as usize]].midpoint())
            .collect();

        let aisle_y = columns
            .iter()
            .map(|segments| {
                let mut ys = vec![0.0; normalized.aisles];
                for segment in segments {
                    if let ColumnKind::Aisle(i) = segment.kind {
                        ys[i] = segment.midpoint();
                    }
                }
                ys
            })
            .collect();

        let radius = passenger_diameter / 2.0;
        let mut seats = FxHashMap::default();
        let mut seat_list = Vec::new();
        for (class, segments) in normalized.classes.iter().zip(&columns) {
            for row in class.first_row..=class.last_row() {
                let leg_room = rows[leg_rooms[row as usize]];
                let seat = rows[leg_rooms[row as usize] + 1];
                let x = seat.end - (radius + PASSENGER_OUTLINE_WIDTH) - WALL_WIDTH;

                // Passengers walk along the middle of the leg room past those
                // already seated in the row.
                let seated_edge = x - radius - PASSENGER_OUTLINE_WIDTH / 2.0;
                let walker_edge = leg_room.midpoint() + radius - COLLISION_MARGIN;
                if x <= seat.start || seated_edge <= walker_edge {
                    return Err(LayoutError::CabinTooSmall {
                        class: class.kind,
                        diameter: passenger_diameter,
                    });
                }

                for letter in class.layout.letters() {
                    let y = segments
                        .iter()
                        .find(|s| s.kind == ColumnKind::Seat(letter))
                        .map_or(0.0, ColumnSegment::midpoint);
                    let id = SeatId::new(row, letter);
                    seats.insert(id, vec2(x, y));
                    seat_list.push(id);
                }
            }
        }

        info!(
            "Cabin layout: {} rows, {} seats, {} aisle(s), {} exit(s), passenger diameter {:.2} px",
            normalized.total_rows(),
            seat_list.len(),
            normalized.aisles,
            normalized.exits,
            passenger_diameter
        );

        Ok(LayoutModel {
            classes: normalized.classes,
            aisles: normalized.aisles,
            exits: normalized.exits,
            adjustments: normalized.adjustments,
            fuselage,
            gate,
            rows,
            columns,
            passenger_diameter,
            gateway_width,
            cabin_front,
            cabin_rear,
            aisle_x,
            aisle_y,
            seats,
            seat_list,
            leg_rooms,
        })
    }

    pub fn has_first_class(&self) -> bool {
        self.classes
            .first()
            .is_some_and(|c| c.kind == SeatClassKind::First)
    }

    pub fn total_rows(&self) -> u32 {
        self.classes.iter().map(|c| c.rows).sum()
    }

    pub fn passenger_radius(&self) -> f32 {
        self.passenger_diameter / 2.0
    }

    /// Largest distance a passenger covers on one axis in one tick.
    pub fn step(&self) -> f32 {
        self.passenger_radius() / 2.0
    }

    /// Inward shrink of a passenger's collision box.
    pub fn collision_margin(&self) -> f32 {
        COLLISION_MARGIN
    }

    /// Seats front to back, rows in order, letters ascending.
    pub fn seat_list(&self) -> &[SeatId] {
        &self.seat_list
    }

    pub fn seat_center(&self, seat: SeatId) -> Option<Vec2> {
        self.seats.get(&seat).copied()
    }

    /// Index into [`LayoutModel::classes`] of the class holding a row.
    pub fn class_index(&self, row: u32) -> Option<usize> {
        self.classes.iter().position(|c| c.contains_row(row))
    }

    pub fn leg_room(&self, row: u32) -> Option<&RowSegment> {
        self.valid_row(row).map(|row| &self.rows[self.leg_rooms[row]])
    }

    pub fn seat_span(&self, row: u32) -> Option<&RowSegment> {
        self.valid_row(row).map(|row| &self.rows[self.leg_rooms[row] + 1])
    }

    fn valid_row(&self, row: u32) -> Option<usize> {
        (row >= 1 && row <= self.total_rows()).then_some(row as usize)
    }

    pub fn exit_segments(&self) -> impl Iterator<Item = &RowSegment> {
        self.rows.iter().filter(|s| s.is_exit())
    }

    /// Aisle a passenger uses to reach a seat, counted from the gate side.
    pub fn aisle_index(&self, class: usize, letter: char) -> usize {
        if self.aisles < 2 {
            return 0;
        }

        let layout = &self.classes[class].layout;
        let position = layout.position(letter).unwrap_or(0);
        let proportion = (position + 1) as f32 / layout.seats() as f32;
        (proportion.round_ties_even() as usize).min(self.aisles - 1)
    }

    /// Class whose aisle key point a passenger of `class` enters the cabin at.
    pub fn entry_class(&self, class: usize) -> usize {
        if self.has_first_class() && class != 0 {
            1
        } else {
            0
        }
    }

    /// Point just inside the gate exit on the given aisle of the entry class.
    pub fn entry_point(&self, entry_class: usize, aisle: usize) -> Vec2 {
        vec2(self.gate.center(), self.aisle_y[entry_class][aisle])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_layout() -> LayoutModel {
        LayoutModel::new(&CabinConfig::default_cabin().unwrap(), 1350.0).unwrap()
    }

    #[test]
    fn test_seat_id() {
        let seat: SeatId = "27c".parse().unwrap();
        assert_eq!(seat, SeatId::new(27, 'C'));
        assert_eq!(seat.to_string(), "27C");

        assert!("C27".parse::<SeatId>().is_err());
        assert!("0A".parse::<SeatId>().is_err());
        assert!("12".parse::<SeatId>().is_err());
        assert!("12AB".parse::<SeatId>().is_err());
    }

    #[test]
    fn test_seat_list() {
        let layout = default_layout();
        let seats = layout.seat_list();

        assert_eq!(seats.len(), 5 * 4 + 5 * 4 + 5 * 6 + 20 * 6);
        assert_eq!(seats[0], SeatId::new(1, 'A'));
        assert_eq!(seats[3], SeatId::new(1, 'D'));
        assert_eq!(seats[4], SeatId::new(2, 'A'));
        assert_eq!(*seats.last().unwrap(), SeatId::new(35, 'F'));
        assert!(seats.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_seats_inside_spans() {
        let layout = default_layout();

        for &seat in layout.seat_list() {
            let center = layout.seat_center(seat).unwrap();
            let span = layout.seat_span(seat.row).unwrap();
            assert!(span.start < center.x && center.x < span.end, "{seat}");

            let class = layout.class_index(seat.row).unwrap();
            let column = layout.columns[class]
                .iter()
                .find(|c| c.kind == ColumnKind::Seat(seat.letter))
                .unwrap();
            assert!(column.start < center.y && center.y < column.end, "{seat}");
        }
    }

    #[test]
    fn test_narrow_window() {
        let cabin = CabinConfig::default_cabin().unwrap();

        // At 300 px no seat centre fits in its seat span.
        assert!(matches!(
            LayoutModel::new(&cabin, 300.0),
            Err(LayoutError::CabinTooSmall { .. })
        ));
        // At 600 px seated passengers block the economy leg rooms.
        assert!(matches!(
            LayoutModel::new(&cabin, 600.0),
            Err(LayoutError::CabinTooSmall {
                class: SeatClassKind::Economy,
                ..
            })
        ));

        let layout = LayoutModel::new(&cabin, 800.0).unwrap();
        for &seat in layout.seat_list() {
            let center = layout.seat_center(seat).unwrap();
            let span = layout.seat_span(seat.row).unwrap();
            assert!(span.start < center.x && center.x < span.end, "{seat}");
        }
    }

    #[test]
    fn test_letter_a_on_gate_side() {
        let layout = default_layout();
        let a = layout.seat_center(SeatId::new(10, 'A')).unwrap();
        let d = layout.seat_center(SeatId::new(10, 'D')).unwrap();

        assert!(a.y > d.y);
        assert!(layout.aisle_y[0][0] > layout.aisle_y[0][1]);
    }

    #[test]
    fn test_aisle_index() {
        let layout = default_layout();
        // "A BC D"
        assert_eq!(layout.aisle_index(0, 'A'), 0);
        assert_eq!(layout.aisle_index(0, 'B'), 0);
        assert_eq!(layout.aisle_index(0, 'C'), 1);
        assert_eq!(layout.aisle_index(0, 'D'), 1);
        // "AB CD EF": 3/6 rounds half to even.
        assert_eq!(layout.aisle_index(3, 'C'), 0);
        assert_eq!(layout.aisle_index(3, 'D'), 1);
    }

    #[test]
    fn test_entry_class() {
        let layout = default_layout();
        assert!(layout.has_first_class());
        assert_eq!(layout.entry_class(0), 0);
        assert_eq!(layout.entry_class(3), 1);

        let mut cabin = CabinConfig::default_cabin().unwrap();
        cabin.class_mut(SeatClassKind::First).unwrap().rows = 0;
        let layout = LayoutModel::new(&cabin, 1350.0).unwrap();
        assert!(!layout.has_first_class());
        assert_eq!(layout.entry_class(2), 0);
        assert_eq!(layout.gate.front, layout.cabin_front);
    }

    #[test]
    fn test_gate_is_first_exit() {
        let mut cabin = CabinConfig::default_cabin().unwrap();
        cabin.exits = 3;
        let layout = LayoutModel::new(&cabin, 1350.0).unwrap();

        let exits: Vec<&RowSegment> = layout.exit_segments().collect();
        assert_eq!(exits.len(), 3);
        assert_eq!(exits[0].start, layout.gate.front);
        assert!(layout.rows[0].start < layout.gate.front);

        // Exits never sit inside a seat span.
        for exit in exits {
            for row in 1..=layout.total_rows() {
                let seat = layout.seat_span(row).unwrap();
                assert!(exit.end <= seat.start + 1e-3 || exit.start >= seat.end - 1e-3);
            }
        }
    }

    #[test]
    fn test_diameter() {
        let layout = default_layout();
        assert!((layout.gateway_width / layout.passenger_diameter - 1.5).abs() < 1e-4);
        assert!(layout.gate.top < layout.gate.door);
        assert!(layout.gate.door < layout.fuselage.height);
        assert!(layout.gate.front < layout.gate.center());
    }
}
