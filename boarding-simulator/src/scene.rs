//! Static cabin drawing. Walls and seat outlines double as collision
//! obstacles; everything tagged removable is decoration only.

use glam::{vec2, Vec2};

use crate::{
    collision::CollisionSurface,
    layout::{
        columns::ColumnSegment,
        rows::RowSegment,
        LayoutModel, WALL_WIDTH,
    },
    shape::{Color, Shape, Style, Tag},
};

pub mod palette {
    use crate::shape::Color;

    pub const BACKGROUND: Color = Color::hex(0xF0F0F0);
    pub const PLANE: Color = Color::hex(0xE5FFFB);
    pub const TOP_TAIL_WING: Color = Color::hex(0xD4E9E6);
    pub const WALL: Color = Color::hex(0xB3C4C1);
    pub const STAIRS: Color = Color::hex(0xFCF9D8);
    pub const STAIRS_OUTLINE: Color = Color::hex(0xCCAA60);
    pub const SEAT: Color = Color::hex(0x000080);
    pub const SEAT_OUTLINE: Color = Color::hex(0x99A3F2);
    pub const EXIT: Color = Color::hex(0xFF0000);
    pub const SKIN_TONES: [Color; 5] = [
        Color::hex(0xFFDBAC),
        Color::hex(0xF1C27D),
        Color::hex(0xE0AC69),
        Color::hex(0xC68642),
        Color::hex(0x8D5524),
    ];
    pub const PASSENGER_OUTLINE: Color = Color::hex(0x693F1A);
}

fn line(points: Vec<Vec2>) -> Shape {
    Shape::Line { points }
}

fn rectangle(min: Vec2, max: Vec2) -> Shape {
    Shape::Rectangle { min, max }
}

/// Draws the aircraft, gate, floor, seats and exits onto `surface`.
pub fn build<S: CollisionSurface + ?Sized>(layout: &LayoutModel, surface: &mut S) {
    let f = &layout.fuselage;
    let gate = &layout.gate;

    surface.create_shape(
        Shape::Polygon {
            points: f.body_outline(),
        },
        Style::fill(palette::PLANE).with_outline(palette::WALL, WALL_WIDTH),
        &[Tag::Body, Tag::Removable],
    );
    for y in [f.y0, f.y1] {
        surface.create_shape(
            line(vec![vec2(f.shoulder, y), vec2(f.armpit, y)]),
            Style::line(palette::WALL, WALL_WIDTH),
            &[Tag::WingWall],
        );
    }
    let (center, radius) = f.tail_wing();
    surface.create_shape(
        Shape::Oval { center, radius },
        Style::fill(palette::TOP_TAIL_WING).with_outline(palette::WALL, WALL_WIDTH),
        &[Tag::TailWing],
    );
    for x in [f.x0, f.x1] {
        surface.create_shape(
            line(vec![vec2(x, f.y0), vec2(x, f.y1)]),
            Style::line(palette::WALL, WALL_WIDTH).dashed(),
            &[Tag::CockpitWall],
        );
    }

    // Gate corridor and waiting area.
    let floor = Style::fill(palette::STAIRS);
    surface.create_shape(
        rectangle(vec2(gate.front, f.y1_inner), vec2(gate.rear, f.height)),
        floor,
        &[Tag::Floor, Tag::Removable],
    );
    surface.create_shape(
        rectangle(vec2(gate.edge, gate.top), vec2(gate.rear, f.height)),
        floor,
        &[Tag::Floor, Tag::Removable],
    );
    let wall = Style::line(palette::STAIRS_OUTLINE, WALL_WIDTH);
    surface.create_shape(
        line(vec![
            vec2(gate.rear, f.y1_inner),
            vec2(gate.rear, gate.door),
            vec2(gate.rear, f.height),
            vec2(gate.edge, f.height),
            vec2(gate.edge, gate.top),
            vec2(gate.front, gate.top),
            vec2(gate.front, f.y1_inner),
        ]),
        wall,
        &[Tag::Wall],
    );

    // Cabin floor, open where the gate meets it.
    let (front, rear) = (layout.cabin_front, layout.cabin_rear);
    surface.create_shape(
        rectangle(vec2(front, f.y0_inner), vec2(rear, f.y1_inner)),
        floor,
        &[Tag::Floor, Tag::Removable],
    );
    surface.create_shape(
        line(vec![
            vec2(gate.front, f.y1_inner),
            vec2(front, f.y1_inner),
            vec2(front, f.y0_inner),
            vec2(rear, f.y0_inner),
            vec2(rear, f.y1_inner),
            vec2(gate.rear, f.y1_inner),
        ]),
        wall,
        &[Tag::Wall],
    );

    for (class, columns) in layout.classes.iter().zip(&layout.columns) {
        let groups: Vec<&[ColumnSegment]> = columns
            .split(ColumnSegment::is_aisle)
            .filter(|g| !g.is_empty())
            .collect();

        for row in class.first_row..=class.last_row() {
            if let Some(seat) = layout.seat_span(row) {
                build_row(surface, seat, &groups);
            }
        }
    }

    for exit in layout.exit_segments() {
        for y in [f.y0_inner, f.y1_inner] {
            surface.create_shape(
                line(vec![vec2(exit.start, y), vec2(exit.end, y)]),
                Style::line(palette::EXIT, WALL_WIDTH * 2.0),
                &[Tag::ExitDoor, Tag::Removable],
            );
        }
    }

    surface.raise_tag(Tag::Floor, Some(Tag::Body));
    surface.raise_tag(Tag::FloorOutline, Some(Tag::Floor));
    surface.raise_tag(Tag::Wall, Some(Tag::FloorOutline));
    surface.raise_tag(Tag::Seat, Some(Tag::Wall));
    surface.raise_tag(Tag::SeatOutline, Some(Tag::Seat));
    surface.raise_tag(Tag::ExitDoor, None);
}

/// Cushions, arm and back rests of one row, plus the floor edge behind it.
fn build_row<S: CollisionSurface + ?Sized>(
    surface: &mut S,
    seat: &RowSegment,
    groups: &[&[ColumnSegment]],
) {
    let front = seat.start;
    let back = seat.end - WALL_WIDTH / 2.0;

    for group in groups {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        let (top, bottom) = (first.start, last.end);

        surface.create_shape(
            rectangle(vec2(seat.start, top), vec2(seat.end, bottom)),
            Style::fill(palette::SEAT),
            &[Tag::Seat, Tag::Removable],
        );

        let mut rests = vec![vec2(front, top), vec2(back, top)];
        for column in &group[..group.len() - 1] {
            let y = column.end;
            rests.extend([vec2(back, y), vec2(front, y), vec2(back, y)]);
        }
        rests.extend([vec2(back, bottom), vec2(front, bottom)]);
        surface.create_shape(
            line(rests),
            Style::line(palette::SEAT_OUTLINE, WALL_WIDTH),
            &[Tag::SeatOutline],
        );

        let x = seat.end + WALL_WIDTH / 2.0;
        surface.create_shape(
            line(vec![vec2(x, top), vec2(x, bottom)]),
            Style::line(palette::STAIRS_OUTLINE, WALL_WIDTH),
            &[Tag::FloorOutline],
        );
    }
}

/// Fill color of a passenger.
pub fn skin_tone(rng: &mut fastrand::Rng) -> Color {
    palette::SKIN_TONES[rng.usize(..palette::SKIN_TONES.len())]
}
