use glam::{vec2, Vec2};

use super::WALL_WIDTH;

/// Visible plane length as a fraction of the window width.
const BODY_MARGIN: f32 = 1.01;
/// Nose length as a fraction of the canvas width.
const NOSE: f32 = 1.0 / 7.0;
/// Tail length as a fraction of the canvas width.
const TAIL: f32 = 1.07 / 7.0;
/// Distance of each cabin wall from the canvas edge as a fraction of the
/// canvas height. Must stay below one half.
const WALL_EDGE: f32 = 0.4;

/// Cabin extent along the fuselage axis for a window width.
pub(super) fn cabin_span(window_width: f32) -> (f32, f32) {
    let width = canvas_width(window_width);
    (NOSE * width, (1.0 - TAIL) * width)
}

fn canvas_width(window_width: f32) -> f32 {
    window_width / BODY_MARGIN / (1.0 - 2.0 * NOSE)
}

/// Outer shape of the aircraft, in canvas pixels (y grows downwards).
#[derive(Debug, Clone, PartialEq)]
pub struct Fuselage {
    pub width: f32,
    pub height: f32,
    /// Cockpit wall.
    pub x0: f32,
    /// Tail wall.
    pub x1: f32,
    /// Upper cabin wall.
    pub y0: f32,
    /// Lower cabin wall, on the gate side.
    pub y1: f32,
    pub y0_inner: f32,
    pub y1_inner: f32,
    /// Wing root, front.
    pub shoulder: f32,
    /// Wing root, rear.
    pub armpit: f32,
    pub wing_tip: f32,
}

impl Fuselage {
    pub(super) fn new(window_width: f32, plane_width: f32) -> Self {
        let width = canvas_width(window_width);
        let height = plane_width / (1.0 - 2.0 * WALL_EDGE);
        let (x0, x1) = cabin_span(window_width);
        let (y0, y1) = (WALL_EDGE * height, (1.0 - WALL_EDGE) * height);
        let x_mid = width / 2.0;

        Fuselage {
            width,
            height,
            x0,
            x1,
            y0,
            y1,
            y0_inner: y0 + WALL_WIDTH,
            y1_inner: y1 - WALL_WIDTH,
            shoulder: x_mid - width / 8.0,
            armpit: x_mid + width / 32.0,
            wing_tip: x_mid + width / 10.0,
        }
    }

    pub fn center(&self) -> Vec2 {
        vec2(self.width, self.height) / 2.0
    }

    /// Y coordinate of the bottom of the gate's door frame.
    pub fn door_level(&self) -> f32 {
        (1.0 - WALL_EDGE / 3.0) * self.height
    }

    /// Body, wings, tail and nose as one closed outline.
    pub fn body_outline(&self) -> Vec<Vec2> {
        let Fuselage {
            width,
            height,
            x0,
            x1,
            y0,
            y1,
            shoulder,
            armpit,
            wing_tip,
            ..
        } = *self;
        let half = (0.5 - WALL_EDGE) * height;
        let y_mid = height / 2.0;
        let tail = x1 + 5.0 / 6.0 * NOSE * width;
        let nose = x0 - 3.0 / 4.0 * NOSE * width;

        vec![
            vec2(x0, y0),
            vec2(shoulder, y0),
            vec2(wing_tip, 0.0),
            vec2(armpit, y0),
            vec2(x1, y0),
            vec2(tail, y0 + half / 2.0),
            vec2(width, y_mid),
            vec2(tail, y1 - half / 2.0),
            vec2(x1, y1),
            vec2(armpit, y1),
            vec2(wing_tip, height),
            vec2(shoulder, y1),
            vec2(x0, y1),
            vec2(nose, y1 - half / 4.0),
            vec2(0.0, y_mid),
            vec2(nose, y0 + half / 4.0),
        ]
    }

    /// Centre and radii of the top tail wing.
    pub fn tail_wing(&self) -> (Vec2, Vec2) {
        let length = TAIL * self.width;
        let center = vec2(self.x1 + length / 2.0, self.height / 2.0);
        (center, vec2(5.0 / 16.0 * length, 5.0 / 64.0 * length))
    }
}
