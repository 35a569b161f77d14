mod state;

use boarding_simulator::{
    scene::palette,
    shape::{Shape, Style},
};
use glam::{vec2, Vec2};
use log::error;
use miniquad::{EventHandler, KeyCode};
use state::{Color, Instance, Mesh, Primitive, RenderState};

use crate::{CONTROL_STATE, SIMULATOR_STATE};

/// Length of a dash and of the gap after it, in canvas pixels.
const DASH: f32 = 6.0;

pub struct Renderer {
    state: RenderState,
    /// Static cabin shapes, bottom to top. Polygons get their own mesh.
    scene: Vec<(Shape, Style, Option<Mesh>)>,
    view_target: Vec2,
    view_scale: f32,
    prev_cursor_pos: Vec2,
    cursor_pos: Vec2,
    mouse_left_down: bool,
    mouse_center_down: bool,
    wheel_delta: f32,
}

impl Renderer {
    pub fn new() -> anyhow::Result<Self> {
        let mut state = RenderState::new()?;
        let (canvas, scene) = {
            let simulator = SIMULATOR_STATE.lock().unwrap();
            (simulator.canvas, simulator.scene.clone())
        };

        let hub = canvas * 0.5;
        let scene = scene
            .into_iter()
            .map(|(shape, style)| {
                let mesh = match &shape {
                    Shape::Polygon { points } => Some(state.new_polygon(hub, points)),
                    _ => None,
                };
                (shape, style, mesh)
            })
            .collect();

        let (width, height) = miniquad::window::screen_size();
        let view_scale = (2.0 / canvas.x).min(2.0 * height / (canvas.y * width));

        Ok(Renderer {
            state,
            scene,
            view_target: hub,
            view_scale,
            prev_cursor_pos: Vec2::ZERO,
            cursor_pos: Vec2::ZERO,
            mouse_left_down: false,
            mouse_center_down: false,
            wheel_delta: 0.0,
        })
    }
}

fn draw_shape(state: &mut RenderState, shape: &Shape, style: &Style, mesh: Option<&Mesh>) {
    let outline = style
        .outline
        .filter(|_| style.width > 0.0)
        .map(Color::from);
    let fill = style.fill.map(Color::from);

    match shape {
        Shape::Rectangle { min, max } => {
            if let Some(fill) = fill {
                state.draw(
                    Primitive::Rectangle,
                    &[Instance::from_box(*min, *max, fill)],
                );
            }
            if let Some(outline) = outline {
                let corners = [*min, vec2(max.x, min.y), *max, vec2(min.x, max.y), *min];
                draw_polyline(state, &corners, style, outline);
            }
        }
        Shape::Oval { center, radius } => {
            let half = style.width / 2.0;
            if let Some(outline) = outline {
                let ring = Instance::from_oval(*center, *radius + half, outline);
                state.draw(Primitive::Circle, &[ring]);
            }
            if let Some(fill) = fill {
                let inner = if outline.is_some() {
                    *radius - half
                } else {
                    *radius
                };
                state.draw(
                    Primitive::Circle,
                    &[Instance::from_oval(*center, inner, fill)],
                );
            }
        }
        Shape::Line { points } => {
            if let Some(outline) = outline {
                draw_polyline(state, points, style, outline);
            }
        }
        Shape::Polygon { points } => {
            if let (Some(fill), Some(mesh)) = (fill, mesh) {
                state.draw_mesh(mesh, &[Instance::identity(fill)]);
            }
            if let Some(outline) = outline {
                let closed: Vec<Vec2> = points.iter().chain(points.first()).copied().collect();
                draw_polyline(state, &closed, style, outline);
            }
        }
    }
}

fn draw_polyline(state: &mut RenderState, points: &[Vec2], style: &Style, color: Color) {
    let mut instances = Vec::new();
    for segment in points.windows(2) {
        let (start, end) = (segment[0], segment[1]);
        if !style.dashed {
            instances.push(Instance::from_line(start, end, style.width, color));
            continue;
        }

        let length = start.distance(end);
        let direction = (end - start).normalize_or_zero();
        let mut offset = 0.0;
        while offset < length {
            let dash_end = (offset + DASH).min(length);
            instances.push(Instance::from_line(
                start + direction * offset,
                start + direction * dash_end,
                style.width,
                color,
            ));
            offset += 2.0 * DASH;
        }
    }
    state.draw(Primitive::Rectangle, &instances);
}

impl EventHandler for Renderer {
    fn update(&mut self) {}

    fn draw(&mut self) {
        let (width, height) = miniquad::window::screen_size();

        // Handle camera movement. Canvas y grows downwards like the screen.
        self.view_scale *= 2.0_f32.powf(self.wheel_delta / 512.0);
        self.wheel_delta = 0.0;

        let cursor_delta = self.cursor_pos - self.prev_cursor_pos;
        self.prev_cursor_pos = self.cursor_pos;

        if self.mouse_center_down || self.mouse_left_down {
            self.view_target -= cursor_delta * 2.0 / (self.view_scale * width);
        }

        // Render.
        let state = &mut self.state;

        state.begin_pass(palette::BACKGROUND.into());
        state.set_view(
            self.view_target,
            vec2(1.0, -width / height) * self.view_scale,
        );

        for (shape, style, mesh) in &self.scene {
            draw_shape(state, shape, style, mesh.as_ref());
        }

        {
            let simulator = SIMULATOR_STATE.lock().unwrap();
            for (shape, style) in &simulator.passengers {
                draw_shape(state, shape, style, None);
            }
        }

        state.end_pass();
    }

    fn key_down_event(
        &mut self,
        keycode: miniquad::KeyCode,
        _keymods: miniquad::KeyMods,
        repeat: bool,
    ) {
        if !repeat {
            match keycode {
                KeyCode::Space => {
                    let mut state = CONTROL_STATE.lock().unwrap();
                    state.paused ^= true;
                }
                KeyCode::Escape => miniquad::window::order_quit(),
                _ => {}
            }
        }
    }

    fn mouse_wheel_event(&mut self, _x: f32, y: f32) {
        self.wheel_delta += y;
    }

    fn mouse_motion_event(&mut self, x: f32, y: f32) {
        self.cursor_pos = vec2(x, y);
    }

    fn mouse_button_down_event(&mut self, button: miniquad::MouseButton, _x: f32, _y: f32) {
        match button {
            miniquad::MouseButton::Left => {
                self.mouse_left_down = true;
            }
            miniquad::MouseButton::Middle => {
                self.mouse_center_down = true;
            }
            _ => {}
        }
    }

    fn mouse_button_up_event(&mut self, button: miniquad::MouseButton, _x: f32, _y: f32) {
        match button {
            miniquad::MouseButton::Left => {
                self.mouse_left_down = false;
            }
            miniquad::MouseButton::Middle => {
                self.mouse_center_down = false;
            }
            _ => {}
        }
    }
}

pub fn run(width: u32, height: u32) {
    let conf = miniquad::conf::Conf {
        window_title: "Airplane Boarding".into(),
        window_width: width as i32,
        window_height: height as i32,
        icon: None,
        sample_count: 4,
        ..Default::default()
    };

    miniquad::start(conf, move || match Renderer::new() {
        Ok(renderer) => Box::new(renderer),
        Err(e) => {
            error!("Failed to set up the renderer: {e}");
            std::process::exit(1);
        }
    });
}
