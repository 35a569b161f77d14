use glam::{Affine2, Mat2, Vec2};
use miniquad::{
    BufferId, BufferLayout, BufferSource, BufferType, BufferUsage, Pipeline, PipelineParams,
    RenderingBackend, ShaderMeta, ShaderSource, UniformBlockLayout, UniformDesc, UniformType,
    UniformsSource, VertexAttribute, VertexFormat, VertexStep,
};

const CIRCLE_SEGMENTS: usize = 32;

/// Unit meshes every instance is drawn from.
#[derive(Debug, Clone, Copy)]
pub enum Primitive {
    /// Square of side one centred on the origin.
    Rectangle,
    /// Circle of radius one centred on the origin.
    Circle,
}

pub struct RenderState {
    ctx: Box<dyn RenderingBackend>,
    pipeline: Pipeline,
    rectangle: Mesh,
    circle: Mesh,

    commands: Vec<Command>,
    /// Instance buffers of the frame being recorded.
    frame_buffers: Vec<BufferId>,
}

impl RenderState {
    pub fn new() -> anyhow::Result<Self> {
        let mut ctx = miniquad::window::new_rendering_backend();

        let rectangle = Mesh::triangle_fan(
            &mut ctx,
            &[
                Vec2::new(-0.5, -0.5),
                Vec2::new(0.5, -0.5),
                Vec2::new(0.5, 0.5),
                Vec2::new(-0.5, 0.5),
            ],
        );
        let circle_outline: Vec<Vec2> = (0..CIRCLE_SEGMENTS)
            .map(|i| Vec2::from_angle(i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU))
            .collect();
        let circle = Mesh::triangle_fan(&mut ctx, &circle_outline);

        let uniforms = vec![
            UniformDesc::new("view_offset", UniformType::Float2),
            UniformDesc::new("view_scale", UniformType::Float2),
        ];
        let shader = ctx.new_shader(
            ShaderSource::Glsl {
                vertex: VERTEX_SHADER,
                fragment: FRAGMENT_SHADER,
            },
            ShaderMeta {
                images: vec![],
                uniforms: UniformBlockLayout { uniforms },
            },
        )?;

        let per_instance = BufferLayout {
            step_func: VertexStep::PerInstance,
            ..Default::default()
        };
        let pipeline = ctx.new_pipeline(
            &[BufferLayout::default(), per_instance],
            &[
                VertexAttribute::with_buffer("local", VertexFormat::Float2, 0),
                VertexAttribute::with_buffer("axes", VertexFormat::Float4, 1),
                VertexAttribute::with_buffer("offset", VertexFormat::Float2, 1),
                VertexAttribute::with_buffer("tint", VertexFormat::Float4, 1),
            ],
            shader,
            PipelineParams::default(),
        );

        Ok(RenderState {
            ctx,
            pipeline,
            rectangle,
            circle,
            commands: Vec::new(),
            frame_buffers: Vec::new(),
        })
    }

    /// Mesh of a closed outline, fanned out from `hub`. The outline must be
    /// star-shaped around the hub.
    pub fn new_polygon(&mut self, hub: Vec2, points: &[Vec2]) -> Mesh {
        let fan: Vec<Vec2> = std::iter::once(hub)
            .chain(points.iter().copied())
            .chain(points.first().copied())
            .collect();
        Mesh::triangle_fan(&mut self.ctx, &fan)
    }

    pub fn begin_pass(&mut self, background: Color) {
        let [r, g, b, a] = background.0;
        self.ctx
            .begin_default_pass(miniquad::PassAction::clear_color(r, g, b, a));
    }

    /// Replays the recorded frame and frees its instance buffers.
    pub fn end_pass(&mut self) {
        self.ctx.apply_pipeline(&self.pipeline);

        for command in self.commands.drain(..) {
            match command {
                Command::View(view) => {
                    self.ctx.apply_uniforms(UniformsSource::table(&view));
                }
                Command::Draw {
                    mesh,
                    instances,
                    count,
                } => {
                    self.ctx.apply_bindings(&miniquad::Bindings {
                        vertex_buffers: vec![mesh.vertices, instances],
                        index_buffer: mesh.indices,
                        images: vec![],
                    });
                    self.ctx.draw(0, mesh.index_count, count);
                }
            }
        }

        self.ctx.end_render_pass();
        self.ctx.commit_frame();

        for buffer in self.frame_buffers.drain(..) {
            self.ctx.delete_buffer(buffer);
        }
    }

    /// Centres the view on `target`. `scale` maps canvas units to clip space
    /// per axis.
    pub fn set_view(&mut self, target: Vec2, scale: Vec2) {
        self.commands.push(Command::View(View {
            view_offset: (-target).to_array(),
            view_scale: scale.to_array(),
        }));
    }

    pub fn draw(&mut self, primitive: Primitive, instances: &[Instance]) {
        let mesh = match primitive {
            Primitive::Rectangle => self.rectangle,
            Primitive::Circle => self.circle,
        };
        self.draw_mesh(&mesh, instances);
    }

    pub fn draw_mesh(&mut self, mesh: &Mesh, instances: &[Instance]) {
        if instances.is_empty() {
            return;
        }

        let buffer = self.ctx.new_buffer(
            BufferType::VertexBuffer,
            BufferUsage::Immutable,
            BufferSource::slice(instances),
        );
        self.frame_buffers.push(buffer);
        self.commands.push(Command::Draw {
            mesh: *mesh,
            instances: buffer,
            count: instances.len() as i32,
        });
    }
}

enum Command {
    View(View),
    Draw {
        mesh: Mesh,
        instances: BufferId,
        count: i32,
    },
}

/// Affine transform of a unit mesh plus its fill.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Instance {
    pub axes: [f32; 4],
    pub offset: [f32; 2],
    pub tint: [f32; 4],
}

impl Instance {
    pub fn new(transform: Affine2, color: Color) -> Self {
        Instance {
            axes: transform.matrix2.to_cols_array(),
            offset: transform.translation.to_array(),
            tint: color.0,
        }
    }

    /// Draws a mesh where it was built.
    pub fn identity(color: Color) -> Self {
        Instance::new(Affine2::IDENTITY, color)
    }

    /// Axis-aligned box, for [`Primitive::Rectangle`].
    pub fn from_box(min: Vec2, max: Vec2, color: Color) -> Self {
        Instance::new(
            Affine2::from_scale_angle_translation(max - min, 0.0, (min + max) * 0.5),
            color,
        )
    }

    /// Ellipse, for [`Primitive::Circle`].
    pub fn from_oval(center: Vec2, radius: Vec2, color: Color) -> Self {
        Instance::new(
            Affine2::from_scale_angle_translation(radius, 0.0, center),
            color,
        )
    }

    /// Segment of a polyline, for [`Primitive::Rectangle`]. Both ends reach
    /// half the width past the points so consecutive segments join.
    pub fn from_line(start: Vec2, end: Vec2, width: f32, color: Color) -> Self {
        let along = end - start;
        let direction = along.normalize_or(Vec2::X);
        let scale = Vec2::new(along.length() + width, width);
        Instance::new(
            Affine2 {
                matrix2: Mat2::from_cols(direction, direction.perp())
                    * Mat2::from_diagonal(scale),
                translation: (start + end) * 0.5,
            },
            color,
        )
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct View {
    view_offset: [f32; 2],
    view_scale: [f32; 2],
}

/// Indexed triangles on the GPU.
#[derive(Debug, Clone, Copy)]
pub struct Mesh {
    vertices: BufferId,
    indices: BufferId,
    index_count: i32,
}

impl Mesh {
    /// Fans triangles out from the first point.
    fn triangle_fan(ctx: &mut Box<dyn RenderingBackend>, points: &[Vec2]) -> Self {
        let indices: Vec<u16> = (1..(points.len() as u16).saturating_sub(1))
            .flat_map(|i| [0, i, i + 1])
            .collect();
        let vertices = ctx.new_buffer(
            BufferType::VertexBuffer,
            BufferUsage::Immutable,
            BufferSource::slice(points),
        );
        let index_buffer = ctx.new_buffer(
            BufferType::IndexBuffer,
            BufferUsage::Immutable,
            BufferSource::slice(&indices),
        );

        Mesh {
            vertices,
            indices: index_buffer,
            index_count: indices.len() as i32,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color(pub [f32; 4]);

impl From<boarding_simulator::shape::Color> for Color {
    fn from(color: boarding_simulator::shape::Color) -> Self {
        Color(color.0)
    }
}

const VERTEX_SHADER: &str = r#"
    #version 140

    in vec2 local;
    in vec4 axes;
    in vec2 offset;
    in vec4 tint;

    uniform vec2 view_offset;
    uniform vec2 view_scale;

    flat out vec4 v_tint;

    void main() {
        vec2 world = offset + mat2(axes) * local;
        gl_Position = vec4((world + view_offset) * view_scale, 0.0, 1.0);
        v_tint = tint;
    }
"#;

const FRAGMENT_SHADER: &str = r#"
    #version 140

    flat in vec4 v_tint;
    out vec4 color;

    void main() {
        color = v_tint;
    }
"#;
