use geo::Rect;
use glam::Vec2;

use crate::{
    shape::{Shape, ShapeId, Style, Tag},
    util::rect_around,
};

/// Drawing and collision surface the simulation runs on.
///
/// Passengers only ever move their own shape; everything else is created once
/// when the cabin scene is built.
pub trait CollisionSurface {
    fn create_shape(&mut self, shape: Shape, style: Style, tags: &[Tag]) -> ShapeId;

    fn move_shape(&mut self, id: ShapeId, delta: Vec2);

    /// Shapes whose regions intersect `region`. Touching counts as
    /// intersecting.
    fn find_overlapping(&self, region: Rect<f32>) -> Vec<ShapeId>;

    /// Tags of a shape. Unknown ids have none.
    fn tags(&self, id: ShapeId) -> &[Tag];

    /// Moves a shape in the draw order to just above `above`, or to the top.
    fn raise(&mut self, id: ShapeId, above: Option<ShapeId>);

    /// Moves every shape tagged `tag` to just above the topmost shape tagged
    /// `above`, or to the top, keeping their relative order.
    fn raise_tag(&mut self, tag: Tag, above: Option<Tag>);

    fn close(&mut self);
}

/// Collision box of a passenger centred at `center`.
pub fn collision_box(center: Vec2, radius: f32, margin: f32) -> Rect<f32> {
    rect_around(center, radius - margin)
}

/// Whether `region` hits a wall, a seat outline or another passenger.
pub fn is_obstructed<S: CollisionSurface + ?Sized>(
    surface: &S,
    region: Rect<f32>,
    own: Option<ShapeId>,
) -> bool {
    surface
        .find_overlapping(region)
        .into_iter()
        .filter(|&id| Some(id) != own)
        .any(|id| {
            let tags = surface.tags(id);
            !tags.contains(&Tag::Removable) && tags.iter().any(|t| t.is_collidable())
        })
}
