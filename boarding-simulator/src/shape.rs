use geo::Rect;
use glam::Vec2;
use thin_vec::ThinVec;

use crate::util::{expand, segment_bounds, to_rect, union};

/// Handle of a shape on a collision surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rectangle { min: Vec2, max: Vec2 },
    Oval { center: Vec2, radius: Vec2 },
    /// Open polyline.
    Line { points: Vec<Vec2> },
    /// Closed, filled outline.
    Polygon { points: Vec<Vec2> },
}

impl Shape {
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Shape::Rectangle { min, max } => {
                *min += delta;
                *max += delta;
            }
            Shape::Oval { center, .. } => *center += delta,
            Shape::Line { points } | Shape::Polygon { points } => {
                points.iter_mut().for_each(|p| *p += delta)
            }
        }
    }

    /// Regions the shape occupies when drawn with the given line width. Lines
    /// give one region per segment.
    pub fn regions(&self, width: f32) -> ThinVec<Rect<f32>> {
        match self {
            Shape::Rectangle { min, max } => {
                thin_vec::thin_vec![expand(to_rect(*min, *max), width / 2.0)]
            }
            Shape::Oval { center, radius } => {
                thin_vec::thin_vec![expand(to_rect(*center - *radius, *center + *radius), width / 2.0)]
            }
            Shape::Line { points } => match points.as_slice() {
                [] => ThinVec::new(),
                [p] => thin_vec::thin_vec![segment_bounds([*p, *p], width)],
                _ => points
                    .windows(2)
                    .map(|w| segment_bounds([w[0], w[1]], width))
                    .collect(),
            },
            Shape::Polygon { points } => match points.split_first() {
                Some((first, rest)) => {
                    let (min, max) = rest
                        .iter()
                        .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
                    thin_vec::thin_vec![expand(to_rect(min, max), width / 2.0)]
                }
                None => ThinVec::new(),
            },
        }
    }
}

/// Bounds of a set of regions.
pub fn bounds(regions: &[Rect<f32>]) -> Option<Rect<f32>> {
    regions.iter().copied().reduce(union)
}

/// RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const fn hex(rgb: u32) -> Self {
        Color([
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
            1.0,
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Style {
    pub fill: Option<Color>,
    pub outline: Option<Color>,
    pub width: f32,
    pub dashed: bool,
}

impl Style {
    pub fn fill(color: Color) -> Self {
        Style {
            fill: Some(color),
            ..Default::default()
        }
    }

    pub fn line(color: Color, width: f32) -> Self {
        Style {
            outline: Some(color),
            width,
            ..Default::default()
        }
    }

    pub fn with_outline(self, color: Color, width: f32) -> Self {
        Style {
            outline: Some(color),
            width,
            ..self
        }
    }

    pub fn dashed(self) -> Self {
        Style {
            dashed: true,
            ..self
        }
    }
}

/// Shape roles. Collision checks only look at walls, seat outlines and
/// passengers, and skip anything tagged [`Tag::Removable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Body,
    WingWall,
    TailWing,
    CockpitWall,
    Floor,
    FloorOutline,
    Wall,
    Seat,
    SeatOutline,
    ExitDoor,
    Passenger,
    Removable,
}

impl Tag {
    pub fn is_collidable(self) -> bool {
        matches!(self, Tag::Wall | Tag::SeatOutline | Tag::Passenger)
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;
    use glam::vec2;

    use super::*;

    #[test]
    fn test_regions() {
        let line = Shape::Line {
            points: vec![vec2(0.0, 0.0), vec2(10.0, 0.0), vec2(10.0, 5.0)],
        };
        let regions = line.regions(2.0);
        assert_eq!(regions.len(), 2);
        assert_float_absolute_eq!(regions[0].min().y, -1.0);
        assert_float_absolute_eq!(regions[1].max().x, 11.0);

        let oval = Shape::Oval {
            center: vec2(5.0, 5.0),
            radius: vec2(2.0, 2.0),
        };
        let regions = oval.regions(2.0);
        assert_float_absolute_eq!(regions[0].min().x, 2.0);
        assert_float_absolute_eq!(regions[0].max().y, 8.0);

        let b = bounds(&line.regions(2.0)).unwrap();
        assert_float_absolute_eq!(b.max().y, 5.0);
        assert_float_absolute_eq!(b.min().x, 0.0);
    }

    #[test]
    fn test_translate() {
        let mut shape = Shape::Rectangle {
            min: vec2(0.0, 0.0),
            max: vec2(1.0, 1.0),
        };
        shape.translate(vec2(2.0, 3.0));
        assert_eq!(
            shape,
            Shape::Rectangle {
                min: vec2(2.0, 3.0),
                max: vec2(3.0, 4.0),
            }
        );
    }

    #[test]
    fn test_color() {
        let color = Color::hex(0xFF8000);
        assert_eq!(color.0[0], 1.0);
        assert_float_absolute_eq!(color.0[1], 128.0 / 255.0);
        assert_eq!(color.0[2], 0.0);
    }
}
