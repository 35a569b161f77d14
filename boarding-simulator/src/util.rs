use geo::{coord, Rect};
use glam::{vec2, Vec2};
use num_traits::PrimInt;

/// Index struct for [`ndarray::Array2`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Index {
    pub y: i32,
    pub x: i32,
}

impl Index {
    /// Values that do not fit in an `i32` give an index that is never valid.
    pub fn new<T: PrimInt>(x: T, y: T) -> Self {
        Index {
            x: x.to_i32().unwrap_or(-1),
            y: y.to_i32().unwrap_or(-1),
        }
    }
}

unsafe impl ndarray::NdIndex<ndarray::Ix2> for Index {
    fn index_checked(&self, dim: &ndarray::Ix2, strides: &ndarray::Ix2) -> Option<isize> {
        if self.x.is_negative() || self.y.is_negative() {
            None
        } else {
            (self.y as usize, self.x as usize).index_checked(dim, strides)
        }
    }

    fn index_unchecked(&self, strides: &ndarray::Ix2) -> isize {
        (self.y as usize, self.x as usize).index_unchecked(strides)
    }
}

pub fn to_rect(min: Vec2, max: Vec2) -> Rect<f32> {
    Rect::new(coord! { x: min.x, y: min.y }, coord! { x: max.x, y: max.y })
}

/// Square of half size `half` around `center`.
pub fn rect_around(center: Vec2, half: f32) -> Rect<f32> {
    to_rect(center - half, center + half)
}

pub fn expand(rect: Rect<f32>, amount: f32) -> Rect<f32> {
    let min = rect.min();
    let max = rect.max();
    Rect::new(
        coord! { x: min.x - amount, y: min.y - amount },
        coord! { x: max.x + amount, y: max.y + amount },
    )
}

pub fn translate(rect: Rect<f32>, delta: Vec2) -> Rect<f32> {
    let min = rect.min();
    let max = rect.max();
    Rect::new(
        coord! { x: min.x + delta.x, y: min.y + delta.y },
        coord! { x: max.x + delta.x, y: max.y + delta.y },
    )
}

/// Smallest rect containing both.
pub fn union(a: Rect<f32>, b: Rect<f32>) -> Rect<f32> {
    Rect::new(
        coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
        coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
    )
}

/// Calculate coordinates of vertices of line with given width.
pub fn line_with_width(line: [Vec2; 2], width: f32) -> [Vec2; 4] {
    let a = (line[1] - line[0]).normalize_or_zero();
    let b = vec2(a.y, -a.x) * 0.5 * width;

    [line[0] - b, line[0] + b, line[1] + b, line[1] - b]
}

/// Bounding box of a line segment drawn with the given width.
pub fn segment_bounds(line: [Vec2; 2], width: f32) -> Rect<f32> {
    let corners = line_with_width(line, width);
    let (min, max) = corners
        .iter()
        .fold((corners[0], corners[0]), |(min, max), &p| {
            (min.min(p), max.max(p))
        });
    to_rect(min, max)
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;
    use geo::Intersects;
    use glam::vec2;
    use ndarray::array;

    use super::*;

    #[test]
    fn test_index() {
        let grid = array![[1, 2, 3], [4, 5, 6]];

        assert_eq!(grid.get(Index::new(2, 1)), Some(&6));
        assert_eq!(grid.get(Index::new(1, 0)), Some(&2));
        assert_eq!(grid.get(Index::new(-1, 0)), None);
        assert_eq!(grid.get(Index::new(3, 0)), None);
        assert_eq!(grid.get(Index::new(u64::MAX, 0)), None);
    }

    #[test]
    fn test_segment_bounds() {
        let rect = segment_bounds([vec2(1.0, 1.0), vec2(4.0, 1.0)], 2.0);
        assert_float_absolute_eq!(rect.min().x, 1.0);
        assert_float_absolute_eq!(rect.min().y, 0.0);
        assert_float_absolute_eq!(rect.max().x, 4.0);
        assert_float_absolute_eq!(rect.max().y, 2.0);

        let point = segment_bounds([vec2(3.0, 3.0), vec2(3.0, 3.0)], 2.0);
        assert_float_absolute_eq!(point.width(), 0.0);
    }

    #[test]
    fn test_touching_rects_intersect() {
        let a = to_rect(vec2(0.0, 0.0), vec2(1.0, 1.0));
        let b = translate(a, vec2(1.0, 0.0));
        let c = translate(a, vec2(1.5, 0.0));

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(expand(a, 0.5).intersects(&c));
        assert_float_absolute_eq!(union(a, c).width(), 2.5);
    }
}
