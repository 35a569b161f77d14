use geo::Rect;
use glam::Vec2;
use ndarray::Array2;
use thin_vec::ThinVec;

use super::util::Index;

/// Uniform bucket grid over the canvas. Shapes are listed in every cell their
/// bounds touch; bounds outside the grid are clamped to the border cells.
pub struct NeighborGrid {
    pub data: Array2<ThinVec<u32>>,
    pub unit: f32,
    pub shape: (usize, usize),
}

impl NeighborGrid {
    pub fn new(size: Vec2, unit: f32) -> Self {
        let shape = (size / unit).ceil().max(Vec2::ONE);
        let shape = (shape.y as usize, shape.x as usize);
        let data = Array2::from_elem(shape, ThinVec::new());

        NeighborGrid { data, unit, shape }
    }

    fn cell_range(&self, rect: &Rect<f32>) -> (Index, Index) {
        let clamp = |v: f32, n: usize| ((v / self.unit).floor().max(0.0) as usize).min(n - 1);
        let (min, max) = (rect.min(), rect.max());

        (
            Index::new(clamp(min.x, self.shape.1), clamp(min.y, self.shape.0)),
            Index::new(clamp(max.x, self.shape.1), clamp(max.y, self.shape.0)),
        )
    }

    fn cells(&self, rect: &Rect<f32>) -> impl Iterator<Item = Index> {
        let (min, max) = self.cell_range(rect);
        (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| Index::new(x, y)))
    }

    pub fn insert(&mut self, id: u32, rect: &Rect<f32>) {
        for ix in self.cells(rect).collect::<ThinVec<_>>() {
            if let Some(ids) = self.data.get_mut(ix) {
                if !ids.has_capacity() {
                    ids.reserve(4);
                }
                ids.push(id);
            }
        }
    }

    pub fn remove(&mut self, id: u32, rect: &Rect<f32>) {
        for ix in self.cells(rect).collect::<ThinVec<_>>() {
            if let Some(ids) = self.data.get_mut(ix) {
                ids.retain(|&i| i != id);
            }
        }
    }

    /// Ids listed in any cell touched by `rect`, sorted and deduplicated.
    pub fn query(&self, rect: &Rect<f32>) -> Vec<u32> {
        let mut ids: Vec<u32> = self
            .cells(rect)
            .filter_map(|ix| self.data.get(ix))
            .flat_map(|ids| ids.iter().copied())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn clear(&mut self) {
        self.data.fill(ThinVec::new());
    }
}
