use geo::{Intersects, Rect};
use glam::Vec2;
use log::debug;
use thin_vec::ThinVec;

use crate::{
    collision::CollisionSurface,
    neighbor_grid::NeighborGrid,
    shape::{bounds, Shape, ShapeId, Style, Tag},
    util::translate,
};

struct Record {
    shape: Shape,
    style: Style,
    tags: ThinVec<Tag>,
    regions: ThinVec<Rect<f32>>,
    bounds: Option<Rect<f32>>,
}

/// Headless collision surface. Shapes are kept in a draw order and indexed in
/// a bucket grid for overlap queries.
pub struct ShapeRegistry {
    records: Vec<Record>,
    order: Vec<ShapeId>,
    grid: NeighborGrid,
    closed: bool,
}

impl ShapeRegistry {
    /// `size` is the canvas extent; `unit` the bucket size of the grid.
    pub fn new(size: Vec2, unit: f32) -> Self {
        ShapeRegistry {
            records: Vec::new(),
            order: Vec::new(),
            grid: NeighborGrid::new(size, unit),
            closed: false,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.record(id).map(|r| &r.shape)
    }

    /// Shapes bottom to top.
    pub fn drawables(&self) -> impl Iterator<Item = (ShapeId, &Shape, &Style, &[Tag])> {
        self.order.iter().filter_map(|&id| {
            self.record(id)
                .map(|r| (id, &r.shape, &r.style, r.tags.as_slice()))
        })
    }

    /// Shapes carrying `tag`, bottom to top.
    pub fn with_tag(&self, tag: Tag) -> Vec<ShapeId> {
        self.order
            .iter()
            .copied()
            .filter(|&id| self.tags(id).contains(&tag))
            .collect()
    }

    fn record(&self, id: ShapeId) -> Option<&Record> {
        self.records.get(id.0 as usize)
    }

    /// Takes `ids` out of the draw order and puts them back right above
    /// `anchor`, or on top.
    fn reorder(&mut self, ids: &[ShapeId], anchor: Option<ShapeId>) {
        self.order.retain(|id| !ids.contains(id));
        let index = anchor
            .and_then(|a| self.order.iter().position(|&i| i == a))
            .map_or(self.order.len(), |position| position + 1);
        self.order.splice(index..index, ids.iter().copied());
    }
}

impl CollisionSurface for ShapeRegistry {
    fn create_shape(&mut self, shape: Shape, style: Style, tags: &[Tag]) -> ShapeId {
        let id = ShapeId(self.records.len() as u32);
        let regions = shape.regions(style.width);
        let bounds = bounds(&regions);
        if let Some(bounds) = &bounds {
            self.grid.insert(id.0, bounds);
        }

        self.records.push(Record {
            shape,
            style,
            tags: tags.iter().copied().collect(),
            regions,
            bounds,
        });
        self.order.push(id);
        id
    }

    fn move_shape(&mut self, id: ShapeId, delta: Vec2) {
        let Some(record) = self.records.get_mut(id.0 as usize) else {
            debug!("move of unknown shape {id:?} ignored");
            return;
        };

        if let Some(bounds) = &record.bounds {
            self.grid.remove(id.0, bounds);
        }
        record.shape.translate(delta);
        for region in record.regions.iter_mut() {
            *region = translate(*region, delta);
        }
        record.bounds = record.bounds.map(|b| translate(b, delta));
        if let Some(bounds) = &record.bounds {
            self.grid.insert(id.0, bounds);
        }
    }

    fn find_overlapping(&self, region: Rect<f32>) -> Vec<ShapeId> {
        self.grid
            .query(&region)
            .into_iter()
            .filter(|&id| {
                self.records[id as usize]
                    .regions
                    .iter()
                    .any(|r| r.intersects(&region))
            })
            .map(ShapeId)
            .collect()
    }

    fn tags(&self, id: ShapeId) -> &[Tag] {
        self.record(id)
            .map(|r| r.tags.as_slice())
            .unwrap_or_default()
    }

    fn raise(&mut self, id: ShapeId, above: Option<ShapeId>) {
        if above.is_some_and(|a| a == id || self.record(a).is_none()) {
            return;
        }
        self.reorder(&[id], above);
    }

    fn raise_tag(&mut self, tag: Tag, above: Option<Tag>) {
        let ids = self.with_tag(tag);
        let anchor = match above {
            Some(above) => {
                let anchor = self
                    .order
                    .iter()
                    .rev()
                    .copied()
                    .find(|&i| self.tags(i).contains(&above) && !ids.contains(&i));
                if anchor.is_none() {
                    return;
                }
                anchor
            }
            None => None,
        };
        self.reorder(&ids, anchor);
    }

    fn close(&mut self) {
        self.records.clear();
        self.order.clear();
        self.grid.clear();
        self.closed = true;
    }
}
