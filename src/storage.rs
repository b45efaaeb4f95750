use crate::math::Vector;
use crate::shape::Rectf;
use fnv::FnvHashMap;

pub type CellIdx = (i32, i32);

/// SparseStorage stores cells in a HashMap, so cells are lazily allocated
/// and dropped again once they are empty.
#[derive(Clone)]
pub struct SparseStorage<T: Default> {
    cell_size: i32,
    cells: FnvHashMap<CellIdx, T>,
}

impl<T: Default> SparseStorage<T> {
    /// `cell_size` must be positive, `ShapeGrid` checks it.
    pub fn new(cell_size: i32) -> Self {
        debug_assert!(cell_size > 0);
        Self {
            cell_size,
            cells: Default::default(),
        }
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    pub fn cells(&self) -> &FnvHashMap<CellIdx, T> {
        &self.cells
    }

    pub fn cell(&self, id: CellIdx) -> Option<&T> {
        self.cells.get(&id)
    }

    pub fn cell_mut(&mut self, id: CellIdx) -> &mut T {
        self.cells.entry(id).or_default()
    }

    /// Calls `f` on an existing cell, dropping the cell if `f` returns true.
    pub fn modify(&mut self, id: CellIdx, f: impl FnOnce(&mut T) -> bool) {
        if let Some(cell) = self.cells.get_mut(&id) {
            if f(cell) {
                self.cells.remove(&id);
            }
        }
    }

    /// Coordinates too far out for an `i32` land in the outermost cells.
    pub fn cell_id(&self, pos: Vector) -> CellIdx {
        let size = self.cell_size as f32;
        (clamp_cell(pos.x / size), clamp_cell(pos.y / size))
    }

    /// Ids of every cell that `rect` touches.
    pub fn cell_range(&self, rect: &Rectf) -> XYRange {
        let (x1, y1) = self.cell_id(rect.p1());
        let (x2, y2) = self.cell_id(rect.p2());
        XYRange {
            x1,
            x2: x2 + 1,
            y2: y2 + 1,
            x: x1,
            y: y1,
        }
    }

    pub fn cell_rect(&self, (x, y): CellIdx) -> Rectf {
        let size = self.cell_size as f32;
        Rectf::new(
            x as f32 * size,
            y as f32 * size,
            (x + 1) as f32 * size,
            (y + 1) as f32 * size,
        )
    }
}

// `i32::MAX` stays free so that a range end never overflows
fn clamp_cell(x: f32) -> i32 {
    (x.floor() as i32).min(i32::MAX - 1)
}

pub struct XYRange {
    x1: i32,
    x2: i32,
    y2: i32,
    x: i32,
    y: i32,
}

impl Iterator for XYRange {
    type Item = CellIdx;

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.y2 || self.x1 >= self.x2 {
            return None;
        }

        let v = (self.x, self.y);
        self.x += 1;
        if self.x == self.x2 {
            self.x = self.x1;
            self.y += 1;
        }

        Some(v)
    }
}
