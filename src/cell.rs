use crate::shapegrid::ShapeGridHandle;

/// A handle registered in a cell, with whether the shape fits in this single cell
/// (in which case queries don't need to deduplicate it).
pub type CellObject = (ShapeGridHandle, bool);

/// A single cell of the grid, can be empty
#[derive(Default, Clone)]
pub struct ShapeGridCell {
    pub objs: Vec<CellObject>,
}

impl ShapeGridCell {
    /// Removes `handle` from the cell, returns true if the cell is now empty.
    pub fn remove(&mut self, handle: ShapeGridHandle) -> bool {
        if let Some(p) = self.objs.iter().position(|(x, _)| *x == handle) {
            self.objs.swap_remove(p);
        }
        self.objs.is_empty()
    }
}
