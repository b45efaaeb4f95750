use crate::error::ShapeError;

/// Settings of a [`ShapeGrid`](crate::ShapeGrid).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    /// Width and height of a cell, in world units.
    /// Should be about the size of the shapes and of the queries.
    pub cell_size: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        // one tile
        Self { cell_size: 32 }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), ShapeError> {
        if self.cell_size <= 0 {
            return Err(ShapeError::InvalidCellSize(self.cell_size));
        }
        Ok(())
    }
}
