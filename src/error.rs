use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("a polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    /// The winding turns the wrong way at this vertex (index into the vertex list).
    #[error("polygon is not convex (or wound the wrong way) at vertex {vertex}")]
    NotConvex { vertex: usize },
    #[error("cell size ({0}) cannot be less than or equal to zero")]
    InvalidCellSize(i32),
}
