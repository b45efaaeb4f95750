//!
//! flat_collide is the collision layer of a 2D game: transformable convex polygons,
//! axis-aligned rectangles and a flat grid to find which of them intersect.
//!
//! Shapes live in screen coordinates (y pointing down). Intersection is exact and
//! symmetric, shapes that only touch are not considered intersecting.
//!
//! ```rust
//! use flat_collide::{intersect, Polygon, Rectf, Vector};
//!
//! let mut tri = Polygon::new(vec![
//!     Vector::new(0.0, 0.0),
//!     Vector::new(4.0, 4.0),
//!     Vector::new(0.0, 4.0),
//! ]);
//! let wall = Rectf::new(3.0, 0.0, 10.0, 10.0);
//!
//! assert!(intersect(&tri, &wall));
//! tri.set_translation(Vector::new(-2.0, 0.0));
//! assert!(!intersect(&tri, &wall));
//! ```
//!
//! [`ShapeGrid`] partitions the space using cells of user defined width, stored in a HashMap
//! so cells are lazily allocated.
//!

pub mod cell;
pub mod config;
pub mod error;
pub mod math;
pub mod shape;
pub mod shapegrid;
pub mod storage;

pub use config::GridConfig;
pub use error::ShapeError;
pub use math::{Rect, Size, Vector};
pub use shape::{intersect, Polygon, Rectf, Shape, ShapeKind, ShapeRef};
pub use shapegrid::{ShapeGrid, ShapeGridHandle};
