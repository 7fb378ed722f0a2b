//! Spatial partitioning data structures
//!
//! Provides efficient spatial indexing for render culling, hit detection,
//! and proximity queries in 2D space. Two complementary structures are
//! offered: a uniform hash grid keyed by node handle and an adaptive
//! quadtree generic over any positioned item type.

mod grid;
mod quadtree;

pub use grid::SpatialGrid;
pub use quadtree::{Positioner, QuadTree};
