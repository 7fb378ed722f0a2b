//! Uniform spatial hash grid
//!
//! Buckets node positions into fixed-size integer cells for cheap
//! proximity queries. The grid is a cache, not a source of truth: it only
//! reflects whichever position was most recently registered for a node,
//! and goes stale if a node moves without re-registration.

use std::collections::HashMap;

use crate::foundation::math::{distance_squared, Point2, Vec2};
use crate::scene::{Aabb, NodeKey};

/// Integer coordinate of one grid cell
type Cell = (i32, i32);

/// Uniform spatial grid over node positions
///
/// Maps node handle to its last-registered cell, and cell to the bucket of
/// `(handle, exact position)` pairs recorded there. Registration follows an
/// explicit remove-then-register protocol: [`SpatialGrid::register_position`]
/// never removes a prior registration on its own, so a caller that skips
/// [`SpatialGrid::remove_registry`] leaves duplicate stale entries behind.
#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<Cell, Vec<(NodeKey, Point2)>>,
    registry: HashMap<NodeKey, Cell>,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialGrid {
    /// Default cell edge length in world units
    pub const DEFAULT_CELL_SIZE: f32 = 100.0;

    /// Create a grid with the default cell size
    pub fn new() -> Self {
        Self::with_cell_size(Self::DEFAULT_CELL_SIZE)
    }

    /// Create a grid with a custom cell size
    pub fn with_cell_size(cell_size: f32) -> Self {
        let cell_size = if cell_size > 0.0 {
            cell_size
        } else {
            log::warn!(
                "invalid grid cell size {cell_size}, falling back to {}",
                Self::DEFAULT_CELL_SIZE
            );
            Self::DEFAULT_CELL_SIZE
        };
        Self {
            cell_size,
            cells: HashMap::new(),
            registry: HashMap::new(),
        }
    }

    /// Cell edge length in world units
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of registered nodes
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether no nodes are registered
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Record a node at a position
    ///
    /// Computes the cell for `pos`, stores it as the node's current cell,
    /// and inserts the pair into that cell's bucket. Does NOT remove the
    /// node from any previous bucket; call [`SpatialGrid::remove_registry`]
    /// first if the node may already be registered elsewhere.
    pub fn register_position(&mut self, node: NodeKey, pos: Point2) {
        let cell = self.cell_of(pos);
        self.registry.insert(node, cell);
        self.cells.entry(cell).or_default().push((node, pos));
    }

    /// Remove a node's registration
    ///
    /// Removal of an unregistered node is tolerated: a missing registry
    /// entry or bucket is logged as a warning and ignored.
    pub fn remove_registry(&mut self, node: NodeKey) {
        let Some(cell) = self.registry.remove(&node) else {
            log::warn!("remove_registry: node {node:?} is not registered");
            return;
        };
        match self.cells.get_mut(&cell) {
            Some(bucket) => bucket.retain(|(k, _)| *k != node),
            None => log::warn!("remove_registry: bucket for cell {cell:?} is missing"),
        }
    }

    /// The exact position a node was last registered at, if any
    pub fn registered_position(&self, node: NodeKey) -> Option<Point2> {
        let cell = self.registry.get(&node)?;
        let bucket = self.cells.get(cell)?;
        bucket
            .iter()
            .find(|(k, _)| *k == node)
            .map(|(_, pos)| *pos)
    }

    /// Snapshot of every currently registered node handle
    pub fn registered_nodes(&self) -> Vec<NodeKey> {
        self.registry.keys().copied().collect()
    }

    /// All nodes whose registered position lies within `area`
    ///
    /// The scan range is widened by one cell on every side so nodes whose
    /// recorded cell is adjacent to the query (fractional positions near a
    /// cell boundary) are still visited; the exact point test runs against
    /// the original rectangle.
    pub fn get_nodes_in_area(&self, area: &Aabb) -> Vec<NodeKey> {
        self.pairs_in_area(area)
            .into_iter()
            .map(|(node, _)| node)
            .collect()
    }

    /// All nodes whose registered position lies within `radius` of `center`
    ///
    /// Delegates to the area scan over the circle's bounding square, then
    /// filters every entry by exact squared distance. Each recorded entry
    /// is tested against its own position, so duplicate stale entries are
    /// filtered individually.
    pub fn get_nodes_in_circle(&self, center: Point2, radius: f32) -> Vec<NodeKey> {
        let square = Aabb::from_center_extents(center, Vec2::new(radius, radius));
        let radius_squared = radius * radius;
        self.pairs_in_area(&square)
            .into_iter()
            .filter(|(_, pos)| distance_squared(*pos, center) <= radius_squared)
            .map(|(node, _)| node)
            .collect()
    }

    fn pairs_in_area(&self, area: &Aabb) -> Vec<(NodeKey, Point2)> {
        let scan = area.expanded(self.cell_size);
        let (min_x, min_y) = self.cell_of(scan.top_left());
        let (max_x, max_y) = self.cell_of(scan.bottom_right());

        let mut found = Vec::new();
        for cx in min_x..=max_x {
            for cy in min_y..=max_y {
                let Some(bucket) = self.cells.get(&(cx, cy)) else {
                    continue;
                };
                // Snapshot the bucket before testing entries, so visiting a
                // node cannot invalidate the iteration mid-query.
                let snapshot = bucket.clone();
                for (node, pos) in snapshot {
                    if area.point_within(pos) {
                        found.push((node, pos));
                    }
                }
            }
        }
        found
    }

    /// Drop every registration
    pub fn clear(&mut self) {
        self.cells.clear();
        self.registry.clear();
    }

    fn cell_of(&self, pos: Point2) -> Cell {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }
}
