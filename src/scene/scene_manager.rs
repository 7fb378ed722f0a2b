//! Scene orchestrator
//!
//! Owns the node hierarchy and one spatial index, drives the fixed-timestep
//! tick pass, and produces the depth-sorted render candidate sequence each
//! frame. The renderer itself is an external collaborator: it receives an
//! ordered list of node handles and reads each node's payload and composed
//! transform.

use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::foundation::math::{Point2, Vec2};
use crate::foundation::time::FixedTimestep;
use crate::scene::behavior::TickContext;
use crate::scene::{Aabb, NodeKey, SceneTree};
use crate::spatial::SpatialGrid;

/// 2D camera describing the visible world rectangle
#[derive(Debug, Clone)]
pub struct Camera2D {
    /// World-space point at the center of the screen
    pub center: Point2,

    /// Size of the viewport in world units
    pub viewport_size: Vec2,
}

impl Camera2D {
    /// Create a camera centered on `center` showing `viewport_size` world units
    pub fn new(center: Point2, viewport_size: Vec2) -> Self {
        Self {
            center,
            viewport_size,
        }
    }

    /// The world-space rectangle currently on screen
    pub fn world_viewport(&self) -> Aabb {
        Aabb::from_center_extents(self.center, self.viewport_size * 0.5)
    }

    /// Map a screen position (origin top-left, y down) to world space
    pub fn screen_to_world(&self, screen: Point2) -> Point2 {
        self.world_viewport().top_left() + Vec2::new(screen.x, screen.y)
    }
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::new(Point2::origin(), Vec2::new(1280.0, 720.0))
    }
}

/// Scene orchestrator
///
/// Ticks every node in the hierarchy once per fixed timestep, keeps the
/// spatial grid in sync with composed node positions, and answers the
/// per-frame render candidate query.
pub struct Scene {
    tree: SceneTree,
    grid: SpatialGrid,
    camera: Camera2D,
    timestep: FixedTimestep,
    cull_margin: f32,
    /// Nodes that have already received their attach hook
    attached: HashSet<NodeKey>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a scene with default configuration
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Create a scene from an engine configuration
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            tree: SceneTree::new(),
            grid: SpatialGrid::with_cell_size(config.grid_cell_size),
            camera: Camera2D::default(),
            timestep: FixedTimestep::new(config.tick_rate),
            cull_margin: config.cull_margin,
            attached: HashSet::new(),
        }
    }

    /// Borrow the node hierarchy
    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    /// Mutably borrow the node hierarchy
    pub fn tree_mut(&mut self) -> &mut SceneTree {
        &mut self.tree
    }

    /// Borrow the spatial index
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Borrow the active camera
    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    /// Mutably borrow the active camera
    pub fn camera_mut(&mut self) -> &mut Camera2D {
        &mut self.camera
    }

    /// Feed a wall-clock delta, running as many fixed ticks as are due
    pub fn run_fixed(&mut self, wall_delta: f32) -> u32 {
        let steps = self.timestep.advance(wall_delta);
        let dt = self.timestep.step();
        for _ in 0..steps {
            self.tick(dt);
        }
        steps
    }

    /// Advance every node in the hierarchy by one tick
    ///
    /// Traversal order is a post-order snapshot taken when the pass starts;
    /// nodes spawned during the pass are first ticked next time, and nodes
    /// removed mid-pass are skipped. A node ticked for the first time under
    /// this orchestrator gets its attach hook before its first tick.
    ///
    /// After the behavior pass the grid is refreshed incrementally: every
    /// node whose composed world position changed since its last
    /// registration is re-registered (remove, then register), and
    /// registrations of dead nodes are dropped.
    pub fn tick(&mut self, dt: f32) {
        for key in self.tree.all_nodes(self.tree.root()) {
            if !self.tree.contains(key) {
                continue; // removed earlier in this same pass
            }
            let first_tick = self.attached.insert(key);

            // Take the behavior out of the node for the duration of its own
            // hooks; the node may mutate the tree through the context.
            let Some(mut behavior) = self
                .tree
                .get_mut(key)
                .and_then(|node| node.behavior.take())
            else {
                continue;
            };
            let mut ctx = TickContext {
                tree: &mut self.tree,
                grid: &mut self.grid,
                dt,
            };
            if first_tick {
                behavior.on_attach(key, &mut ctx);
            }
            behavior.tick(key, &mut ctx);
            if let Some(node) = self.tree.get_mut(key) {
                node.behavior = Some(behavior);
            }
        }

        self.refresh_grid();
    }

    /// Render candidates for the current frame, back-to-front
    ///
    /// Expands the camera's world viewport by the cull margin, queries the
    /// grid for nodes inside the expanded rectangle, drops invisible nodes,
    /// and sorts the survivors by descending depth key.
    pub fn render_candidates(&self) -> Vec<NodeKey> {
        let query = self.camera.world_viewport().expanded(self.cull_margin);
        let mut candidates = self.grid.get_nodes_in_area(&query);
        candidates.retain(|key| self.tree.get(*key).is_some_and(|node| node.visible));
        candidates.sort_by(|a, b| {
            let za = self.tree.get(*a).map_or(0.0, |n| n.z);
            let zb = self.tree.get(*b).map_or(0.0, |n| n.z);
            zb.total_cmp(&za)
        });
        candidates
    }

    /// Reconcile the grid with composed node positions
    fn refresh_grid(&mut self) {
        for key in self.grid.registered_nodes() {
            if !self.tree.contains(key) {
                self.grid.remove_registry(key);
            }
        }
        self.attached.retain(|key| self.tree.contains(*key));

        for key in self.tree.all_nodes(self.tree.root()) {
            let world = self.tree.world_position(key);
            match self.grid.registered_position(key) {
                Some(previous) if previous == world => {}
                Some(_) => {
                    self.grid.remove_registry(key);
                    self.grid.register_position(key, world);
                }
                None => self.grid.register_position(key, world),
            }
        }
    }
}
