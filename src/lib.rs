//! # Vista Engine
//!
//! The scene-graph and spatial-index core of a 2D real-time engine.
//!
//! ## Features
//!
//! - **Node Hierarchy**: arena-backed tree of positioned nodes with
//!   parent back-references and root-to-node transform composition
//! - **Uniform Spatial Grid**: fixed-cell hash grid for amortized-cheap
//!   area and circle proximity queries
//! - **Adaptive Quadtree**: generic quadtree that splits leaves on
//!   overflow, parameterized over a positioner capability
//! - **Scene Orchestration**: fixed-timestep tick pass and depth-sorted,
//!   visibility-culled render candidate pass
//!
//! Rendering, asset loading, and input dispatch are external
//! collaborators: the core hands the renderer an ordered sequence of node
//! handles each frame and treats per-node draw payloads as opaque.
//!
//! ## Quick Start
//!
//! ```rust
//! use vista_engine::prelude::*;
//!
//! let mut scene = Scene::new();
//! let root = scene.tree().root();
//! let player = scene.tree_mut().add_child(
//!     root,
//!     Node::new().with_name("player").with_offset(Vec2::new(50.0, 50.0)),
//! );
//!
//! scene.tick(1.0 / 60.0);
//! let nearby = scene.grid().get_nodes_in_circle(Point2::new(50.0, 50.0), 10.0);
//! assert!(nearby.contains(&player));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod config;
pub mod foundation;
pub mod scene;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, EngineConfig},
        foundation::{
            math::{Point2, Vec2},
            time::{FixedTimestep, Timer},
        },
        scene::{Aabb, Behavior, Camera2D, DrawPayload, Node, NodeKey, Scene, SceneTree, TickContext},
        spatial::{Positioner, QuadTree, SpatialGrid},
    };
}
