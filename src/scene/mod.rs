//! Scene management system
//!
//! The node hierarchy and its orchestration. Bridges gameplay (behaviors
//! ticking nodes) and graphics (depth-sorted render candidates) without
//! knowing about either side's internals.
//!
//! ## Architecture
//!
//! ```text
//! Behaviors (gameplay)
//!      |
//! Scene (orchestrator: tick pass, grid refresh, culling)
//!      |
//! Renderer (external, consumes ordered node handles)
//! ```

mod behavior;
mod bounding_box;
mod node;
mod scene_manager;

pub use behavior::{Behavior, DrawPayload, TickContext};
pub use bounding_box::Aabb;
pub use node::{Node, NodeKey, SceneTree};
pub use scene_manager::{Camera2D, Scene};
