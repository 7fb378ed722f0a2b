//! Node capability set
//!
//! Per-node tick logic and draw payloads are expressed as capabilities
//! rather than an inheritance hierarchy: [`Behavior`] is trait-dispatched
//! by the orchestrator, and [`DrawPayload`] is a tagged variant the
//! external renderer interprets while the core treats it as opaque data.

use crate::foundation::math::Point2;
use crate::scene::{NodeKey, SceneTree};
use crate::spatial::SpatialGrid;

/// Mutable scene state handed to behaviors during the tick pass
pub struct TickContext<'a> {
    /// The node hierarchy; behaviors may move, spawn, or remove nodes
    pub tree: &'a mut SceneTree,

    /// The orchestrator's spatial index, for proximity checks
    pub grid: &'a mut SpatialGrid,

    /// Fixed step duration in seconds
    pub dt: f32,
}

/// Per-node tick logic, dispatched by the scene orchestrator
///
/// A behavior is taken out of its node while its own hooks run, so it may
/// freely mutate the tree (including detaching its own node) through the
/// context without aliasing itself.
pub trait Behavior {
    /// Runs once, the first time the orchestrator ticks this node
    ///
    /// Lets a node rebuild cached state on entry into a scene.
    fn on_attach(&mut self, key: NodeKey, ctx: &mut TickContext<'_>) {
        let _ = (key, ctx);
    }

    /// Runs every fixed tick
    fn tick(&mut self, key: NodeKey, ctx: &mut TickContext<'_>) {
        let _ = (key, ctx);
    }
}

/// Opaque renderable payload attached to a node
///
/// Supplied by the asset/scene layer, read by the renderer; the core never
/// interprets the contents.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawPayload {
    /// Reference to a sprite by asset name
    Sprite(String),

    /// Polygon outline in local space
    Polygon(Vec<Point2>),
}
