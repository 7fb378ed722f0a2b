//! Adaptive quadtree spatial partitioning structure
//!
//! Recursively splits 2D space into four quadrants when item density
//! exceeds a threshold. Generic over the item type and a positioner
//! capability that yields an item's current position, so externally-owned
//! items (node handles, projectiles, UI elements) can be indexed without
//! the tree owning their state.

use crate::foundation::math::{distance_squared, Point2, Vec2};
use crate::scene::Aabb;

/// Capability that yields an item's current 2D position
///
/// Used to route items to quadrants during insertion and to filter query
/// results by exact position.
pub trait Positioner<T> {
    /// Current position of `item`
    fn position(&self, item: &T) -> Point2;
}

/// Blanket impl so a closure can serve as a positioner
impl<T, F> Positioner<T> for F
where
    F: Fn(&T) -> Point2,
{
    fn position(&self, item: &T) -> Point2 {
        self(item)
    }
}

/// Single node in the quadtree hierarchy
///
/// A node is a leaf (owns its items) until an insertion pushes it past the
/// split threshold, at which point it becomes a branch holding exactly four
/// children whose bounds partition this node's bounds into equal quadrants.
/// A split is permanent: children are never merged back into a leaf, even
/// when every item is later removed.
#[derive(Debug, Clone)]
struct QuadNode<T> {
    bounds: Aabb,
    items: Vec<T>,
    children: Option<Box<[QuadNode<T>; 4]>>,
}

impl<T: PartialEq> QuadNode<T> {
    fn new(bounds: Aabb) -> Self {
        Self {
            bounds,
            items: Vec::new(),
            children: None,
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Quadrant index (0-3) for a position, by midpoint comparison
    ///
    /// Half-open on the midpoint: a position exactly on the midline routes
    /// to the right/bottom quadrant, matching `Aabb::point_within` on the
    /// quadrant bounds. Positions outside the bounds clamp to the nearest
    /// quadrant so no item is ever dropped.
    fn quadrant_index(&self, pos: Point2) -> usize {
        let center = self.bounds.center();
        let right = usize::from(pos.x >= center.x);
        let bottom = usize::from(pos.y >= center.y);
        (bottom << 1) | right
    }

    /// The four quadrant bounds: top-left, top-right, bottom-left, bottom-right
    fn quadrant_bounds(&self) -> [Aabb; 4] {
        let tl = self.bounds.top_left();
        let br = self.bounds.bottom_right();
        let mid = self.bounds.center();
        [
            Aabb::new(tl, mid),
            Aabb::new(Point2::new(mid.x, tl.y), Point2::new(br.x, mid.y)),
            Aabb::new(Point2::new(tl.x, mid.y), Point2::new(mid.x, br.y)),
            Aabb::new(mid, br),
        ]
    }

    fn insert<P: Positioner<T>>(&mut self, item: T, positioner: &P, split_threshold: usize) {
        if self.is_leaf() {
            self.items.push(item);
            if self.items.len() > split_threshold {
                self.split(positioner);
            }
            return;
        }

        let index = self.quadrant_index(positioner.position(&item));
        if let Some(children) = self.children.as_mut() {
            children[index].insert(item, positioner, split_threshold);
        }
    }

    /// Convert this leaf into a branch, redistributing its items
    ///
    /// Items are pushed directly into the owning child's list rather than
    /// re-inserted through `insert`, so a pile of identically-positioned
    /// items cannot trigger a runaway split cascade.
    fn split<P: Positioner<T>>(&mut self, positioner: &P) {
        if self.children.is_some() {
            return;
        }

        let [tl, tr, bl, br] = self.quadrant_bounds();
        let mut children = Box::new([
            QuadNode::new(tl),
            QuadNode::new(tr),
            QuadNode::new(bl),
            QuadNode::new(br),
        ]);

        for item in std::mem::take(&mut self.items) {
            let index = self.quadrant_index(positioner.position(&item));
            children[index].items.push(item);
        }

        self.children = Some(children);
    }

    /// Position-guided removal with an exhaustive fallback
    ///
    /// Descends the same way `insert` routes, then falls back to a full
    /// depth-first search of the remaining quadrants when the item's
    /// reported position is stale. Removal therefore succeeds whenever the
    /// item is present anywhere in the tree.
    fn remove<P: Positioner<T>>(&mut self, item: &T, positioner: &P) -> bool {
        if self.is_leaf() {
            return self.remove_local(item);
        }

        let index = self.quadrant_index(positioner.position(item));
        if let Some(children) = self.children.as_mut() {
            if children[index].remove(item, positioner) {
                return true;
            }
            for (i, child) in children.iter_mut().enumerate() {
                if i != index && child.remove_anywhere(item) {
                    return true;
                }
            }
        }
        false
    }

    /// Blind depth-first removal, ignoring the item's position
    fn remove_anywhere(&mut self, item: &T) -> bool {
        if self.remove_local(item) {
            return true;
        }
        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                if child.remove_anywhere(item) {
                    return true;
                }
            }
        }
        false
    }

    fn remove_local(&mut self, item: &T) -> bool {
        if let Some(index) = self.items.iter().position(|i| i == item) {
            self.items.swap_remove(index);
            return true;
        }
        false
    }

    fn contains(&self, item: &T) -> bool {
        if self.items.iter().any(|i| i == item) {
            return true;
        }
        self.children
            .as_ref()
            .is_some_and(|children| children.iter().any(|c| c.contains(item)))
    }

    fn query_rect<'a, P: Positioner<T>>(
        &'a self,
        area: &Aabb,
        positioner: &P,
        found: &mut Vec<&'a T>,
    ) {
        if !self.bounds.intersects(area) {
            return;
        }
        for item in &self.items {
            if area.point_within(positioner.position(item)) {
                found.push(item);
            }
        }
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.query_rect(area, positioner, found);
            }
        }
    }

    fn query_circle<'a, P: Positioner<T>>(
        &'a self,
        center: Point2,
        radius_squared: f32,
        bounding_square: &Aabb,
        positioner: &P,
        found: &mut Vec<&'a T>,
    ) {
        if !self.bounds.intersects(bounding_square) {
            return;
        }
        for item in &self.items {
            if distance_squared(positioner.position(item), center) <= radius_squared {
                found.push(item);
            }
        }
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.query_circle(center, radius_squared, bounding_square, positioner, found);
            }
        }
    }

    fn count(&self) -> usize {
        let mut total = self.items.len();
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                total += child.count();
            }
        }
        total
    }
}

/// Adaptive quadtree over items located by a positioner
#[derive(Debug, Clone)]
pub struct QuadTree<T, P> {
    positioner: P,
    split_threshold: usize,
    root: QuadNode<T>,
}

impl<T: PartialEq, P: Positioner<T>> QuadTree<T, P> {
    /// Default maximum items per leaf before it splits
    pub const DEFAULT_SPLIT_THRESHOLD: usize = 8;

    /// Create a quadtree covering `bounds`, splitting leaves that exceed
    /// `split_threshold` items
    pub fn new(bounds: Aabb, split_threshold: usize, positioner: P) -> Self {
        let split_threshold = if split_threshold > 0 {
            split_threshold
        } else {
            log::warn!(
                "invalid split threshold 0, falling back to {}",
                Self::DEFAULT_SPLIT_THRESHOLD
            );
            Self::DEFAULT_SPLIT_THRESHOLD
        };
        Self {
            positioner,
            split_threshold,
            root: QuadNode::new(bounds),
        }
    }

    /// Bounds covered by the tree
    pub fn bounds(&self) -> Aabb {
        self.root.bounds
    }

    /// Insert an item, routed by its current position
    pub fn add(&mut self, item: T) {
        self.root.insert(item, &self.positioner, self.split_threshold);
    }

    /// Remove an item
    ///
    /// Returns `true` if the item was found and removed. Removal of an
    /// absent item is a silent no-op returning `false`, consistent with the
    /// grid's tolerance for unregistered nodes.
    pub fn remove(&mut self, item: &T) -> bool {
        self.root.remove(item, &self.positioner)
    }

    /// Whether the item is stored anywhere in the tree
    pub fn contains(&self, item: &T) -> bool {
        self.root.contains(item)
    }

    /// All items whose position lies within the rectangle
    pub fn get_within_rect(&self, top_left: Point2, bottom_right: Point2) -> Vec<&T> {
        let area = Aabb::new(top_left, bottom_right);
        let mut found = Vec::new();
        self.root.query_rect(&area, &self.positioner, &mut found);
        found
    }

    /// All items whose position lies within `radius` of `center`
    pub fn get_within_radius(&self, center: Point2, radius: f32) -> Vec<&T> {
        let bounding_square = Aabb::from_center_extents(center, Vec2::new(radius, radius));
        let mut found = Vec::new();
        self.root.query_circle(
            center,
            radius * radius,
            &bounding_square,
            &self.positioner,
            &mut found,
        );
        found
    }

    /// Total number of stored items
    pub fn len(&self) -> usize {
        self.root.count()
    }

    /// Whether the tree holds no items
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reset to a single empty leaf with the original bounds
    ///
    /// This is the only way split structure is ever discarded; removal
    /// alone never merges children back into a leaf.
    pub fn clear(&mut self) {
        self.root = QuadNode::new(self.root.bounds);
    }
}
