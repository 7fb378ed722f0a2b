//! Math utilities and types
//!
//! Provides fundamental 2D math types for the scene and spatial modules.
//! Rotations throughout the engine are expressed in **turns** (1.0 turn is
//! a full revolution, counter-clockwise positive).

pub use nalgebra::{Rotation2, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// Math constants
pub mod constants {
    /// Full revolution in radians
    pub const TAU: f32 = std::f32::consts::TAU;
}

/// Convert a rotation in turns to radians
pub fn turns_to_radians(turns: f32) -> f32 {
    turns * constants::TAU
}

/// Rotate a vector counter-clockwise by an angle given in turns
pub fn rotate_turns(v: Vec2, turns: f32) -> Vec2 {
    Rotation2::new(turns_to_radians(turns)) * v
}

/// Squared distance between two points
pub fn distance_squared(a: Point2, b: Point2) -> f32 {
    (b - a).magnitude_squared()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quarter_turn_rotates_x_onto_y() {
        let v = rotate_turns(Vec2::new(5.0, 0.0), 0.25);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(v.y, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn full_turn_is_identity() {
        let v = rotate_turns(Vec2::new(3.0, -2.0), 1.0);
        assert_relative_eq!(v.x, 3.0, epsilon = 1e-4);
        assert_relative_eq!(v.y, -2.0, epsilon = 1e-4);
    }

    #[test]
    fn distance_squared_is_symmetric() {
        let a = Point2::new(1.0, 2.0);
        let b = Point2::new(4.0, 6.0);
        assert_relative_eq!(distance_squared(a, b), 25.0);
        assert_relative_eq!(distance_squared(b, a), 25.0);
    }
}
