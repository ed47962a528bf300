use serde::{Deserialize, Serialize};

/// Point in canvas pixel coordinates (x to the right, y downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    /// Euclidean distance between two points.
    pub fn dist(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Angle (rad) of the direction from self towards other, measured like atan2(dy, dx).
    pub fn heading_to(&self, other: &Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Returns the point reached when moving `dist` along `heading`.
    pub fn advanced(&self, heading: f64, dist: f64) -> Point {
        Point {
            x: self.x + heading.cos() * dist,
            y: self.y + heading.sin() * dist,
        }
    }

    /// Transforms a point given in a local frame (rotated by `angle`, origin at `origin`) into
    /// canvas coordinates.
    pub fn rotate_translate(&self, angle: f64, origin: &Point) -> Point {
        let (sin, cos) = angle.sin_cos();
        Point {
            x: origin.x + self.x * cos - self.y * sin,
            y: origin.y + self.x * sin + self.y * cos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn dist_and_heading() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_abs_diff_eq!(a.dist(&b), 5.0);
        assert_abs_diff_eq!(a.heading_to(&Point::new(0.0, 2.0)), FRAC_PI_2);
    }

    #[test]
    fn advanced_moves_along_heading() {
        let p = Point::new(1.0, 1.0).advanced(FRAC_PI_2, 2.0);
        assert_abs_diff_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn rotate_translate_quarter_turn() {
        let p = Point::new(15.0, 0.0).rotate_translate(FRAC_PI_2, &Point::new(100.0, 100.0));
        assert_abs_diff_eq!(p.x, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, 115.0, epsilon = 1e-9);
    }
}
