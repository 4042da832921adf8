//! Geometric primitives for recognized text regions.
//!
//! OCR engines report each text line together with the polygon enclosing it,
//! usually a quadrilateral listed clockwise from the top-left corner.

use serde::{Deserialize, Serialize};

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    /// X-coordinate of the point.
    pub x: f32,
    /// Y-coordinate of the point.
    pub y: f32,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A bounding box represented by a collection of points.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    /// The points that define the bounding box.
    pub points: Vec<Point>,
}

impl BoundingBox {
    /// Creates a new bounding box from a vector of points.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Creates an axis-aligned rectangle from its top-left and bottom-right corners.
    ///
    /// The points are listed clockwise starting at the top-left corner.
    pub fn from_coords(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let points = vec![
            Point::new(x1, y1),
            Point::new(x2, y1),
            Point::new(x2, y2),
            Point::new(x1, y2),
        ];
        Self { points }
    }

    /// Returns true when the box has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Gets the minimum x-coordinate of all points in the bounding box.
    ///
    /// Returns 0.0 for an empty box.
    pub fn x_min(&self) -> f32 {
        self.fold_coord(|p| p.x, f32::INFINITY, f32::min)
    }

    /// Gets the minimum y-coordinate of all points in the bounding box.
    pub fn y_min(&self) -> f32 {
        self.fold_coord(|p| p.y, f32::INFINITY, f32::min)
    }

    /// Gets the maximum x-coordinate of all points in the bounding box.
    pub fn x_max(&self) -> f32 {
        self.fold_coord(|p| p.x, f32::NEG_INFINITY, f32::max)
    }

    /// Gets the maximum y-coordinate of all points in the bounding box.
    pub fn y_max(&self) -> f32 {
        self.fold_coord(|p| p.y, f32::NEG_INFINITY, f32::max)
    }

    fn fold_coord(&self, coord: impl Fn(&Point) -> f32, init: f32, f: fn(f32, f32) -> f32) -> f32 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.points.iter().map(coord).fold(init, f)
    }
}

impl From<[[f32; 2]; 4]> for BoundingBox {
    fn from(quad: [[f32; 2]; 4]) -> Self {
        Self::new(quad.iter().map(|[x, y]| Point::new(*x, *y)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_extents() {
        let bbox = BoundingBox::from_coords(10.0, 20.0, 100.0, 80.0);
        assert_eq!(bbox.x_min(), 10.0);
        assert_eq!(bbox.y_min(), 20.0);
        assert_eq!(bbox.x_max(), 100.0);
        assert_eq!(bbox.y_max(), 80.0);
    }

    #[test]
    fn test_empty_bounding_box() {
        let bbox = BoundingBox::default();
        assert!(bbox.is_empty());
        assert_eq!(bbox.x_min(), 0.0);
        assert_eq!(bbox.y_max(), 0.0);
    }

    #[test]
    fn test_from_quad_keeps_point_order() {
        // Slightly rotated line, as emitted by detectors
        let bbox = BoundingBox::from([[12.0, 5.0], [90.0, 7.0], [89.0, 20.0], [11.0, 18.0]]);
        assert_eq!(bbox.points.len(), 4);
        assert_eq!(bbox.points[0], Point::new(12.0, 5.0));
        assert_eq!(bbox.points[2], Point::new(89.0, 20.0));
        assert_eq!(bbox.x_min(), 11.0);
        assert_eq!(bbox.y_max(), 20.0);
    }
}
