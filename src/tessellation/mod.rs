use std::f64::consts::TAU;

use crate::error::{Result, TessellationError};
use crate::geometry::Ellipse;
use crate::math::{polygon_2d::signed_area_2d, Point2};

/// Minimum number of sides for a polygon approximation.
pub const MIN_SEGMENTS: usize = 3;

/// A closed polygon approximation of a curve.
///
/// Vertices are ordered counter-clockwise; the closing edge from the last
/// vertex back to the first is implicit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    /// The ordered vertices of the polygon.
    pub points: Vec<Point2>,
}

impl Polygon {
    /// Returns the number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns whether the polygon has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the x coordinates of the vertices, in order.
    #[must_use]
    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    /// Returns the y coordinates of the vertices, in order.
    #[must_use]
    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    /// Returns the vertices flattened as `[x0, y0, x1, y1, ...]`, the layout
    /// polygon-drawing canvases typically consume.
    #[must_use]
    pub fn interleaved(&self) -> Vec<f64> {
        let mut flat = Vec::with_capacity(self.points.len() * 2);
        for p in &self.points {
            flat.push(p.x);
            flat.push(p.y);
        }
        flat
    }

    /// Signed area of the polygon (positive for counter-clockwise winding).
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.points)
    }
}

/// Discretizes an ellipse into a closed polygon with `segments` vertices.
///
/// Samples the parametric ellipse at `t = 2*pi*i/segments` for
/// `i in 0..segments`, producing a counter-clockwise vertex sequence. Pure
/// function of its inputs; the caller owns the result.
///
/// # Errors
///
/// Returns [`TessellationError::InvalidParameters`] when `segments` is less
/// than [`MIN_SEGMENTS`].
pub fn tessellate_ellipse(ellipse: &Ellipse, segments: usize) -> Result<Polygon> {
    if segments < MIN_SEGMENTS {
        return Err(TessellationError::InvalidParameters(format!(
            "a polygon needs at least {MIN_SEGMENTS} segments, got {segments}"
        ))
        .into());
    }

    let step = TAU / segments as f64;
    let points = (0..segments)
        .map(|i| ellipse.point_at(step * i as f64))
        .collect();

    Ok(Polygon { points })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn test_ellipse() -> Ellipse {
        Ellipse::new(Point2::new(1.0, -2.0), 4.0, 2.0, 0.7).unwrap()
    }

    #[test]
    fn vertex_count_matches_segments() {
        for segments in [3, 7, 100, 256] {
            let poly = tessellate_ellipse(&test_ellipse(), segments).unwrap();
            assert_eq!(poly.len(), segments);
            assert!(poly.points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        }
    }

    #[test]
    fn too_few_segments_is_an_error() {
        assert!(tessellate_ellipse(&test_ellipse(), 2).is_err());
        assert!(tessellate_ellipse(&test_ellipse(), 0).is_err());
    }

    #[test]
    fn winding_is_counter_clockwise() {
        let poly = tessellate_ellipse(&test_ellipse(), 64).unwrap();
        assert!(crate::math::polygon_2d::is_ccw(&poly.points));
    }

    #[test]
    fn polygon_closes_on_itself() {
        let poly = tessellate_ellipse(&test_ellipse(), 100).unwrap();
        let first = poly.points[0];
        let last = poly.points[poly.len() - 1];
        let edge = (poly.points[1] - first).norm();
        // The implicit closing edge is one more segment, not a long jump.
        assert!((last - first).norm() < 2.0 * edge);
    }

    #[test]
    fn area_approaches_ellipse_area() {
        let e = test_ellipse();
        let poly = tessellate_ellipse(&e, 512).unwrap();
        let exact = std::f64::consts::PI * e.semi_major() * e.semi_minor();
        assert_abs_diff_eq!(poly.signed_area(), exact, epsilon = exact * 1e-3);
    }

    #[test]
    fn flattened_accessors_agree() {
        let poly = tessellate_ellipse(&test_ellipse(), 10).unwrap();
        let (xs, ys) = (poly.xs(), poly.ys());
        assert_eq!(xs.len(), 10);
        assert_eq!(ys.len(), 10);
        let flat = poly.interleaved();
        assert_eq!(flat.len(), 20);
        for i in 0..10 {
            assert_abs_diff_eq!(flat[2 * i], xs[i]);
            assert_abs_diff_eq!(flat[2 * i + 1], ys[i]);
        }
    }
}
