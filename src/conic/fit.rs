//! Least-squares conic fit under a unit-norm coefficient constraint.

use nalgebra::{Matrix6, SymmetricEigen, Vector6};

use crate::error::{FitError, Result};
use crate::math::{Point2, TOLERANCE};

use super::ConicCoeffs;

/// Minimum number of distinct sample points for a conic fit.
pub const MIN_POINTS: usize = 5;

/// Parameters controlling the least-squares solve.
#[derive(Debug, Clone, Copy)]
pub struct FitParams {
    /// Upper bound on the condition number of the scatter-matrix solve.
    ///
    /// The condition number is measured on normalized coordinates as the
    /// ratio of the largest eigenvalue to the second-smallest one; the
    /// smallest eigenvalue is the fit residual itself and is excluded so
    /// that exact fits are not flagged.
    pub condition_limit: f64,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            condition_limit: 1e10,
        }
    }
}

/// Fits a general conic to the sample points by least squares.
///
/// Builds the design row `[x^2, xy, y^2, x, y, 1]` per point, accumulates
/// the 6x6 scatter matrix, and takes the eigenvector of its smallest
/// eigenvalue as the unit-norm least-squares solution. Points are shifted
/// to their centroid and rescaled before the solve for conditioning; the
/// returned coefficients are expressed in the original coordinates.
///
/// # Errors
///
/// Returns [`FitError::InsufficientData`] when fewer than [`MIN_POINTS`]
/// distinct points are supplied, [`FitError::DegenerateFit`] when the
/// solution is not elliptic (e.g. collinear input), and
/// [`FitError::NumericalInstability`] when the solve exceeds the configured
/// condition limit.
pub fn fit_conic(points: &[Point2], params: &FitParams) -> Result<ConicCoeffs> {
    let distinct = count_distinct(points);
    if distinct < MIN_POINTS {
        return Err(FitError::InsufficientData {
            needed: MIN_POINTS,
            got: distinct,
        }
        .into());
    }

    let (centroid, scale) = normalization(points);

    let mut scatter = Matrix6::<f64>::zeros();
    for p in points {
        let x = (p.x - centroid.x) * scale;
        let y = (p.y - centroid.y) * scale;
        let row = Vector6::new(x * x, x * y, y * y, x, y, 1.0);
        scatter += row * row.transpose();
    }

    let eigen = SymmetricEigen::new(scatter);

    // Indices of the smallest, second-smallest, and largest eigenvalues.
    let mut order: Vec<usize> = (0..6).collect();
    order.sort_by(|&i, &j| {
        eigen.eigenvalues[i]
            .partial_cmp(&eigen.eigenvalues[j])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let (lo, lo2, hi) = (order[0], order[1], order[5]);

    let solution = eigen.eigenvectors.column(lo).into_owned();

    // Classify the conic on the unit-norm solution, with a tolerance so
    // that line pairs produced by collinear input cannot slip past the
    // strict sign test through roundoff. Checked before conditioning so
    // exactly-collinear input reports degeneracy rather than instability.
    let disc = solution[1] * solution[1] - 4.0 * solution[0] * solution[2];
    if disc >= -TOLERANCE {
        return Err(FitError::DegenerateFit(format!(
            "fitted conic is not an ellipse (normalized discriminant = {disc:.3e})"
        ))
        .into());
    }

    let gap = eigen.eigenvalues[lo2];
    let condition = if gap > f64::MIN_POSITIVE {
        eigen.eigenvalues[hi] / gap
    } else {
        f64::INFINITY
    };
    if condition > params.condition_limit {
        return Err(FitError::NumericalInstability {
            condition,
            limit: params.condition_limit,
        }
        .into());
    }

    Ok(denormalize(&solution, &centroid, scale))
}

/// Counts points that are pairwise distinct within [`TOLERANCE`].
fn count_distinct(points: &[Point2]) -> usize {
    let mut distinct = 0;
    for (i, p) in points.iter().enumerate() {
        let seen = points[..i].iter().any(|q| (p - q).norm() < TOLERANCE);
        if !seen {
            distinct += 1;
        }
    }
    distinct
}

/// Computes the centroid and the scale factor that brings the mean distance
/// from the centroid to `sqrt(2)`.
fn normalization(points: &[Point2]) -> (Point2, f64) {
    let n = points.len() as f64;
    let cx = points.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = points.iter().map(|p| p.y).sum::<f64>() / n;

    let mean_dist = points
        .iter()
        .map(|p| ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt())
        .sum::<f64>()
        / n;

    let scale = if mean_dist > TOLERANCE {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };

    (Point2::new(cx, cy), scale)
}

/// Maps conic coefficients fitted in normalized coordinates
/// `x' = s*(x - cx), y' = s*(y - cy)` back to the original coordinates.
fn denormalize(v: &Vector6<f64>, centroid: &Point2, s: f64) -> ConicCoeffs {
    let [a_, b_, c_, d_, e_, f_] = [v[0], v[1], v[2], v[3], v[4], v[5]];
    let (mx, my) = (centroid.x, centroid.y);
    let s2 = s * s;

    let a = a_ * s2;
    let b = b_ * s2;
    let c = c_ * s2;
    let d = -2.0 * a_ * s2 * mx - b_ * s2 * my + d_ * s;
    let e = -b_ * s2 * mx - 2.0 * c_ * s2 * my + e_ * s;
    let f = a_ * s2 * mx * mx + b_ * s2 * mx * my + c_ * s2 * my * my - d_ * s * mx - e_ * s * my
        + f_;

    ConicCoeffs([a, b, c, d, e, f])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::EllifitError;

    fn ellipse_samples(cx: f64, cy: f64, a: f64, b: f64, n: usize) -> Vec<Point2> {
        (0..n)
            .map(|i| {
                let t = std::f64::consts::TAU * (i as f64) / (n as f64);
                Point2::new(cx + a * t.cos(), cy + b * t.sin())
            })
            .collect()
    }

    #[test]
    fn recovers_exact_conic() {
        let points = ellipse_samples(0.0, 0.0, 2.0, 1.0, 12);
        let conic = fit_conic(&points, &FitParams::default()).unwrap();
        assert!(conic.is_ellipse());
        for p in &points {
            let residual = conic.algebraic_distance(p.x, p.y);
            assert!(residual.abs() < 1e-9, "residual {residual} too large");
        }
    }

    #[test]
    fn duplicate_points_do_not_break_the_fit() {
        let mut points = ellipse_samples(3.0, -1.0, 4.0, 2.0, 8);
        let repeats = points.clone();
        points.extend_from_slice(&repeats);
        let conic = fit_conic(&points, &FitParams::default()).unwrap();
        assert!(conic.is_ellipse());
    }

    #[test]
    fn four_points_are_insufficient() {
        let points = ellipse_samples(0.0, 0.0, 2.0, 1.0, 4);
        let err = fit_conic(&points, &FitParams::default()).unwrap_err();
        assert!(matches!(
            err,
            EllifitError::Fit(FitError::InsufficientData { needed: 5, got: 4 })
        ));
    }

    #[test]
    fn duplicates_do_not_count_as_distinct() {
        let mut points = ellipse_samples(0.0, 0.0, 2.0, 1.0, 4);
        points.push(points[0]);
        points.push(points[2]);
        let err = fit_conic(&points, &FitParams::default()).unwrap_err();
        assert!(matches!(
            err,
            EllifitError::Fit(FitError::InsufficientData { .. })
        ));
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let points: Vec<Point2> = (0..6).map(|i| Point2::new(f64::from(i), 2.0)).collect();
        let err = fit_conic(&points, &FitParams::default()).unwrap_err();
        assert!(matches!(
            err,
            EllifitError::Fit(FitError::DegenerateFit(_))
        ));
    }

    #[test]
    fn tight_condition_limit_flags_instability() {
        let points = ellipse_samples(0.0, 0.0, 2.0, 1.0, 12);
        let params = FitParams {
            condition_limit: 1.0,
        };
        let err = fit_conic(&points, &params).unwrap_err();
        assert!(matches!(
            err,
            EllifitError::Fit(FitError::NumericalInstability { .. })
        ));
    }
}
