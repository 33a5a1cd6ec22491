//! The fitting pipeline: sample points -> conic -> ellipse -> polygon.
//!
//! Stateless; every call re-derives its result from the full input set.

use crate::conic::{fit_conic, FitParams};
use crate::error::Result;
use crate::geometry::Ellipse;
use crate::math::Point2;
use crate::tessellation::{tessellate_ellipse, Polygon};

/// Default number of polygon sides for [`ellipse_fit`].
pub const DEFAULT_SEGMENTS: usize = 100;

/// Fits an ellipse to the sample points with default parameters.
///
/// # Errors
///
/// See [`fit_ellipse_with`].
pub fn fit_ellipse(points: &[Point2]) -> Result<Ellipse> {
    fit_ellipse_with(points, &FitParams::default())
}

/// Fits an ellipse to the sample points.
///
/// Solves the least-squares conic through the points and extracts the
/// geometric parameters. Duplicate points are permitted; input order does
/// not affect the result beyond floating-point summation order.
///
/// # Errors
///
/// Returns [`crate::error::FitError::InsufficientData`] for fewer than five
/// distinct points, [`crate::error::FitError::DegenerateFit`] when the
/// best-fit conic is not a real ellipse (e.g. collinear input), and
/// [`crate::error::FitError::NumericalInstability`] when the solve exceeds
/// the configured condition limit.
pub fn fit_ellipse_with(points: &[Point2], params: &FitParams) -> Result<Ellipse> {
    let conic = fit_conic(points, params)?;
    Ellipse::from_conic(&conic)
}

/// Fits an ellipse to the sample points and discretizes it into a closed
/// polygon with `segments` vertices (see [`DEFAULT_SEGMENTS`]).
///
/// # Errors
///
/// Propagates the fitting errors of [`fit_ellipse`] and the parameter
/// errors of [`tessellate_ellipse`]. On failure nothing is returned; the
/// caller decides whether to report, retry, or keep its previous result.
pub fn ellipse_fit(points: &[Point2], segments: usize) -> Result<Polygon> {
    let ellipse = fit_ellipse(points)?;
    tessellate_ellipse(&ellipse, segments)
}
