use std::f64::consts::{FRAC_PI_2, PI};

use crate::conic::ConicCoeffs;
use crate::error::{FitError, Result};
use crate::math::{Point2, TOLERANCE};

/// An ellipse in the plane.
///
/// Defined by a center, semi-major and semi-minor axis lengths, and the
/// rotation of the major axis from +x.
///
/// `P(t) = center + R(rotation) * (semi_major * cos(t), semi_minor * sin(t))`
/// for `t` in `[0, 2*pi)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    center: Point2,
    semi_major: f64,
    semi_minor: f64,
    rotation: f64,
}

impl Ellipse {
    /// Creates a new ellipse.
    ///
    /// # Arguments
    ///
    /// * `center` - Center of the ellipse
    /// * `semi_major` - Semi-major axis length (must be positive and finite)
    /// * `semi_minor` - Semi-minor axis length (must be positive, finite,
    ///   and not exceed `semi_major`)
    /// * `rotation` - Rotation of the major axis from +x, in radians
    ///
    /// # Errors
    ///
    /// Returns an error if an axis length is non-positive, non-finite, or
    /// the axes are out of order, or if any coordinate is non-finite.
    pub fn new(center: Point2, semi_major: f64, semi_minor: f64, rotation: f64) -> Result<Self> {
        if !semi_major.is_finite() || semi_major < TOLERANCE {
            return Err(
                FitError::DegenerateFit("semi-major axis must be positive".into()).into(),
            );
        }
        if !semi_minor.is_finite() || semi_minor < TOLERANCE {
            return Err(
                FitError::DegenerateFit("semi-minor axis must be positive".into()).into(),
            );
        }
        if semi_minor > semi_major {
            return Err(FitError::DegenerateFit(
                "semi-minor axis exceeds semi-major axis".into(),
            )
            .into());
        }
        if !center.x.is_finite() || !center.y.is_finite() || !rotation.is_finite() {
            return Err(FitError::DegenerateFit("non-finite ellipse parameters".into()).into());
        }

        Ok(Self {
            center,
            semi_major,
            semi_minor,
            rotation: normalize_rotation(rotation),
        })
    }

    /// Extracts ellipse parameters from general conic coefficients.
    ///
    /// The center solves the 2x2 linear system from the conic gradient, the
    /// rotation is `0.5 * atan2(B, A - C)`, and the semi-axes come from the
    /// eigenvalues of the quadratic part together with the conic value at
    /// the center. Axes are canonicalized so the semi-major one is the
    /// larger, adjusting the rotation by `pi/2` when they swap. The result
    /// is independent of the overall sign and scale of the coefficients.
    ///
    /// # Errors
    ///
    /// Returns [`FitError::DegenerateFit`] if the conic is not elliptic or
    /// the derived axes are non-positive or non-finite.
    pub fn from_conic(conic: &ConicCoeffs) -> Result<Self> {
        let [a, b, c, d, e, f] = conic.0;

        let disc = b * b - 4.0 * a * c;
        if disc >= 0.0 {
            return Err(FitError::DegenerateFit(format!(
                "conic is not elliptic (discriminant = {disc:.3e})"
            ))
            .into());
        }

        // Center: gradient of the quadratic form vanishes there.
        //   2A*cx + B*cy + D = 0
        //   B*cx + 2C*cy + E = 0
        let denom = -disc;
        let cx = (b * e - 2.0 * c * d) / denom;
        let cy = (b * d - 2.0 * a * e) / denom;

        let rotation = 0.5 * b.atan2(a - c);

        // Eigenvalues of the 2x2 quadratic part give the axis scales.
        let sum = a + c;
        let diff = ((a - c).powi(2) + b * b).sqrt();
        let lambda1 = (sum + diff) / 2.0;
        let lambda2 = (sum - diff) / 2.0;

        // Conic value at the center; zero means a point ellipse.
        let f_center = a * cx * cx + b * cx * cy + c * cy * cy + d * cx + e * cy + f;
        if f_center.abs() < f64::MIN_POSITIVE {
            return Err(FitError::DegenerateFit("point ellipse".into()).into());
        }

        let major_sq = -f_center / lambda1;
        let minor_sq = -f_center / lambda2;
        if !major_sq.is_finite() || !minor_sq.is_finite() || major_sq <= 0.0 || minor_sq <= 0.0 {
            return Err(FitError::DegenerateFit("non-positive semi-axis".into()).into());
        }

        let (axis1, axis2) = (major_sq.sqrt(), minor_sq.sqrt());
        let (semi_major, semi_minor, rotation) = if axis1 >= axis2 {
            (axis1, axis2, rotation)
        } else {
            (axis2, axis1, rotation + FRAC_PI_2)
        };

        Self::new(Point2::new(cx, cy), semi_major, semi_minor, rotation)
    }

    /// Converts the ellipse back to general conic coefficients, scaled so
    /// the conic evaluates to -1 at the center.
    #[must_use]
    pub fn to_conic(&self) -> ConicCoeffs {
        let (sin_r, cos_r) = self.rotation.sin_cos();
        let a2 = self.semi_major * self.semi_major;
        let b2 = self.semi_minor * self.semi_minor;
        let (cx, cy) = (self.center.x, self.center.y);

        let a = cos_r * cos_r / a2 + sin_r * sin_r / b2;
        let b = 2.0 * cos_r * sin_r * (1.0 / a2 - 1.0 / b2);
        let c = sin_r * sin_r / a2 + cos_r * cos_r / b2;
        let d = -2.0 * a * cx - b * cy;
        let e = -b * cx - 2.0 * c * cy;
        let f = a * cx * cx + b * cx * cy + c * cy * cy - 1.0;

        ConicCoeffs([a, b, c, d, e, f])
    }

    /// Evaluates the ellipse at parameter `t` (radians).
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        let (sin_r, cos_r) = self.rotation.sin_cos();
        let x = self.semi_major * t.cos();
        let y = self.semi_minor * t.sin();
        Point2::new(
            self.center.x + x * cos_r - y * sin_r,
            self.center.y + x * sin_r + y * cos_r,
        )
    }

    /// Returns the center of the ellipse.
    #[must_use]
    pub fn center(&self) -> Point2 {
        self.center
    }

    /// Returns the semi-major axis length.
    #[must_use]
    pub fn semi_major(&self) -> f64 {
        self.semi_major
    }

    /// Returns the semi-minor axis length.
    #[must_use]
    pub fn semi_minor(&self) -> f64 {
        self.semi_minor
    }

    /// Returns the rotation of the major axis from +x, in `(-pi/2, pi/2]`.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }
}

/// Normalizes a rotation angle to `(-pi/2, pi/2]`; the major axis is a line,
/// so the rotation is only meaningful modulo pi.
fn normalize_rotation(rotation: f64) -> f64 {
    // Modular reduction instead of repeated subtraction: for |rotation|
    // beyond ~1e16 subtracting pi no longer changes the value in f64.
    let reduced = rotation.rem_euclid(PI);
    if reduced > FRAC_PI_2 {
        reduced - PI
    } else {
        reduced
    }
}
