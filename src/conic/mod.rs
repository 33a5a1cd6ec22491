mod fit;

pub use fit::{fit_conic, FitParams, MIN_POINTS};

/// Coefficients of a general conic `A*x^2 + B*x*y + C*y^2 + D*x + E*y + F = 0`,
/// stored as `[A, B, C, D, E, F]`.
///
/// The overall scale of the coefficient vector is arbitrary; all predicates
/// on this type are scale-invariant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConicCoeffs(pub [f64; 6]);

impl ConicCoeffs {
    /// Returns the conic discriminant `B^2 - 4*A*C`.
    ///
    /// Negative for ellipses, zero for parabolas, positive for hyperbolas.
    #[must_use]
    pub fn discriminant(&self) -> f64 {
        let [a, b, c, ..] = self.0;
        b * b - 4.0 * a * c
    }

    /// Returns whether the quadratic form is elliptic.
    #[must_use]
    pub fn is_ellipse(&self) -> bool {
        self.discriminant() < 0.0
    }

    /// Algebraic residual of a point against this conic.
    ///
    /// Zero exactly on the curve; sign and magnitude depend on the
    /// coefficient scale.
    #[must_use]
    pub fn algebraic_distance(&self, x: f64, y: f64) -> f64 {
        let [a, b, c, d, e, f] = self.0;
        a * x * x + b * x * y + c * y * y + d * x + e * y + f
    }
}
