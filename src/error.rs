use thiserror::Error;

/// Top-level error type for the ellifit crate.
#[derive(Debug, Error)]
pub enum EllifitError {
    #[error(transparent)]
    Fit(#[from] FitError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Errors raised by the ellipse-fitting pipeline.
#[derive(Debug, Error)]
pub enum FitError {
    #[error("fit needs at least {needed} distinct points, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("degenerate fit: {0}")]
    DegenerateFit(String),

    #[error("ill-conditioned solve: condition number {condition:.3e} exceeds limit {limit:.3e}")]
    NumericalInstability { condition: f64, limit: f64 },
}

/// Errors related to polygon discretization.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("invalid tessellation parameters: {0}")]
    InvalidParameters(String),
}

/// Errors related to the point-collection grid.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid grid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience type alias for results using [`EllifitError`].
pub type Result<T> = std::result::Result<T, EllifitError>;
