pub mod conic;
pub mod error;
pub mod fit;
pub mod geometry;
pub mod grid;
pub mod math;
pub mod tessellation;

pub use error::{EllifitError, Result};
pub use fit::{ellipse_fit, fit_ellipse, fit_ellipse_with, DEFAULT_SEGMENTS};
