mod ellipse;

pub use ellipse::Ellipse;
