//! Point-collection grid: the state behind an interactive point picker.
//!
//! Owns the selection state explicitly instead of spreading it across UI
//! callbacks; a rendering layer only needs [`Grid::select`],
//! [`Grid::selected_coords`], and [`Grid::clear`].

use crate::error::{GridError, Result};
use crate::math::{Point2, Vector2};

/// Layout of the point grid.
#[derive(Debug, Clone, Copy)]
pub struct GridConfig {
    /// Width of the canvas region.
    pub width: f64,
    /// Height of the canvas region.
    pub height: f64,
    /// Number of grid points per side.
    pub points_per_side: usize,
    /// Hit radius of each grid point.
    pub point_radius: f64,
    /// Shift of the whole grid right and down, so the first row and column
    /// stay visible.
    pub offset: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 600.0,
            points_per_side: 20,
            point_radius: 5.0,
            offset: 10.0,
        }
    }
}

/// A square grid of selectable points.
///
/// Selections are kept in the order they were made; re-selecting a point is
/// a no-op. [`Grid::selected_coords`] yields the continuous coordinates the
/// fitting pipeline consumes.
#[derive(Debug, Clone)]
pub struct Grid {
    config: GridConfig,
    spacing_x: f64,
    spacing_y: f64,
    selected: Vec<(usize, usize)>,
}

impl Grid {
    /// Creates a grid from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidConfig`] if a dimension or the point
    /// radius is not positive, or if there are fewer than two points per
    /// side.
    pub fn new(config: GridConfig) -> Result<Self> {
        if !(config.width > 0.0) || !(config.height > 0.0) {
            return Err(
                GridError::InvalidConfig("width and height must be positive".into()).into(),
            );
        }
        if !(config.point_radius > 0.0) {
            return Err(GridError::InvalidConfig("point radius must be positive".into()).into());
        }
        if config.points_per_side < 2 {
            return Err(
                GridError::InvalidConfig("need at least two points per side".into()).into(),
            );
        }

        let points = config.points_per_side as f64;
        Ok(Self {
            spacing_x: config.width / points,
            spacing_y: config.height / points,
            config,
            selected: Vec::new(),
        })
    }

    /// Returns the continuous coordinates of the grid point at `(i, j)`.
    #[must_use]
    pub fn index_to_coord(&self, i: usize, j: usize) -> Point2 {
        Point2::new(
            self.spacing_x * i as f64 + self.config.offset,
            self.spacing_y * j as f64 + self.config.offset,
        )
    }

    /// Returns the grid indices nearest to the coordinate, or `None` when
    /// the nearest indices fall outside the grid.
    #[must_use]
    pub fn coord_to_index(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let i = ((x - self.config.offset) / self.spacing_x).round();
        let j = ((y - self.config.offset) / self.spacing_y).round();
        let side = self.config.points_per_side as f64;
        if i < 0.0 || j < 0.0 || i >= side || j >= side {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = (i as usize, j as usize);
        Some(index)
    }

    /// Returns whether a coordinate lies within the canvas region.
    #[must_use]
    pub fn in_bounds(&self, x: f64, y: f64) -> bool {
        (0.0..=self.config.width).contains(&x) && (0.0..=self.config.height).contains(&y)
    }

    /// Selects the grid point under the coordinate, if any.
    ///
    /// The click must land within `point_radius` of a grid point. Returns
    /// `true` when a point was newly selected; clicks between points and
    /// re-selections return `false`.
    pub fn select(&mut self, x: f64, y: f64) -> bool {
        let Some((i, j)) = self.coord_to_index(x, y) else {
            return false;
        };
        let point = self.index_to_coord(i, j);
        let miss: Vector2 = Point2::new(x, y) - point;
        if miss.norm() > self.config.point_radius {
            return false;
        }
        if self.is_selected(i, j) {
            return false;
        }
        self.selected.push((i, j));
        true
    }

    /// Returns whether the grid point at `(i, j)` is selected.
    #[must_use]
    pub fn is_selected(&self, i: usize, j: usize) -> bool {
        self.selected.contains(&(i, j))
    }

    /// Returns the number of selected points.
    #[must_use]
    pub fn selected_len(&self) -> usize {
        self.selected.len()
    }

    /// Returns the coordinates of the selected points, in selection order.
    #[must_use]
    pub fn selected_coords(&self) -> Vec<Point2> {
        self.selected
            .iter()
            .map(|&(i, j)| self.index_to_coord(i, j))
            .collect()
    }

    /// Deselects all points.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Returns the grid configuration.
    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn default_grid() -> Grid {
        Grid::new(GridConfig::default()).unwrap()
    }

    #[test]
    fn index_coord_roundtrip() {
        let grid = default_grid();
        for (i, j) in [(0, 0), (3, 7), (19, 19)] {
            let p = grid.index_to_coord(i, j);
            assert_eq!(grid.coord_to_index(p.x, p.y), Some((i, j)));
        }
    }

    #[test]
    fn default_spacing_matches_layout() {
        let grid = default_grid();
        let p = grid.index_to_coord(1, 2);
        assert_abs_diff_eq!(p.x, 40.0);
        assert_abs_diff_eq!(p.y, 70.0);
    }

    #[test]
    fn select_requires_hit_within_radius() {
        let mut grid = default_grid();
        let p = grid.index_to_coord(2, 2);
        assert!(grid.select(p.x + 3.0, p.y - 2.0));
        // Half-way between two points is farther than the radius.
        assert!(!grid.select(p.x + 15.0, p.y));
        assert_eq!(grid.selected_len(), 1);
    }

    #[test]
    fn reselection_is_a_no_op() {
        let mut grid = default_grid();
        let p = grid.index_to_coord(5, 5);
        assert!(grid.select(p.x, p.y));
        assert!(!grid.select(p.x + 1.0, p.y + 1.0));
        assert_eq!(grid.selected_len(), 1);
    }

    #[test]
    fn selection_outside_grid_is_rejected() {
        let mut grid = default_grid();
        assert!(!grid.select(-50.0, -50.0));
        assert!(!grid.select(1e4, 1e4));
        assert_eq!(grid.selected_len(), 0);
    }

    #[test]
    fn selected_coords_preserve_order() {
        let mut grid = default_grid();
        for (i, j) in [(4, 1), (0, 0), (9, 12)] {
            let p = grid.index_to_coord(i, j);
            assert!(grid.select(p.x, p.y));
        }
        let coords = grid.selected_coords();
        assert_eq!(coords.len(), 3);
        assert_eq!(coords[0], grid.index_to_coord(4, 1));
        assert_eq!(coords[1], grid.index_to_coord(0, 0));
        assert_eq!(coords[2], grid.index_to_coord(9, 12));
    }

    #[test]
    fn clear_resets_selection() {
        let mut grid = default_grid();
        let p = grid.index_to_coord(1, 1);
        assert!(grid.select(p.x, p.y));
        grid.clear();
        assert_eq!(grid.selected_len(), 0);
        assert!(!grid.is_selected(1, 1));
    }

    #[test]
    fn in_bounds_matches_canvas() {
        let grid = default_grid();
        assert!(grid.in_bounds(0.0, 0.0));
        assert!(grid.in_bounds(600.0, 600.0));
        assert!(!grid.in_bounds(-1.0, 10.0));
        assert!(!grid.in_bounds(10.0, 601.0));
    }

    #[test]
    fn invalid_configs_are_rejected() {
        assert!(Grid::new(GridConfig {
            width: 0.0,
            ..GridConfig::default()
        })
        .is_err());
        assert!(Grid::new(GridConfig {
            point_radius: -1.0,
            ..GridConfig::default()
        })
        .is_err());
        assert!(Grid::new(GridConfig {
            points_per_side: 1,
            ..GridConfig::default()
        })
        .is_err());
    }
}
