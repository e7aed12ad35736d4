//! Centered coordinate mesh over a rectangular domain.

use ndarray::{Array1, Array2};

use crate::config::{require_count, require_positive, SimulationConfig};
use crate::error::ConfigError;

/// Coordinate mesh for a `ny` x `nx` grid.
///
/// Arrays are indexed `[row, column]` = `[y, x]`, matching the `(y, x)`
/// dimension order of the output file.
#[derive(Debug, Clone)]
pub struct Grid {
    pub nx: usize,
    pub ny: usize,
    pub lx: f64,
    pub ly: f64,
    pub dx: f64,
    pub dy: f64,
    /// Centered 1D x coordinates (length `nx`).
    pub x_coords: Array1<f64>,
    /// Centered 1D y coordinates (length `ny`).
    pub y_coords: Array1<f64>,
    /// Mean of the uncentered x coordinates, subtracted during centering.
    pub x_offset: f64,
    /// Mean of the uncentered y coordinates, subtracted during centering.
    pub y_offset: f64,
    /// X coordinate of every cell, shape `(ny, nx)`.
    pub x: Array2<f64>,
    /// Y coordinate of every cell, shape `(ny, nx)`.
    pub y: Array2<f64>,
}

impl Grid {
    /// Builds the mesh described by a simulation configuration.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        build_grid(config.nx, config.ny, config.lx, config.ly)
    }

    /// Array shape `(ny, nx)` shared by every 2D field.
    pub fn shape(&self) -> (usize, usize) {
        (self.ny, self.nx)
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.nx * self.ny
    }
}

/// Builds a centered mesh over `[0, lx) x [0, ly)`.
///
/// Coordinates start at zero with step `lx / nx` (resp. `ly / ny`), then each
/// axis is shifted by its own mean so the mesh is centered on the origin.
///
/// # Errors
/// Returns [`ConfigError`] if a cell count is zero or an extent is not a
/// positive finite number.
pub fn build_grid(nx: usize, ny: usize, lx: f64, ly: f64) -> Result<Grid, ConfigError> {
    require_count("Nx", nx)?;
    require_count("Ny", ny)?;
    require_positive("Lx", lx)?;
    require_positive("Ly", ly)?;

    let dx = lx / nx as f64;
    let dy = ly / ny as f64;

    let (x_coords, x_offset) = centered_axis(nx, dx);
    let (y_coords, y_offset) = centered_axis(ny, dy);

    let x = Array2::from_shape_fn((ny, nx), |(_, i)| x_coords[i]);
    let y = Array2::from_shape_fn((ny, nx), |(j, _)| y_coords[j]);

    log::debug!(
        "Grid {}x{}: dx={:.6}, dy={:.6}, offsets=({:.6}, {:.6})",
        nx, ny, dx, dy, x_offset, y_offset
    );

    Ok(Grid {
        nx,
        ny,
        lx,
        ly,
        dx,
        dy,
        x_coords,
        y_coords,
        x_offset,
        y_offset,
        x,
        y,
    })
}

/// Returns `i * step` for `i in 0..n` shifted by its mean, plus that mean.
fn centered_axis(n: usize, step: f64) -> (Array1<f64>, f64) {
    let raw = Array1::from_shape_fn(n, |i| i as f64 * step);
    let mean = raw.mean().unwrap_or(0.0);
    (raw - mean, mean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_shape() {
        let grid = build_grid(8, 5, 2.0, 1.0).unwrap();
        assert_eq!(grid.shape(), (5, 8));
        assert_eq!(grid.x.dim(), (5, 8));
        assert_eq!(grid.y.dim(), (5, 8));
        assert_eq!(grid.x_coords.len(), 8);
        assert_eq!(grid.y_coords.len(), 5);
        assert_eq!(grid.cell_count(), 40);
    }

    #[test]
    fn test_grid_spacing() {
        let grid = build_grid(512, 256, 10.0, 5.0).unwrap();
        assert!((grid.dx - 10.0 / 512.0).abs() < 1e-15);
        assert!((grid.dy - 5.0 / 256.0).abs() < 1e-15);
        assert!((grid.x_coords[1] - grid.x_coords[0] - grid.dx).abs() < 1e-12);
        assert!((grid.y_coords[1] - grid.y_coords[0] - grid.dy).abs() < 1e-12);
    }

    #[test]
    fn test_grid_recentering() {
        let grid = build_grid(10, 4, 1.0, 2.0).unwrap();

        // Mean of 0, 0.1, ..., 0.9 and of 0, 0.5, 1.0, 1.5
        assert!((grid.x_offset - 0.45).abs() < 1e-12);
        assert!((grid.y_offset - 0.75).abs() < 1e-12);

        assert!(grid.x_coords.mean().unwrap().abs() < 1e-12);
        assert!(grid.y_coords.mean().unwrap().abs() < 1e-12);
        assert!(grid.x.mean().unwrap().abs() < 1e-12);
        assert!(grid.y.mean().unwrap().abs() < 1e-12);

        assert!((grid.x_coords[0] + 0.45).abs() < 1e-12);
        assert!((grid.y_coords[3] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_grid_replication() {
        let grid = build_grid(3, 4, 3.0, 4.0).unwrap();
        for j in 0..4 {
            for i in 0..3 {
                assert_eq!(grid.x[[j, i]], grid.x_coords[i]);
                assert_eq!(grid.y[[j, i]], grid.y_coords[j]);
            }
        }
    }

    #[test]
    fn test_grid_exact_cell_count() {
        // Step sizes that are not exactly representable must not add a cell.
        let grid = build_grid(512, 512, 10.0, 10.0).unwrap();
        assert_eq!(grid.shape(), (512, 512));
    }

    #[test]
    fn test_grid_degenerate_inputs() {
        assert!(matches!(
            build_grid(0, 4, 1.0, 1.0),
            Err(ConfigError::NonPositiveCount { name: "Nx", .. })
        ));
        assert!(matches!(
            build_grid(4, 0, 1.0, 1.0),
            Err(ConfigError::NonPositiveCount { name: "Ny", .. })
        ));
        assert!(matches!(
            build_grid(4, 4, 0.0, 1.0),
            Err(ConfigError::NonPositive { name: "Lx", .. })
        ));
        assert!(build_grid(4, 4, 1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_single_cell_grid() {
        let grid = build_grid(1, 1, 1.0, 1.0).unwrap();
        assert_eq!(grid.x[[0, 0]], 0.0);
        assert_eq!(grid.y[[0, 0]], 0.0);
    }
}
