//! Regular lattice of tracer-particle start positions.

use rayon::prelude::*;

use crate::config::{require_count, require_positive};
use crate::error::ConfigError;

/// Initial tracer-particle state.
///
/// Positions are in domain coordinates `[0, lx] x [0, ly]` (not centered
/// like the grid). Entry `i` sits at lattice row `i / side`, column
/// `i % side`, so x varies fastest.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSet {
    /// Lattice points per axis.
    pub side: usize,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Initial x velocities (zero).
    pub u: Vec<f64>,
    /// Initial y velocities (zero).
    pub v: Vec<f64>,
}

impl ParticleSet {
    /// Number of particles.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Returns `k` such that `k * k == count`.
///
/// # Errors
/// [`ConfigError::NotPerfectSquare`] if no such `k` exists, or a count error
/// for zero particles.
pub fn lattice_side(count: usize) -> Result<usize, ConfigError> {
    require_count("num_particles", count)?;

    let mut k = (count as f64).sqrt().round() as usize;
    // Guard against rounding for very large counts.
    while k > 0 && k.saturating_mul(k) > count {
        k -= 1;
    }
    while (k + 1).saturating_mul(k + 1) <= count {
        k += 1;
    }

    if k * k != count {
        return Err(ConfigError::NotPerfectSquare(count));
    }
    Ok(k)
}

/// `n` evenly spaced samples over `[start, end]`, both endpoints included.
///
/// The last sample is exactly `end`; a single sample is `start`.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + i as f64 * step })
                .collect()
        }
    }
}

/// Seeds `count` particles on a square lattice spanning `[0, lx] x [0, ly]`.
pub fn seed_lattice(count: usize, lx: f64, ly: f64) -> Result<ParticleSet, ConfigError> {
    require_positive("Lx", lx)?;
    require_positive("Ly", ly)?;
    let side = lattice_side(count)?;

    let xs = linspace(0.0, lx, side);
    let ys = linspace(0.0, ly, side);

    let mut x = vec![0.0; count];
    let mut y = vec![0.0; count];
    x.par_iter_mut()
        .zip(y.par_iter_mut())
        .enumerate()
        .for_each(|(k, (xp, yp))| {
            *xp = xs[k % side];
            *yp = ys[k / side];
        });

    log::debug!("Seeded {} particles on a {}x{} lattice", count, side, side);

    Ok(ParticleSet {
        side,
        x,
        y,
        u: vec![0.0; count],
        v: vec![0.0; count],
    })
}
