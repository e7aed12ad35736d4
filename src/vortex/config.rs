//! Vortex population parameters.

use serde::{Deserialize, Serialize};

use crate::config::{require_count, require_finite, require_non_negative, require_positive};
use crate::error::ConfigError;

/// Configuration for the random vortex population.
///
/// Width statistics scale with the domain length `Lx`; velocity statistics
/// follow from the Rossby number, the Coriolis parameter and the mean width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VortexConfig {
    /// Number of vortices to superpose.
    pub count: usize,
    /// Rossby number `Ro`, sets the mean velocity amplitude.
    pub rossby: f64,
    /// Mean vortex width as a fraction of `Lx`.
    pub width_ratio: f64,
    /// Width standard deviation as a fraction of the mean width.
    pub width_std_ratio: f64,
    /// Velocity standard deviation as a fraction of the mean velocity.
    pub velocity_std_ratio: f64,
    /// Upper bound on width draws per vortex before giving up.
    pub max_width_draws: u32,
}

impl Default for VortexConfig {
    fn default() -> Self {
        Self {
            count: 180,
            rossby: 0.1,
            width_ratio: 0.03,
            width_std_ratio: 0.05,
            velocity_std_ratio: 0.05,
            max_width_draws: 1000,
        }
    }
}

impl VortexConfig {
    /// Derives the sampling statistics for a domain of length `lx`.
    pub fn stats(&self, lx: f64, f0: f64) -> VortexStats {
        let mean_width = self.width_ratio * lx;
        let mean_velocity = 4.0 * self.rossby * f0 * mean_width;
        VortexStats {
            mean_width,
            std_width: self.width_std_ratio * mean_width,
            mean_velocity,
            // Sign is applied separately, keep the spread non-negative.
            std_velocity: (self.velocity_std_ratio * mean_velocity).abs(),
        }
    }

    pub(crate) fn validate(&self, lx: f64) -> Result<(), ConfigError> {
        require_finite("Ro", self.rossby)?;
        require_positive("vortex width ratio", self.width_ratio)?;
        require_positive("mean vortex width", self.width_ratio * lx)?;
        require_non_negative("vortex width std ratio", self.width_std_ratio)?;
        require_non_negative("vortex velocity std ratio", self.velocity_std_ratio)?;
        require_count("max width draws", self.max_width_draws as usize)?;
        Ok(())
    }
}

/// Derived distribution parameters for vortex sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VortexStats {
    pub mean_width: f64,
    pub std_width: f64,
    pub mean_velocity: f64,
    pub std_velocity: f64,
}
