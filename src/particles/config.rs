//! Tracer particle settings.

use serde::{Deserialize, Serialize};

use crate::config::require_non_negative;
use crate::error::ConfigError;

/// Configuration for the tracer-particle lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Number of particles; must be a perfect square.
    pub count: usize,
    /// Minimum inter-particle distance used by the solver (`par_int`).
    pub min_spacing: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 400 * 400,
            min_spacing: 0.007,
        }
    }
}

impl ParticleConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        super::lattice_side(self.count)?;
        require_non_negative("par_int", self.min_spacing)?;
        Ok(())
    }
}
