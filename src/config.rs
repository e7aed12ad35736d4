//! Run-level simulation configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::particles::ParticleConfig;
use crate::vortex::VortexConfig;

/// Pass-through time bookkeeping consumed by the downstream solver.
///
/// None of these values influence the generated fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Output file index the solver starts counting from.
    pub output: i64,
    /// Initial simulation time.
    pub time: f64,
    /// Final simulation time (`Tf`).
    pub final_time: f64,
    /// Interval between solver outputs.
    pub plot_interval: f64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            output: 0,
            time: 0.0,
            final_time: 200.0,
            plot_interval: 1.0,
        }
    }
}

/// Complete configuration for one initial-condition run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Cells along x.
    pub nx: usize,
    /// Cells along y.
    pub ny: usize,
    /// Domain length along x (m).
    pub lx: f64,
    /// Domain length along y (m).
    pub ly: f64,
    /// Gravitational acceleration (m/s^2).
    pub g: f64,
    /// Reference depth (m), written as the constant bathymetry and `Hmax`.
    pub h0: f64,
    /// Coriolis parameter (1/s).
    pub f0: f64,
    pub vortices: VortexConfig,
    pub particles: ParticleConfig,
    pub time: TimeConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            nx: 512,
            ny: 512,
            lx: 10.0,
            ly: 10.0,
            g: 9.81,
            h0: 0.5,
            f0: 0.25,
            vortices: VortexConfig::default(),
            particles: ParticleConfig::default(),
            time: TimeConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// The 512x512 reference run with 180 vortices and 400x400 particles.
    pub fn reference() -> Self {
        Self::default()
    }

    /// A cheap configuration for quick looks and tests.
    ///
    /// Keeps the reference physics but shrinks the grid to `n` x `n`, the
    /// vortex count to `vortices`, and the particle lattice to 16 x 16.
    pub fn small(n: usize, vortices: usize) -> Self {
        Self {
            nx: n,
            ny: n,
            vortices: VortexConfig {
                count: vortices,
                ..Default::default()
            },
            particles: ParticleConfig {
                count: 256,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Loads a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Grid spacing `(dx, dy)`.
    pub fn spacing(&self) -> (f64, f64) {
        (self.lx / self.nx as f64, self.ly / self.ny as f64)
    }

    /// Checks every constraint needed to keep generation well defined.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_count("Nx", self.nx)?;
        require_count("Ny", self.ny)?;
        require_positive("Lx", self.lx)?;
        require_positive("Ly", self.ly)?;
        require_positive("g", self.g)?;
        require_finite("H0", self.h0)?;
        require_finite("f0", self.f0)?;

        self.vortices.validate(self.lx)?;
        self.particles.validate()?;

        require_finite("time", self.time.time)?;
        require_finite("Tf", self.time.final_time)?;
        require_finite("plot_interval", self.time.plot_interval)?;
        Ok(())
    }
}

pub(crate) fn require_count(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::NonPositiveCount { name, value });
    }
    Ok(())
}

pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ConfigError::NonPositive { name, value });
    }
    Ok(())
}

pub(crate) fn require_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(ConfigError::Negative { name, value });
    }
    Ok(())
}

pub(crate) fn require_finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { name, value });
    }
    Ok(())
}
