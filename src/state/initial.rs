//! Initial-condition record for one run.

use crate::config::SimulationConfig;
use crate::error::GenerationError;
use crate::grid::Grid;
use crate::particles::ParticleSet;
use crate::vortex::FieldState;

/// Everything a run produces before it is written out.
///
/// Stage outputs start as `None` and are filled in by the pipeline.
#[derive(Debug, Clone)]
pub struct InitialState {
    /// Configuration the run was generated from.
    pub config: SimulationConfig,
    /// Master random seed.
    pub seed: u64,
    /// Coordinate mesh (populated by the grid stage).
    pub grid: Option<Grid>,
    /// Vortex velocity and height fields (populated by the vortex stage).
    pub fields: Option<FieldState>,
    /// Tracer particles (populated by the particle stage).
    pub particles: Option<ParticleSet>,
}

impl InitialState {
    /// Creates an empty state for the given configuration and seed.
    pub fn new(config: SimulationConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            grid: None,
            fields: None,
            particles: None,
        }
    }

    /// Returns true once every stage output is present.
    pub fn is_complete(&self) -> bool {
        self.grid.is_some() && self.fields.is_some() && self.particles.is_some()
    }

    pub fn grid(&self) -> Result<&Grid, GenerationError> {
        self.grid.as_ref().ok_or(GenerationError::MissingInput("grid"))
    }

    pub fn fields(&self) -> Result<&FieldState, GenerationError> {
        self.fields.as_ref().ok_or(GenerationError::MissingInput("vortex fields"))
    }

    pub fn particles(&self) -> Result<&ParticleSet, GenerationError> {
        self.particles.as_ref().ok_or(GenerationError::MissingInput("particles"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_empty() {
        let state = InitialState::new(SimulationConfig::small(8, 1), 42);
        assert_eq!(state.seed, 42);
        assert!(!state.is_complete());
        assert!(matches!(state.grid(), Err(GenerationError::MissingInput("grid"))));
        assert!(state.fields().is_err());
        assert!(state.particles().is_err());
    }
}
