//! Initial-condition generator for 2D rotating shallow-water runs.
//!
//! Superposes randomly drawn Gaussian vortices, each in geostrophic balance
//! between its velocity field and free-surface bump, on a centered grid,
//! seeds a square lattice of tracer particles, and writes everything in the
//! `initial_conditions` layout expected by the solver.

pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod particles;
pub mod pipeline;
pub mod state;
pub mod vortex;

pub use config::{SimulationConfig, TimeConfig};
pub use error::{ConfigError, GenerationError, SamplingError};
pub use export::{ExportError, MemoryDataset, StateSink};
pub use grid::Grid;
pub use particles::{ParticleConfig, ParticleSet};
pub use pipeline::{GenerationStage, Pipeline, PipelineError, StageId};
pub use state::InitialState;
pub use vortex::{FieldState, VortexConfig, VortexParameters, VortexStats};

/// Runs the standard pipeline for `config` with the given seed.
pub fn generate(config: SimulationConfig, seed: u64) -> Result<InitialState, PipelineError> {
    let mut state = InitialState::new(config, seed);
    Pipeline::standard().run(&mut state)?;
    Ok(state)
}
