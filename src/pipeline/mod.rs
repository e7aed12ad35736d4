//! Generation pipeline.
//!
//! Validates the configuration, then runs the grid, vortex and particle
//! stages in order on an [`InitialState`](crate::state::InitialState).

mod stage;

pub use stage::{
    GenerationStage, GridStage, ParticleStage, Pipeline, PipelineError, StageId, StageRng,
    VortexStage,
};
