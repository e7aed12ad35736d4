//! Generation stage trait and pipeline orchestration.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::error::GenerationError;
use crate::grid::Grid;
use crate::particles::seed_lattice;
use crate::state::InitialState;
use crate::vortex::synthesize_field;

/// Unique identifier for generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Coordinate mesh construction.
    Grid,
    /// Vortex field superposition.
    Vortices,
    /// Tracer-particle lattice.
    Particles,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Grid => "grid",
            StageId::Vortices => "vortices",
            StageId::Particles => "particles",
        }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Stage '{stage}' failed: {source}")]
    StageFailed {
        stage: String,
        #[source]
        source: GenerationError,
    },
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
}

impl PipelineError {
    /// Name of the stage that failed.
    pub fn stage(&self) -> Option<&str> {
        match self {
            PipelineError::StageFailed { stage, .. } => Some(stage.as_str()),
            PipelineError::MissingDependency(stage, _) => Some(stage.as_str()),
        }
    }
}

/// Generator threaded through every stage of a run.
pub type StageRng = ChaCha8Rng;

/// Trait for implementing generation stages.
///
/// Each stage fills in part of the [`InitialState`], building upon earlier
/// stages. Stages draw random numbers only from the generator they are
/// handed, which keeps a run reproducible from its seed.
pub trait GenerationStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the stage, modifying the state in place.
    fn execute(&self, state: &mut InitialState, rng: &mut StageRng) -> Result<(), GenerationError>;
}

/// Orchestrates generation stages into a complete run.
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl Pipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Grid, vortex and particle stages in their natural order.
    pub fn standard() -> Self {
        let mut pipeline = Self::new();
        pipeline
            .add_stage(GridStage)
            .add_stage(VortexStage)
            .add_stage(ParticleStage);
        pipeline
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Validates the configuration, then executes all stages in order.
    pub fn run(&self, state: &mut InitialState) -> Result<(), PipelineError> {
        self.run_with_callbacks(state, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `state` - The state to generate into
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        state: &mut InitialState,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        state
            .config
            .validate()
            .map_err(|e| PipelineError::StageFailed {
                stage: "configuration".to_string(),
                source: e.into(),
            })?;

        let mut rng = StageRng::seed_from_u64(state.seed);
        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);

            // Check dependencies
            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            log::info!("[{}/{}] {}", i + 1, total, stage.name());
            stage
                .execute(state, &mut rng)
                .map_err(|source| PipelineError::StageFailed {
                    stage: stage.name().to_string(),
                    source,
                })?;
            completed.push(stage.id());

            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}

/// Builds the centered coordinate mesh.
pub struct GridStage;

impl GenerationStage for GridStage {
    fn id(&self) -> StageId {
        StageId::Grid
    }

    fn name(&self) -> &str {
        "Grid Construction"
    }

    fn execute(&self, state: &mut InitialState, _rng: &mut StageRng) -> Result<(), GenerationError> {
        state.grid = Some(Grid::from_config(&state.config)?);
        Ok(())
    }
}

/// Superposes the random vortex population onto the grid.
pub struct VortexStage;

impl GenerationStage for VortexStage {
    fn id(&self) -> StageId {
        StageId::Vortices
    }

    fn name(&self) -> &str {
        "Vortex Synthesis"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Grid]
    }

    fn execute(&self, state: &mut InitialState, rng: &mut StageRng) -> Result<(), GenerationError> {
        let fields = synthesize_field(state.grid()?, &state.config, rng)?;
        state.fields = Some(fields);
        Ok(())
    }
}

/// Seeds the tracer-particle lattice. Independent of the grid.
pub struct ParticleStage;

impl GenerationStage for ParticleStage {
    fn id(&self) -> StageId {
        StageId::Particles
    }

    fn name(&self) -> &str {
        "Particle Seeding"
    }

    fn execute(&self, state: &mut InitialState, _rng: &mut StageRng) -> Result<(), GenerationError> {
        let config = &state.config;
        let particles = seed_lattice(config.particles.count, config.lx, config.ly)?;
        state.particles = Some(particles);
        Ok(())
    }
}
