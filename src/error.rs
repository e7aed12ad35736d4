//! Error types shared across generation stages.

use thiserror::Error;

/// Configuration rejected before or during generation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a positive cell count, got {value}")]
    NonPositiveCount { name: &'static str, value: usize },
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("num_particles ({0}) is not a perfect square; the particle lattice needs k*k points")]
    NotPerfectSquare(usize),
    #[error("Invalid {name} distribution: {reason}")]
    Distribution { name: &'static str, reason: String },
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Random sampling that could not produce a usable value.
#[derive(Error, Debug)]
pub enum SamplingError {
    #[error("Vortex {vortex}: no positive width after {attempts} draws")]
    WidthExhausted { vortex: usize, attempts: u32 },
}

/// Any failure inside a generation stage.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sampling(#[from] SamplingError),
    #[error("Stage input missing: {0}")]
    MissingInput(&'static str),
}
