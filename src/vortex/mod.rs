//! Random vortex field synthesis.
//!
//! Each vortex is a Gaussian height anomaly with the velocity field that
//! balances it under rotation. Vortices are drawn from normal distributions
//! around a mean width and velocity and superposed on the grid.

mod config;
mod field;
mod sampler;

pub use config::{VortexConfig, VortexStats};
pub use field::{add_vortex, synthesize_field, FieldState};
pub use sampler::{sample_positive, VortexParameters, VortexSampler, CENTER_FRACTION};
