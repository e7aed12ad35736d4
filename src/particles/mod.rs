//! Lagrangian tracer-particle seeding.

mod config;
mod lattice;

pub use config::ParticleConfig;
pub use lattice::{lattice_side, linspace, seed_lattice, ParticleSet};
