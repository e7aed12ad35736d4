//! Cartesian mesh construction.
//!
//! Provides the centered coordinate arrays every field is laid out on.

mod mesh;

pub use mesh::{build_grid, Grid};
