//! Export of the initial state to the solver's container format.
//!
//! The schema writer targets the [`StateSink`] trait. [`MemoryDataset`]
//! keeps everything in memory; the NetCDF4 file backend is available with
//! the `netcdf` cargo feature.

mod memory;
#[cfg(feature = "netcdf")]
mod netcdf_io;
mod schema;
mod sink;

#[cfg(not(feature = "netcdf"))]
use std::path::Path;

use crate::state::InitialState;

pub use memory::{MemoryDataset, StoredVariable, Values};
pub use schema::{
    write_initial_state, SchemaPlaceholders, DEFAULT_FILE_NAME, DESCRIPTION, DIM_CONST,
    DIM_TRAJECTORY, DIM_X, DIM_Y, FIELD_DIMS, FIELD_VARIABLES, INT_SCALARS, PARTICLE_VARIABLES,
    REAL_SCALARS,
};
pub use sink::{ExportError, StateSink};

#[cfg(feature = "netcdf")]
pub use netcdf_io::{export_initial_state, read_initial_conditions, NetCdfSink};

/// Writes `state` to a NetCDF4 file at `path`.
#[cfg(not(feature = "netcdf"))]
pub fn export_initial_state(_state: &InitialState, _path: &Path) -> Result<(), ExportError> {
    Err(ExportError::FeatureDisabled)
}

/// Reads an initial-conditions file back into memory.
#[cfg(not(feature = "netcdf"))]
pub fn read_initial_conditions(_path: &Path) -> Result<MemoryDataset, ExportError> {
    Err(ExportError::FeatureDisabled)
}

/// Writes `state` into a fresh in-memory dataset.
pub fn to_memory(state: &InitialState) -> Result<MemoryDataset, ExportError> {
    let mut dataset = MemoryDataset::new();
    write_initial_state(state, &mut dataset)?;
    Ok(dataset)
}
