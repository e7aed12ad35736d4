//! NetCDF4 backend for the initial-conditions container.
//!
//! Files are written to a temporary sibling of the target path and renamed
//! into place only after every variable has been written and the file has
//! closed cleanly, so a failed run
//! never leaves a partial file behind.

use std::path::Path;

use ndarray::Array2;

use super::memory::MemoryDataset;
use super::schema::{
    write_initial_state, DIM_CONST, DIM_TRAJECTORY, DIM_X, DIM_Y, FIELD_DIMS, FIELD_VARIABLES,
    INT_SCALARS, PARTICLE_VARIABLES, REAL_SCALARS,
};
use super::sink::{ExportError, StateSink};
use crate::state::InitialState;

/// [`StateSink`] writing straight into a NetCDF4 file.
pub struct NetCdfSink {
    file: netcdf::FileMut,
}

impl NetCdfSink {
    /// Creates (or truncates) a NetCDF4 file at `path`.
    pub fn create(path: &Path) -> Result<Self, ExportError> {
        let file = netcdf::create(path)?;
        Ok(Self { file })
    }

    /// Closes the file, reporting any error from flushing buffered data.
    pub fn finish(self) -> Result<(), ExportError> {
        self.file.close()?;
        Ok(())
    }
}

impl StateSink for NetCdfSink {
    fn set_description(&mut self, description: &str) -> Result<(), ExportError> {
        self.file.add_attribute("description", description)?;
        Ok(())
    }

    fn add_dimension(&mut self, name: &str, len: usize) -> Result<(), ExportError> {
        self.file.add_dimension(name, len)?;
        Ok(())
    }

    fn put_field(
        &mut self,
        name: &str,
        dims: [&str; 2],
        data: &Array2<f64>,
        units: &str,
    ) -> Result<(), ExportError> {
        let data = data.as_standard_layout();
        let values = data
            .as_slice()
            .ok_or_else(|| ExportError::NonContiguous(name.to_string()))?;

        let mut var = self.file.add_variable::<f64>(name, &dims)?;
        var.put_attribute("units", units)?;
        var.put_values(values, ..)?;
        Ok(())
    }

    fn put_series(
        &mut self,
        name: &str,
        dim: &str,
        data: &[f64],
        units: Option<&str>,
    ) -> Result<(), ExportError> {
        let mut var = self.file.add_variable::<f64>(name, &[dim])?;
        if let Some(units) = units {
            var.put_attribute("units", units)?;
        }
        var.put_values(data, ..)?;
        Ok(())
    }

    fn put_int(&mut self, name: &str, dim: &str, value: i64) -> Result<(), ExportError> {
        let mut var = self.file.add_variable::<i64>(name, &[dim])?;
        var.put_values(&[value], ..)?;
        Ok(())
    }

    fn put_real(&mut self, name: &str, dim: &str, value: f64) -> Result<(), ExportError> {
        let mut var = self.file.add_variable::<f64>(name, &[dim])?;
        var.put_values(&[value], ..)?;
        Ok(())
    }
}

/// Writes `state` to a NetCDF4 file at `path`.
///
/// An existing file at `path` is replaced only on success.
pub fn export_initial_state(state: &InitialState, path: &Path) -> Result<(), ExportError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Deleted on drop unless persisted.
    let staging = tempfile::Builder::new()
        .prefix(".initial_conditions")
        .suffix(".nc.partial")
        .tempfile_in(dir)?
        .into_temp_path();

    let mut sink = NetCdfSink::create(&staging)?;
    write_initial_state(state, &mut sink)?;
    sink.finish()?;

    staging.persist(path).map_err(|e| ExportError::Io(e.error))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Reads an initial-conditions file back into memory.
///
/// Every schema variable must be present with its declared dimensions.
pub fn read_initial_conditions(path: &Path) -> Result<MemoryDataset, ExportError> {
    let file = netcdf::open(path)?;
    let mut dataset = MemoryDataset::new();

    if let Some(attr) = file.attribute("description") {
        if let netcdf::AttributeValue::Str(text) = attr.value()? {
            dataset.set_description(&text)?;
        }
    }

    for name in [DIM_X, DIM_Y, DIM_TRAJECTORY, DIM_CONST] {
        let dim = file
            .dimension(name)
            .ok_or_else(|| ExportError::UnknownDimension(name.to_string()))?;
        dataset.add_dimension(name, dim.len())?;
    }

    let ny = dataset.dimension(DIM_Y).unwrap_or(0);
    let nx = dataset.dimension(DIM_X).unwrap_or(0);

    for (name, _) in FIELD_VARIABLES {
        let var = schema_variable(&file, name, &FIELD_DIMS)?;
        let values: Vec<f64> = var.get_values(..)?;
        let actual = values.len();
        let array = Array2::from_shape_vec((ny, nx), values).map_err(|_| {
            ExportError::ShapeMismatch {
                name: name.to_string(),
                expected: ny * nx,
                actual,
            }
        })?;
        let units = units_of(&var).unwrap_or_default();
        dataset.put_field(name, FIELD_DIMS, &array, &units)?;
    }

    for name in PARTICLE_VARIABLES {
        let var = schema_variable(&file, name, &[DIM_TRAJECTORY])?;
        let values: Vec<f64> = var.get_values(..)?;
        let units = units_of(&var);
        dataset.put_series(name, DIM_TRAJECTORY, &values, units.as_deref())?;
    }

    for name in INT_SCALARS {
        let var = schema_variable(&file, name, &[DIM_CONST])?;
        let values: Vec<i64> = var.get_values(..)?;
        let value = values
            .first()
            .copied()
            .ok_or_else(|| ExportError::MissingVariable(name.to_string()))?;
        dataset.put_int(name, DIM_CONST, value)?;
    }

    for name in REAL_SCALARS {
        let var = schema_variable(&file, name, &[DIM_CONST])?;
        let values: Vec<f64> = var.get_values(..)?;
        let value = values
            .first()
            .copied()
            .ok_or_else(|| ExportError::MissingVariable(name.to_string()))?;
        dataset.put_real(name, DIM_CONST, value)?;
    }

    Ok(dataset)
}

/// Looks up `name` and checks it is laid out over `dims`.
fn schema_variable<'f>(
    file: &'f netcdf::File,
    name: &str,
    dims: &[&str],
) -> Result<netcdf::Variable<'f>, ExportError> {
    let var = file
        .variable(name)
        .ok_or_else(|| ExportError::MissingVariable(name.to_string()))?;

    let actual: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
    if actual != dims {
        return Err(ExportError::DimensionMismatch {
            name: name.to_string(),
            expected: dims.iter().map(|d| d.to_string()).collect(),
            actual,
        });
    }
    Ok(var)
}

fn units_of(var: &netcdf::Variable) -> Option<String> {
    match var.attribute_value("units")?.ok()? {
        netcdf::AttributeValue::Str(units) => Some(units),
        _ => None,
    }
}
