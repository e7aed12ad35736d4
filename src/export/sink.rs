//! Primitive write operations of a named-variable container.

use ndarray::Array2;
use thiserror::Error;

/// Errors raised while writing or reading an initial-conditions container.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),
    #[error("Unknown dimension '{0}'")]
    UnknownDimension(String),
    #[error("Dimension '{0}' is already defined")]
    DuplicateDimension(String),
    #[error("Variable '{0}' is already defined")]
    DuplicateVariable(String),
    #[error("Variable '{name}' expects {expected} values, got {actual}")]
    ShapeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("Field '{name}' has shape {actual:?}, expected {expected:?}")]
    FieldShape {
        name: String,
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("Variable '{name}' has dimensions {actual:?}, expected {expected:?}")]
    DimensionMismatch {
        name: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("Field '{0}' could not be laid out contiguously")]
    NonContiguous(String),
    #[error("Missing variable: {0}")]
    MissingVariable(String),
    #[error("Initial state is incomplete: {0} missing")]
    Incomplete(&'static str),
    #[error("NetCDF support not enabled; rebuild with `--features netcdf`")]
    FeatureDisabled,
}

/// A container keyed by variable name, such as a NetCDF file.
///
/// Dimensions must be added before any variable that uses them.
pub trait StateSink {
    /// Sets the container-level description attribute.
    fn set_description(&mut self, description: &str) -> Result<(), ExportError>;

    /// Declares a fixed-length dimension.
    fn add_dimension(&mut self, name: &str, len: usize) -> Result<(), ExportError>;

    /// Writes a 2D real array over `dims` = `[row_dim, column_dim]`.
    fn put_field(
        &mut self,
        name: &str,
        dims: [&str; 2],
        data: &Array2<f64>,
        units: &str,
    ) -> Result<(), ExportError>;

    /// Writes a 1D real array over `dim`.
    fn put_series(
        &mut self,
        name: &str,
        dim: &str,
        data: &[f64],
        units: Option<&str>,
    ) -> Result<(), ExportError>;

    /// Writes a single integer over a length-1 dimension.
    fn put_int(&mut self, name: &str, dim: &str, value: i64) -> Result<(), ExportError>;

    /// Writes a single real over a length-1 dimension.
    fn put_real(&mut self, name: &str, dim: &str, value: f64) -> Result<(), ExportError>;
}
