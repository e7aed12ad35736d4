//! In-memory container implementing [`StateSink`].

use ndarray::Array2;

use super::sink::{ExportError, StateSink};

/// Stored variable data.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Real(Vec<f64>),
    Int(Vec<i64>),
}

/// A variable held by a [`MemoryDataset`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredVariable {
    /// Dimension names, outermost first.
    pub dims: Vec<String>,
    /// Dimension lengths, matching `dims`.
    pub shape: Vec<usize>,
    /// `units` attribute, if any.
    pub units: Option<String>,
    /// Row-major values.
    pub values: Values,
}

/// In-memory dataset with the same structure as the output file.
///
/// Validates dimension references and value counts on every write, which
/// makes it a faithful stand-in for the file container in tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryDataset {
    description: Option<String>,
    dimensions: Vec<(String, usize)>,
    variables: Vec<(String, StoredVariable)>,
}

impl MemoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Length of a dimension.
    pub fn dimension(&self, name: &str) -> Option<usize> {
        self.dimensions
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, len)| len)
    }

    /// Dimension names in declaration order.
    pub fn dimension_names(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(|(n, _)| n.as_str())
    }

    pub fn variable(&self, name: &str) -> Option<&StoredVariable> {
        self.variables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Variable names in write order.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|(n, _)| n.as_str())
    }

    /// Real values of a variable.
    pub fn reals(&self, name: &str) -> Option<&[f64]> {
        match &self.variable(name)?.values {
            Values::Real(v) => Some(v),
            Values::Int(_) => None,
        }
    }

    /// Integer values of a variable.
    pub fn ints(&self, name: &str) -> Option<&[i64]> {
        match &self.variable(name)?.values {
            Values::Int(v) => Some(v),
            Values::Real(_) => None,
        }
    }

    /// First value of a real scalar variable.
    pub fn real_scalar(&self, name: &str) -> Option<f64> {
        self.reals(name)?.first().copied()
    }

    /// First value of an integer scalar variable.
    pub fn int_scalar(&self, name: &str) -> Option<i64> {
        self.ints(name)?.first().copied()
    }

    /// `units` attribute of a variable.
    pub fn units(&self, name: &str) -> Option<&str> {
        self.variable(name)?.units.as_deref()
    }

    /// A 2D real variable as an array.
    pub fn field(&self, name: &str) -> Option<Array2<f64>> {
        let var = self.variable(name)?;
        match (&var.values, var.shape.as_slice()) {
            (Values::Real(v), &[rows, cols]) => Array2::from_shape_vec((rows, cols), v.clone()).ok(),
            _ => None,
        }
    }

    fn insert(
        &mut self,
        name: &str,
        dims: &[&str],
        units: Option<&str>,
        values: Values,
    ) -> Result<(), ExportError> {
        if self.variable(name).is_some() {
            return Err(ExportError::DuplicateVariable(name.to_string()));
        }

        let shape = dims
            .iter()
            .map(|d| {
                self.dimension(d)
                    .ok_or_else(|| ExportError::UnknownDimension(d.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let expected: usize = shape.iter().product();
        let actual = match &values {
            Values::Real(v) => v.len(),
            Values::Int(v) => v.len(),
        };
        if expected != actual {
            return Err(ExportError::ShapeMismatch {
                name: name.to_string(),
                expected,
                actual,
            });
        }

        self.variables.push((
            name.to_string(),
            StoredVariable {
                dims: dims.iter().map(|d| d.to_string()).collect(),
                shape,
                units: units.map(str::to_string),
                values,
            },
        ));
        Ok(())
    }
}

impl StateSink for MemoryDataset {
    fn set_description(&mut self, description: &str) -> Result<(), ExportError> {
        self.description = Some(description.to_string());
        Ok(())
    }

    fn add_dimension(&mut self, name: &str, len: usize) -> Result<(), ExportError> {
        if self.dimension(name).is_some() {
            return Err(ExportError::DuplicateDimension(name.to_string()));
        }
        self.dimensions.push((name.to_string(), len));
        Ok(())
    }

    fn put_field(
        &mut self,
        name: &str,
        dims: [&str; 2],
        data: &Array2<f64>,
        units: &str,
    ) -> Result<(), ExportError> {
        let rows = self
            .dimension(dims[0])
            .ok_or_else(|| ExportError::UnknownDimension(dims[0].to_string()))?;
        let cols = self
            .dimension(dims[1])
            .ok_or_else(|| ExportError::UnknownDimension(dims[1].to_string()))?;
        if data.dim() != (rows, cols) {
            return Err(ExportError::FieldShape {
                name: name.to_string(),
                expected: (rows, cols),
                actual: data.dim(),
            });
        }

        // `iter` walks in logical row-major order regardless of memory layout.
        let values = data.iter().copied().collect();
        self.insert(name, &dims, Some(units), Values::Real(values))
    }

    fn put_series(
        &mut self,
        name: &str,
        dim: &str,
        data: &[f64],
        units: Option<&str>,
    ) -> Result<(), ExportError> {
        self.insert(name, &[dim], units, Values::Real(data.to_vec()))
    }

    fn put_int(&mut self, name: &str, dim: &str, value: i64) -> Result<(), ExportError> {
        self.insert(name, &[dim], None, Values::Int(vec![value]))
    }

    fn put_real(&mut self, name: &str, dim: &str, value: f64) -> Result<(), ExportError> {
        self.insert(name, &[dim], None, Values::Real(vec![value]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset_with_dims() -> MemoryDataset {
        let mut ds = MemoryDataset::new();
        ds.add_dimension("x", 3).unwrap();
        ds.add_dimension("y", 2).unwrap();
        ds.add_dimension("const", 1).unwrap();
        ds
    }

    #[test]
    fn test_put_and_read_field() {
        let mut ds = dataset_with_dims();
        let data = Array2::from_shape_fn((2, 3), |(j, i)| (j * 3 + i) as f64);
        ds.put_field("eta", ["y", "x"], &data, "m").unwrap();

        let var = ds.variable("eta").unwrap();
        assert_eq!(var.dims, vec!["y", "x"]);
        assert_eq!(var.shape, vec![2, 3]);
        assert_eq!(ds.units("eta"), Some("m"));
        assert_eq!(ds.reals("eta").unwrap(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(ds.field("eta").unwrap(), data);
    }

    #[test]
    fn test_transposed_field_is_rejected() {
        let mut ds = dataset_with_dims();
        let data = Array2::zeros((3, 2));
        assert!(matches!(
            ds.put_field("u", ["y", "x"], &data, "m/s"),
            Err(ExportError::FieldShape { expected: (2, 3), actual: (3, 2), .. })
        ));
    }

    #[test]
    fn test_scalars() {
        let mut ds = dataset_with_dims();
        ds.put_int("Nx", "const", 3).unwrap();
        ds.put_real("g", "const", 9.81).unwrap();

        assert_eq!(ds.int_scalar("Nx"), Some(3));
        assert_eq!(ds.real_scalar("g"), Some(9.81));
        assert_eq!(ds.real_scalar("Nx"), None);
        assert_eq!(ds.units("g"), None);
    }

    #[test]
    fn test_series_length_checked() {
        let mut ds = dataset_with_dims();
        assert!(matches!(
            ds.put_series("p", "x", &[1.0, 2.0], None),
            Err(ExportError::ShapeMismatch { expected: 3, actual: 2, .. })
        ));
    }

    #[test]
    fn test_unknown_dimension() {
        let mut ds = MemoryDataset::new();
        assert!(matches!(
            ds.put_real("g", "const", 1.0),
            Err(ExportError::UnknownDimension(_))
        ));
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut ds = dataset_with_dims();
        assert!(matches!(
            ds.add_dimension("x", 4),
            Err(ExportError::DuplicateDimension(_))
        ));

        ds.put_real("g", "const", 1.0).unwrap();
        assert!(matches!(
            ds.put_real("g", "const", 2.0),
            Err(ExportError::DuplicateVariable(_))
        ));
    }

    #[test]
    fn test_write_order_preserved() {
        let mut ds = dataset_with_dims();
        ds.put_real("b", "const", 1.0).unwrap();
        ds.put_real("a", "const", 2.0).unwrap();
        let names: Vec<&str> = ds.variable_names().collect();
        assert_eq!(names, vec!["b", "a"]);
        let dims: Vec<&str> = ds.dimension_names().collect();
        assert_eq!(dims, vec!["x", "y", "const"]);
    }
}
