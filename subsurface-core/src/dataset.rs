//! A named n-dimensional dataset: variables over named dims, 1-D coordinates per dim and container-level attributes.
//!
//! Both canonical containers ([`UnstructuredData`](crate::containers::UnstructuredData) and
//! [`StructuredData`](crate::containers::StructuredData)) can be converted to and from a [`Dataset`], which is the form
//! the self-describing archive format serializes.

use std::{collections::BTreeMap, fmt::Display};

use ndarray::{Array1, ArrayD};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Element type of an array within a [`Dataset`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    #[serde(rename = "float64")]
    Float64,
    #[serde(rename = "int64")]
    Int64,
    #[serde(rename = "str")]
    Str,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Float64 => "float64",
            DataType::Int64 => "int64",
            DataType::Str => "str",
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, DataType::Str)
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed n-dimensional array data
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Float(ArrayD<f64>),
    Int(ArrayD<i64>),
    Text(ArrayD<String>),
}

impl ArrayData {
    pub fn shape(&self) -> &[usize] {
        match self {
            ArrayData::Float(arr) => arr.shape(),
            ArrayData::Int(arr) => arr.shape(),
            ArrayData::Text(arr) => arr.shape(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> DataType {
        match self {
            ArrayData::Float(_) => DataType::Float64,
            ArrayData::Int(_) => DataType::Int64,
            ArrayData::Text(_) => DataType::Str,
        }
    }

    /// Returns a float copy of numeric data, `None` for text data
    pub fn to_f64(&self) -> Option<ArrayD<f64>> {
        match self {
            ArrayData::Float(arr) => Some(arr.clone()),
            ArrayData::Int(arr) => Some(arr.mapv(|v| v as f64)),
            ArrayData::Text(_) => None,
        }
    }

    /// Creates 1-D text data from the given strings
    pub fn text_1d<S: Into<String>, I: IntoIterator<Item = S>>(values: I) -> Self {
        let values = values.into_iter().map(Into::into).collect::<Vec<String>>();
        ArrayData::Text(Array1::from_vec(values).into_dyn())
    }
}

/// An array over named dims
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    dims: Vec<String>,
    data: ArrayData,
}

impl Variable {
    /// Creates a new `Variable`. Fails with an arity error if the number of dims does not match the dimensionality
    /// of `data`
    pub fn new<S: Into<String>, I: IntoIterator<Item = S>>(dims: I, data: ArrayData) -> Result<Self> {
        let dims = dims.into_iter().map(Into::into).collect::<Vec<String>>();
        if dims.len() != data.ndim() {
            return Err(Error::arity(format!(
                "variable has {} dims ({}) but its data is {}-dimensional",
                dims.len(),
                dims.join(", "),
                data.ndim()
            )));
        }
        Ok(Self { dims, data })
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn into_data(self) -> ArrayData {
        self.data
    }
}

/// Named collection of [`Variable`]s that share dims, plus coordinates and container-level attributes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    variables: BTreeMap<String, Variable>,
    coords: BTreeMap<String, Variable>,
    attrs: Map<String, Value>,
}

impl Dataset {
    /// Creates a new `Dataset` and validates it. Every coordinate must be 1-D over the dim of the same name, and all
    /// variables and coordinates must agree on the extent of every dim they share
    pub fn new(
        variables: BTreeMap<String, Variable>,
        coords: BTreeMap<String, Variable>,
        attrs: Map<String, Value>,
    ) -> Result<Self> {
        let dataset = Self {
            variables,
            coords,
            attrs,
        };
        dataset.validate()?;
        Ok(dataset)
    }

    fn validate(&self) -> Result<()> {
        for (name, coord) in &self.coords {
            if coord.dims().len() != 1 || coord.dims()[0] != *name {
                return Err(Error::structure(
                    name.clone(),
                    format!(
                        "coordinate '{}' must be 1-D over the dim of the same name, but has dims ({})",
                        name,
                        coord.dims().join(", ")
                    ),
                ));
            }
        }
        self.try_dims().map(|_| ())
    }

    fn try_dims(&self) -> Result<BTreeMap<String, usize>> {
        let mut dims: BTreeMap<String, usize> = BTreeMap::new();
        for (name, variable) in self.variables.iter().chain(self.coords.iter()) {
            for (dim, extent) in variable.dims().iter().zip(variable.shape()) {
                match dims.get(dim) {
                    Some(existing) if existing != extent => {
                        return Err(Error::arity(format!(
                            "dim '{}' has extent {} in '{}' but {} elsewhere",
                            dim, extent, name, existing
                        )));
                    }
                    Some(_) => {}
                    None => {
                        dims.insert(dim.clone(), *extent);
                    }
                }
            }
        }
        Ok(dims)
    }

    /// Returns the extent of every dim used in this `Dataset`
    pub fn dims(&self) -> BTreeMap<String, usize> {
        // Extents are validated on construction
        self.try_dims().unwrap_or_default()
    }

    /// Returns an error naming the first of the given dims that this `Dataset` does not have
    pub fn require_dims(&self, required: &[&str]) -> Result<()> {
        let dims = self.dims();
        for dim in required {
            if !dims.contains_key(*dim) {
                return Err(Error::structure(
                    *dim,
                    format!(
                        "dataset has dims ({})",
                        dims.keys().cloned().collect::<Vec<_>>().join(", ")
                    ),
                ));
            }
        }
        Ok(())
    }

    pub fn variables(&self) -> &BTreeMap<String, Variable> {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    pub fn coords(&self) -> &BTreeMap<String, Variable> {
        &self.coords
    }

    pub fn coord(&self, name: &str) -> Option<&Variable> {
        self.coords.get(name)
    }

    pub fn attrs(&self) -> &Map<String, Value> {
        &self.attrs
    }

    pub fn into_parts(
        self,
    ) -> (
        BTreeMap<String, Variable>,
        BTreeMap<String, Variable>,
        Map<String, Value>,
    ) {
        (self.variables, self.coords, self.attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use ndarray::{arr1, arr2};

    fn float_var(dims: &[&str], data: ArrayD<f64>) -> Variable {
        Variable::new(dims.iter().copied(), ArrayData::Float(data)).unwrap()
    }

    #[test]
    fn test_dataset_collects_dims() -> Result<()> {
        let mut variables = BTreeMap::new();
        variables.insert(
            "vertex".to_owned(),
            float_var(&["points", "XYZ"], arr2(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]).into_dyn()),
        );
        let mut coords = BTreeMap::new();
        coords.insert("XYZ".to_owned(), Variable::new(["XYZ"], ArrayData::text_1d(["x", "y", "z"]))?);

        let dataset = Dataset::new(variables, coords, Map::new())?;
        let dims = dataset.dims();
        assert_eq!(dims["points"], 2);
        assert_eq!(dims["XYZ"], 3);
        assert!(dataset.require_dims(&["points", "XYZ"]).is_ok());

        let err = dataset.require_dims(&["cell"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structure);
        assert!(err.to_string().contains("'cell'"));
        Ok(())
    }

    #[test]
    fn test_conflicting_extents_are_rejected() {
        let mut variables = BTreeMap::new();
        variables.insert("a".to_owned(), float_var(&["x"], arr1(&[1.0, 2.0]).into_dyn()));
        variables.insert("b".to_owned(), float_var(&["x"], arr1(&[1.0, 2.0, 3.0]).into_dyn()));
        let err = Dataset::new(variables, BTreeMap::new(), Map::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArityMismatch);
    }

    #[test]
    fn test_coordinate_must_be_over_own_dim() {
        let mut coords = BTreeMap::new();
        coords.insert("x".to_owned(), float_var(&["y"], arr1(&[1.0, 2.0]).into_dyn()));
        let err = Dataset::new(BTreeMap::new(), coords, Map::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structure);
    }

    #[test]
    fn test_variable_dims_must_match_ndim() {
        let err = Variable::new(["x"], ArrayData::Float(arr2(&[[1.0]]).into_dyn())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArityMismatch);
    }
}
