use std::{collections::BTreeMap, fmt::Display, io::Cursor};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::warn;
use nalgebra::Point3;
use ndarray::{Array1, ArrayD, IxDyn, ShapeBuilder};
use serde_json::{Map, Value};

use super::binary::{check_payload_length, MemoryOrder, StructuredHeader};
use crate::dataset::{ArrayData, Dataset, Variable};
use crate::math::{quantile, AABB};
use crate::{Error, Result};

/// Name of the primary data variable if none is given explicitly
pub const DEFAULT_PRIMARY_NAME: &str = "data_array";

/// Returns the conventional dim names for an array with `ndim` dimensions: `x`, `x,y` and `x,y,z` for up to three
/// dimensions, `dim0, dim1, ...` beyond that
/// ```
/// # use subsurface_core::containers::default_dims;
/// assert_eq!(default_dims(2), vec!["x", "y"]);
/// assert_eq!(default_dims(4), vec!["dim0", "dim1", "dim2", "dim3"]);
/// ```
pub fn default_dims(ndim: usize) -> Vec<String> {
    match ndim {
        1..=3 => ["x", "y", "z"][..ndim].iter().map(|d| d.to_string()).collect(),
        _ => (0..ndim).map(|idx| format!("dim{}", idx)).collect(),
    }
}

/// A float array over named dims
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    dims: Vec<String>,
    values: ArrayD<f64>,
}

impl DataArray {
    pub fn new<S: Into<String>, I: IntoIterator<Item = S>>(dims: I, values: ArrayD<f64>) -> Result<Self> {
        let dims = dims.into_iter().map(Into::into).collect::<Vec<String>>();
        if dims.len() != values.ndim() {
            return Err(Error::arity(format!(
                "{} dims ({}) given for a {}-dimensional array",
                dims.len(),
                dims.join(", "),
                values.ndim()
            )));
        }
        Ok(Self { dims, values })
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn values(&self) -> &ArrayD<f64> {
        &self.values
    }

    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }
}

/// Which retained value replaces outliers in [`StructuredData::replace_outliers`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceWith {
    /// Largest value that is not an outlier
    Max,
    /// Smallest value that is not an outlier
    Min,
}

/// Named n-dimensional gridded data: one or more co-located float arrays, a coordinate axis per dim, and the name of
/// the primary variable
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredData {
    data_vars: BTreeMap<String, DataArray>,
    coords: BTreeMap<String, Array1<f64>>,
    primary_name: String,
    attrs: Map<String, Value>,
}

impl StructuredData {
    /// Creates a new `StructuredData` from the given parts. Dims without a coordinate get an index coordinate
    /// `0, 1, 2, ...`. Fails if `primary_name` is not a data variable, if variables disagree on the extent of a dim,
    /// or if a coordinate does not match its dim extent
    pub fn new(
        data_vars: BTreeMap<String, DataArray>,
        mut coords: BTreeMap<String, Array1<f64>>,
        primary_name: impl Into<String>,
        attrs: Map<String, Value>,
    ) -> Result<Self> {
        let primary_name = primary_name.into();
        let dims = collect_dims(&data_vars)?;
        for (dim, extent) in &dims {
            coords
                .entry(dim.clone())
                .or_insert_with(|| Array1::from_iter((0..*extent).map(|v| v as f64)));
        }
        let data = Self {
            data_vars,
            coords,
            primary_name,
            attrs,
        };
        data.validate(&dims)?;
        Ok(data)
    }

    /// Creates a `StructuredData` with a single variable whose dims are inferred from its dimensionality (see
    /// [`default_dims`]). The variable becomes the primary variable
    /// ```
    /// # use subsurface_core::containers::StructuredData;
    /// let topo = StructuredData::from_array(ndarray::Array2::<f64>::zeros((3, 4)).into_dyn(), Some("topo")).unwrap();
    /// assert_eq!(topo.primary_name(), "topo");
    /// assert_eq!(topo.dims(), vec![("x".to_string(), 3), ("y".to_string(), 4)]);
    /// ```
    pub fn from_array(values: ArrayD<f64>, name: Option<&str>) -> Result<Self> {
        let dims = default_dims(values.ndim());
        Self::from_array_with_dims(values, &dims, name)
    }

    /// Creates a `StructuredData` with a single variable over the given dims
    pub fn from_array_with_dims<S: AsRef<str>>(
        values: ArrayD<f64>,
        dims: &[S],
        name: Option<&str>,
    ) -> Result<Self> {
        let name = name.unwrap_or(DEFAULT_PRIMARY_NAME);
        let mut data_vars = BTreeMap::new();
        data_vars.insert(
            name.to_owned(),
            DataArray::new(dims.iter().map(|d| d.as_ref().to_owned()), values)?,
        );
        Self::new(data_vars, BTreeMap::new(), name, Map::new())
    }

    /// Creates a `StructuredData` from a mapping of name to array. Dims are inferred per array, so all arrays of the
    /// same dimensionality must have the same shape. If `primary_name` is `None`, the first name in sorted order is used
    pub fn from_arrays(arrays: BTreeMap<String, ArrayD<f64>>, primary_name: Option<&str>) -> Result<Self> {
        let primary_name = match primary_name {
            Some(name) => name.to_owned(),
            None => arrays
                .keys()
                .next()
                .cloned()
                .ok_or_else(|| Error::format("cannot create StructuredData without arrays"))?,
        };
        let data_vars = arrays
            .into_iter()
            .map(|(name, values)| {
                let dims = default_dims(values.ndim());
                Ok((name, DataArray::new(dims, values)?))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;
        Self::new(data_vars, BTreeMap::new(), primary_name, Map::new())
    }

    /// Creates a `StructuredData` from its [`Dataset`] form. All variables must be numeric. If `primary_name` is `None`,
    /// the `primary_name` attribute of the dataset is used, then [`DEFAULT_PRIMARY_NAME`], and finally the only
    /// variable if there is exactly one
    pub fn from_dataset(dataset: Dataset, primary_name: Option<&str>) -> Result<Self> {
        let (variables, coords, mut attrs) = dataset.into_parts();
        let stored_primary = attrs
            .remove("primary_name")
            .and_then(|v| v.as_str().map(str::to_owned));

        let data_vars = variables
            .into_iter()
            .map(|(name, variable)| {
                let values = variable.data().to_f64().ok_or_else(|| {
                    Error::format(format!("data variable '{}' must be numeric", name))
                })?;
                Ok((name, DataArray::new(variable.dims().iter().cloned(), values)?))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;
        let coords = coords
            .into_iter()
            .map(|(name, coord)| {
                let values = coord
                    .data()
                    .to_f64()
                    .ok_or_else(|| Error::format(format!("coordinate '{}' must be numeric", name)))?;
                Ok((name, Array1::from_iter(values.iter().copied())))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        let primary_name = match primary_name.map(str::to_owned).or(stored_primary) {
            Some(name) => name,
            None if data_vars.contains_key(DEFAULT_PRIMARY_NAME) => DEFAULT_PRIMARY_NAME.to_owned(),
            None if data_vars.len() == 1 => data_vars.keys().next().cloned().unwrap_or_default(),
            None => {
                return Err(Error::structure(
                    DEFAULT_PRIMARY_NAME,
                    "dataset has several variables and no primary variable",
                ))
            }
        };
        Self::new(data_vars, coords, primary_name, attrs)
    }

    /// Converts this `StructuredData` into its [`Dataset`] form. The primary name is stored as the `primary_name`
    /// attribute
    pub fn to_dataset(&self) -> Result<Dataset> {
        let variables = self
            .data_vars
            .iter()
            .map(|(name, var)| {
                Ok((
                    name.clone(),
                    Variable::new(var.dims.iter().cloned(), ArrayData::Float(var.values.clone()))?,
                ))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;
        let coords = self
            .coords
            .iter()
            .map(|(name, values)| {
                Ok((
                    name.clone(),
                    Variable::new([name.clone()], ArrayData::Float(values.clone().into_dyn()))?,
                ))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;
        let mut attrs = self.attrs.clone();
        attrs.insert("primary_name".into(), Value::from(self.primary_name.clone()));
        Dataset::new(variables, coords, attrs)
    }

    fn validate(&self, dims: &BTreeMap<String, usize>) -> Result<()> {
        if !self.data_vars.contains_key(&self.primary_name) {
            return Err(Error::structure(
                self.primary_name.clone(),
                format!(
                    "primary variable is not one of the data variables ({})",
                    self.data_vars.keys().cloned().collect::<Vec<_>>().join(", ")
                ),
            ));
        }
        for (dim, coord) in &self.coords {
            if let Some(extent) = dims.get(dim) {
                if coord.len() != *extent {
                    return Err(Error::arity(format!(
                        "coordinate '{}' has {} values but the dim has extent {}",
                        dim,
                        coord.len(),
                        extent
                    )));
                }
            }
        }
        Ok(())
    }

    /// The primary array
    pub fn values(&self) -> &ArrayD<f64> {
        &self.primary().values
    }

    pub fn primary(&self) -> &DataArray {
        // `primary_name` is checked against `data_vars` whenever it changes
        &self.data_vars[&self.primary_name]
    }

    pub fn primary_name(&self) -> &str {
        &self.primary_name
    }

    /// Makes `name` the primary variable. Fails if there is no such variable
    pub fn set_primary_name(&mut self, name: &str) -> Result<()> {
        if !self.data_vars.contains_key(name) {
            return Err(Error::structure(name, "no such data variable"));
        }
        self.primary_name = name.to_owned();
        Ok(())
    }

    /// Returns the data variable called `name`. Fails with a structure error if there is no such variable
    pub fn data_var(&self, name: &str) -> Result<&DataArray> {
        self.data_vars.get(name).ok_or_else(|| {
            Error::structure(
                name,
                format!(
                    "no such data variable, available are ({})",
                    self.data_vars.keys().cloned().collect::<Vec<_>>().join(", ")
                ),
            )
        })
    }

    pub fn data_vars(&self) -> &BTreeMap<String, DataArray> {
        &self.data_vars
    }

    /// Dims of the primary variable with their extents, in axis order
    pub fn dims(&self) -> Vec<(String, usize)> {
        let primary = self.primary();
        primary
            .dims
            .iter()
            .cloned()
            .zip(primary.shape().iter().copied())
            .collect()
    }

    pub fn coords(&self) -> &BTreeMap<String, Array1<f64>> {
        &self.coords
    }

    pub fn coord(&self, dim: &str) -> Option<&Array1<f64>> {
        self.coords.get(dim)
    }

    /// Replaces the coordinate of `dim`. Fails if the length does not match the extent of `dim`
    pub fn with_coord(mut self, dim: &str, values: Array1<f64>) -> Result<Self> {
        self.coords.insert(dim.to_owned(), values);
        let dims = collect_dims(&self.data_vars)?;
        self.validate(&dims)?;
        Ok(self)
    }

    pub fn attrs(&self) -> &Map<String, Value> {
        &self.attrs
    }

    pub fn with_attrs(mut self, attrs: Map<String, Value>) -> Self {
        self.attrs = attrs;
        self
    }

    /// Bounding box spanned by the `x`, `y` and `z` coordinates. A missing `z` coordinate is treated as `0`. Returns
    /// `None` if `x` or `y` are missing or empty
    pub fn bounds(&self) -> Option<AABB<f64>> {
        let range = |dim: &str| -> Option<(f64, f64)> {
            let coord = self.coords.get(dim)?;
            let min = coord.iter().copied().fold(f64::INFINITY, f64::min);
            let max = coord.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if coord.is_empty() {
                None
            } else {
                Some((min, max))
            }
        };
        let (xmin, xmax) = range("x")?;
        let (ymin, ymax) = range("y")?;
        let (zmin, zmax) = range("z").unwrap_or((0.0, 0.0));
        AABB::from_min_max(Point3::new(xmin, ymin, zmin), Point3::new(xmax, ymax, zmax))
    }

    /// Clamps outliers of the variable `name` (the primary variable if `None`) in place. Values whose magnitude is
    /// above the `percentile` quantile of all magnitudes are replaced by the largest (or smallest) retained value.
    /// Returns the number of replaced values. A `percentile` of `1.0` never replaces anything
    pub fn replace_outliers(
        &mut self,
        name: Option<&str>,
        percentile: f64,
        replace_with: ReplaceWith,
    ) -> Result<usize> {
        if !(0.0..=1.0).contains(&percentile) {
            return Err(Error::format(format!(
                "percentile must be within [0, 1], got {}",
                percentile
            )));
        }
        let name = name.unwrap_or(&self.primary_name).to_owned();
        let var = self
            .data_vars
            .get_mut(&name)
            .ok_or_else(|| Error::structure(name.clone(), "no such data variable"))?;

        let magnitudes = var.values.iter().map(|v| v.abs()).collect::<Vec<_>>();
        let threshold = match quantile(&magnitudes, percentile) {
            Some(threshold) => threshold,
            None => return Ok(0),
        };
        let is_outlier = |v: f64| v.abs() > threshold;

        let retained = var.values.iter().copied().filter(|v| !v.is_nan() && !is_outlier(*v));
        let replacement = match replace_with {
            ReplaceWith::Max => retained.fold(f64::NEG_INFINITY, f64::max),
            ReplaceWith::Min => retained.fold(f64::INFINITY, f64::min),
        };

        let mut replaced = 0;
        var.values.mapv_inplace(|v| {
            if is_outlier(v) {
                replaced += 1;
                replacement
            } else {
                v
            }
        });
        if replaced > 0 {
            warn!(
                "Replaced {} outliers of '{}' above {} with {}",
                replaced, name, threshold, replacement
            );
        }
        Ok(replaced)
    }

    /// Encodes the primary variable as little-endian 32-bit floats in the given `order`
    pub fn to_binary(&self, order: MemoryOrder) -> Result<(Vec<u8>, StructuredHeader)> {
        let values = self.values();
        let header = StructuredHeader {
            data_shape: values.shape().to_vec(),
        };
        let mut payload = Vec::with_capacity(header.payload_byte_length()?);
        let ordered: Box<dyn Iterator<Item = &f64>> = match order {
            MemoryOrder::RowMajor => Box::new(values.iter()),
            MemoryOrder::ColumnMajor => Box::new(values.t().into_iter()),
        };
        for value in ordered {
            payload.write_f32::<LittleEndian>(*value as f32)?;
        }
        Ok((payload, header))
    }

    /// Decodes a single-variable `StructuredData` with default dims and index coordinates from a binary payload
    pub fn from_binary(header: &StructuredHeader, payload: &[u8], order: MemoryOrder) -> Result<Self> {
        let byte_length = header.payload_byte_length()?;
        check_payload_length(payload, byte_length)?;
        let mut values = vec![0.0f32; byte_length / 4];
        Cursor::new(payload).read_f32_into::<LittleEndian>(&mut values)?;
        let values = values.into_iter().map(f64::from).collect::<Vec<_>>();
        let shape = IxDyn(&header.data_shape);
        let array = match order {
            MemoryOrder::RowMajor => ArrayD::from_shape_vec(shape, values),
            MemoryOrder::ColumnMajor => ArrayD::from_shape_vec(shape.f(), values),
        }
        .map_err(|e| Error::format(format!("invalid data_shape: {}", e)))?;
        Self::from_array(array, None)
    }
}

impl Display for StructuredData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StructuredData: primary '{}' over (", self.primary_name)?;
        for (idx, (dim, extent)) in self.dims().iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", dim, extent)?;
        }
        write!(f, "), {} variables", self.data_vars.len())
    }
}

fn collect_dims(data_vars: &BTreeMap<String, DataArray>) -> Result<BTreeMap<String, usize>> {
    let mut dims = BTreeMap::new();
    for (name, var) in data_vars {
        for (dim, extent) in var.dims.iter().zip(var.shape()) {
            let existing = *dims.entry(dim.clone()).or_insert(*extent);
            if existing != *extent {
                return Err(Error::arity(format!(
                    "dim '{}' has extent {} in '{}' but {} elsewhere",
                    dim, extent, name, existing
                )));
            }
        }
    }
    Ok(dims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use ndarray::{arr1, Array3};

    #[test]
    fn test_outlier_clamp_max() -> Result<()> {
        let mut topo = StructuredData::from_array(arr1(&[1.0, 2.0, 3.0, 4.0, 100.0]).into_dyn(), Some("topo"))?;
        let replaced = topo.replace_outliers(None, 0.8, ReplaceWith::Max)?;
        assert_eq!(replaced, 1);
        assert_eq!(topo.values().iter().copied().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0, 4.0, 4.0]);
        Ok(())
    }

    #[test]
    fn test_outlier_clamp_min_and_negative_magnitudes() -> Result<()> {
        let mut data = StructuredData::from_array(arr1(&[-100.0, 1.0, 2.0, 3.0, 4.0]).into_dyn(), None)?;
        data.replace_outliers(None, 0.8, ReplaceWith::Min)?;
        assert_eq!(data.values().iter().copied().collect::<Vec<_>>(), vec![1.0, 1.0, 2.0, 3.0, 4.0]);
        Ok(())
    }

    #[test]
    fn test_outlier_clamp_full_percentile_is_noop() -> Result<()> {
        let mut data = StructuredData::from_array(arr1(&[1.0, -50.0, 3.0, 1000.0]).into_dyn(), None)?;
        let before = data.clone();
        assert_eq!(data.replace_outliers(None, 1.0, ReplaceWith::Max)?, 0);
        assert_eq!(data, before);
        Ok(())
    }

    #[test]
    fn test_outlier_clamp_only_touches_selected_variable() -> Result<()> {
        let mut arrays = BTreeMap::new();
        arrays.insert("a".to_owned(), arr1(&[1.0, 2.0, 3.0, 4.0, 100.0]).into_dyn());
        arrays.insert("b".to_owned(), arr1(&[1.0, 2.0, 3.0, 4.0, 100.0]).into_dyn());
        let mut data = StructuredData::from_arrays(arrays, Some("a"))?;
        data.replace_outliers(Some("b"), 0.8, ReplaceWith::Max)?;
        assert_eq!(data.data_var("a")?.values()[4], 100.0);
        assert_eq!(data.data_var("b")?.values()[4], 4.0);
        Ok(())
    }

    #[test]
    fn test_unknown_variable_is_an_error() -> Result<()> {
        let data = StructuredData::from_array(arr1(&[1.0]).into_dyn(), Some("topo"))?;
        assert_eq!(data.data_var("elevation").unwrap_err().kind(), ErrorKind::Structure);
        Ok(())
    }

    #[test]
    fn test_primary_must_exist() {
        let mut arrays = BTreeMap::new();
        arrays.insert("a".to_owned(), arr1(&[1.0]).into_dyn());
        let err = StructuredData::from_arrays(arrays, Some("b")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structure);
    }

    #[test]
    fn test_coordinate_length_must_match() -> Result<()> {
        let data = StructuredData::from_array(Array3::<f64>::zeros((2, 3, 4)).into_dyn(), None)?;
        assert_eq!(data.coord("z").map(|c| c.len()), Some(4));
        let err = data.with_coord("y", arr1(&[0.0, 1.0])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArityMismatch);
        Ok(())
    }

    #[test]
    fn test_high_dimensional_dims() -> Result<()> {
        let data = StructuredData::from_array(ArrayD::zeros(IxDyn(&[1, 2, 3, 4])), None)?;
        let dims = data.dims().into_iter().map(|(d, _)| d).collect::<Vec<_>>();
        assert_eq!(dims, vec!["dim0", "dim1", "dim2", "dim3"]);
        Ok(())
    }

    #[test]
    fn test_binary_round_trip() -> Result<()> {
        let values = Array3::from_shape_fn((2, 3, 4), |(i, j, k)| (i * 100 + j * 10 + k) as f64).into_dyn();
        let data = StructuredData::from_array(values, None)?;
        for order in [MemoryOrder::RowMajor, MemoryOrder::ColumnMajor] {
            let (payload, header) = data.to_binary(order)?;
            assert_eq!(header.data_shape, vec![2, 3, 4]);
            let decoded = StructuredData::from_binary(&header, &payload, order)?;
            assert_eq!(decoded.values(), data.values());
        }
        Ok(())
    }

    #[test]
    fn test_column_major_payload_order() -> Result<()> {
        let data = StructuredData::from_array(ndarray::arr2(&[[1.0, 2.0], [3.0, 4.0]]).into_dyn(), None)?;
        let (payload, _) = data.to_binary(MemoryOrder::ColumnMajor)?;
        let mut values = vec![0.0f32; 4];
        Cursor::new(&payload).read_f32_into::<LittleEndian>(&mut values)?;
        assert_eq!(values, vec![1.0, 3.0, 2.0, 4.0]);
        Ok(())
    }

    #[test]
    fn test_dataset_round_trip() -> Result<()> {
        let data = StructuredData::from_array(Array3::from_elem((2, 2, 2), 7.0).into_dyn(), Some("vp"))?
            .with_coord("x", arr1(&[10.0, 20.0]))?;
        let decoded = StructuredData::from_dataset(data.to_dataset()?, None)?;
        assert_eq!(decoded, data);
        let bounds = decoded.bounds().unwrap();
        assert_eq!(bounds.as_extent(), (10.0, 20.0, 0.0, 1.0, 0.0, 1.0));
        Ok(())
    }
}
