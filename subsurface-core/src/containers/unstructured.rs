use std::{collections::BTreeMap, fmt::Display, io::Cursor};

use byteorder::{LittleEndian, WriteBytesExt};
use ndarray::{Array2, ArrayView2, Axis};
use nalgebra::Point3;
use serde_json::{Map, Value};

use super::binary::{
    check_payload_length, read_f32_matrix, read_i32_matrix, write_f32_matrix, matrix_indices, MemoryOrder,
    StoredMatrix, UnstructuredHeader,
};
use super::{AttributeColumn, AttributeTable};
use crate::dataset::{ArrayData, DataType, Dataset, Variable};
use crate::math::AABB;
use crate::{Error, Result};

/// Names of the variables, dims and coordinates of an [`UnstructuredData`] in its [`Dataset`] form
pub mod names {
    pub const VERTEX: &str = "vertex";
    pub const CELLS: &str = "cells";
    pub const POINTS_DIM: &str = "points";
    pub const CELL_DIM: &str = "cell";
    pub const XYZ_DIM: &str = "XYZ";
    pub const NODES_DIM: &str = "nodes";
    pub const CELL_ATTR_DIM: &str = "cell_attr";
    pub const VERTEX_ATTR_DIM: &str = "vertex_attr";
    /// Prefix of the per-column cell attribute variables, e.g. `cell_attr/lith_code`
    pub const CELL_ATTR_PREFIX: &str = "cell_attr/";
    pub const VERTEX_ATTR_PREFIX: &str = "vertex_attr/";

    pub(crate) const LEGACY_CELL_ATTR_DIM: &str = "attribute";
    pub(crate) const LEGACY_VERTEX_ATTR_DIM: &str = "points_attribute";
    pub(crate) const LEGACY_CELL_ATTRS: &str = "attributes";
    pub(crate) const LEGACY_VERTEX_ATTRS: &str = "points_attributes";
}

/// Allowed number of vertices per cell: point, line, triangle, tetrahedron, hexahedron
pub const VALID_CELL_ARITIES: [usize; 5] = [1, 2, 3, 4, 8];

/// How the cells of an [`UnstructuredData`] are given on construction
#[derive(Debug, Clone, PartialEq)]
pub enum Cells {
    /// Explicit connectivity, one row of vertex indices per cell
    Array(Array2<usize>),
    /// One single-vertex cell per vertex: `cells[i] = [i]`
    Points,
    /// Consecutive vertex pairs: `cells[i] = [i, i + 1]`
    Lines,
}

impl From<Array2<usize>> for Cells {
    fn from(cells: Array2<usize>) -> Self {
        Cells::Array(cells)
    }
}

impl Cells {
    fn expand(self, n_points: usize) -> Array2<usize> {
        match self {
            Cells::Array(cells) => cells,
            Cells::Points => Array2::from_shape_fn((n_points, 1), |(row, _)| row),
            Cells::Lines => {
                Array2::from_shape_fn((n_points.saturating_sub(1), 2), |(row, col)| row + col)
            }
        }
    }
}

/// Vertices, cell connectivity and per-cell/per-vertex attributes bound together as one validated dataset.
///
/// The number of vertices per cell (the cell arity) determines the geometric category: 1 = point cloud, 2 = lines,
/// 3 = triangles, 4 = tetrahedra, 8 = hexahedra. An `UnstructuredData` is a value: it is validated on construction and
/// every modification (e.g. [`with_cell_attrs`](UnstructuredData::with_cell_attrs)) produces a new, re-validated value
#[derive(Debug, Clone, PartialEq)]
pub struct UnstructuredData {
    vertex: Array2<f64>,
    cells: Array2<usize>,
    cell_attrs: AttributeTable,
    vertex_attrs: AttributeTable,
    attrs: Map<String, Value>,
}

impl UnstructuredData {
    /// Creates a new `UnstructuredData` from the given arrays. `vertex` must have shape `(P, 3)`. Missing or
    /// column-less attribute tables become zero-column tables with the matching number of rows
    /// ```
    /// # use subsurface_core::containers::{Cells, UnstructuredData};
    /// # use ndarray::arr2;
    /// let data = UnstructuredData::from_arrays(
    ///     arr2(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]),
    ///     Cells::Lines,
    ///     None,
    ///     None,
    /// ).unwrap();
    /// assert_eq!(data.n_cells(), 2);
    /// assert_eq!(data.cell_attrs().shape(), (2, 0));
    /// ```
    pub fn from_arrays(
        vertex: Array2<f64>,
        cells: Cells,
        cell_attrs: Option<AttributeTable>,
        vertex_attrs: Option<AttributeTable>,
    ) -> Result<Self> {
        let n_points = vertex.nrows();
        let cells = cells.expand(n_points);
        let n_cells = cells.nrows();
        let data = Self {
            vertex,
            cells,
            cell_attrs: cell_attrs.unwrap_or_default().fit_rows(n_cells),
            vertex_attrs: vertex_attrs.unwrap_or_default().fit_rows(n_points),
            attrs: Map::new(),
        };
        data.validate()?;
        Ok(data)
    }

    /// Creates a new `UnstructuredData` from its [`Dataset`] form. Datasets written with the legacy attribute names
    /// are upgraded once; if that is not possible, a `LegacyUpgrade` error is returned
    pub fn from_dataset(dataset: Dataset) -> Result<Self> {
        if is_legacy_dataset(&dataset) {
            let upgraded = upgrade_legacy_dataset(dataset)
                .map_err(|e| Error::LegacyUpgrade(e.to_string()))?;
            return Self::from_canonical_dataset(upgraded)
                .map_err(|e| Error::LegacyUpgrade(e.to_string()));
        }
        Self::from_canonical_dataset(dataset)
    }

    fn from_canonical_dataset(dataset: Dataset) -> Result<Self> {
        dataset.require_dims(&[
            names::POINTS_DIM,
            names::CELL_DIM,
            names::VERTEX_ATTR_DIM,
            names::CELL_ATTR_DIM,
        ])?;

        let vertex = dataset
            .variable(names::VERTEX)
            .ok_or_else(|| Error::structure(names::VERTEX, "dataset has no vertex variable"))?;
        expect_leading_dim(vertex, names::VERTEX, names::POINTS_DIM)?;
        let vertex = vertex
            .data()
            .to_f64()
            .ok_or_else(|| Error::format("vertex variable must be numeric"))?
            .into_dimensionality::<ndarray::Ix2>()
            .map_err(|e| Error::arity(format!("vertex variable is not 2-D: {}", e)))?;

        let cells = dataset
            .variable(names::CELLS)
            .ok_or_else(|| Error::structure(names::CELLS, "dataset has no cells variable"))?;
        expect_leading_dim(cells, names::CELLS, names::CELL_DIM)?;
        let cells = cells_from_array_data(cells.data())?;

        let cell_attrs = attribute_table_from_dataset(
            &dataset,
            names::CELL_ATTR_DIM,
            names::CELL_ATTR_PREFIX,
            names::CELL_DIM,
        )?;
        let vertex_attrs = attribute_table_from_dataset(
            &dataset,
            names::VERTEX_ATTR_DIM,
            names::VERTEX_ATTR_PREFIX,
            names::POINTS_DIM,
        )?;

        let (_, _, attrs) = dataset.into_parts();
        Self::from_arrays(vertex, Cells::Array(cells), Some(cell_attrs), Some(vertex_attrs))?
            .with_attrs(attrs)
    }

    /// Converts this `UnstructuredData` into its [`Dataset`] form
    pub fn to_dataset(&self) -> Result<Dataset> {
        let mut variables = BTreeMap::new();
        variables.insert(
            names::VERTEX.to_owned(),
            Variable::new(
                [names::POINTS_DIM, names::XYZ_DIM],
                ArrayData::Float(self.vertex.clone().into_dyn()),
            )?,
        );
        variables.insert(
            names::CELLS.to_owned(),
            Variable::new(
                [names::CELL_DIM, names::NODES_DIM],
                ArrayData::Int(self.cells.mapv(|idx| idx as i64).into_dyn()),
            )?,
        );
        for (prefix, dim, table) in [
            (names::CELL_ATTR_PREFIX, names::CELL_DIM, &self.cell_attrs),
            (names::VERTEX_ATTR_PREFIX, names::POINTS_DIM, &self.vertex_attrs),
        ] {
            for (name, column) in table.columns() {
                variables.insert(
                    format!("{}{}", prefix, name),
                    Variable::new([dim], column.to_array_data())?,
                );
            }
        }

        let mut coords = BTreeMap::new();
        coords.insert(
            names::XYZ_DIM.to_owned(),
            Variable::new([names::XYZ_DIM], ArrayData::text_1d(["x", "y", "z"]))?,
        );
        coords.insert(
            names::CELL_ATTR_DIM.to_owned(),
            Variable::new(
                [names::CELL_ATTR_DIM],
                ArrayData::text_1d(self.cell_attrs.names().iter().cloned()),
            )?,
        );
        coords.insert(
            names::VERTEX_ATTR_DIM.to_owned(),
            Variable::new(
                [names::VERTEX_ATTR_DIM],
                ArrayData::text_1d(self.vertex_attrs.names().iter().cloned()),
            )?,
        );

        Dataset::new(variables, coords, self.attrs.clone())
    }

    fn validate(&self) -> Result<()> {
        if self.vertex.ncols() != 3 {
            return Err(Error::arity(format!(
                "vertex must have shape (P, 3), got {:?}",
                self.vertex.shape()
            )));
        }
        let n_points = self.n_points();
        if self.n_cells() > 0 && !VALID_CELL_ARITIES.contains(&self.cell_arity()) {
            return Err(Error::arity(format!(
                "cell arity {} is none of {:?}",
                self.cell_arity(),
                VALID_CELL_ARITIES
            )));
        }
        if let Some(max_index) = self.cells.iter().max() {
            if *max_index >= n_points {
                return Err(Error::arity(format!(
                    "cell references vertex {} but there are only {} vertices",
                    max_index, n_points
                )));
            }
        }
        if self.cell_attrs.n_rows() != self.n_cells() {
            return Err(Error::arity(format!(
                "cell attributes have {} rows but there are {} cells",
                self.cell_attrs.n_rows(),
                self.n_cells()
            )));
        }
        if self.vertex_attrs.n_rows() != n_points {
            return Err(Error::arity(format!(
                "vertex attributes have {} rows but there are {} vertices",
                self.vertex_attrs.n_rows(),
                n_points
            )));
        }
        Ok(())
    }

    /// Returns a copy of this container with the given cell attributes
    pub fn with_cell_attrs(mut self, cell_attrs: AttributeTable) -> Result<Self> {
        self.cell_attrs = cell_attrs.fit_rows(self.n_cells());
        self.validate()?;
        Ok(self)
    }

    /// Returns a copy of this container with the given vertex attributes
    pub fn with_vertex_attrs(mut self, vertex_attrs: AttributeTable) -> Result<Self> {
        self.vertex_attrs = vertex_attrs.fit_rows(self.n_points());
        self.validate()?;
        Ok(self)
    }

    /// Returns a copy of this container with the given container-level attributes
    pub fn with_attrs(mut self, attrs: Map<String, Value>) -> Result<Self> {
        self.attrs = attrs;
        self.validate()?;
        Ok(self)
    }

    pub fn vertex(&self) -> ArrayView2<'_, f64> {
        self.vertex.view()
    }

    pub fn cells(&self) -> ArrayView2<'_, usize> {
        self.cells.view()
    }

    pub fn cell_attrs(&self) -> &AttributeTable {
        &self.cell_attrs
    }

    pub fn vertex_attrs(&self) -> &AttributeTable {
        &self.vertex_attrs
    }

    pub fn attrs(&self) -> &Map<String, Value> {
        &self.attrs
    }

    pub fn n_points(&self) -> usize {
        self.vertex.nrows()
    }

    pub fn n_cells(&self) -> usize {
        self.cells.nrows()
    }

    /// Number of vertices per cell
    pub fn cell_arity(&self) -> usize {
        self.cells.ncols()
    }

    /// Returns the vertex at `index` as a point
    pub fn point(&self, index: usize) -> Option<Point3<f64>> {
        if index >= self.n_points() {
            return None;
        }
        let row = self.vertex.row(index);
        Some(Point3::new(row[0], row[1], row[2]))
    }

    /// Bounding box of all vertices. Returns `None` if there are no vertices
    pub fn bounds(&self) -> Option<AABB<f64>> {
        let points = (0..self.n_points())
            .filter_map(|idx| self.point(idx))
            .collect::<Vec<_>>();
        AABB::from_points(points.iter())
    }

    /// Extent of all vertices as `(xmin, xmax, ymin, ymax, zmin, zmax)`. Returns `None` if there are no vertices
    pub fn extent(&self) -> Option<(f64, f64, f64, f64, f64, f64)> {
        self.bounds().map(|bounds| bounds.as_extent())
    }

    /// Encodes this container as a binary payload and its JSON header. The payload is `vertex`, `cells`,
    /// `cell_attrs` and `vertex_attrs` in that order, each written in the given `order`. Text attributes cannot be
    /// represented in the payload and cause a format error
    pub fn to_binary(&self, order: MemoryOrder) -> Result<(Vec<u8>, UnstructuredHeader)> {
        for (name, column) in self.cell_attrs.columns().chain(self.vertex_attrs.columns()) {
            if !column.dtype().is_numeric() {
                return Err(Error::format(format!(
                    "attribute '{}' is text and cannot be written as float32",
                    name
                )));
            }
        }

        let header = UnstructuredHeader {
            vertex_shape: [self.n_points(), 3],
            cell_shape: [self.n_cells(), self.cell_arity()],
            cell_attr_shape: [self.cell_attrs.n_rows(), self.cell_attrs.n_columns()],
            vertex_attr_shape: [self.vertex_attrs.n_rows(), self.vertex_attrs.n_columns()],
            cell_attr_names: self.cell_attrs.names().to_vec(),
            cell_attr_types: self.cell_attrs.dtypes(),
            vertex_attr_names: self.vertex_attrs.names().to_vec(),
            vertex_attr_types: self.vertex_attrs.dtypes(),
            attrs: self.attrs.clone(),
        };

        let mut payload = Vec::with_capacity(header.payload_byte_length()?);
        write_f32_matrix(&mut payload, self.n_points(), 3, order, |r, c| self.vertex[[r, c]])?;
        for (row, col) in matrix_indices(self.n_cells(), self.cell_arity(), order) {
            let index = i32::try_from(self.cells[[row, col]])
                .map_err(|_| Error::format("cell index does not fit into int32"))?;
            payload.write_i32::<LittleEndian>(index)?;
        }
        for table in [&self.cell_attrs, &self.vertex_attrs] {
            let columns = table.columns().map(|(_, column)| column).collect::<Vec<_>>();
            write_f32_matrix(&mut payload, table.n_rows(), table.n_columns(), order, |r, c| {
                columns[c].value_as_f64(r).unwrap_or(f64::NAN)
            })?;
        }

        Ok((payload, header))
    }

    /// Decodes a container from the binary payload and header produced by [`to_binary`](UnstructuredData::to_binary).
    /// `order` must be the same order that was used for encoding
    pub fn from_binary(header: &UnstructuredHeader, payload: &[u8], order: MemoryOrder) -> Result<Self> {
        check_header_consistency(header)?;
        check_payload_length(payload, header.payload_byte_length()?)?;

        let mut reader = Cursor::new(payload);
        let vertex = read_f32_matrix(&mut reader, header.vertex_shape, order)?;
        let cells = read_i32_matrix(&mut reader, header.cell_shape, order)?;
        let cell_attrs = read_f32_matrix(&mut reader, header.cell_attr_shape, order)?;
        let vertex_attrs = read_f32_matrix(&mut reader, header.vertex_attr_shape, order)?;

        let vertex = Array2::from_shape_fn((header.vertex_shape[0], 3), |(r, c)| vertex.get(r, c) as f64);
        let cells = {
            let mut values = Array2::zeros((header.cell_shape[0], header.cell_shape[1]));
            for ((r, c), value) in values.indexed_iter_mut() {
                *value = usize::try_from(cells.get(r, c))
                    .map_err(|_| Error::arity("negative cell index in binary payload"))?;
            }
            values
        };
        let cell_attrs = attribute_table_from_matrix(
            &cell_attrs,
            header.cell_attr_shape[0],
            &header.cell_attr_names,
            &header.cell_attr_types,
        )?;
        let vertex_attrs = attribute_table_from_matrix(
            &vertex_attrs,
            header.vertex_attr_shape[0],
            &header.vertex_attr_names,
            &header.vertex_attr_types,
        )?;

        Self::from_arrays(vertex, Cells::Array(cells), Some(cell_attrs), Some(vertex_attrs))?
            .with_attrs(header.attrs.clone())
    }
}

impl Display for UnstructuredData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "UnstructuredData: {} vertices, {} cells of arity {}",
            self.n_points(),
            self.n_cells(),
            self.cell_arity()
        )?;
        if let Some((xmin, xmax, ymin, ymax, zmin, zmax)) = self.extent() {
            writeln!(
                f,
                "\textent: x [{}, {}] y [{}, {}] z [{}, {}]",
                xmin, xmax, ymin, ymax, zmin, zmax
            )?;
        }
        writeln!(f, "\tcell attributes: {}", self.cell_attrs)?;
        write!(f, "\tvertex attributes: {}", self.vertex_attrs)
    }
}

fn check_header_consistency(header: &UnstructuredHeader) -> Result<()> {
    if header.vertex_shape[1] != 3 {
        return Err(Error::format(format!(
            "vertex_shape must be (P, 3), got {:?}",
            header.vertex_shape
        )));
    }
    for (what, shape, names, types) in [
        ("cell", header.cell_attr_shape, &header.cell_attr_names, &header.cell_attr_types),
        ("vertex", header.vertex_attr_shape, &header.vertex_attr_names, &header.vertex_attr_types),
    ] {
        if names.len() != shape[1] || types.len() != shape[1] {
            return Err(Error::format(format!(
                "{} attribute shape {:?} does not match {} names and {} types",
                what,
                shape,
                names.len(),
                types.len()
            )));
        }
    }
    Ok(())
}

fn attribute_table_from_matrix(
    matrix: &StoredMatrix<f32>,
    n_rows: usize,
    names: &[String],
    types: &[DataType],
) -> Result<AttributeTable> {
    names
        .iter()
        .zip(types)
        .enumerate()
        .try_fold(AttributeTable::with_rows(n_rows), |table, (col, (name, dtype))| {
            let column = match dtype {
                DataType::Float64 => {
                    AttributeColumn::Float((0..n_rows).map(|r| matrix.get(r, col) as f64).collect())
                }
                DataType::Int64 => AttributeColumn::Int(
                    (0..n_rows)
                        .map(|r| matrix.get(r, col).round() as i64)
                        .collect(),
                ),
                DataType::Str => {
                    return Err(Error::format(format!(
                        "attribute '{}' is declared as text, which the binary payload cannot hold",
                        name
                    )))
                }
            };
            table.with_column(name.clone(), column)
        })
}

fn expect_leading_dim(variable: &Variable, name: &str, dim: &str) -> Result<()> {
    if variable.dims().len() != 2 || variable.dims()[0] != dim {
        return Err(Error::structure(
            dim,
            format!(
                "variable '{}' must have dims ({}, _), got ({})",
                name,
                dim,
                variable.dims().join(", ")
            ),
        ));
    }
    Ok(())
}

fn cells_from_array_data(data: &ArrayData) -> Result<Array2<usize>> {
    let as_index = |value: f64| -> Result<usize> {
        if value < 0.0 || value.fract() != 0.0 || !value.is_finite() {
            return Err(Error::arity(format!("invalid cell index {}", value)));
        }
        Ok(value as usize)
    };
    let values = match data {
        ArrayData::Int(arr) => arr
            .iter()
            .map(|v| usize::try_from(*v).map_err(|_| Error::arity(format!("invalid cell index {}", v))))
            .collect::<Result<Vec<_>>>()?,
        ArrayData::Float(arr) => arr.iter().map(|v| as_index(*v)).collect::<Result<Vec<_>>>()?,
        ArrayData::Text(_) => return Err(Error::format("cells variable must be numeric")),
    };
    let shape = data.shape();
    Array2::from_shape_vec((shape[0], shape[1]), values)
        .map_err(|e| Error::arity(format!("cells variable is not 2-D: {}", e)))
}

fn attribute_table_from_dataset(
    dataset: &Dataset,
    names_dim: &str,
    prefix: &str,
    rows_dim: &str,
) -> Result<AttributeTable> {
    let n_rows = dataset.dims().get(rows_dim).copied().unwrap_or(0);
    let column_names = match dataset.coord(names_dim).map(Variable::data) {
        Some(ArrayData::Text(names)) => names.iter().cloned().collect::<Vec<_>>(),
        Some(_) => {
            return Err(Error::format(format!(
                "coordinate '{}' must hold attribute names",
                names_dim
            )))
        }
        None => vec![],
    };

    column_names
        .into_iter()
        .try_fold(AttributeTable::with_rows(n_rows), |table, name| {
            let variable_name = format!("{}{}", prefix, name);
            let variable = dataset.variable(&variable_name).ok_or_else(|| {
                Error::structure(
                    names_dim,
                    format!("attribute '{}' has no variable '{}'", name, variable_name),
                )
            })?;
            if variable.dims() != [rows_dim] {
                return Err(Error::structure(
                    rows_dim,
                    format!("attribute variable '{}' must be 1-D over '{}'", variable_name, rows_dim),
                ));
            }
            table.with_column(name, AttributeColumn::from_array_data(variable.data().clone())?)
        })
}

fn is_legacy_dataset(dataset: &Dataset) -> bool {
    let dims = dataset.dims();
    dataset.variable(names::LEGACY_CELL_ATTRS).is_some()
        || dataset.variable(names::LEGACY_VERTEX_ATTRS).is_some()
        || dims.contains_key(names::LEGACY_CELL_ATTR_DIM)
        || dims.contains_key(names::LEGACY_VERTEX_ATTR_DIM)
}

/// Splits the 2-D legacy attribute matrices into one variable per column and renames the legacy axes
fn upgrade_legacy_dataset(dataset: Dataset) -> Result<Dataset> {
    let dims = dataset.dims();
    let (mut variables, mut coords, attrs) = dataset.into_parts();

    for (legacy_var, legacy_dim, rows_dim, new_dim, prefix) in [
        (
            names::LEGACY_CELL_ATTRS,
            names::LEGACY_CELL_ATTR_DIM,
            names::CELL_DIM,
            names::CELL_ATTR_DIM,
            names::CELL_ATTR_PREFIX,
        ),
        (
            names::LEGACY_VERTEX_ATTRS,
            names::LEGACY_VERTEX_ATTR_DIM,
            names::POINTS_DIM,
            names::VERTEX_ATTR_DIM,
            names::VERTEX_ATTR_PREFIX,
        ),
    ] {
        let legacy_names = coords.remove(legacy_dim);
        let matrix = match variables.remove(legacy_var) {
            Some(matrix) => matrix,
            None => {
                if dims.get(legacy_dim).copied().unwrap_or(0) > 0 {
                    return Err(Error::format(format!(
                        "legacy axis '{}' has entries but there is no '{}' variable",
                        legacy_dim, legacy_var
                    )));
                }
                coords.insert(
                    new_dim.to_owned(),
                    Variable::new([new_dim], ArrayData::text_1d(Vec::<String>::new()))?,
                );
                continue;
            }
        };
        if matrix.dims().len() != 2 || matrix.dims()[0] != rows_dim {
            return Err(Error::format(format!(
                "legacy variable '{}' must have dims ({}, {}), got ({})",
                legacy_var,
                rows_dim,
                legacy_dim,
                matrix.dims().join(", ")
            )));
        }

        let n_columns = matrix.shape()[1];
        let column_names = match legacy_names.map(Variable::into_data) {
            Some(ArrayData::Text(names)) if names.len() == n_columns => names.iter().cloned().collect(),
            Some(ArrayData::Text(names)) => {
                return Err(Error::format(format!(
                    "legacy axis '{}' names {} attributes but '{}' has {} columns",
                    legacy_dim,
                    names.len(),
                    legacy_var,
                    n_columns
                )))
            }
            _ => (0..n_columns).map(|idx| idx.to_string()).collect::<Vec<_>>(),
        };

        for (col, name) in column_names.iter().enumerate() {
            let column = match matrix.data() {
                ArrayData::Float(arr) => ArrayData::Float(arr.index_axis(Axis(1), col).to_owned()),
                ArrayData::Int(arr) => ArrayData::Int(arr.index_axis(Axis(1), col).to_owned()),
                ArrayData::Text(arr) => ArrayData::Text(arr.index_axis(Axis(1), col).to_owned()),
            };
            variables.insert(format!("{}{}", prefix, name), Variable::new([rows_dim], column)?);
        }
        coords.insert(
            new_dim.to_owned(),
            Variable::new([new_dim], ArrayData::text_1d(column_names))?,
        );
    }

    Dataset::new(variables, coords, attrs)
}
