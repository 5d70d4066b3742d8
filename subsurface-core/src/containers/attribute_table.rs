use std::fmt::Display;

use ndarray::Array1;

use crate::dataset::{ArrayData, DataType};
use crate::{Error, Result};

/// A single named attribute column. All columns of an [`AttributeTable`] have the same length
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeColumn {
    Float(Vec<f64>),
    Int(Vec<i64>),
    Text(Vec<String>),
}

impl AttributeColumn {
    pub fn len(&self) -> usize {
        match self {
            AttributeColumn::Float(values) => values.len(),
            AttributeColumn::Int(values) => values.len(),
            AttributeColumn::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> DataType {
        match self {
            AttributeColumn::Float(_) => DataType::Float64,
            AttributeColumn::Int(_) => DataType::Int64,
            AttributeColumn::Text(_) => DataType::Str,
        }
    }

    /// Returns the value at `row` as a float. Returns `None` for text columns or if `row` is out of bounds
    pub fn value_as_f64(&self, row: usize) -> Option<f64> {
        match self {
            AttributeColumn::Float(values) => values.get(row).copied(),
            AttributeColumn::Int(values) => values.get(row).map(|v| *v as f64),
            AttributeColumn::Text(_) => None,
        }
    }

    pub fn as_float(&self) -> Option<&[f64]> {
        match self {
            AttributeColumn::Float(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&[i64]> {
        match self {
            AttributeColumn::Int(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&[String]> {
        match self {
            AttributeColumn::Text(values) => Some(values),
            _ => None,
        }
    }

    pub(crate) fn to_array_data(&self) -> ArrayData {
        match self {
            AttributeColumn::Float(values) => ArrayData::Float(Array1::from_vec(values.clone()).into_dyn()),
            AttributeColumn::Int(values) => ArrayData::Int(Array1::from_vec(values.clone()).into_dyn()),
            AttributeColumn::Text(values) => ArrayData::Text(Array1::from_vec(values.clone()).into_dyn()),
        }
    }

    pub(crate) fn from_array_data(data: ArrayData) -> Result<Self> {
        if data.ndim() != 1 {
            return Err(Error::arity(format!(
                "attribute columns must be 1-D, got shape {:?}",
                data.shape()
            )));
        }
        Ok(match data {
            ArrayData::Float(arr) => AttributeColumn::Float(arr.iter().copied().collect()),
            ArrayData::Int(arr) => AttributeColumn::Int(arr.iter().copied().collect()),
            ArrayData::Text(arr) => AttributeColumn::Text(arr.iter().cloned().collect()),
        })
    }
}

impl From<Vec<f64>> for AttributeColumn {
    fn from(values: Vec<f64>) -> Self {
        AttributeColumn::Float(values)
    }
}

impl From<Vec<i64>> for AttributeColumn {
    fn from(values: Vec<i64>) -> Self {
        AttributeColumn::Int(values)
    }
}

impl From<Vec<String>> for AttributeColumn {
    fn from(values: Vec<String>) -> Self {
        AttributeColumn::Text(values)
    }
}

/// Ordered, named attribute columns of uniform length. A table always knows its number of rows, even if it has no
/// columns, so that an empty table still has the shape `(rows, 0)`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeTable {
    n_rows: usize,
    names: Vec<String>,
    columns: Vec<AttributeColumn>,
}

impl AttributeTable {
    /// Creates a table with `n_rows` rows and no columns
    pub fn with_rows(n_rows: usize) -> Self {
        Self {
            n_rows,
            names: vec![],
            columns: vec![],
        }
    }

    /// Creates a table from the given named columns. The number of rows is taken from the first column, all other
    /// columns must have the same length
    /// ```
    /// # use subsurface_core::containers::{AttributeColumn, AttributeTable};
    /// let table = AttributeTable::from_columns(vec![
    ///     ("porosity", AttributeColumn::Float(vec![0.1, 0.2])),
    ///     ("facies", AttributeColumn::Int(vec![1, 3])),
    /// ]).unwrap();
    /// assert_eq!(table.shape(), (2, 2));
    /// ```
    pub fn from_columns<S: Into<String>, I: IntoIterator<Item = (S, AttributeColumn)>>(
        columns: I,
    ) -> Result<Self> {
        let mut columns = columns.into_iter().peekable();
        let n_rows = columns.peek().map(|(_, column)| column.len()).unwrap_or(0);
        columns.try_fold(Self::with_rows(n_rows), |table, (name, column)| {
            table.with_column(name, column)
        })
    }

    /// Appends a column to this table. Fails if the column length does not match the number of rows, or if a
    /// column with the same name already exists
    pub fn with_column<S: Into<String>>(mut self, name: S, column: AttributeColumn) -> Result<Self> {
        let name = name.into();
        if column.len() != self.n_rows {
            return Err(Error::arity(format!(
                "attribute '{}' has {} rows but the table has {}",
                name,
                column.len(),
                self.n_rows
            )));
        }
        if self.names.contains(&name) {
            return Err(Error::format(format!("duplicate attribute name '{}'", name)));
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(self)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Shape of this table as `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.columns.len())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn dtypes(&self) -> Vec<DataType> {
        self.columns.iter().map(AttributeColumn::dtype).collect()
    }

    pub fn column(&self, name: &str) -> Option<&AttributeColumn> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| &self.columns[idx])
    }

    /// Iterator over `(name, column)` pairs in column order
    pub fn columns(&self) -> impl Iterator<Item = (&str, &AttributeColumn)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter())
    }

    /// A column-less table can be stretched to any number of rows, which is what containers do with empty
    /// attribute tables. Tables with columns keep their row count
    pub(crate) fn fit_rows(self, n_rows: usize) -> Self {
        if self.columns.is_empty() {
            Self::with_rows(n_rows)
        } else {
            self
        }
    }
}

impl Display for AttributeTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} rows [", self.n_rows)?;
        for (idx, (name, column)) in self.columns().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, column.dtype())?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_column_length_mismatch() {
        let err = AttributeTable::from_columns(vec![
            ("a", AttributeColumn::Float(vec![1.0, 2.0])),
            ("b", AttributeColumn::Float(vec![1.0])),
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArityMismatch);
    }

    #[test]
    fn test_duplicate_names() {
        let err = AttributeTable::with_rows(1)
            .with_column("a", AttributeColumn::Int(vec![1]))
            .and_then(|t| t.with_column("a", AttributeColumn::Int(vec![2])))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_empty_table_fits_rows() {
        let table = AttributeTable::default().fit_rows(5);
        assert_eq!(table.shape(), (5, 0));
    }

    #[test]
    fn test_display() {
        let table = AttributeTable::from_columns(vec![
            ("id", AttributeColumn::Int(vec![1])),
            ("name", AttributeColumn::Text(vec!["a".into()])),
        ])
        .unwrap();
        assert_eq!(table.to_string(), "1 rows [id: int64, name: str]");
    }
}
