//! Headers and payload helpers for the binary pair format: a JSON header that enumerates the shape and type of every
//! sub-array, and a little-endian payload that is split by the shapes the header declares.

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use itertools::{iproduct, Either};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dataset::DataType;
use crate::{Error, Result};

/// Order in which the elements of multi-dimensional arrays are written to a binary payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemoryOrder {
    /// Last index varies fastest (C order)
    #[default]
    RowMajor,
    /// First index varies fastest (Fortran order)
    ColumnMajor,
}

/// JSON header of a binary [`UnstructuredData`](super::UnstructuredData) payload. The payload is the concatenation of
/// `vertex`, `cells`, `cell_attrs` and `vertex_attrs`. Vertex and attribute blocks are 32-bit floats, cells are 32-bit
/// signed integers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnstructuredHeader {
    pub vertex_shape: [usize; 2],
    pub cell_shape: [usize; 2],
    pub cell_attr_shape: [usize; 2],
    pub vertex_attr_shape: [usize; 2],
    pub cell_attr_names: Vec<String>,
    pub cell_attr_types: Vec<DataType>,
    pub vertex_attr_names: Vec<String>,
    pub vertex_attr_types: Vec<DataType>,
    /// Container-level attributes, passed through unchanged
    #[serde(default)]
    pub attrs: Map<String, Value>,
}

impl UnstructuredHeader {
    /// Number of bytes of the payload that this header describes. Fails with a format error if the shapes describe
    /// more bytes than fit into memory
    pub fn payload_byte_length(&self) -> Result<usize> {
        [
            ("vertex", self.vertex_shape),
            ("cells", self.cell_shape),
            ("cell_attrs", self.cell_attr_shape),
            ("vertex_attrs", self.vertex_attr_shape),
        ]
        .iter()
        .try_fold(0usize, |total, (name, shape)| {
            let block = byte_length(name, shape, 4)?;
            total
                .checked_add(block)
                .ok_or_else(|| Error::format("binary header describes more bytes than fit into memory"))
        })
    }
}

/// JSON header of a binary [`StructuredData`](super::StructuredData) payload, which holds the primary variable as
/// 32-bit floats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredHeader {
    pub data_shape: Vec<usize>,
}

impl StructuredHeader {
    pub fn payload_byte_length(&self) -> Result<usize> {
        byte_length("data", &self.data_shape, 4)
    }
}

/// Number of bytes of an array with the given `shape` and element size
pub(crate) fn byte_length(name: &str, shape: &[usize], element_size: usize) -> Result<usize> {
    shape
        .iter()
        .try_fold(element_size, |bytes, extent| bytes.checked_mul(*extent))
        .ok_or_else(|| Error::format(format!("shape {:?} of '{}' is too large", shape, name)))
}

/// Returns the `(row, column)` indices of a `rows x cols` matrix in the order given by `order`
pub(crate) fn matrix_indices(
    rows: usize,
    cols: usize,
    order: MemoryOrder,
) -> impl Iterator<Item = (usize, usize)> {
    match order {
        MemoryOrder::RowMajor => Either::Left(iproduct!(0..rows, 0..cols)),
        MemoryOrder::ColumnMajor => Either::Right(iproduct!(0..cols, 0..rows).map(|(c, r)| (r, c))),
    }
}

/// Writes the `rows x cols` matrix defined by `value` as little-endian 32-bit floats
pub(crate) fn write_f32_matrix<F: Fn(usize, usize) -> f64>(
    payload: &mut Vec<u8>,
    rows: usize,
    cols: usize,
    order: MemoryOrder,
    value: F,
) -> Result<()> {
    for (row, col) in matrix_indices(rows, cols, order) {
        payload.write_f32::<LittleEndian>(value(row, col) as f32)?;
    }
    Ok(())
}

/// Dense matrix read from a binary payload, indexable as `(row, column)` regardless of the order it was stored in
pub(crate) struct StoredMatrix<T> {
    values: Vec<T>,
    rows: usize,
    cols: usize,
    order: MemoryOrder,
}

impl<T: Copy> StoredMatrix<T> {
    pub fn get(&self, row: usize, col: usize) -> T {
        match self.order {
            MemoryOrder::RowMajor => self.values[row * self.cols + col],
            MemoryOrder::ColumnMajor => self.values[col * self.rows + row],
        }
    }
}

pub(crate) fn read_f32_matrix<R: Read>(
    reader: &mut R,
    [rows, cols]: [usize; 2],
    order: MemoryOrder,
) -> Result<StoredMatrix<f32>> {
    let mut values = vec![0.0f32; byte_length("matrix", &[rows, cols], 4)? / 4];
    reader.read_f32_into::<LittleEndian>(&mut values)?;
    Ok(StoredMatrix {
        values,
        rows,
        cols,
        order,
    })
}

pub(crate) fn read_i32_matrix<R: Read>(
    reader: &mut R,
    [rows, cols]: [usize; 2],
    order: MemoryOrder,
) -> Result<StoredMatrix<i32>> {
    let mut values = vec![0i32; byte_length("matrix", &[rows, cols], 4)? / 4];
    reader.read_i32_into::<LittleEndian>(&mut values)?;
    Ok(StoredMatrix {
        values,
        rows,
        cols,
        order,
    })
}

/// Fails with a format error if `payload` does not have exactly `expected` bytes
pub(crate) fn check_payload_length(payload: &[u8], expected: usize) -> Result<()> {
    if payload.len() != expected {
        return Err(Error::format(format!(
            "binary payload has {} bytes but its header describes {} bytes",
            payload.len(),
            expected
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use std::io::Cursor;

    #[test]
    fn test_matrix_indices_order() {
        let row_major = matrix_indices(2, 3, MemoryOrder::RowMajor).collect::<Vec<_>>();
        assert_eq!(row_major, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
        let col_major = matrix_indices(2, 3, MemoryOrder::ColumnMajor).collect::<Vec<_>>();
        assert_eq!(col_major, vec![(0, 0), (1, 0), (0, 1), (1, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_stored_matrix_indexing() -> Result<()> {
        for order in [MemoryOrder::RowMajor, MemoryOrder::ColumnMajor] {
            let mut payload = vec![];
            write_f32_matrix(&mut payload, 2, 3, order, |r, c| (r * 10 + c) as f64)?;
            let matrix = read_f32_matrix(&mut Cursor::new(&payload), [2, 3], order)?;
            assert_eq!(matrix.get(1, 2), 12.0);
            assert_eq!(matrix.get(0, 1), 1.0);
        }
        Ok(())
    }

    #[test]
    fn test_oversized_shape_is_a_format_error() {
        let header = StructuredHeader {
            data_shape: vec![1 << 62, 8],
        };
        assert_eq!(header.payload_byte_length().unwrap_err().kind(), ErrorKind::Format);
        assert_eq!(byte_length("a", &[usize::MAX, 0], 4).unwrap(), 0);
    }

    #[test]
    fn test_header_keys() {
        let header = UnstructuredHeader {
            vertex_shape: [2, 3],
            cell_shape: [1, 2],
            cell_attr_shape: [1, 0],
            vertex_attr_shape: [2, 0],
            cell_attr_names: vec![],
            cell_attr_types: vec![],
            vertex_attr_names: vec![],
            vertex_attr_types: vec![],
            attrs: Map::new(),
        };
        assert_eq!(header.payload_byte_length().unwrap(), 2 * 3 * 4 + 2 * 4);
        let json = serde_json::to_value(&header).unwrap();
        assert_eq!(json["vertex_shape"], serde_json::json!([2, 3]));
    }
}
