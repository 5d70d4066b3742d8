//! Self-describing dataset archives (`.ssa`).
//!
//! An archive is laid out as follows:
//! - A fixed 16-byte [`ArchiveHeader`] with the magic bytes `ssds`, the format version and the byte lengths of the
//!   two following sections
//! - A JSON header ([`ArchiveJsonHeader`]) that describes every variable and coordinate, padded with spaces to an
//!   8-byte boundary. Text arrays are stored inline in this header
//! - A little-endian body with all numeric arrays as 64-bit floats or integers in row-major order

mod archive_types;
pub use self::archive_types::*;

mod archive_reader;
pub use self::archive_reader::*;

mod archive_writer;
pub use self::archive_writer::*;

mod common;

use std::path::Path;

use subsurface_core::Result;

use crate::base::{Container, StructuredWriter, UnstructuredWriter};

/// The current archive format version
pub const ARCHIVE_VERSION: u32 = 1;

/// Extension of archive files
pub const ARCHIVE_EXTENSION: &str = "ssa";

/// Writes `container` as an archive to `path`
pub fn write_archive<P: AsRef<Path>>(path: P, container: &Container) -> Result<()> {
    let mut writer = ArchiveWriter::from_path(path)?;
    match container {
        Container::Unstructured(data) => {
            writer.write_unstructured(data)?;
            UnstructuredWriter::flush(&mut writer)
        }
        Container::Structured(data) => {
            writer.write_structured(data)?;
            StructuredWriter::flush(&mut writer)
        }
    }
}

/// Reads the container stored in the archive at `path`
pub fn read_archive<P: AsRef<Path>>(path: P) -> Result<Container> {
    ArchiveReader::from_path(path)?.read_container()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{ContainerKind, StructuredReader, UnstructuredReader};
    use serde_json::{json, Map};
    use std::collections::BTreeMap;
    use std::io::Cursor;
    use subsurface_core::containers::{AttributeColumn, AttributeTable, Cells, StructuredData, UnstructuredData};
    use subsurface_core::dataset::{ArrayData, DataType, Dataset, Variable};
    use subsurface_core::ndarray::{arr1, arr2, Array3};
    use subsurface_core::ErrorKind;

    fn borehole_like() -> UnstructuredData {
        let cell_attrs = AttributeTable::from_columns(vec![
            ("lith_code", AttributeColumn::Int(vec![1, 2])),
            ("unit", AttributeColumn::Text(vec!["sand".into(), "clay".into()])),
        ])
        .unwrap();
        let mut attrs = Map::new();
        attrs.insert("cell_attr_map".into(), json!({"lith_code": {"sand": 1, "clay": 2}}));
        UnstructuredData::from_arrays(
            arr2(&[[0.1, 0.2, 100.0], [0.1, 0.2, 70.0], [0.3, 0.2, 40.0]]),
            Cells::Lines,
            Some(cell_attrs),
            None,
        )
        .and_then(|data| data.with_attrs(attrs))
        .unwrap()
    }

    #[test]
    fn test_unstructured_round_trip_is_lossless() -> Result<()> {
        let data = borehole_like();
        let mut writer = ArchiveWriter::from_write(vec![]);
        writer.write_unstructured(&data)?;
        let bytes = writer.into_inner();
        assert_eq!(&bytes[..4], b"ssds");

        let read = ArchiveReader::from_read(Cursor::new(bytes)).read_unstructured()?;
        assert_eq!(read, data);
        Ok(())
    }

    #[test]
    fn test_structured_round_trip_keeps_primary_and_coords() -> Result<()> {
        let data = StructuredData::from_array(Array3::from_elem((2, 3, 1), 1.5).into_dyn(), Some("vp"))?
            .with_coord("y", arr1(&[10.0, 20.0, 30.0]))?;
        let mut writer = ArchiveWriter::from_write(vec![]);
        writer.write_structured(&data)?;

        let read = ArchiveReader::from_read(Cursor::new(writer.into_inner())).read_structured()?;
        assert_eq!(read.primary_name(), "vp");
        assert_eq!(read, data);
        Ok(())
    }

    #[test]
    fn test_legacy_dataset_is_upgraded_on_read() -> Result<()> {
        let mut variables = BTreeMap::new();
        variables.insert(
            "vertex".to_owned(),
            Variable::new(["points", "XYZ"], ArrayData::Float(arr2(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]).into_dyn()))?,
        );
        variables.insert(
            "cells".to_owned(),
            Variable::new(["cell", "nodes"], ArrayData::Int(arr2(&[[0, 1]]).into_dyn()))?,
        );
        variables.insert(
            "attributes".to_owned(),
            Variable::new(["cell", "attribute"], ArrayData::Float(arr2(&[[7.0]]).into_dyn()))?,
        );
        let mut coords = BTreeMap::new();
        coords.insert("attribute".to_owned(), Variable::new(["attribute"], ArrayData::text_1d(["grade"]))?);
        let legacy = Dataset::new(variables, coords, Map::new())?;

        let mut writer = ArchiveWriter::from_write(vec![]);
        writer.write_dataset(crate::base::ContainerKind::Unstructured, None, &legacy)?;
        let data = ArchiveReader::from_read(Cursor::new(writer.into_inner())).read_unstructured()?;
        assert_eq!(
            data.cell_attrs().column("grade").and_then(|c| c.as_float()),
            Some(&[7.0][..])
        );
        assert_eq!(data.vertex_attrs().shape(), (2, 0));
        Ok(())
    }

    #[test]
    fn test_bad_magic_is_a_format_error() -> Result<()> {
        let mut writer = ArchiveWriter::from_write(vec![]);
        writer.write_unstructured(&borehole_like())?;
        let mut bytes = writer.into_inner();
        bytes[0] = b'x';
        let err = ArchiveReader::from_read(Cursor::new(bytes)).read_container().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        Ok(())
    }

    #[test]
    fn test_oversized_variable_shape_is_a_format_error() -> Result<()> {
        let mut variables = BTreeMap::new();
        variables.insert(
            "vertex".to_owned(),
            ArchiveVariable {
                dims: vec!["points".into()],
                shape: vec![1 << 62],
                dtype: DataType::Float64,
                byte_offset: Some(0),
                values: None,
            },
        );
        let json_header = super::common::ser_padded_json(&ArchiveJsonHeader {
            kind: ContainerKind::Unstructured,
            primary_name: None,
            attrs: Map::new(),
            variables,
            coords: BTreeMap::new(),
        })?;
        let header = ArchiveHeader::new(ARCHIVE_VERSION, json_header.len() as u32, 0);
        let mut bytes = bincode::serialize(&header).unwrap();
        bytes.extend_from_slice(&json_header);

        let err = ArchiveReader::from_read(Cursor::new(bytes)).read_container().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.to_string().contains("'vertex'"));
        Ok(())
    }

    #[test]
    fn test_body_is_8_byte_aligned() -> Result<()> {
        let mut writer = ArchiveWriter::from_write(vec![]);
        writer.write_unstructured(&borehole_like())?;
        let bytes = writer.into_inner();
        let header: ArchiveHeader = bincode::deserialize(&bytes[..ArchiveHeader::BYTE_LENGTH]).unwrap();
        assert_eq!(header.json_byte_length % 8, 0);
        assert_eq!(
            bytes.len(),
            ArchiveHeader::BYTE_LENGTH + header.json_byte_length as usize + header.body_byte_length as usize
        );
        Ok(())
    }
}
