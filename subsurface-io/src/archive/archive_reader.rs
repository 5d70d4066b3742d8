use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, Cursor, Read},
    path::Path,
};

use byteorder::{LittleEndian, ReadBytesExt};
use log::debug;
use subsurface_core::containers::{StructuredData, UnstructuredData};
use subsurface_core::dataset::{ArrayData, DataType, Dataset, Variable};
use subsurface_core::ndarray::{ArrayD, IxDyn, ShapeError};
use subsurface_core::{Error, Result};

use super::common::deser_padded_json;
use super::{ArchiveHeader, ArchiveJsonHeader, ArchiveVariable};
use crate::base::{Container, ContainerKind, StructuredReader, UnstructuredReader};

/// Contents of an archive: the stored dataset plus what is needed to turn it back into a container
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveContents {
    pub kind: ContainerKind,
    pub primary_name: Option<String>,
    pub dataset: Dataset,
}

impl ArchiveContents {
    /// Converts the stored dataset back into its container. Unstructured datasets in the legacy layout are upgraded
    pub fn into_container(self) -> Result<Container> {
        match self.kind {
            ContainerKind::Unstructured => Ok(UnstructuredData::from_dataset(self.dataset)?.into()),
            ContainerKind::Structured => {
                Ok(StructuredData::from_dataset(self.dataset, self.primary_name.as_deref())?.into())
            }
        }
    }
}

/// Reader for self-describing archives
pub struct ArchiveReader<R: Read> {
    reader: R,
}

impl<R: Read> ArchiveReader<R> {
    pub fn from_read(reader: R) -> Self {
        Self { reader }
    }

    /// Reads the dataset stored in the archive
    pub fn read_contents(&mut self) -> Result<ArchiveContents> {
        let header: ArchiveHeader = bincode::deserialize_from(&mut self.reader)
            .map_err(|e| Error::format(format!("could not read archive header: {}", e)))?;
        header.verify()?;

        let json_header: ArchiveJsonHeader =
            deser_padded_json(&mut self.reader, header.json_byte_length as usize)?;
        let mut body = vec![0; header.body_byte_length as usize];
        self.reader.read_exact(&mut body)?;
        debug!(
            "Read {} archive with {} variables and {} body bytes",
            json_header.kind,
            json_header.variables.len(),
            body.len()
        );

        let variables = decode_variables(&json_header.variables, &body)?;
        let coords = decode_variables(&json_header.coords, &body)?;
        Ok(ArchiveContents {
            kind: json_header.kind,
            primary_name: json_header.primary_name,
            dataset: Dataset::new(variables, coords, json_header.attrs)?,
        })
    }

    pub fn read_container(&mut self) -> Result<Container> {
        self.read_contents()?.into_container()
    }
}

impl ArchiveReader<BufReader<File>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_read(BufReader::new(File::open(path)?)))
    }
}

impl<R: Read> UnstructuredReader for ArchiveReader<R> {
    fn read_unstructured(&mut self) -> Result<UnstructuredData> {
        self.read_container()?.into_unstructured()
    }
}

impl<R: Read> StructuredReader for ArchiveReader<R> {
    fn read_structured(&mut self) -> Result<StructuredData> {
        self.read_container()?.into_structured()
    }
}

fn decode_variables(
    entries: &BTreeMap<String, ArchiveVariable>,
    body: &[u8],
) -> Result<BTreeMap<String, Variable>> {
    entries
        .iter()
        .map(|(name, entry)| {
            let data = decode_array(name, entry, body)?;
            Ok((name.clone(), Variable::new(entry.dims.iter().cloned(), data)?))
        })
        .collect()
}

fn decode_array(name: &str, entry: &ArchiveVariable, body: &[u8]) -> Result<ArrayData> {
    let shape = IxDyn(&entry.shape);
    let too_large = || Error::format(format!("variable '{}' has a shape that is too large: {:?}", name, entry.shape));
    let n_elements = entry.n_elements().ok_or_else(too_large)?;
    let shape_error = |e: ShapeError| Error::format(format!("variable '{}' has an invalid shape: {}", name, e));

    if entry.dtype == DataType::Str {
        let values = entry
            .values
            .clone()
            .ok_or_else(|| Error::format(format!("text variable '{}' has no inline values", name)))?;
        return Ok(ArrayData::Text(ArrayD::from_shape_vec(shape, values).map_err(shape_error)?));
    }

    let offset = entry
        .byte_offset
        .ok_or_else(|| Error::format(format!("numeric variable '{}' has no byte_offset", name)))?;
    let end = n_elements
        .checked_mul(8)
        .and_then(|length| offset.checked_add(length))
        .ok_or_else(too_large)?;
    let bytes = body.get(offset..end).ok_or_else(|| {
        Error::format(format!(
            "variable '{}' spans bytes {}..{} but the body has {} bytes",
            name,
            offset,
            end,
            body.len()
        ))
    })?;
    let mut cursor = Cursor::new(bytes);
    match entry.dtype {
        DataType::Int64 => {
            let mut values = vec![0i64; n_elements];
            cursor.read_i64_into::<LittleEndian>(&mut values)?;
            Ok(ArrayData::Int(ArrayD::from_shape_vec(shape, values).map_err(shape_error)?))
        }
        _ => {
            let mut values = vec![0f64; n_elements];
            cursor.read_f64_into::<LittleEndian>(&mut values)?;
            Ok(ArrayData::Float(ArrayD::from_shape_vec(shape, values).map_err(shape_error)?))
        }
    }
}
