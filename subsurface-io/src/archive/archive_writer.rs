use std::{
    collections::BTreeMap,
    convert::TryInto,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use byteorder::{LittleEndian, WriteBytesExt};
use subsurface_core::containers::{StructuredData, UnstructuredData};
use subsurface_core::dataset::{ArrayData, Dataset, Variable};
use subsurface_core::{Error, Result};

use super::common::ser_padded_json;
use super::{ArchiveHeader, ArchiveJsonHeader, ArchiveVariable, ARCHIVE_VERSION};
use crate::base::{ContainerKind, StructuredWriter, UnstructuredWriter};

/// Writer for self-describing archives. An archive stores a whole [`Dataset`], so variable names, dims, coordinates
/// and container-level attributes all survive a round trip
pub struct ArchiveWriter<W: Write> {
    writer: W,
}

impl<W: Write> ArchiveWriter<W> {
    pub fn from_write(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Writes `dataset` as a single archive
    pub fn write_dataset(
        &mut self,
        kind: ContainerKind,
        primary_name: Option<&str>,
        dataset: &Dataset,
    ) -> Result<()> {
        let mut body = vec![];
        let variables = encode_variables(dataset.variables(), &mut body)?;
        let coords = encode_variables(dataset.coords(), &mut body)?;
        let json_header = ArchiveJsonHeader {
            kind,
            primary_name: primary_name.map(str::to_owned),
            attrs: dataset.attrs().clone(),
            variables,
            coords,
        };
        let json_blob = ser_padded_json(&json_header)?;

        let header = ArchiveHeader::new(
            ARCHIVE_VERSION,
            json_blob
                .len()
                .try_into()
                .map_err(|_| Error::format("archive JSON header exceeds maximum size of 4GiB"))?,
            body.len()
                .try_into()
                .map_err(|_| Error::format("archive body exceeds maximum size of 4GiB"))?,
        );
        bincode::serialize_into(&mut self.writer, &header)
            .map_err(|e| Error::format(format!("error while serializing archive header: {}", e)))?;
        self.writer.write_all(&json_blob)?;
        self.writer.write_all(&body)?;
        Ok(())
    }
}

impl ArchiveWriter<BufWriter<File>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_write(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> UnstructuredWriter for ArchiveWriter<W> {
    fn write_unstructured(&mut self, data: &UnstructuredData) -> Result<()> {
        self.write_dataset(ContainerKind::Unstructured, None, &data.to_dataset()?)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(self.writer.flush()?)
    }
}

impl<W: Write> StructuredWriter for ArchiveWriter<W> {
    fn write_structured(&mut self, data: &StructuredData) -> Result<()> {
        self.write_dataset(
            ContainerKind::Structured,
            Some(data.primary_name()),
            &data.to_dataset()?,
        )
    }

    fn flush(&mut self) -> Result<()> {
        Ok(self.writer.flush()?)
    }
}

/// Appends the numeric variables to `body` in row-major order and describes all variables for the JSON header
fn encode_variables(
    variables: &BTreeMap<String, Variable>,
    body: &mut Vec<u8>,
) -> Result<BTreeMap<String, ArchiveVariable>> {
    variables
        .iter()
        .map(|(name, variable)| {
            let mut entry = ArchiveVariable {
                dims: variable.dims().to_vec(),
                shape: variable.shape().to_vec(),
                dtype: variable.data().dtype(),
                byte_offset: None,
                values: None,
            };
            match variable.data() {
                ArrayData::Float(values) => {
                    entry.byte_offset = Some(body.len());
                    for value in values.iter() {
                        body.write_f64::<LittleEndian>(*value)?;
                    }
                }
                ArrayData::Int(values) => {
                    entry.byte_offset = Some(body.len());
                    for value in values.iter() {
                        body.write_i64::<LittleEndian>(*value)?;
                    }
                }
                ArrayData::Text(values) => {
                    entry.values = Some(values.iter().cloned().collect());
                }
            }
            Ok((name.clone(), entry))
        })
        .collect()
}
