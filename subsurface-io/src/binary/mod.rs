use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use log::debug;
use serde_json::Value;
use subsurface_core::containers::{
    MemoryOrder, StructuredData, StructuredHeader, UnstructuredData, UnstructuredHeader,
};
use subsurface_core::Result;

use crate::base::{Container, StructuredReader, StructuredWriter, UnstructuredReader, UnstructuredWriter};

/// Extension of the header file of a binary pair
pub const HEADER_EXTENSION: &str = "json";
/// Extension of the payload file of a binary pair
pub const PAYLOAD_EXTENSION: &str = "le";

/// Returns the `(header, payload)` paths of the binary pair at `path`. `path` may point to either file of the pair or
/// be the common stem
/// ```
/// # use subsurface_io::binary::binary_pair_paths;
/// let (header, payload) = binary_pair_paths("wells.json");
/// assert_eq!(header.to_str(), Some("wells.json"));
/// assert_eq!(payload.to_str(), Some("wells.le"));
/// ```
pub fn binary_pair_paths<P: AsRef<Path>>(path: P) -> (PathBuf, PathBuf) {
    let path = path.as_ref();
    (
        path.with_extension(HEADER_EXTENSION),
        path.with_extension(PAYLOAD_EXTENSION),
    )
}

/// Writer for binary pairs: a JSON header describing the shape and type of every sub-array, and a little-endian
/// payload. Each writer writes exactly one container
pub struct BinaryPairWriter<W: Write> {
    header: W,
    payload: W,
    order: MemoryOrder,
}

impl<W: Write> BinaryPairWriter<W> {
    pub fn from_writers(header: W, payload: W, order: MemoryOrder) -> Self {
        Self {
            header,
            payload,
            order,
        }
    }

    /// Returns the underlying `(header, payload)` writers
    pub fn into_inner(self) -> (W, W) {
        (self.header, self.payload)
    }

    fn write_pair<H: serde::Serialize>(&mut self, header: &H, payload: &[u8]) -> Result<()> {
        serde_json::to_writer(&mut self.header, header)?;
        self.payload.write_all(payload)?;
        Ok(())
    }
}

impl BinaryPairWriter<BufWriter<File>> {
    /// Creates (or truncates) both files of the binary pair at `path`
    pub fn from_path<P: AsRef<Path>>(path: P, order: MemoryOrder) -> Result<Self> {
        let (header_path, payload_path) = binary_pair_paths(path);
        debug!(
            "Writing binary pair {} + {}",
            header_path.display(),
            payload_path.display()
        );
        Ok(Self::from_writers(
            BufWriter::new(File::create(header_path)?),
            BufWriter::new(File::create(payload_path)?),
            order,
        ))
    }
}

impl<W: Write> UnstructuredWriter for BinaryPairWriter<W> {
    fn write_unstructured(&mut self, data: &UnstructuredData) -> Result<()> {
        let (payload, header) = data.to_binary(self.order)?;
        self.write_pair(&header, &payload)
    }

    fn flush(&mut self) -> Result<()> {
        self.header.flush()?;
        self.payload.flush()?;
        Ok(())
    }
}

impl<W: Write> StructuredWriter for BinaryPairWriter<W> {
    fn write_structured(&mut self, data: &StructuredData) -> Result<()> {
        let (payload, header) = data.to_binary(self.order)?;
        self.write_pair(&header, &payload)
    }

    fn flush(&mut self) -> Result<()> {
        self.header.flush()?;
        self.payload.flush()?;
        Ok(())
    }
}

/// Reader for binary pairs. The header is authoritative: the payload is split by the shapes it declares. The memory
/// order is not stored in the files and has to match the order that was used for writing
pub struct BinaryPairReader<R: Read> {
    header: R,
    payload: R,
    order: MemoryOrder,
}

impl<R: Read> BinaryPairReader<R> {
    pub fn from_readers(header: R, payload: R, order: MemoryOrder) -> Self {
        Self {
            header,
            payload,
            order,
        }
    }

    fn read_payload(&mut self) -> Result<Vec<u8>> {
        let mut payload = vec![];
        self.payload.read_to_end(&mut payload)?;
        Ok(payload)
    }

    /// Reads whichever container the header describes. Structured headers are recognized by their `data_shape` key
    pub fn read_container(&mut self) -> Result<Container> {
        let header: Value = serde_json::from_reader(&mut self.header)?;
        let payload = self.read_payload()?;
        if header.get("data_shape").is_some() {
            let header: StructuredHeader = serde_json::from_value(header)?;
            Ok(StructuredData::from_binary(&header, &payload, self.order)?.into())
        } else {
            let header: UnstructuredHeader = serde_json::from_value(header)?;
            Ok(UnstructuredData::from_binary(&header, &payload, self.order)?.into())
        }
    }
}

impl BinaryPairReader<BufReader<File>> {
    /// Opens both files of the binary pair at `path`
    pub fn from_path<P: AsRef<Path>>(path: P, order: MemoryOrder) -> Result<Self> {
        let (header_path, payload_path) = binary_pair_paths(path);
        Ok(Self::from_readers(
            BufReader::new(File::open(header_path)?),
            BufReader::new(File::open(payload_path)?),
            order,
        ))
    }
}

impl<R: Read> UnstructuredReader for BinaryPairReader<R> {
    fn read_unstructured(&mut self) -> Result<UnstructuredData> {
        let header: UnstructuredHeader = serde_json::from_reader(&mut self.header)?;
        let payload = self.read_payload()?;
        UnstructuredData::from_binary(&header, &payload, self.order)
    }
}

impl<R: Read> StructuredReader for BinaryPairReader<R> {
    fn read_structured(&mut self) -> Result<StructuredData> {
        let header: StructuredHeader = serde_json::from_reader(&mut self.header)?;
        let payload = self.read_payload()?;
        StructuredData::from_binary(&header, &payload, self.order)
    }
}

/// Writes `container` as the binary pair `<stem>.json` + `<stem>.le`
pub fn write_binary_pair<P: AsRef<Path>>(path: P, container: &Container, order: MemoryOrder) -> Result<()> {
    let mut writer = BinaryPairWriter::from_path(path, order)?;
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

/// Reads the binary pair `<stem>.json` + `<stem>.le`
pub fn read_binary_pair<P: AsRef<Path>>(path: P, order: MemoryOrder) -> Result<Container> {
    BinaryPairReader::from_path(path, order)?.read_container()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use subsurface_core::nalgebra::Point3;
    use subsurface_core::ndarray::{arr1, arr2};
    use subsurface_core::containers::Cells;
    use subsurface_core::ErrorKind;

    fn write_to_memory(container: &Container, order: MemoryOrder) -> Result<(Vec<u8>, Vec<u8>)> {
        let mut writer = BinaryPairWriter::from_writers(vec![], vec![], order);
        match container {
            Container::Unstructured(data) => writer.write_unstructured(data)?,
            Container::Structured(data) => writer.write_structured(data)?,
        }
        Ok(writer.into_inner())
    }

    #[test]
    fn test_in_memory_unstructured_round_trip() -> Result<()> {
        let data = UnstructuredData::from_arrays(
            arr2(&[[0.0, 0.0, 10.0], [0.0, 0.0, -20.0], [5.0, 0.0, -50.0]]),
            Cells::Lines,
            None,
            None,
        )?;
        let container = Container::from(data);
        for order in [MemoryOrder::RowMajor, MemoryOrder::ColumnMajor] {
            let (header, payload) = write_to_memory(&container, order)?;
            let mut reader = BinaryPairReader::from_readers(Cursor::new(header), Cursor::new(payload), order);
            let read = reader.read_container()?;
            assert_eq!(read, container);
            let data = read.into_unstructured()?;
            assert_eq!(data.point(2), Some(Point3::new(5.0, 0.0, -50.0)));
        }
        Ok(())
    }

    #[test]
    fn test_structured_header_is_detected() -> Result<()> {
        let data = StructuredData::from_array(arr1(&[1.0, 2.5, -3.0]).into_dyn(), None)?;
        let (header, payload) = write_to_memory(&data.clone().into(), MemoryOrder::RowMajor)?;
        assert_eq!(String::from_utf8(header.clone()).unwrap(), r#"{"data_shape":[3]}"#);

        let read = BinaryPairReader::from_readers(Cursor::new(header), Cursor::new(payload), MemoryOrder::RowMajor)
            .read_container()?;
        assert_eq!(read.into_structured()?.values(), data.values());
        Ok(())
    }

    #[test]
    fn test_truncated_payload_is_a_format_error() -> Result<()> {
        let data = StructuredData::from_array(arr1(&[1.0, 2.0]).into_dyn(), None)?;
        let (header, mut payload) = write_to_memory(&data.into(), MemoryOrder::RowMajor)?;
        payload.pop();
        let err = BinaryPairReader::from_readers(Cursor::new(header), Cursor::new(payload), MemoryOrder::RowMajor)
            .read_structured()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        Ok(())
    }
}
