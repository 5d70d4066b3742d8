use std::path::Path;

use subsurface_core::containers::{MemoryOrder, StructuredData, UnstructuredData};
use subsurface_core::{Error, Result};

use super::Container;
use crate::archive::{read_archive, write_archive};
use crate::binary::{read_binary_pair, write_binary_pair};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SupportedFileExtensions {
    BinaryPair,
    Archive,
}

/// Returns a lookup value for the file extension of the given file path
fn get_extension_lookup(path: &Path) -> Result<Option<SupportedFileExtensions>> {
    let extension = match path.extension() {
        Some(ex) => ex,
        None => return Ok(None),
    };
    let extension_str = extension.to_str().ok_or_else(|| {
        Error::format(format!(
            "file extension of path {} is no valid Unicode string",
            path.display()
        ))
    })?;
    match extension_str.to_lowercase().as_str() {
        "json" | "le" => Ok(Some(SupportedFileExtensions::BinaryPair)),
        "ssa" => Ok(Some(SupportedFileExtensions::Archive)),
        _ => Ok(None),
    }
}

fn unsupported(path: &Path) -> Error {
    Error::format(format!("unsupported file format of file {}", path.display()))
}

/// Checks whether the given `path` has an extension that [`read_container`] and [`write_container`] support
pub fn is_supported_file<P: AsRef<Path>>(path: P) -> Result<bool> {
    Ok(get_extension_lookup(path.as_ref())?.is_some())
}

/// Reads the container stored at `path`, choosing the format from the file extension: `.json` and `.le` are read as a
/// binary pair (in row-major order), `.ssa` as an archive
pub fn read_container<P: AsRef<Path>>(path: P) -> Result<Container> {
    let path = path.as_ref();
    match get_extension_lookup(path)? {
        Some(SupportedFileExtensions::BinaryPair) => read_binary_pair(path, MemoryOrder::RowMajor),
        Some(SupportedFileExtensions::Archive) => read_archive(path),
        None => Err(unsupported(path)),
    }
}

/// Writes `container` to `path`, choosing the format from the file extension (see [`read_container`])
pub fn write_container<P: AsRef<Path>>(path: P, container: &Container) -> Result<()> {
    let path = path.as_ref();
    match get_extension_lookup(path)? {
        Some(SupportedFileExtensions::BinaryPair) => write_binary_pair(path, container, MemoryOrder::RowMajor),
        Some(SupportedFileExtensions::Archive) => write_archive(path, container),
        None => Err(unsupported(path)),
    }
}

/// Reads the [`UnstructuredData`] stored at `path`. Fails if the file holds structured data
pub fn read_unstructured<P: AsRef<Path>>(path: P) -> Result<UnstructuredData> {
    read_container(path)?.into_unstructured()
}

/// Reads the [`StructuredData`] stored at `path`. Fails if the file holds unstructured data
pub fn read_structured<P: AsRef<Path>>(path: P) -> Result<StructuredData> {
    read_container(path)?.into_structured()
}

pub fn write_unstructured<P: AsRef<Path>>(path: P, data: &UnstructuredData) -> Result<()> {
    write_container(path, &Container::Unstructured(data.clone()))
}

pub fn write_structured<P: AsRef<Path>>(path: P, data: &StructuredData) -> Result<()> {
    write_container(path, &Container::Structured(data.clone()))
}
