use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use static_assertions::const_assert;
use subsurface_core::dataset::DataType;
use subsurface_core::{Error, Result};

use crate::base::ContainerKind;

/// Fixed-size header at the start of every archive
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveHeader {
    pub magic: [u8; 4],
    pub version: u32,
    /// Length of the JSON header including its padding
    pub json_byte_length: u32,
    pub body_byte_length: u32,
}

impl ArchiveHeader {
    /// Length of an archive header in bytes
    pub const BYTE_LENGTH: usize = 16;
    pub const MAGIC: [u8; 4] = *b"ssds";

    pub fn new(version: u32, json_byte_length: u32, body_byte_length: u32) -> Self {
        Self {
            magic: Self::MAGIC,
            version,
            json_byte_length,
            body_byte_length,
        }
    }

    /// Returns an error if the magic bytes or the version of this header are not supported
    pub fn verify(&self) -> Result<()> {
        if self.magic != Self::MAGIC {
            return Err(Error::format(format!(
                "no valid archive, expected first four bytes to be 'ssds' but got '{:?}'",
                self.magic
            )));
        }
        if self.version != super::ARCHIVE_VERSION {
            return Err(Error::format(format!(
                "unsupported archive version {} (supported: {})",
                self.version,
                super::ARCHIVE_VERSION
            )));
        }
        Ok(())
    }
}

const_assert!(ArchiveHeader::BYTE_LENGTH == std::mem::size_of::<ArchiveHeader>());

/// Description of one variable or coordinate within the JSON header. Numeric arrays live in the body at
/// `byte_offset`, text arrays are stored inline as `values`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveVariable {
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    pub dtype: DataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_offset: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

impl ArchiveVariable {
    /// Number of elements of this variable, `None` if the shape describes more elements than fit into a `usize`
    pub fn n_elements(&self) -> Option<usize> {
        self.shape
            .iter()
            .try_fold(1usize, |count, extent| count.checked_mul(*extent))
    }
}

/// JSON header of an archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveJsonHeader {
    pub kind: ContainerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_name: Option<String>,
    #[serde(default)]
    pub attrs: Map<String, Value>,
    pub variables: BTreeMap<String, ArchiveVariable>,
    #[serde(default)]
    pub coords: BTreeMap<String, ArchiveVariable>,
}
