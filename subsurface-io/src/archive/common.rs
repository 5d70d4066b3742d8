use std::io::Read;

use serde::{de::DeserializeOwned, Serialize};
use subsurface_core::Result;

/// Serializes `json_header` and pads it with trailing spaces to an 8-byte boundary
pub(crate) fn ser_padded_json<T: Serialize>(json_header: &T) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec(json_header)?;
    let next_8_byte_boundary = (bytes.len() + 7) / 8 * 8;
    bytes.resize(next_8_byte_boundary, b' ');
    Ok(bytes)
}

/// Reads a padded JSON header of `byte_length` bytes from `reader`
pub(crate) fn deser_padded_json<T: DeserializeOwned, R: Read>(mut reader: R, byte_length: usize) -> Result<T> {
    let mut bytes = vec![0; byte_length];
    reader.read_exact(&mut bytes)?;
    Ok(serde_json::from_slice(&bytes)?)
}
