use subsurface_core::containers::{StructuredData, UnstructuredData};
use subsurface_core::Result;

/// Base trait for all types that can read an [`UnstructuredData`]. Readers return containers that already satisfy all
/// container invariants; any renaming of columns or axes happens inside the reader
pub trait UnstructuredReader {
    fn read_unstructured(&mut self) -> Result<UnstructuredData>;
}

/// Base trait for all types that can read a [`StructuredData`]
pub trait StructuredReader {
    fn read_structured(&mut self) -> Result<StructuredData>;
}
