use subsurface_core::containers::{StructuredData, UnstructuredData};
use subsurface_core::Result;

/// Base trait for all types that can write an [`UnstructuredData`]
pub trait UnstructuredWriter {
    fn write_unstructured(&mut self, data: &UnstructuredData) -> Result<()>;
    /// Flush all written data to the underlying sink
    fn flush(&mut self) -> Result<()>;
}

/// Base trait for all types that can write a [`StructuredData`]
pub trait StructuredWriter {
    fn write_structured(&mut self, data: &StructuredData) -> Result<()>;
    /// Flush all written data to the underlying sink
    fn flush(&mut self) -> Result<()>;
}
