mod attribute_table;
pub use self::attribute_table::*;

mod binary;
pub use self::binary::{MemoryOrder, StructuredHeader, UnstructuredHeader};

mod unstructured;
pub use self::unstructured::*;

mod structured;
pub use self::structured::*;
