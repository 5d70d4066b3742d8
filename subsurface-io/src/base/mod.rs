use std::fmt::Display;

use subsurface_core::containers::{StructuredData, UnstructuredData};
use subsurface_core::elements::{Element, StructuredGrid, StructuredSurface};
use subsurface_core::{Error, Result};

mod reader;
pub use self::reader::*;

mod writer;
pub use self::writer::*;

mod io_factory;
pub use self::io_factory::*;

/// Either of the two canonical containers, as read from a file whose content is not known upfront
#[derive(Debug, Clone, PartialEq)]
pub enum Container {
    Unstructured(UnstructuredData),
    Structured(StructuredData),
}

impl Container {
    pub fn kind(&self) -> ContainerKind {
        match self {
            Container::Unstructured(_) => ContainerKind::Unstructured,
            Container::Structured(_) => ContainerKind::Structured,
        }
    }

    pub fn into_unstructured(self) -> Result<UnstructuredData> {
        match self {
            Container::Unstructured(data) => Ok(data),
            Container::Structured(_) => Err(Error::format("expected unstructured data, got structured data")),
        }
    }

    pub fn into_structured(self) -> Result<StructuredData> {
        match self {
            Container::Structured(data) => Ok(data),
            Container::Unstructured(_) => Err(Error::format("expected structured data, got unstructured data")),
        }
    }

    /// Returns the typed element view matching this container
    pub fn element(&self) -> Result<Element<'_>> {
        match self {
            Container::Unstructured(data) => Element::from_unstructured(data),
            Container::Structured(data) => match data.dims().len() {
                2 => StructuredSurface::new(data).map(Element::StructuredSurface),
                3 => StructuredGrid::new(data).map(Element::StructuredGrid),
                other => Err(Error::arity(format!(
                    "no typed element for {}-dimensional structured data",
                    other
                ))),
            },
        }
    }
}

impl From<UnstructuredData> for Container {
    fn from(data: UnstructuredData) -> Self {
        Container::Unstructured(data)
    }
}

impl From<StructuredData> for Container {
    fn from(data: StructuredData) -> Self {
        Container::Structured(data)
    }
}

/// Which of the two canonical containers a file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    Unstructured,
    Structured,
}

impl Display for ContainerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerKind::Unstructured => f.write_str("unstructured"),
            ContainerKind::Structured => f.write_str("structured"),
        }
    }
}
