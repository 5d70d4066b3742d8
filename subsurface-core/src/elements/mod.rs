//! Typed views over the canonical containers. Each view borrows (or owns) a container and asserts one invariant on
//! its shape, e.g. that every cell of a [`LineSet`] has exactly two vertices. Views expose semantic accessors only,
//! which is all that a [`Visualizer`] may depend on.

mod point_set;
pub use self::point_set::*;

mod line_set;
pub use self::line_set::*;

mod tri_surf;
pub use self::tri_surf::*;

mod tetra_mesh;
pub use self::tetra_mesh::*;

mod structured_grid;
pub use self::structured_grid::*;

use std::fmt::Display;

use crate::containers::UnstructuredData;
use crate::{Error, Result};

/// Any of the typed element views
#[derive(Debug, Clone)]
pub enum Element<'a> {
    PointSet(PointSet<'a>),
    LineSet(LineSet<'a>),
    TriSurf(TriSurf<'a>),
    TetraMesh(TetraMesh<'a>),
    StructuredGrid(StructuredGrid<'a>),
    StructuredSurface(StructuredSurface<'a>),
}

impl<'a> Element<'a> {
    /// Picks the typed view matching the cell arity of `data`. Fails for arities without a typed view (hexahedra)
    pub fn from_unstructured(data: &'a UnstructuredData) -> Result<Self> {
        match data.cell_arity() {
            1 => PointSet::new(data).map(Element::PointSet),
            2 => LineSet::new(data).map(Element::LineSet),
            3 => TriSurf::new(data).map(Element::TriSurf),
            4 => TetraMesh::new(data).map(Element::TetraMesh),
            other => Err(Error::arity(format!(
                "no typed element for cells with {} vertices",
                other
            ))),
        }
    }

    /// Name of the element category
    pub fn category(&self) -> &'static str {
        match self {
            Element::PointSet(_) => "PointSet",
            Element::LineSet(_) => "LineSet",
            Element::TriSurf(_) => "TriSurf",
            Element::TetraMesh(_) => "TetraMesh",
            Element::StructuredGrid(_) => "StructuredGrid",
            Element::StructuredSurface(_) => "StructuredSurface",
        }
    }
}

impl Display for Element<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Element::PointSet(e) => write!(f, "PointSet: {} points", e.n_points()),
            Element::LineSet(e) => write!(
                f,
                "LineSet: {} segments over {} vertices, radius {}",
                e.n_segments(),
                e.data().n_points(),
                e.radius()
            ),
            Element::TriSurf(e) => write!(
                f,
                "TriSurf: {} triangles over {} vertices{}",
                e.n_triangles(),
                e.data().n_points(),
                if e.texture().is_some() { ", textured" } else { "" }
            ),
            Element::TetraMesh(e) => write!(
                f,
                "TetraMesh: {} tetrahedra over {} vertices",
                e.n_tetrahedra(),
                e.data().n_points()
            ),
            Element::StructuredGrid(e) => write!(f, "StructuredGrid: {}", e.data()),
            Element::StructuredSurface(e) => write!(f, "StructuredSurface: {}", e.data()),
        }
    }
}

/// Consumer of typed elements, e.g. a bridge to a rendering library. Implementations must only rely on the accessors
/// of the typed views, never on the internals of the containers
pub trait Visualizer {
    type Output;

    fn visualize(&mut self, element: &Element<'_>) -> Result<Self::Output>;
}

pub(crate) fn require_arity(data: &UnstructuredData, expected: usize, element: &str) -> Result<()> {
    if data.cell_arity() != expected {
        return Err(Error::arity(format!(
            "{} requires cells with {} vertices, got {}",
            element,
            expected,
            data.cell_arity()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::Cells;
    use ndarray::{arr2, Array2};

    struct CountingVisualizer {
        seen: Vec<String>,
    }

    impl Visualizer for CountingVisualizer {
        type Output = usize;

        fn visualize(&mut self, element: &Element<'_>) -> Result<usize> {
            self.seen.push(element.category().to_owned());
            Ok(match element {
                Element::PointSet(e) => e.n_points(),
                Element::LineSet(e) => e.n_segments(),
                Element::TriSurf(e) => e.n_triangles(),
                Element::TetraMesh(e) => e.n_tetrahedra(),
                Element::StructuredGrid(e) => e.meshgrid().nrows(),
                Element::StructuredSurface(e) => e.meshgrid().nrows(),
            })
        }
    }

    #[test]
    fn test_element_from_arity() -> Result<()> {
        let vertex = arr2(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let points = UnstructuredData::from_arrays(vertex.clone(), Cells::Points, None, None)?;
        let lines = UnstructuredData::from_arrays(vertex.clone(), Cells::Lines, None, None)?;
        let tris = UnstructuredData::from_arrays(vertex.clone(), Cells::Array(arr2(&[[0, 1, 2], [0, 2, 3]])), None, None)?;
        let tets = UnstructuredData::from_arrays(vertex, Cells::Array(arr2(&[[0, 1, 2, 3]])), None, None)?;

        let mut visualizer = CountingVisualizer { seen: vec![] };
        let counts = [&points, &lines, &tris, &tets]
            .iter()
            .map(|data| Element::from_unstructured(data).and_then(|e| visualizer.visualize(&e)))
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(counts, vec![4, 3, 2, 1]);
        assert_eq!(visualizer.seen, vec!["PointSet", "LineSet", "TriSurf", "TetraMesh"]);
        Ok(())
    }

    #[test]
    fn test_hexahedra_have_no_element() -> Result<()> {
        let vertex = Array2::zeros((8, 3));
        let cells = Array2::from_shape_fn((1, 8), |(_, c)| c);
        let hexa = UnstructuredData::from_arrays(vertex, Cells::Array(cells), None, None)?;
        let err = Element::from_unstructured(&hexa).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::ArityMismatch);
        Ok(())
    }
}
