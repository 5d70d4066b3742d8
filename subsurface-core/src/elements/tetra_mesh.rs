use ndarray::ArrayView2;

use super::require_arity;
use crate::containers::UnstructuredData;
use crate::Result;

/// Tetrahedral volume mesh: an [`UnstructuredData`] whose cells each reference four vertices
#[derive(Debug, Clone, Copy)]
pub struct TetraMesh<'a> {
    data: &'a UnstructuredData,
}

impl<'a> TetraMesh<'a> {
    pub fn new(data: &'a UnstructuredData) -> Result<Self> {
        require_arity(data, 4, "TetraMesh")?;
        Ok(Self { data })
    }

    pub fn data(&self) -> &'a UnstructuredData {
        self.data
    }

    /// Vertex indices of all tetrahedra as a `(n_tetrahedra, 4)` array
    pub fn tetrahedra(&self) -> ArrayView2<'a, usize> {
        self.data.cells()
    }

    pub fn n_tetrahedra(&self) -> usize {
        self.data.n_cells()
    }

    /// Summed volume of all tetrahedra
    pub fn volume(&self) -> f64 {
        self.tetrahedra()
            .rows()
            .into_iter()
            .filter_map(|tet| {
                let a = self.data.point(tet[0])?;
                let b = self.data.point(tet[1])?;
                let c = self.data.point(tet[2])?;
                let d = self.data.point(tet[3])?;
                Some((b - a).dot(&(c - a).cross(&(d - a))).abs() / 6.0)
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::Cells;
    use assert_approx_eq::assert_approx_eq;
    use ndarray::arr2;

    #[test]
    fn test_tetra_mesh_volume() -> Result<()> {
        let data = UnstructuredData::from_arrays(
            arr2(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]),
            Cells::Array(arr2(&[[0, 1, 2, 3]])),
            None,
            None,
        )?;
        let mesh = TetraMesh::new(&data)?;
        assert_eq!(mesh.n_tetrahedra(), 1);
        assert_approx_eq!(mesh.volume(), 1.0 / 6.0);
        Ok(())
    }

    #[test]
    fn test_tetra_mesh_rejects_triangles() -> Result<()> {
        let data = UnstructuredData::from_arrays(
            arr2(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            Cells::Array(arr2(&[[0, 1, 2]])),
            None,
            None,
        )?;
        assert!(TetraMesh::new(&data).is_err());
        Ok(())
    }
}
