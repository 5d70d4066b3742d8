use nalgebra::Point3;
use ndarray::ArrayView2;

use super::require_arity;
use crate::containers::{StructuredData, UnstructuredData};
use crate::Result;

/// Image draped onto a [`TriSurf`], e.g. a geological profile. The image is anchored by three points: `origin` is the
/// image corner at `(u, v) = (0, 0)`, `point_u` lies at `(1, 0)` and `point_v` at `(0, 1)`
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub image: StructuredData,
    pub origin: Point3<f64>,
    pub point_u: Point3<f64>,
    pub point_v: Point3<f64>,
}

/// Triangulated surface, e.g. a horizon, fault or topography: an [`UnstructuredData`] whose cells each reference three
/// vertices, with an optional texture
#[derive(Debug, Clone)]
pub struct TriSurf<'a> {
    mesh: &'a UnstructuredData,
    texture: Option<Texture>,
}

impl<'a> TriSurf<'a> {
    /// Creates a `TriSurf` view. Fails with an arity error unless every cell has exactly three vertices
    pub fn new(mesh: &'a UnstructuredData) -> Result<Self> {
        require_arity(mesh, 3, "TriSurf")?;
        Ok(Self { mesh, texture: None })
    }

    pub fn with_texture(
        mut self,
        image: StructuredData,
        origin: Point3<f64>,
        point_u: Point3<f64>,
        point_v: Point3<f64>,
    ) -> Self {
        self.texture = Some(Texture {
            image,
            origin,
            point_u,
            point_v,
        });
        self
    }

    pub fn data(&self) -> &'a UnstructuredData {
        self.mesh
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    /// Vertex indices of all triangles as a `(n_triangles, 3)` array
    pub fn triangles(&self) -> ArrayView2<'a, usize> {
        self.mesh.cells()
    }

    pub fn n_triangles(&self) -> usize {
        self.mesh.n_cells()
    }

    /// Summed area of all triangles
    pub fn area(&self) -> f64 {
        self.triangles()
            .rows()
            .into_iter()
            .filter_map(|tri| {
                let a = self.mesh.point(tri[0])?;
                let b = self.mesh.point(tri[1])?;
                let c = self.mesh.point(tri[2])?;
                Some((b - a).cross(&(c - a)).norm() / 2.0)
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::Cells;
    use crate::ErrorKind;
    use assert_approx_eq::assert_approx_eq;
    use ndarray::{arr2, Array2};

    fn unit_square() -> UnstructuredData {
        UnstructuredData::from_arrays(
            arr2(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]),
            Cells::Array(arr2(&[[0, 1, 2], [0, 2, 3]])),
            None,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_tri_surf_accessors() -> Result<()> {
        let mesh = unit_square();
        let surface = TriSurf::new(&mesh)?;
        assert_eq!(surface.n_triangles(), 2);
        assert_eq!(surface.triangles().row(1).to_vec(), vec![0, 2, 3]);
        assert_approx_eq!(surface.area(), 1.0);
        assert!(surface.texture().is_none());
        Ok(())
    }

    #[test]
    fn test_texture_is_kept() -> Result<()> {
        let mesh = unit_square();
        let image = StructuredData::from_array(Array2::<f64>::zeros((4, 4)).into_dyn(), Some("rgb"))?;
        let surface = TriSurf::new(&mesh)?.with_texture(
            image,
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let texture = surface.texture().unwrap();
        assert_eq!(texture.image.primary_name(), "rgb");
        assert_eq!(texture.point_u, Point3::new(1.0, 0.0, 0.0));
        Ok(())
    }

    #[test]
    fn test_tri_surf_rejects_tetrahedra() -> Result<()> {
        let mesh = UnstructuredData::from_arrays(Array2::zeros((4, 3)), Cells::Array(arr2(&[[0, 1, 2, 3]])), None, None)?;
        assert_eq!(TriSurf::new(&mesh).unwrap_err().kind(), ErrorKind::ArityMismatch);
        Ok(())
    }
}
