use ndarray::{Array1, Array2, ArrayView2, Ix2};

use crate::containers::StructuredData;
use crate::{Error, Result};

/// Regular 3-D grid, e.g. a seismic cube or a reservoir property: a [`StructuredData`] whose primary variable is over
/// the dims `x, y, z`
#[derive(Debug, Clone, Copy)]
pub struct StructuredGrid<'a> {
    data: &'a StructuredData,
}

impl<'a> StructuredGrid<'a> {
    pub fn new(data: &'a StructuredData) -> Result<Self> {
        require_dims(data, &["x", "y", "z"])?;
        Ok(Self { data })
    }

    pub fn data(&self) -> &'a StructuredData {
        self.data
    }

    /// Cartesian coordinates of all grid nodes as an `(nx * ny * nz, 3)` array in `ij` order, i.e. the same order in
    /// which the primary values are laid out
    pub fn meshgrid(&self) -> Array2<f64> {
        meshgrid(&axes(self.data, &["x", "y", "z"]))
    }
}

/// Regular 2-D grid, e.g. a DEM: a [`StructuredData`] whose primary variable is over the dims `x, y`
#[derive(Debug, Clone, Copy)]
pub struct StructuredSurface<'a> {
    data: &'a StructuredData,
}

impl<'a> StructuredSurface<'a> {
    pub fn new(data: &'a StructuredData) -> Result<Self> {
        require_dims(data, &["x", "y"])?;
        Ok(Self { data })
    }

    pub fn data(&self) -> &'a StructuredData {
        self.data
    }

    /// Cartesian `x, y` coordinates of all grid nodes as an `(nx * ny, 2)` array in `ij` order
    pub fn meshgrid(&self) -> Array2<f64> {
        meshgrid(&axes(self.data, &["x", "y"]))
    }

    /// Grid nodes as 3-D points with the primary values as elevation
    pub fn points(&self) -> Array2<f64> {
        let grid = self.meshgrid();
        let mut points = Array2::zeros((grid.nrows(), 3));
        for ((mut point, node), z) in points
            .rows_mut()
            .into_iter()
            .zip(grid.rows())
            .zip(self.data.values().iter())
        {
            point[0] = node[0];
            point[1] = node[1];
            point[2] = *z;
        }
        points
    }

    /// The primary values as an `(nx, ny)` array
    pub fn values(&self) -> Result<ArrayView2<'a, f64>> {
        self.data
            .values()
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|e| Error::arity(format!("surface values are not 2-D: {}", e)))
    }
}

fn require_dims(data: &StructuredData, expected: &[&str]) -> Result<()> {
    let dims = data.dims();
    for axis in expected {
        if !dims.iter().any(|(dim, _)| dim == axis) || data.coord(axis).is_none() {
            return Err(Error::structure(
                *axis,
                format!("primary variable '{}' has no coordinate '{}'", data.primary_name(), axis),
            ));
        }
    }
    if dims.len() != expected.len() || dims.iter().zip(expected).any(|((dim, _), axis)| dim != axis) {
        return Err(Error::arity(format!(
            "primary variable '{}' must be over ({}), got ({})",
            data.primary_name(),
            expected.join(", "),
            dims.iter().map(|(dim, _)| dim.as_str()).collect::<Vec<_>>().join(", ")
        )));
    }
    Ok(())
}

fn axes<'d>(data: &'d StructuredData, dims: &[&str]) -> Vec<&'d Array1<f64>> {
    // Presence of the coordinates is checked on construction of the views
    dims.iter().filter_map(|dim| data.coord(dim)).collect()
}

fn meshgrid(axes: &[&Array1<f64>]) -> Array2<f64> {
    let n_nodes = axes.iter().map(|axis| axis.len()).product();
    let mut grid = Array2::zeros((n_nodes, axes.len()));
    for (node, mut row) in grid.rows_mut().into_iter().enumerate() {
        let mut rest = node;
        for (idx, axis) in axes.iter().enumerate().rev() {
            row[idx] = axis[rest % axis.len()];
            rest /= axis.len();
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use ndarray::{arr1, arr2, Array3};

    #[test]
    fn test_grid_meshgrid_is_ij_ordered() -> Result<()> {
        let data = StructuredData::from_array(Array3::<f64>::zeros((2, 2, 3)).into_dyn(), None)?
            .with_coord("z", arr1(&[-10.0, -20.0, -30.0]))?;
        let grid = StructuredGrid::new(&data)?;
        let nodes = grid.meshgrid();
        assert_eq!(nodes.nrows(), 12);
        assert_eq!(nodes.row(0).to_vec(), vec![0.0, 0.0, -10.0]);
        assert_eq!(nodes.row(2).to_vec(), vec![0.0, 0.0, -30.0]);
        assert_eq!(nodes.row(3).to_vec(), vec![0.0, 1.0, -10.0]);
        assert_eq!(nodes.row(11).to_vec(), vec![1.0, 1.0, -30.0]);
        Ok(())
    }

    #[test]
    fn test_surface_points_carry_values() -> Result<()> {
        let data = StructuredData::from_array(arr2(&[[1.0, 2.0], [3.0, 4.0]]).into_dyn(), Some("topo"))?
            .with_coord("x", arr1(&[100.0, 200.0]))?;
        let surface = StructuredSurface::new(&data)?;
        assert_eq!(
            surface.points(),
            arr2(&[[100.0, 0.0, 1.0], [100.0, 1.0, 2.0], [200.0, 0.0, 3.0], [200.0, 1.0, 4.0]])
        );
        assert_eq!(surface.values()?[[1, 0]], 3.0);
        Ok(())
    }

    #[test]
    fn test_wrong_dimensionality() -> Result<()> {
        let surface_data = StructuredData::from_array(arr2(&[[1.0]]).into_dyn(), None)?;
        assert_eq!(StructuredGrid::new(&surface_data).unwrap_err().kind(), ErrorKind::Structure);

        let grid_data = StructuredData::from_array(Array3::<f64>::zeros((1, 1, 1)).into_dyn(), None)?;
        assert_eq!(StructuredSurface::new(&grid_data).unwrap_err().kind(), ErrorKind::ArityMismatch);
        Ok(())
    }
}
