use nalgebra::Point3;
use ndarray::ArrayView2;

use super::require_arity;
use crate::containers::{AttributeTable, UnstructuredData};
use crate::Result;

/// A point cloud: an [`UnstructuredData`] whose cells each reference a single vertex
#[derive(Debug, Clone, Copy)]
pub struct PointSet<'a> {
    data: &'a UnstructuredData,
}

impl<'a> PointSet<'a> {
    /// Creates a `PointSet` view. Fails with an arity error unless every cell has exactly one vertex
    pub fn new(data: &'a UnstructuredData) -> Result<Self> {
        require_arity(data, 1, "PointSet")?;
        Ok(Self { data })
    }

    pub fn data(&self) -> &'a UnstructuredData {
        self.data
    }

    /// Coordinates of all points as a `(n_points, 3)` array
    pub fn points(&self) -> ArrayView2<'a, f64> {
        self.data.vertex()
    }

    pub fn n_points(&self) -> usize {
        self.data.n_points()
    }

    pub fn point(&self, index: usize) -> Option<Point3<f64>> {
        self.data.point(index)
    }

    /// Per-point attributes. Every cell of a point cloud is exactly one point, so these are the cell attributes
    pub fn point_data(&self) -> &'a AttributeTable {
        self.data.cell_attrs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::{AttributeColumn, Cells};
    use crate::ErrorKind;
    use ndarray::arr2;

    #[test]
    fn test_point_set_accessors() -> Result<()> {
        let attrs = AttributeTable::from_columns(vec![("porosity", AttributeColumn::Float(vec![0.1, 0.2]))])?;
        let data = UnstructuredData::from_arrays(
            arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]),
            Cells::Points,
            Some(attrs),
            None,
        )?;
        let points = PointSet::new(&data)?;
        assert_eq!(points.n_points(), 2);
        assert_eq!(points.points()[[1, 2]], 6.0);
        assert_eq!(points.point(0), Some(Point3::new(1.0, 2.0, 3.0)));
        assert_eq!(
            points.point_data().column("porosity").and_then(|c| c.as_float()),
            Some(&[0.1, 0.2][..])
        );
        Ok(())
    }

    #[test]
    fn test_point_set_rejects_lines() -> Result<()> {
        let data = UnstructuredData::from_arrays(arr2(&[[0.0; 3], [1.0; 3]]), Cells::Lines, None, None)?;
        assert_eq!(PointSet::new(&data).unwrap_err().kind(), ErrorKind::ArityMismatch);
        Ok(())
    }
}
