use std::borrow::Cow;

use nalgebra::Point3;
use ndarray::ArrayView2;

use super::require_arity;
use crate::containers::{Cells, UnstructuredData};
use crate::Result;

/// Radius of a [`LineSet`] if none is given
pub const DEFAULT_RADIUS: f64 = 1.0;

/// Connected line segments, e.g. borehole trajectories: an [`UnstructuredData`] whose cells each reference two
/// vertices. The radius is a rendering hint for tube display and not part of the geometry
#[derive(Debug, Clone)]
pub struct LineSet<'a> {
    data: Cow<'a, UnstructuredData>,
    radius: f64,
}

impl<'a> LineSet<'a> {
    /// Creates a `LineSet` view. A container without any cells gets consecutive vertex pairs as segments (the view
    /// then owns a copy of the container). Fails with an arity error if the cells do not have two vertices each
    pub fn new(data: &'a UnstructuredData) -> Result<Self> {
        if data.n_cells() == 0 {
            return Ok(Self {
                data: Cow::Owned(sequential_segments(data)?),
                radius: DEFAULT_RADIUS,
            });
        }
        require_arity(data, 2, "LineSet")?;
        Ok(Self {
            data: Cow::Borrowed(data),
            radius: DEFAULT_RADIUS,
        })
    }

    /// Like [`new`](LineSet::new), but takes ownership of `data`
    pub fn from_owned(data: UnstructuredData) -> Result<LineSet<'static>> {
        let data = if data.n_cells() == 0 {
            sequential_segments(&data)?
        } else {
            require_arity(&data, 2, "LineSet")?;
            data
        };
        Ok(LineSet {
            data: Cow::Owned(data),
            radius: DEFAULT_RADIUS,
        })
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn data(&self) -> &UnstructuredData {
        &self.data
    }

    pub fn into_data(self) -> UnstructuredData {
        self.data.into_owned()
    }

    /// Vertex index pairs of all segments as a `(n_segments, 2)` array
    pub fn segments(&self) -> ArrayView2<'_, usize> {
        self.data.cells()
    }

    pub fn n_segments(&self) -> usize {
        self.data.n_cells()
    }

    /// Start and end point of the segment at `index`
    pub fn segment(&self, index: usize) -> Option<(Point3<f64>, Point3<f64>)> {
        if index >= self.n_segments() {
            return None;
        }
        let cells = self.data.cells();
        Some((
            self.data.point(cells[[index, 0]])?,
            self.data.point(cells[[index, 1]])?,
        ))
    }

    /// Total length of all segments
    pub fn length(&self) -> f64 {
        (0..self.n_segments())
            .filter_map(|idx| self.segment(idx))
            .map(|(start, end)| (end - start).norm())
            .sum()
    }
}

fn sequential_segments(data: &UnstructuredData) -> Result<UnstructuredData> {
    UnstructuredData::from_arrays(
        data.vertex().to_owned(),
        Cells::Lines,
        None,
        Some(data.vertex_attrs().clone()),
    )?
    .with_attrs(data.attrs().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use assert_approx_eq::assert_approx_eq;
    use ndarray::{arr2, Array2};

    #[test]
    fn test_missing_cells_become_sequential_segments() -> Result<()> {
        let data = UnstructuredData::from_arrays(
            arr2(&[[0.0, 0.0, 0.0], [3.0, 4.0, 0.0], [3.0, 4.0, 10.0]]),
            Cells::Array(Array2::zeros((0, 2))),
            None,
            None,
        )?;
        let lines = LineSet::new(&data)?.with_radius(5.0);
        assert_eq!(lines.n_segments(), 2);
        assert_eq!(lines.segments(), arr2(&[[0, 1], [1, 2]]));
        assert_approx_eq!(lines.length(), 15.0);
        assert_eq!(lines.radius(), 5.0);
        Ok(())
    }

    #[test]
    fn test_line_set_rejects_single_vertex_cells() -> Result<()> {
        let data = UnstructuredData::from_arrays(arr2(&[[0.0; 3], [1.0; 3]]), Cells::Points, None, None)?;
        assert_eq!(LineSet::new(&data).unwrap_err().kind(), ErrorKind::ArityMismatch);
        assert_eq!(LineSet::from_owned(data).unwrap_err().kind(), ErrorKind::ArityMismatch);
        Ok(())
    }

    #[test]
    fn test_segment_accessor() -> Result<()> {
        let data = UnstructuredData::from_arrays(arr2(&[[0.0; 3], [1.0; 3]]), Cells::Lines, None, None)?;
        let lines = LineSet::new(&data)?;
        assert_eq!(lines.segment(0), Some((Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))));
        assert_eq!(lines.segment(1), None);
        Ok(())
    }
}
