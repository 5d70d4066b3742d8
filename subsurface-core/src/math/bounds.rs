use nalgebra::{Point3, Scalar};

/// 3D axis-aligned bounding box of a container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB<T: Scalar + PartialOrd> {
    min: Point3<T>,
    max: Point3<T>,
}

impl<T: Scalar + PartialOrd + Copy> AABB<T> {
    /// Creates a bounding box from its corners. Returns `None` if `min` is above `max` on any axis
    /// ```
    /// # use subsurface_core::math::AABB;
    /// let bounds = AABB::from_min_max(nalgebra::Point3::new(0.0, 0.0, 0.0), nalgebra::Point3::new(1.0, 1.0, 1.0));
    /// assert!(bounds.is_some());
    /// ```
    pub fn from_min_max(min: Point3<T>, max: Point3<T>) -> Option<Self> {
        if min.x > max.x || min.y > max.y || min.z > max.z {
            return None;
        }
        Some(Self { min, max })
    }

    /// Smallest bounding box around all `points`, `None` if there are no points
    /// ```
    /// # use subsurface_core::math::AABB;
    /// let points = [nalgebra::Point3::new(1.0, 5.0, -2.0), nalgebra::Point3::new(-1.0, 2.0, 3.0)];
    /// let bounds = AABB::from_points(points.iter()).unwrap();
    /// assert_eq!(*bounds.min(), nalgebra::Point3::new(-1.0, 2.0, -2.0));
    /// assert_eq!(*bounds.max(), nalgebra::Point3::new(1.0, 5.0, 3.0));
    /// ```
    pub fn from_points<'a, I: IntoIterator<Item = &'a Point3<T>>>(points: I) -> Option<Self>
    where
        T: 'a,
    {
        let mut points = points.into_iter();
        let first = *points.next()?;
        let (min, max) = points.fold((first, first), |(mut min, mut max), point| {
            for axis in 0..3 {
                if point[axis] < min[axis] {
                    min[axis] = point[axis];
                }
                if point[axis] > max[axis] {
                    max[axis] = point[axis];
                }
            }
            (min, max)
        });
        Some(Self { min, max })
    }

    pub fn min(&self) -> &Point3<T> {
        &self.min
    }

    pub fn max(&self) -> &Point3<T> {
        &self.max
    }

    /// The bounds as `(xmin, xmax, ymin, ymax, zmin, zmax)`
    /// ```
    /// # use subsurface_core::math::AABB;
    /// let bounds = AABB::from_min_max(nalgebra::Point3::new(0.0, 1.0, 2.0), nalgebra::Point3::new(3.0, 4.0, 5.0)).unwrap();
    /// assert_eq!(bounds.as_extent(), (0.0, 3.0, 1.0, 4.0, 2.0, 5.0));
    /// ```
    pub fn as_extent(&self) -> (T, T, T, T, T, T) {
        (
            self.min.x, self.max.x, self.min.y, self.max.y, self.min.z, self.max.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_bounds_are_rejected() {
        assert!(AABB::from_min_max(Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 1.0)).is_none());
    }

    #[test]
    fn test_from_single_point() {
        let point = Point3::new(2.0, -1.0, 0.5);
        let bounds = AABB::from_points([point].iter()).unwrap();
        assert_eq!(bounds.as_extent(), (2.0, 2.0, -1.0, -1.0, 0.5, 0.5));
    }

    #[test]
    fn test_from_points_empty() {
        let points: Vec<Point3<f64>> = vec![];
        assert!(AABB::from_points(points.iter()).is_none());
    }
}
