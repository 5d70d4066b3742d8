use float_ord::FloatOrd;

/// Computes the `q`-quantile of `values` using linear interpolation between the two closest ranks. NaN values are
/// ignored. Returns `None` if there are no values or if `q` is not within `[0, 1]`
/// ```
/// # use subsurface_core::math::quantile;
/// assert_eq!(quantile(&[1.0, 2.0, 3.0, 4.0, 100.0], 0.5), Some(3.0));
/// assert_eq!(quantile(&[1.0, 2.0, 3.0, 4.0, 100.0], 1.0), Some(100.0));
/// ```
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if !(0.0..=1.0).contains(&q) {
        return None;
    }
    let mut sorted = values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .map(FloatOrd)
        .collect::<Vec<_>>();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort();

    let rank = q * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    let (FloatOrd(low), FloatOrd(high)) = (sorted[lower], sorted[upper]);
    Some(low + (high - low) * fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_quantile_interpolates() {
        let q = quantile(&[1.0, 2.0, 3.0, 4.0, 100.0], 0.8).unwrap();
        assert_approx_eq!(q, 23.2);
    }

    #[test]
    fn test_quantile_ignores_nan() {
        assert_eq!(quantile(&[f64::NAN, 5.0], 0.0), Some(5.0));
        assert_eq!(quantile(&[f64::NAN], 0.5), None);
        assert_eq!(quantile(&[1.0], 1.5), None);
    }
}
