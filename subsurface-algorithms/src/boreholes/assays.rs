use float_ord::FloatOrd;
use subsurface_core::tables::AssayRow;

/// Linearly interpolates the samples `(depth, value)` at each depth of `basis`. Samples with a NaN value are ignored.
/// Depths outside of the sampled range are NaN
/// ```
/// # use subsurface_algorithms::boreholes::interpolate_samples;
/// let log = interpolate_samples(&[(10.0, 1.0), (20.0, 3.0)], &[0.0, 15.0, 20.0]);
/// assert!(log[0].is_nan());
/// assert_eq!(&log[1..], &[2.0, 3.0]);
/// ```
pub fn interpolate_samples(samples: &[(f64, f64)], basis: &[f64]) -> Vec<f64> {
    let mut samples = samples
        .iter()
        .copied()
        .filter(|(depth, value)| depth.is_finite() && !value.is_nan())
        .collect::<Vec<_>>();
    samples.sort_by_key(|(depth, _)| FloatOrd(*depth));

    basis
        .iter()
        .map(|depth| {
            let upper = samples.partition_point(|(sample_depth, _)| sample_depth < depth);
            match (upper.checked_sub(1).and_then(|idx| samples.get(idx)), samples.get(upper)) {
                (_, Some((d, v))) if d == depth => *v,
                (Some((d0, v0)), Some((d1, v1))) => v0 + (v1 - v0) * (depth - d0) / (d1 - d0),
                _ => f64::NAN,
            }
        })
        .collect()
}

/// Samples every channel of the assay rows of one well at the given depths. Returns one log per channel
pub fn assay_logs<'a, I: IntoIterator<Item = &'a AssayRow>>(
    rows: I,
    n_channels: usize,
    basis: &[f64],
) -> Vec<Vec<f64>> {
    let rows = rows.into_iter().collect::<Vec<_>>();
    (0..n_channels)
        .map(|channel| {
            let samples = rows
                .iter()
                .map(|row| (row.basis, row.values.get(channel).copied().unwrap_or(f64::NAN)))
                .collect::<Vec<_>>();
            interpolate_samples(&samples, basis)
        })
        .collect()
}
