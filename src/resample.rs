//! Time series decimation
//!
//! Provider-native market charts are irregular and oversized; every stored
//! series is cut down to its period's fixed point capacity by stride-based
//! decimation. No interpolation or averaging, so every output point is a
//! real observed sample.

use crate::cache::PricePoint;

/// Decimate `points` down to at most `target_count` evenly strided samples
///
/// With `n` input points the stride is `max(1, n / target_count)`; the walk
/// stops once `target_count` points are collected or the input runs out.
/// Fewer inputs than the target are kept as-is, and an empty input yields an
/// empty output (the caller treats that period as unpopulated).
pub fn resample(points: &[PricePoint], target_count: usize) -> Vec<PricePoint> {
    if points.is_empty() || target_count == 0 {
        return Vec::new();
    }

    let step = (points.len() / target_count).max(1);
    let mut resampled = Vec::with_capacity(target_count.min(points.len()));

    for point in points.iter().step_by(step) {
        if resampled.len() >= target_count {
            break;
        }
        resampled.push(*point);
    }

    resampled
}
