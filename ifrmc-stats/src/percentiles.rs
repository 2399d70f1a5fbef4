//! Percentile Computation
//!
//! Empirical percentiles over Monte-Carlo toys using linear interpolation between
//! order statistics (Hyndman-Fan type 7).
//!
//! Sorting uses the IEEE 754 total order, so non-finite toys have a fixed place:
//! `-inf` first, `+inf` after every finite value, and NaN last.

use rayon::prelude::*;

/// Below this length a serial sort beats spinning up the rayon pool
const PARALLEL_SORT_THRESHOLD: usize = 1 << 16;

/// Sort samples ascending under `f64::total_cmp`
///
/// Large inputs are sorted on the global rayon pool. The result is identical to
/// a serial sort since the order is total.
pub fn sort_samples(samples: &mut [f64]) {
    if samples.len() >= PARALLEL_SORT_THRESHOLD {
        samples.par_sort_unstable_by(f64::total_cmp);
    } else {
        samples.sort_unstable_by(f64::total_cmp);
    }
}

/// Compute a percentile from samples that are already sorted ascending
///
/// `percentile` is a rank in `[0, 100]`; values outside are clamped. Uses
/// linear interpolation between nearest ranks: `rank = p * (n - 1)`.
/// Returns 0.0 for an empty slice.
pub fn percentile_of_sorted(sorted: &[f64], percentile: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    if sorted.len() == 1 {
        return sorted[0];
    }

    let n = sorted.len();
    let p = percentile.clamp(0.0, 100.0) / 100.0;

    let rank = p * (n - 1) as f64;
    let lower_idx = (rank.floor() as usize).min(n - 1);
    let upper_idx = (lower_idx + 1).min(n - 1);
    let fraction = rank - lower_idx as f64;

    let lower = sorted[lower_idx];
    let upper = sorted[upper_idx];

    // An exact rank must not mix in its neighbour: inf * 0.0 would be NaN.
    if fraction == 0.0 || lower == upper {
        return lower;
    }

    lower + fraction * (upper - lower)
}

/// Compute a single percentile from unsorted samples
///
/// # Examples
///
/// ```
/// # use ifrmc_stats::compute_percentile;
/// let samples = vec![5.0, 1.0, 4.0, 2.0, 3.0];
/// assert_eq!(compute_percentile(&samples, 50.0), 3.0);
/// ```
pub fn compute_percentile(samples: &[f64], percentile: f64) -> f64 {
    let mut sorted = samples.to_vec();
    sort_samples(&mut sorted);
    percentile_of_sorted(&sorted, percentile)
}

/// Percentile ranks `(low, high)` of the symmetric-tail interval for a confidence level
///
/// `level = 0.95` gives `(2.5, 97.5)`; `level = 0.683` gives `(15.85, 84.15)`.
pub fn tail_percentiles(level: f64) -> (f64, f64) {
    let low = 50.0 * (1.0 - level);
    (low, 100.0 - low)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let p50 = compute_percentile(&samples, 50.0);
        assert!((p50 - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_interpolation_between_ranks() {
        let sorted: Vec<f64> = (0..100).map(|x| x as f64).collect();
        assert!((percentile_of_sorted(&sorted, 2.5) - 2.475).abs() < 1e-9);
        assert!((percentile_of_sorted(&sorted, 97.5) - 96.525).abs() < 1e-9);
        assert!((percentile_of_sorted(&sorted, 15.85) - 15.6915).abs() < 1e-9);
        assert!((percentile_of_sorted(&sorted, 84.15) - 83.3085).abs() < 1e-9);
    }

    #[test]
    fn test_extremes() {
        let sorted: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        assert_eq!(percentile_of_sorted(&sorted, 0.0), 1.0);
        assert_eq!(percentile_of_sorted(&sorted, 100.0), 10.0);
        assert_eq!(percentile_of_sorted(&sorted, 150.0), 10.0);
        assert_eq!(percentile_of_sorted(&sorted, -5.0), 1.0);
    }

    #[test]
    fn test_single_sample() {
        assert_eq!(compute_percentile(&[42.0], 97.5), 42.0);
    }

    #[test]
    fn test_empty_samples() {
        assert_eq!(compute_percentile(&[], 50.0), 0.0);
    }

    #[test]
    fn test_sort_places_non_finite_last() {
        let mut samples = vec![f64::NAN, 2.0, f64::INFINITY, -1.0, f64::NEG_INFINITY];
        sort_samples(&mut samples);
        assert_eq!(samples[0], f64::NEG_INFINITY);
        assert_eq!(samples[1], -1.0);
        assert_eq!(samples[2], 2.0);
        assert_eq!(samples[3], f64::INFINITY);
        assert!(samples[4].is_nan());
    }

    #[test]
    fn test_exact_rank_next_to_infinity() {
        let sorted = vec![1.0, 2.0, f64::INFINITY];
        assert_eq!(percentile_of_sorted(&sorted, 50.0), 2.0);
        assert_eq!(percentile_of_sorted(&sorted, 100.0), f64::INFINITY);
    }

    #[test]
    fn test_parallel_sort_matches_serial() {
        let mut parallel: Vec<f64> = (0..PARALLEL_SORT_THRESHOLD * 2)
            .map(|i| ((i * 7919) % 10007) as f64 * 0.5)
            .collect();
        let mut serial = parallel.clone();
        sort_samples(&mut parallel);
        serial.sort_by(f64::total_cmp);
        assert_eq!(parallel, serial);
    }

    #[test]
    fn test_tail_percentiles() {
        let (lo, hi) = tail_percentiles(0.95);
        assert!((lo - 2.5).abs() < 1e-9);
        assert!((hi - 97.5).abs() < 1e-9);

        let (lo, hi) = tail_percentiles(0.683);
        assert!((lo - 15.85).abs() < 1e-9);
        assert!((hi - 84.15).abs() < 1e-9);
    }
}
