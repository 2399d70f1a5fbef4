//! Ratio Estimator
//!
//! Pairs the i-th fatality toy with the i-th infection toy. The two sequences
//! are independent, and positional pairing is what turns them into a sample of
//! the IFR distribution.
//!
//! Division follows IEEE 754 with no masking: `k / 0` is `+inf` for `k > 0`
//! and `0 / 0` is NaN. Whether those toys survive is decided later by the
//! interval extractor's [`NonFinitePolicy`](ifrmc_stats::NonFinitePolicy).

/// IFR of one toy pair, as a fraction
#[inline]
pub fn ratio(fatalities: f64, infections: f64) -> f64 {
    fatalities / infections
}

/// Element-wise `fatalities[i] / infections[i]`
///
/// # Panics
///
/// Panics if the sequences differ in length.
pub fn estimate_ratios(fatalities: &[f64], infections: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(fatalities.len());
    extend_ratios(&mut out, fatalities, infections);
    out
}

/// Append the ratios of one batch to `out`
///
/// # Panics
///
/// Panics if the sequences differ in length.
pub fn extend_ratios(out: &mut Vec<f64>, fatalities: &[f64], infections: &[f64]) {
    assert_eq!(
        fatalities.len(),
        infections.len(),
        "fatality and infection toys must be paired one to one"
    );
    out.extend(
        fatalities
            .iter()
            .zip(infections)
            .map(|(&f, &i)| ratio(f, i)),
    );
}
