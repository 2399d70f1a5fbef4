//! Report Building
//!
//! Converts an [`Estimate`] into the serializable [`Report`], binning the
//! retained toys into histograms along the way.

use crate::config::HistogramConfig;
use chrono::Utc;
use ifrmc_core::{AnalyticReference, Estimate, SampleSequences};
use ifrmc_report::{
    HistogramData, IfrMetrics, Report, ReferenceInterval, ReportMeta, SCHEMA_VERSION,
    SequenceMetrics, StudyInfo,
};
use ifrmc_stats::{Histogram, SampleSummary};

/// Build a complete report from an estimate
pub fn build_report(
    estimate: &Estimate,
    reference: Option<&AnalyticReference>,
    histograms: &HistogramConfig,
    duration_ms: f64,
) -> Report {
    let params = &estimate.params;

    let meta = ReportMeta {
        schema_version: SCHEMA_VERSION,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        model: estimate.model.to_string(),
        seed: estimate.seed,
        non_finite_policy: estimate.non_finite.to_string(),
        duration_ms,
    };

    let study = StudyInfo {
        population: params.population,
        tested: params.tested,
        infected: params.infected,
        fatal: params.fatal,
        trials: params.trials,
        infection_rate: params.infection_rate(),
        scaled_infections: params.scaled_infections(),
    };

    let diagnostics = vec![
        SequenceMetrics::new("infections", &estimate.infections),
        SequenceMetrics::new("fatalities", &estimate.fatalities),
        SequenceMetrics::new("ifr", &estimate.ratio_stats),
    ];

    let reference = reference.map(reference_intervals).unwrap_or_default();

    let histograms = match &estimate.samples {
        Some(samples) => build_histograms(estimate, samples, histograms),
        None => Vec::new(),
    };

    Report {
        meta,
        study,
        ifr: IfrMetrics::from(&estimate.summary),
        diagnostics,
        reference,
        histograms,
    }
}

fn reference_intervals(reference: &AnalyticReference) -> Vec<ReferenceInterval> {
    let point = reference.point_estimate;
    vec![
        ReferenceInterval::new("clopper-pearson", point, &reference.clopper_pearson_68),
        ReferenceInterval::new("clopper-pearson", point, &reference.clopper_pearson_95),
        ReferenceInterval::new("poisson", point, &reference.poisson_68),
        ReferenceInterval::new("poisson", point, &reference.poisson_95),
    ]
}

fn build_histograms(
    estimate: &Estimate,
    samples: &SampleSequences,
    config: &HistogramConfig,
) -> Vec<HistogramData> {
    let mut histograms = Vec::with_capacity(3);

    if let Some(mut h) = infection_histogram(&estimate.infections, config) {
        h.fill_scaled(&samples.infections, 1.0);
        histograms.push(HistogramData::new("infections", "Infections", &h));
    }

    let fatal_edges: Vec<f64> = (0..=config.fatal_max).map(|k| k as f64).collect();
    if let Some(mut h) = Histogram::with_edges(fatal_edges) {
        h.fill_scaled(&samples.fatalities, 1.0);
        histograms.push(HistogramData::new("fatalities", "Fatalities", &h));
    }

    if let Some(mut h) = Histogram::linspace(0.0, config.ifr_max_pct, config.ifr_bins) {
        h.fill_scaled(&estimate.ratios, 100.0);
        histograms.push(HistogramData::new("ifr", "IFR (%)", &h));
    }

    histograms
}

/// Range of `sigmas` standard deviations around the infection mean.
/// A degenerate sequence gets a unit-wide window so it still lands in a bin.
fn infection_histogram(summary: &SampleSummary, config: &HistogramConfig) -> Option<Histogram> {
    if summary.count == 0 || !summary.mean.is_finite() {
        return None;
    }
    let half_width = if summary.std_dev > 0.0 {
        config.infection_sigmas * summary.std_dev
    } else {
        0.5
    };
    let low = (summary.mean - half_width).max(0.0);
    let high = summary.mean + half_width;
    Histogram::linspace(low, high, config.infection_bins)
}
