//! Integration tests for ifrmc
//!
//! These tests run the estimator end to end through the public facade.

use ifrmc::{
    AnalyticReference, IfrError, NonFinitePolicy, RunConfig, Sampler, SamplingModel,
    StudyParameters, estimate, estimate_ratios, extract_intervals, parse_json_report,
};

/// The published study with a million binomial toys lands on the known result
#[test]
fn test_reference_study_binomial() {
    let config = RunConfig::new(StudyParameters::REFERENCE, SamplingModel::BinomialResampling)
        .with_seed(2020);
    let result = estimate(&config).unwrap();
    let pct = result.summary.to_percent();

    assert_eq!(result.ratios.len(), 1_000_000);
    assert!(pct.mean > 0.30 && pct.mean < 0.45, "mean {}", pct.mean);
    assert!(pct.ci95.lower > 0.08 && pct.ci95.lower < 0.16, "{:?}", pct.ci95);
    assert!(pct.ci95.upper > 0.60 && pct.ci95.upper < 0.80, "{:?}", pct.ci95);
    assert!(pct.is_nested());

    // Binomial infections stay near infected * population / tested
    let expected = StudyParameters::REFERENCE.scaled_infections();
    assert!((result.infections.mean - expected).abs() < 1.0);
    assert!((result.fatalities.mean - 7.0).abs() < 0.05);
}

/// Both models agree to within the fatality-dominated spread
#[test]
fn test_models_agree_on_reference_study() {
    let params = StudyParameters::REFERENCE.with_trials(100_000);
    let a = estimate(&RunConfig::new(params, SamplingModel::GaussianScaling).with_seed(1)).unwrap();
    let b =
        estimate(&RunConfig::new(params, SamplingModel::BinomialResampling).with_seed(1)).unwrap();

    // Gaussian scaling carries the sampling error of the tested group, so it is wider
    assert!(a.infections.std_dev > b.infections.std_dev);
    assert!((a.summary.mean - b.summary.mean).abs() < 0.0005);
}

/// Same seed, same toys, same intervals
#[test]
fn test_seeded_runs_are_reproducible() {
    let params = StudyParameters::REFERENCE.with_trials(10_000);
    for model in [SamplingModel::GaussianScaling, SamplingModel::BinomialResampling] {
        let config = RunConfig::new(params, model).with_seed(99);
        let first = estimate(&config).unwrap();
        let second = estimate(&config).unwrap();
        assert_eq!(first.ratios, second.ratios);
        assert_eq!(first.summary, second.summary);

        let other = estimate(&config.clone().with_seed(100)).unwrap();
        assert_ne!(first.ratios, other.ratios);
    }
}

/// Sampler, ratio estimator and extractor compose to the same result as the engine
#[test]
fn test_pipeline_matches_engine() {
    let params = StudyParameters::REFERENCE.with_trials(5_000);
    let model = SamplingModel::BinomialResampling;

    let toys = Sampler::seeded(params, model, 7).unwrap().sample();
    let ratios = estimate_ratios(&toys.fatalities, &toys.infections);
    let manual = extract_intervals(ratios, NonFinitePolicy::Propagate).unwrap();

    let engine = estimate(&RunConfig::new(params, model).with_seed(7)).unwrap();
    assert_eq!(manual, engine.summary);
}

/// Intervals nest around the mean once there are enough toys
#[test]
fn test_intervals_nested_for_many_studies() {
    let studies = [
        StudyParameters::new(10_000, 500, 50, 20, 2_000).unwrap(),
        StudyParameters::new(1_000_000, 2_000, 30, 150, 2_000).unwrap(),
        StudyParameters::new(800, 800, 400, 3, 2_000).unwrap(),
    ];
    for params in studies {
        for model in [SamplingModel::GaussianScaling, SamplingModel::BinomialResampling] {
            let result = estimate(&RunConfig::new(params, model).with_seed(5)).unwrap();
            assert!(result.summary.is_nested(), "{:?} {:?}", params, result.summary);
        }
    }
}

/// Zero tested is rejected before any toy is drawn
#[test]
fn test_zero_tested_rejected() {
    let params = StudyParameters {
        tested: 0,
        ..StudyParameters::REFERENCE
    };
    let result = estimate(&RunConfig::new(params, SamplingModel::GaussianScaling));
    assert!(matches!(result, Err(IfrError::InvalidParameters(_))));
    assert!(matches!(
        StudyParameters::new(100, 0, 0, 1, 10),
        Err(IfrError::InvalidParameters(_))
    ));
}

/// Zero fatalities give a degenerate zero distribution
#[test]
fn test_zero_fatalities() {
    let params = StudyParameters::new(12_597, 919, 138, 0, 1_000).unwrap();
    let result = estimate(&RunConfig::new(params, SamplingModel::BinomialResampling).with_seed(3))
        .unwrap();
    assert_eq!(result.summary.mean, 0.0);
    assert_eq!(result.summary.ci95.lower, 0.0);
    assert_eq!(result.summary.ci95.upper, 0.0);
}

/// Percentiles follow linear interpolation between closest ranks
#[test]
fn test_percentiles_of_known_sequence() {
    let values: Vec<f64> = (0..100).map(f64::from).collect();
    let summary = extract_intervals(values, NonFinitePolicy::Propagate).unwrap();

    assert!((summary.mean - 49.5).abs() < 1e-12);
    assert!((summary.ci95.lower - 2.475).abs() < 1e-9);
    assert!((summary.ci95.upper - 96.525).abs() < 1e-9);
    assert!((summary.ci68.lower - 15.6915).abs() < 1e-9);
    assert!((summary.ci68.upper - 83.3085).abs() < 1e-9);
}

/// Analytic intervals bracket the Monte-Carlo mean
#[test]
fn test_analytic_reference_brackets_estimate() {
    let params = StudyParameters::REFERENCE.with_trials(50_000);
    let result =
        estimate(&RunConfig::new(params, SamplingModel::BinomialResampling).with_seed(8)).unwrap();
    let reference = AnalyticReference::compute(&params).unwrap();

    assert!(reference.clopper_pearson_95.contains(result.summary.mean));
    assert!(reference.poisson_95.contains(result.summary.mean));
}

/// A JSON report written by the CLI parses back
#[test]
fn test_cli_json_report_round_trip() {
    use clap::Parser;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.json");
    let cli = ifrmc_cli::Cli::parse_from([
        "ifrmc",
        "--trials",
        "3000",
        "--seed",
        "12",
        "--model",
        "gaussian",
        "--format",
        "json",
        "--quiet",
        "--output",
        out.to_str().unwrap(),
    ]);
    ifrmc_cli::run_with_cli(cli).unwrap();

    let json = std::fs::read_to_string(&out).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["meta"]["model"], "gaussian");

    let report = parse_json_report(&json).unwrap();
    assert_eq!(report.study.trials, 3000);
    assert_eq!(report.ifr.samples, 3000);
    assert!(report.ifr.ci95_lower_pct <= report.ifr.ci68_lower_pct);
    assert!(report.ifr.ci68_upper_pct <= report.ifr.ci95_upper_pct);
}
