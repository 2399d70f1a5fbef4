//! Property tests for the sampler and ratio estimator

use ifrmc_core::{IfrError, Sampler, SamplingModel, StudyParameters, estimate_ratios};
use proptest::prelude::*;

fn study() -> impl Strategy<Value = StudyParameters> {
    (1u64..5_000, 0u64..=30, 1u64..300).prop_flat_map(|(population, fatal, trials)| {
        (1..=population).prop_flat_map(move |tested| {
            (0..=tested).prop_map(move |infected| StudyParameters {
                population,
                tested,
                infected,
                fatal,
                trials,
            })
        })
    })
}

fn model() -> impl Strategy<Value = SamplingModel> {
    prop_oneof![
        Just(SamplingModel::GaussianScaling),
        Just(SamplingModel::BinomialResampling),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn sequences_have_trials_length(params in study(), model in model(), seed in any::<u64>()) {
        let toys = Sampler::seeded(params, model, seed).unwrap().sample();
        prop_assert_eq!(toys.infections.len() as u64, params.trials);
        prop_assert_eq!(toys.fatalities.len() as u64, params.trials);
    }

    #[test]
    fn binomial_infections_bounded_by_population(params in study(), seed in any::<u64>()) {
        let toys = Sampler::seeded(params, SamplingModel::BinomialResampling, seed)
            .unwrap()
            .sample();
        for i in toys.infections {
            prop_assert!(i >= 0.0);
            prop_assert!(i <= params.population as f64);
            prop_assert_eq!(i.fract(), 0.0);
        }
    }

    #[test]
    fn fatalities_are_non_negative_integers(params in study(), model in model(), seed in any::<u64>()) {
        let toys = Sampler::seeded(params, model, seed).unwrap().sample();
        for f in toys.fatalities {
            prop_assert!(f >= 0.0);
            prop_assert_eq!(f.fract(), 0.0);
        }
    }

    #[test]
    fn ratios_are_exact_quotients(params in study(), model in model(), seed in any::<u64>()) {
        let toys = Sampler::seeded(params, model, seed).unwrap().sample();
        let ratios = estimate_ratios(&toys.fatalities, &toys.infections);
        prop_assert_eq!(ratios.len(), toys.len());
        for (i, r) in ratios.iter().enumerate() {
            let expected = toys.fatalities[i] / toys.infections[i];
            prop_assert_eq!(r.to_bits(), expected.to_bits());
        }
    }

    #[test]
    fn zero_tested_always_rejected(population in 0u64..1000, trials in 1u64..100) {
        let params = StudyParameters { population, tested: 0, infected: 0, fatal: 1, trials };
        let rejected = matches!(
            Sampler::seeded(params, SamplingModel::GaussianScaling, 0),
            Err(IfrError::InvalidParameters(_))
        );
        prop_assert!(rejected);
    }
}
