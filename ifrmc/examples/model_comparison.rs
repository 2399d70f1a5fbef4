//! Model Comparison
//!
//! Runs both infection models on the reference study and prints them next to
//! the closed-form intervals.
//!
//! Run with:
//!   cargo run --release --example model_comparison
//!   cargo run --release --example model_comparison -- 250000   # toy count

use ifrmc::prelude::*;
use ifrmc::{AnalyticReference, ConfidenceInterval};

fn main() -> Result<(), IfrError> {
    let trials = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(200_000);
    let params = StudyParameters::REFERENCE.with_trials(trials);

    println!(
        "population {}  tested {}  infected {}  fatal {}  ({} toys)\n",
        params.population, params.tested, params.infected, params.fatal, params.trials
    );

    for model in [SamplingModel::GaussianScaling, SamplingModel::BinomialResampling] {
        let estimate = run(&RunConfig::new(params, model).with_seed(42))?;
        let pct = estimate.summary.to_percent();
        println!(
            "{:<16} <IFR> = {:5.3} %  CL68: {}  CL95: {}  (infections {:.1} ± {:.1})",
            model.to_string(),
            pct.mean,
            bracket(&pct.ci68),
            bracket(&pct.ci95),
            estimate.infections.mean,
            estimate.infections.std_dev,
        );
    }

    let reference = AnalyticReference::compute(&params)?;
    println!();
    println!(
        "{:<16} <IFR> = {:5.3} %  CL68: {}  CL95: {}",
        "clopper-pearson",
        reference.point_estimate * 100.0,
        bracket(&reference.clopper_pearson_68.scaled(100.0)),
        bracket(&reference.clopper_pearson_95.scaled(100.0)),
    );
    println!(
        "{:<16} <IFR> = {:5.3} %  CL68: {}  CL95: {}",
        "poisson",
        reference.point_estimate * 100.0,
        bracket(&reference.poisson_68.scaled(100.0)),
        bracket(&reference.poisson_95.scaled(100.0)),
    );

    Ok(())
}

fn bracket(interval: &ConfidenceInterval) -> String {
    format!("[{:5.3} {:5.3}] %", interval.lower, interval.upper)
}
