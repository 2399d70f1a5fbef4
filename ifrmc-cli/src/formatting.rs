//! Human-readable terminal output

use ifrmc_report::{HistogramData, Report};

const BAR_WIDTH: usize = 40;

/// Format a report for the terminal
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("IFR Monte-Carlo\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    let study = &report.study;
    output.push_str(&format!(
        "  population: {}  tested: {}  infected: {}  fatal: {}\n",
        study.population, study.tested, study.infected, study.fatal
    ));
    output.push_str(&format!(
        "  infection rate: {:.4}  scaled infections: {:.1}\n",
        study.infection_rate, study.scaled_infections
    ));
    let seed = report
        .meta
        .seed
        .map(|s| s.to_string())
        .unwrap_or_else(|| "entropy".to_string());
    output.push_str(&format!(
        "  model: {}  trials: {}  seed: {}  non-finite: {}\n",
        report.meta.model, study.trials, seed, report.meta.non_finite_policy
    ));

    output.push_str("\nToys\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    for seq in &report.diagnostics {
        output.push_str(&format!(
            "  {:<11} mean: {:<12.4} stddev: {:<12.4} min: {:<10.4} max: {:.4}\n",
            seq.name, seq.mean, seq.std_dev, seq.min, seq.max
        ));
        if seq.non_finite > 0 {
            output.push_str(&format!("              non-finite: {}\n", seq.non_finite));
        }
    }

    if !report.reference.is_empty() {
        output.push_str("\nAnalytic reference\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for r in &report.reference {
            output.push_str(&format!(
                "  {:<16} CL{:.0}: [{:5.3} {:5.3}] %  (point {:5.3} %)\n",
                r.method,
                r.level * 100.0,
                r.lower_pct,
                r.upper_pct,
                r.point_pct
            ));
        }
    }

    for histogram in &report.histograms {
        output.push_str(&format_histogram(histogram));
    }

    output.push('\n');
    output.push_str(&report.ifr.summary_line());
    output.push('\n');
    if report.ifr.non_finite > 0 {
        output.push_str(&format!(
            "  ({} of {} IFR toys were NaN or infinite)\n",
            report.ifr.non_finite, report.ifr.samples
        ));
    }
    output.push_str(&format!("\nTotal time: {:.1} ms\n", report.meta.duration_ms));

    output
}

/// ASCII bars for every non-empty bin
fn format_histogram(histogram: &HistogramData) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", histogram.x_label));
    output.push_str(&"-".repeat(60));
    output.push('\n');

    let max = histogram.counts.iter().copied().max().unwrap_or(0);
    if max == 0 {
        output.push_str("  (no toys in range)\n");
    } else {
        for (i, &count) in histogram.counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let width = ((count as f64 / max as f64) * BAR_WIDTH as f64).round() as usize;
            output.push_str(&format!(
                "  [{:>10.4}, {:>10.4}) {:>9} {}\n",
                histogram.edges[i],
                histogram.edges[i + 1],
                count,
                "#".repeat(width.max(1))
            ));
        }
    }

    let outside = histogram.underflow + histogram.overflow + histogram.non_finite;
    if outside > 0 {
        output.push_str(&format!(
            "  outside: {} below, {} above, {} non-finite\n",
            histogram.underflow, histogram.overflow, histogram.non_finite
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HistogramConfig;
    use crate::report::build_report;
    use ifrmc_core::{RunConfig, SamplingModel, StudyParameters, run};

    #[test]
    fn test_human_output_ends_with_summary() {
        let estimate = run(&RunConfig::new(
            StudyParameters::REFERENCE.with_trials(2_000),
            SamplingModel::GaussianScaling,
        )
        .with_seed(5)
        .retaining_samples())
        .unwrap();
        let report = build_report(&estimate, None, &HistogramConfig::default(), 1.5);
        let output = format_human_output(&report);

        assert!(output.contains("IFR Monte-Carlo"));
        assert!(output.contains("model: gaussian"));
        assert!(output.contains("IFR (%)"));
        assert!(output.contains(&report.ifr.summary_line()));
    }

    #[test]
    fn test_histogram_skips_empty_bins() {
        let data = HistogramData {
            name: "fatalities".to_string(),
            x_label: "Fatalities".to_string(),
            edges: vec![0.0, 1.0, 2.0, 3.0],
            counts: vec![4, 0, 2],
            density: vec![],
            underflow: 0,
            overflow: 1,
            non_finite: 0,
        };
        let text = format_histogram(&data);
        let bars: Vec<&str> = text.lines().filter(|l| l.contains('#')).collect();
        assert_eq!(bars.len(), 2);
        assert!(bars[0].ends_with(&"#".repeat(BAR_WIDTH)));
        assert!(text.contains("1 above"));
    }
}
