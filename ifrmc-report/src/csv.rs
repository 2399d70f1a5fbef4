//! CSV Output
//!
//! One row per histogram bin, suitable for plotting elsewhere:
//! `histogram,lower,upper,count,density`.

use crate::report::Report;

/// Generate the histogram bin table
pub fn generate_csv_report(report: &Report) -> String {
    let mut output = String::from("histogram,lower,upper,count,density\n");

    for histogram in &report.histograms {
        for (i, window) in histogram.edges.windows(2).enumerate() {
            output.push_str(&format!(
                "{},{},{},{},{}\n",
                escape(&histogram.name),
                window[0],
                window[1],
                histogram.counts[i],
                histogram.density[i],
            ));
        }
    }

    output
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
