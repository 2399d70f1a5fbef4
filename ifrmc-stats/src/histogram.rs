//! Histograms
//!
//! Fixed-edge binning: every bin is half-open `[a, b)`
//! except the last, which also includes its right edge. Values outside the edges
//! and non-finite values are tallied separately instead of being dropped silently.

/// Binned counts of a toy sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<u64>,
    underflow: u64,
    overflow: u64,
    non_finite: u64,
}

impl Histogram {
    /// Create `bins` equal-width bins spanning `[low, high]`
    ///
    /// Returns `None` if `bins == 0` or the range is empty or non-finite.
    pub fn linspace(low: f64, high: f64, bins: usize) -> Option<Self> {
        if bins == 0 || !low.is_finite() || !high.is_finite() || high <= low {
            return None;
        }

        let step = (high - low) / bins as f64;
        let mut edges: Vec<f64> = (0..bins).map(|i| low + step * i as f64).collect();
        edges.push(high);
        Self::with_edges(edges)
    }

    /// Create bins from explicit, strictly increasing edges
    pub fn with_edges(edges: Vec<f64>) -> Option<Self> {
        if edges.len() < 2
            || edges.iter().any(|e| !e.is_finite())
            || edges.windows(2).any(|w| w[1] <= w[0])
        {
            return None;
        }

        let bins = edges.len() - 1;
        Some(Self {
            edges,
            counts: vec![0; bins],
            underflow: 0,
            overflow: 0,
            non_finite: 0,
        })
    }

    /// Add one value
    pub fn fill(&mut self, value: f64) {
        if !value.is_finite() {
            self.non_finite += 1;
            return;
        }

        let last = self.edges.len() - 1;
        if value < self.edges[0] {
            self.underflow += 1;
        } else if value > self.edges[last] {
            self.overflow += 1;
        } else if value == self.edges[last] {
            self.counts[last - 1] += 1;
        } else {
            // First edge strictly greater than value, minus one
            let idx = self.edges.partition_point(|&e| e <= value) - 1;
            self.counts[idx] += 1;
        }
    }

    /// Add every value of a slice, each multiplied by `scale` first
    pub fn fill_scaled(&mut self, values: &[f64], scale: f64) {
        for &value in values {
            self.fill(value * scale);
        }
    }

    /// Bin edges (one more than the number of bins)
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Raw count per bin
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Number of bins
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Values below the first edge
    pub fn underflow(&self) -> u64 {
        self.underflow
    }

    /// Values above the last edge
    pub fn overflow(&self) -> u64 {
        self.overflow
    }

    /// NaN or infinite values
    pub fn non_finite(&self) -> u64 {
        self.non_finite
    }

    /// Values that landed inside the edges
    pub fn in_range(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Probability density per bin: integrates to one over the covered range
    pub fn density(&self) -> Vec<f64> {
        let total = self.in_range();
        if total == 0 {
            return vec![0.0; self.bins()];
        }

        self.counts
            .iter()
            .zip(self.edges.windows(2))
            .map(|(&c, w)| c as f64 / (total as f64 * (w[1] - w[0])))
            .collect()
    }

    /// Fraction of in-range values per bin (sums to one)
    pub fn fractions(&self) -> Vec<f64> {
        let total = self.in_range();
        if total == 0 {
            return vec![0.0; self.bins()];
        }
        self.counts
            .iter()
            .map(|&c| c as f64 / total as f64)
            .collect()
    }

    /// Index of the fullest bin (first one on ties)
    pub fn mode_bin(&self) -> Option<usize> {
        let max = *self.counts.iter().max()?;
        self.counts.iter().position(|&c| c == max)
    }
}
