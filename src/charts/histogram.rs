//! Equal-width binning for histogram charts.

/// Bin count used by the fare and distance histograms.
pub const HISTOGRAM_BINS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn label(&self) -> String {
        format!("{:.2}-{:.2}", self.lo, self.hi)
    }
}

/// Bin `values` into `bins` equal-width bins spanning their observed range.
///
/// Every bin is half-open except the last, which also holds the maximum.
/// A degenerate range (all values equal) is widened to `[v - 0.5, v + 0.5]`.
/// Returns no bins for empty input or non-finite values only.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (mut lo, mut hi) = finite
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if hi <= lo {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lo: lo + i as f64 * width,
            hi: if i + 1 == bins { hi } else { lo + (i + 1) as f64 * width },
            count: 0,
        })
        .collect();

    for v in finite {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }

    out
}
