//! Uniform-binned 1-D histogram.

use serde::{Deserialize, Serialize};

/// Where a value lands on a histogram axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinIndex {
    /// Below the lower edge.
    Underflow,
    /// In-range bin (0-based).
    Bin(usize),
    /// At or above the upper edge, or NaN.
    Overflow,
}

/// A 1D histogram with uniform bins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hist1D {
    /// Histogram name (full, including the booking base).
    pub name: String,
    /// Histogram title.
    pub title: String,
    /// Number of bins (excluding under/overflow).
    pub n_bins: usize,
    /// Lower edge of first bin.
    pub x_min: f64,
    /// Upper edge of last bin.
    pub x_max: f64,
    /// Bin contents (sum of weights, length = n_bins).
    pub bin_content: Vec<f64>,
    /// Sum of weights squared per bin.
    pub sumw2: Vec<f64>,
    /// Underflow sum of weights.
    pub underflow: f64,
    /// Overflow sum of weights.
    pub overflow: f64,
    /// Underflow sum of weights squared.
    pub underflow_sumw2: f64,
    /// Overflow sum of weights squared.
    pub overflow_sumw2: f64,
    /// Number of fill calls, including under/overflow.
    pub entries: u64,
}

impl Hist1D {
    /// Empty histogram. Binning is validated by the caller
    /// ([`crate::HistSet::book`]).
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        n_bins: usize,
        x_min: f64,
        x_max: f64,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            n_bins,
            x_min,
            x_max,
            bin_content: vec![0.0; n_bins],
            sumw2: vec![0.0; n_bins],
            underflow: 0.0,
            overflow: 0.0,
            underflow_sumw2: 0.0,
            overflow_sumw2: 0.0,
            entries: 0,
        }
    }

    /// Bin width.
    pub fn bin_width(&self) -> f64 {
        (self.x_max - self.x_min) / self.n_bins as f64
    }

    /// Bin edges (length = n_bins + 1).
    pub fn bin_edges(&self) -> Vec<f64> {
        let w = self.bin_width();
        (0..=self.n_bins).map(|i| self.x_min + w * i as f64).collect()
    }

    /// Centre of in-range bin `i`.
    pub fn bin_center(&self, i: usize) -> f64 {
        self.x_min + self.bin_width() * (i as f64 + 0.5)
    }

    /// Locate `x` on the axis.
    ///
    /// `x < x_min` is underflow, `x >= x_max` is overflow. NaN is treated as
    /// overflow so that a degenerate ratio never disappears silently. A
    /// histogram without bins sends everything in range to overflow.
    pub fn find_bin(&self, x: f64) -> BinIndex {
        if x < self.x_min {
            return BinIndex::Underflow;
        }
        if x.is_nan() || x >= self.x_max || self.n_bins == 0 {
            return BinIndex::Overflow;
        }
        let b = (self.n_bins as f64 * (x - self.x_min) / (self.x_max - self.x_min)) as usize;
        // Rounding can push values just below x_max onto n_bins.
        BinIndex::Bin(b.min(self.n_bins - 1))
    }

    /// Add `weight` at `x`.
    pub fn fill(&mut self, x: f64, weight: f64) -> BinIndex {
        let w2 = weight * weight;
        let bin = self.find_bin(x);
        match bin {
            BinIndex::Underflow => {
                self.underflow += weight;
                self.underflow_sumw2 += w2;
            }
            BinIndex::Overflow => {
                self.overflow += weight;
                self.overflow_sumw2 += w2;
            }
            BinIndex::Bin(b) => {
                self.bin_content[b] += weight;
                self.sumw2[b] += w2;
            }
        }
        self.entries += 1;
        bin
    }

    /// Sum of in-range weights.
    pub fn integral(&self) -> f64 {
        self.bin_content.iter().sum()
    }

    /// Statistical error of bin `i` (sqrt of `sumw2`).
    pub fn bin_error(&self, i: usize) -> f64 {
        self.sumw2[i].sqrt()
    }

    /// Weighted mean of in-range fills, evaluated at bin centres.
    pub fn mean(&self) -> Option<f64> {
        let sumw = self.integral();
        if sumw == 0.0 {
            return None;
        }
        let sumwx: f64 =
            self.bin_content.iter().enumerate().map(|(i, w)| w * self.bin_center(i)).sum();
        Some(sumwx / sumw)
    }
}
