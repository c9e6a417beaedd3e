//! Core traits for phists
//!
//! Aggregators never own histograms. They book through a
//! [`HistogramService`], keep the returned [`HistId`] handles, and fill
//! through the same service on every event. The concrete store lives in
//! `ph-histo`; tests substitute recording doubles.

use crate::Result;
use crate::types::HistId;

/// Histogramming collaborator.
pub trait HistogramService {
    /// Book a 1-D histogram with `n_bins` uniform bins over `[low, high)`.
    ///
    /// The histogram is registered under `base + name`. Booking a name that
    /// already exists is an error.
    fn book(
        &mut self,
        base: &str,
        name: &str,
        title: &str,
        n_bins: usize,
        low: f64,
        high: f64,
    ) -> Result<HistId>;

    /// Add `weight` to the bin containing `value`.
    fn fill(&mut self, id: HistId, value: f64, weight: f64) -> Result<()>;
}

impl<T: HistogramService + ?Sized> HistogramService for &mut T {
    fn book(
        &mut self,
        base: &str,
        name: &str,
        title: &str,
        n_bins: usize,
        low: f64,
        high: f64,
    ) -> Result<HistId> {
        (**self).book(base, name, title, n_bins, low, high)
    }

    fn fill(&mut self, id: HistId, value: f64, weight: f64) -> Result<()> {
        (**self).fill(id, value, weight)
    }
}
