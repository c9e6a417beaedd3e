//! Booking registry: owns every histogram and hands out [`HistId`] handles.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use ph_core::{Error, HistId, HistogramService, Result};

use crate::histogram::Hist1D;

static NEXT_SET_ID: AtomicU64 = AtomicU64::new(1);

/// Named collection of booked histograms, in booking order.
///
/// Every set carries its own instance id and only accepts handles it issued.
/// A clone keeps the id, so handles stay valid in both copies.
#[derive(Debug, Clone)]
pub struct HistSet {
    set_id: u64,
    hists: Vec<Hist1D>,
    index: HashMap<String, HistId>,
}

impl Default for HistSet {
    fn default() -> Self {
        Self::new()
    }
}

impl HistSet {
    /// Empty set.
    pub fn new() -> Self {
        Self {
            set_id: NEXT_SET_ID.fetch_add(1, Ordering::Relaxed),
            hists: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Instance id stamped into every handle this set issues.
    pub fn set_id(&self) -> u64 {
        self.set_id
    }

    fn slot(&self, id: HistId) -> Result<usize> {
        if id.set != self.set_id || id.index >= self.hists.len() {
            log::error!("handle {id} was not issued by histogram set {}", self.set_id);
            return Err(Error::Lookup(format!(
                "handle {id} was not issued by histogram set {}",
                self.set_id
            )));
        }
        Ok(id.index)
    }

    /// Number of booked histograms.
    pub fn len(&self) -> usize {
        self.hists.len()
    }

    /// Whether nothing has been booked.
    pub fn is_empty(&self) -> bool {
        self.hists.is_empty()
    }

    /// Handle for a full histogram name.
    pub fn id(&self, name: &str) -> Option<HistId> {
        self.index.get(name).copied()
    }

    /// Histogram by full name.
    pub fn get(&self, name: &str) -> Option<&Hist1D> {
        self.id(name).map(|id| &self.hists[id.index])
    }

    /// Histogram by handle. Handles from another set are a [`Error::Lookup`].
    pub fn by_id(&self, id: HistId) -> Result<&Hist1D> {
        let i = self.slot(id)?;
        Ok(&self.hists[i])
    }

    /// Full names in booking order.
    pub fn names(&self) -> Vec<&str> {
        self.hists.iter().map(|h| h.name.as_str()).collect()
    }

    /// Iterate histograms in booking order.
    pub fn iter(&self) -> impl Iterator<Item = &Hist1D> {
        self.hists.iter()
    }

    /// Total fill calls across all histograms.
    pub fn total_entries(&self) -> u64 {
        self.hists.iter().map(|h| h.entries).sum()
    }

    /// Serialize all histograms (booking order) as a JSON array.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(&self.hists)?)
    }

    /// Write all histograms to `path` as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.hists)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

impl HistogramService for HistSet {
    fn book(
        &mut self,
        base: &str,
        name: &str,
        title: &str,
        n_bins: usize,
        low: f64,
        high: f64,
    ) -> Result<HistId> {
        let full = format!("{base}{name}");
        if self.index.contains_key(&full) {
            return Err(Error::Setup(format!("histogram '{full}' is already booked")));
        }
        if n_bins == 0 {
            return Err(Error::Setup(format!("histogram '{full}': n_bins must be > 0")));
        }
        if !low.is_finite() || !high.is_finite() || high <= low {
            return Err(Error::Setup(format!(
                "histogram '{full}': invalid range [{low}, {high})"
            )));
        }

        let id = HistId::new(self.set_id, self.hists.len());
        log::debug!("booking {full} ({n_bins} bins, [{low}, {high}))");
        self.hists.push(Hist1D::new(full.clone(), title, n_bins, low, high));
        self.index.insert(full, id);
        Ok(id)
    }

    fn fill(&mut self, id: HistId, value: f64, weight: f64) -> Result<()> {
        let i = self.slot(id)?;
        self.hists[i].fill(value, weight);
        Ok(())
    }
}
