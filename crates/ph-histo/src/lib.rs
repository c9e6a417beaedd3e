//! # ph-histo
//!
//! In-memory histogramming for phists.
//!
//! [`Hist1D`] is a uniform-binned 1-D histogram with ROOT-style
//! under/overflow handling and per-bin `sumw2`. [`HistSet`] books histograms
//! by name and implements [`ph_core::HistogramService`], so aggregators can
//! fill through opaque handles.
//!
//! ## Example
//!
//! ```
//! use ph_core::HistogramService;
//! use ph_histo::HistSet;
//!
//! let mut set = HistSet::new();
//! let id = set.book("electron/", "isIsolated_FCTight", "isIsolated_FCTight", 3, -1.5, 1.5).unwrap();
//! set.fill(id, 1.0, 2.0).unwrap();
//! let h = set.get("electron/isIsolated_FCTight").unwrap();
//! assert_eq!(h.bin_content, vec![0.0, 0.0, 2.0]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod histogram;
pub mod set;

pub use histogram::{BinIndex, Hist1D};
pub use set::HistSet;
