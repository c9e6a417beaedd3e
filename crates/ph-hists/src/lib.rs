//! # ph-hists
//!
//! Histogram aggregators for electron objects.
//!
//! [`ElectronHists`] books isolation and identification histograms according
//! to a detail string and fills them from either object representation:
//! [`ph_core::NativeElectron`] (decorations in an auxiliary store, MeV) or
//! [`ph_core::PlainElectron`] (flat fields and flag maps, GeV). Both shapes
//! are reduced to [`ElectronFeatures`] first; filling only ever sees
//! features, so the two paths cannot drift apart.
//!
//! ## Example
//!
//! ```
//! use ph_core::{FourMomentum, PlainElectron, PlainParticle};
//! use ph_histo::HistSet;
//! use ph_hists::ElectronHists;
//!
//! let mut hists = HistSet::new();
//! let mut electrons = ElectronHists::new("electron/", "isolation ISOL_FCTight");
//! electrons.setup(&mut hists).unwrap();
//!
//! let mut el = PlainElectron::new(FourMomentum::new(40.0, 0.1, 0.2, 0.0));
//! el.is_isolated.insert("FCTight".into(), 1);
//! electrons.process_plain(&PlainParticle::Electron(el), 1.0, &mut hists).unwrap();
//!
//! let flag = hists.get("electron/isIsolated_FCTight").unwrap();
//! assert_eq!(flag.bin_content, vec![0.0, 0.0, 1.0]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accessor;
pub mod electron_hists;
pub mod features;
pub mod info_switch;
pub mod particle_hists;

pub use accessor::{AccessorCache, AuxAccessor, ElectronAccessors};
pub use electron_hists::ElectronHists;
pub use features::{
    ElectronFeatures, FeatureSource, IsolationFeatures, MEV_PER_GEV, MISSING_FLAG,
};
pub use info_switch::{ElectronInfoSwitch, NONE_WP, ParticleInfoSwitch, is_active_wp};
pub use particle_hists::{HistDef, ParticleHists};
