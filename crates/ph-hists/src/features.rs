//! Feature extraction: object → [`ElectronFeatures`].
//!
//! Each electron representation implements [`FeatureSource`]. Extraction
//! reads everything a fill needs and does all fallible lookups up front, so
//! a failing object never leaves a histogram half-updated.

use std::collections::BTreeMap;

use ph_core::{Error, FourMomentum, IsolationType, NativeElectron, PlainElectron, Result};

use crate::accessor::ElectronAccessors;
use crate::info_switch::ElectronInfoSwitch;

/// MeV per GeV.
pub const MEV_PER_GEV: f64 = 1e3;

/// Flag value filled when a native decoration is not available.
pub const MISSING_FLAG: f64 = -1.0;

/// Isolation features of one electron.
#[derive(Debug, Clone, PartialEq)]
pub struct IsolationFeatures {
    /// Working point → flag (-1 unknown, 0 not isolated, 1 isolated).
    pub flags: Vec<(String, f64)>,
    /// Cone variables in GeV, [`IsolationType::ALL`] order.
    pub abs: [f64; 9],
    /// Cone variables divided by pt, same order.
    pub rel: [f64; 9],
}

/// Everything the electron histograms are filled from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElectronFeatures {
    /// Present when isolation is switched on.
    pub isolation: Option<IsolationFeatures>,
    /// Working point → flag, present when PID or quality is switched on.
    pub pid: Option<Vec<(String, f64)>>,
}

/// An electron representation the aggregator can read.
pub trait FeatureSource {
    /// Kinematics in GeV.
    fn kinematics(&self) -> FourMomentum;

    /// Extract the features enabled by `switch`.
    fn features(
        &self,
        switch: &ElectronInfoSwitch,
        accessors: &mut ElectronAccessors,
    ) -> Result<ElectronFeatures>;
}

impl FeatureSource for NativeElectron {
    fn kinematics(&self) -> FourMomentum {
        self.p4.in_units(MEV_PER_GEV)
    }

    /// Flags come from decorations; a missing decoration gives
    /// [`MISSING_FLAG`]. Cones are stored in MeV: absolute values are
    /// converted to GeV, relative ones are divided by pt in MeV.
    fn features(
        &self,
        switch: &ElectronInfoSwitch,
        accessors: &mut ElectronAccessors,
    ) -> Result<ElectronFeatures> {
        let mut out = ElectronFeatures::default();

        if switch.isolation {
            let flags = switch
                .active_isol_wps()
                .map(|wp| (wp.to_string(), accessors.isolation.read_flag(wp, &self.aux)))
                .collect();
            let pt = self.pt();
            out.isolation = Some(IsolationFeatures {
                flags,
                abs: IsolationType::ALL.map(|k| self.isolation(k) / MEV_PER_GEV),
                rel: IsolationType::ALL.map(|k| self.isolation(k) / pt),
            });
        }

        if switch.pid_or_quality() {
            out.pid = Some(
                switch
                    .active_pid_wps()
                    .map(|wp| (wp.to_string(), accessors.pid.read_flag(wp, &self.aux)))
                    .collect(),
            );
        }

        Ok(out)
    }
}

impl FeatureSource for PlainElectron {
    fn kinematics(&self) -> FourMomentum {
        self.p4
    }

    /// Flags come from the object's maps and every configured working point
    /// must be present. Cones are already in GeV.
    fn features(
        &self,
        switch: &ElectronInfoSwitch,
        _accessors: &mut ElectronAccessors,
    ) -> Result<ElectronFeatures> {
        let mut out = ElectronFeatures::default();

        if switch.isolation {
            let flags = switch
                .active_isol_wps()
                .map(|wp| flag_entry(&self.is_isolated, "isIsolated", wp))
                .collect::<Result<Vec<_>>>()?;
            let pt = self.p4.pt;
            let abs = self.isolation.values();
            out.isolation = Some(IsolationFeatures { flags, abs, rel: abs.map(|v| v / pt) });
        }

        if switch.pid_or_quality() {
            let flags = switch
                .active_pid_wps()
                .map(|wp| flag_entry(&self.pid, "PID", wp))
                .collect::<Result<Vec<_>>>()?;
            out.pid = Some(flags);
        }

        Ok(out)
    }
}

fn flag_entry(map: &BTreeMap<String, i32>, what: &str, wp: &str) -> Result<(String, f64)> {
    match map.get(wp) {
        Some(&v) => Ok((wp.to_string(), f64::from(v))),
        None => {
            log::error!("plain electron has no {what} entry for working point '{wp}'");
            Err(Error::Lookup(format!("{what}: no entry for working point '{wp}'")))
        }
    }
}
