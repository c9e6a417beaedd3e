//! Electron isolation and identification histograms.
//!
//! Booking (all under the aggregator's base name):
//!
//! | Group | Histograms | Binning |
//! |-------|------------|---------|
//! | `isolation` | `isIsolated_<wp>` per isolation working point | 3 bins [-1.5, 1.5] |
//! | `isolation` | `ptcone20` … `topoetcone40` (GeV) | 101 bins [-0.2, 20] |
//! | `isolation` | `ptcone20_rel` … `topoetcone40_rel` | 110 bins [-0.2, 2] |
//! | `PID` or `quality` | `<wp>` per PID working point | 3 bins [-1.5, 1.5] |
//!
//! Flag histograms hold -1 (decoration unavailable), 0 or 1.
//!
//! Every processing call narrows the object, extracts its features, resolves
//! every handle, and only then fills (kinematics first). Any error therefore
//! leaves all histograms untouched.

use std::collections::BTreeMap;

use ph_core::{
    Error, EventInfo, HistId, HistogramService, IsolationType, NativeElectron, NativeParticle,
    PlainElectron, PlainParticle, Result,
};

use crate::accessor::ElectronAccessors;
use crate::features::{ElectronFeatures, FeatureSource};
use crate::info_switch::ElectronInfoSwitch;
use crate::particle_hists::{HistDef, ParticleHists};

const FLAG_BINS: (usize, f64, f64) = (3, -1.5, 1.5);
const CONE_BINS: (usize, f64, f64) = (101, -0.2, 20.0);
const CONE_REL_BINS: (usize, f64, f64) = (110, -0.2, 2.0);

fn def(name: String, (n, lo, hi): (usize, f64, f64)) -> HistDef {
    HistDef::new(name, n, lo, hi)
}

/// What a booked histogram is for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Isolated(String),
    Cone(usize),
    ConeRel(usize),
    Pid(String),
}

#[derive(Debug, Clone, Copy)]
struct ConeHists {
    abs: [HistId; 9],
    rel: [HistId; 9],
}

/// Isolation/PID aggregator for electrons.
#[derive(Debug, Clone)]
pub struct ElectronHists {
    base: ParticleHists,
    switch: ElectronInfoSwitch,
    is_isolated: BTreeMap<String, HistId>,
    pid: BTreeMap<String, HistId>,
    cones: Option<ConeHists>,
    accessors: ElectronAccessors,
    initialized: bool,
}

impl ElectronHists {
    /// Aggregator booking under `name` with switches parsed from `detail`.
    pub fn new(name: impl Into<String>, detail: &str) -> Self {
        Self::with_switch(name, ElectronInfoSwitch::parse(detail))
    }

    /// Aggregator with an already parsed switch.
    pub fn with_switch(name: impl Into<String>, switch: ElectronInfoSwitch) -> Self {
        let base = ParticleHists::new(name, "electron", "electron", switch.particle.clone());
        Self {
            base,
            switch,
            is_isolated: BTreeMap::new(),
            pid: BTreeMap::new(),
            cones: None,
            accessors: ElectronAccessors::default(),
            initialized: false,
        }
    }

    /// Booking base name.
    pub fn name(&self) -> &str {
        self.base.name()
    }

    /// Active switches.
    pub fn switch(&self) -> &ElectronInfoSwitch {
        &self.switch
    }

    /// Decoration accessors created so far (native path).
    pub fn accessors(&self) -> &ElectronAccessors {
        &self.accessors
    }

    /// Whether [`ElectronHists::setup`] has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn electron_bookings(&self) -> Vec<(Slot, HistDef)> {
        let mut out = Vec::new();

        if self.switch.isolation {
            for wp in self.switch.active_isol_wps() {
                let d = def(format!("isIsolated_{wp}"), FLAG_BINS);
                out.push((Slot::Isolated(wp.to_string()), d));
            }
            for (i, k) in IsolationType::ALL.iter().enumerate() {
                out.push((Slot::Cone(i), def(k.name().to_string(), CONE_BINS)));
            }
            for (i, k) in IsolationType::ALL.iter().enumerate() {
                out.push((Slot::ConeRel(i), def(format!("{}_rel", k.name()), CONE_REL_BINS)));
            }
        }

        if self.switch.pid_or_quality() {
            for wp in self.switch.active_pid_wps() {
                out.push((Slot::Pid(wp.to_string()), def(wp.to_string(), FLAG_BINS)));
            }
        }

        out
    }

    /// Every histogram [`ElectronHists::setup`] books, kinematics first.
    pub fn bookings(&self) -> Vec<HistDef> {
        let mut out = self.base.bookings();
        out.extend(self.electron_bookings().into_iter().map(|(_, d)| d));
        out
    }

    /// Book all histograms enabled by the switch.
    ///
    /// Runs the kinematic setup first. A second successful call is rejected
    /// with [`Error::Setup`] and books nothing. A failed setup leaves the
    /// aggregator unset and can be retried; histograms booked before the
    /// failure stay in `hists`.
    pub fn setup(&mut self, hists: &mut dyn HistogramService) -> Result<()> {
        if self.initialized {
            return Err(Error::Setup(format!("'{}' is already set up", self.name())));
        }
        if let Err(e) = self.book_all(hists) {
            self.base.reset();
            self.is_isolated.clear();
            self.pid.clear();
            self.cones = None;
            return Err(e);
        }
        self.initialized = true;
        Ok(())
    }

    fn book_all(&mut self, hists: &mut dyn HistogramService) -> Result<()> {
        self.base.setup(hists)?;

        if self.switch.isolation {
            log::debug!("'{}': adding isolation plots", self.name());
        }

        let mut abs = Vec::with_capacity(9);
        let mut rel = Vec::with_capacity(9);
        for (slot, d) in self.electron_bookings() {
            let id = d.book(hists, self.base.name())?;
            match slot {
                Slot::Isolated(wp) => {
                    self.is_isolated.insert(wp, id);
                }
                Slot::Pid(wp) => {
                    self.pid.insert(wp, id);
                }
                Slot::Cone(_) => abs.push(id),
                Slot::ConeRel(_) => rel.push(id),
            }
        }
        let abs: std::result::Result<[HistId; 9], _> = abs.try_into();
        let rel: std::result::Result<[HistId; 9], _> = rel.try_into();
        if let (Ok(abs), Ok(rel)) = (abs, rel) {
            self.cones = Some(ConeHists { abs, rel });
        }
        Ok(())
    }

    /// Process a native particle. Non-electrons fail with
    /// [`Error::TypeMismatch`] before anything is filled.
    pub fn process_native(
        &mut self,
        particle: &NativeParticle,
        weight: f64,
        event: &EventInfo,
        hists: &mut dyn HistogramService,
    ) -> Result<()> {
        let electron = particle.as_electron().inspect_err(|_| {
            log::error!("cannot convert {} to electron", particle.kind());
        })?;
        self.process_native_electron(electron, weight, event, hists)
    }

    /// Process a native electron.
    ///
    /// Missing `isIsolated_<wp>` or PID decorations are filled as -1.
    pub fn process_native_electron(
        &mut self,
        electron: &NativeElectron,
        weight: f64,
        event: &EventInfo,
        hists: &mut dyn HistogramService,
    ) -> Result<()> {
        log::trace!(
            "'{}': native electron, run {} event {}",
            self.name(),
            event.run_number,
            event.event_number
        );
        self.process_source(electron, weight, hists)
    }

    /// Process a plain particle. Non-electrons fail with
    /// [`Error::TypeMismatch`] before anything is filled.
    pub fn process_plain(
        &mut self,
        particle: &PlainParticle,
        weight: f64,
        hists: &mut dyn HistogramService,
    ) -> Result<()> {
        let electron = particle.as_electron().inspect_err(|_| {
            log::error!("cannot convert {} to electron", particle.kind());
        })?;
        self.process_plain_electron(electron, weight, hists)
    }

    /// Process a plain electron.
    ///
    /// Every configured working point must be present in the object's
    /// `isIsolated`/`PID` maps, otherwise [`Error::Lookup`].
    pub fn process_plain_electron(
        &mut self,
        electron: &PlainElectron,
        weight: f64,
        hists: &mut dyn HistogramService,
    ) -> Result<()> {
        self.process_source(electron, weight, hists)
    }

    fn process_source<S: FeatureSource + ?Sized>(
        &mut self,
        source: &S,
        weight: f64,
        hists: &mut dyn HistogramService,
    ) -> Result<()> {
        let features = source.features(&self.switch, &mut self.accessors)?;
        let mut fills = self.base.plan(&source.kinematics())?;
        fills.extend(self.plan(&features)?);
        for (id, value) in fills {
            hists.fill(id, value, weight)?;
        }
        Ok(())
    }

    fn plan(&self, features: &ElectronFeatures) -> Result<Vec<(HistId, f64)>> {
        let mut fills = Vec::new();

        if let Some(iso) = &features.isolation {
            for (wp, value) in &iso.flags {
                fills.push((self.handle(&self.is_isolated, "isolation", wp)?, *value));
            }
            let cones = self.cones.ok_or_else(|| {
                log::error!("'{}': isolation histograms not booked", self.name());
                Error::Lookup(format!("'{}': isolation histograms not booked", self.name()))
            })?;
            fills.extend(cones.abs.iter().copied().zip(iso.abs));
            fills.extend(cones.rel.iter().copied().zip(iso.rel));
        }

        if let Some(pid) = &features.pid {
            for (wp, value) in pid {
                fills.push((self.handle(&self.pid, "PID", wp)?, *value));
            }
        }

        Ok(fills)
    }

    fn handle(&self, map: &BTreeMap<String, HistId>, group: &str, wp: &str) -> Result<HistId> {
        map.get(wp).copied().ok_or_else(|| {
            log::error!("'{}': no {group} histogram booked for '{wp}'", self.name());
            Error::Lookup(format!("'{}': no {group} histogram booked for '{wp}'", self.name()))
        })
    }
}
