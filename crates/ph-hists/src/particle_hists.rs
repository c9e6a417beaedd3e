//! Generic particle aggregator: kinematic histograms shared by all species.
//!
//! Species aggregators such as [`crate::ElectronHists`] wrap one of these
//! and run its setup and fills before their own.

use std::f64::consts::PI;

use serde::Serialize;

use ph_core::{Error, FourMomentum, HistId, HistogramService, Result};

use crate::info_switch::ParticleInfoSwitch;

/// Definition of one histogram to book.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistDef {
    /// Histogram name (without the booking base).
    pub name: String,
    /// Histogram title.
    pub title: String,
    /// Number of bins.
    pub n_bins: usize,
    /// Lower edge.
    pub low: f64,
    /// Upper edge.
    pub high: f64,
}

impl HistDef {
    /// Definition with the name reused as title.
    pub fn new(name: impl Into<String>, n_bins: usize, low: f64, high: f64) -> Self {
        let name = name.into();
        Self { title: name.clone(), name, n_bins, low, high }
    }

    /// Override the title.
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Book through `hists` under `base`.
    pub fn book(&self, hists: &mut dyn HistogramService, base: &str) -> Result<HistId> {
        hists.book(base, &self.name, &self.title, self.n_bins, self.low, self.high)
    }
}

#[derive(Debug, Clone, Copy)]
struct KinematicHists {
    pt: HistId,
    eta: HistId,
    phi: HistId,
    mass: HistId,
    energy: HistId,
}

/// Kinematic histograms for one particle species.
#[derive(Debug, Clone)]
pub struct ParticleHists {
    name: String,
    prefix: String,
    title: String,
    switch: ParticleInfoSwitch,
    kinematic: Option<KinematicHists>,
    initialized: bool,
}

impl ParticleHists {
    /// Aggregator booking under `name`, with histogram names starting with
    /// `prefix` and titles starting with `title`.
    pub fn new(
        name: impl Into<String>,
        prefix: impl Into<String>,
        title: impl Into<String>,
        switch: ParticleInfoSwitch,
    ) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            title: title.into(),
            switch,
            kinematic: None,
            initialized: false,
        }
    }

    /// Booking base name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Active switches.
    pub fn switch(&self) -> &ParticleInfoSwitch {
        &self.switch
    }

    /// Whether [`ParticleHists::setup`] has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Histograms [`ParticleHists::setup`] books, in order.
    pub fn bookings(&self) -> Vec<HistDef> {
        if !self.switch.kinematic {
            return Vec::new();
        }
        let (p, t) = (&self.prefix, &self.title);
        vec![
            HistDef::new(format!("{p}Pt"), 100, 0.0, 1000.0).titled(format!("{t} p_{{T}} [GeV]")),
            HistDef::new(format!("{p}Eta"), 80, -4.0, 4.0).titled(format!("{t} #eta")),
            HistDef::new(format!("{p}Phi"), 120, -PI, PI).titled(format!("{t} #phi")),
            HistDef::new(format!("{p}Mass"), 120, 0.0, 400.0).titled(format!("{t} Mass [GeV]")),
            HistDef::new(format!("{p}Energy"), 120, 0.0, 4000.0)
                .titled(format!("{t} Energy [GeV]")),
        ]
    }

    /// Book the kinematic histograms. A second successful call is rejected.
    ///
    /// A failed setup leaves the aggregator unset, so it can be retried.
    /// Histograms booked before the failure stay in `hists`.
    pub fn setup(&mut self, hists: &mut dyn HistogramService) -> Result<()> {
        if self.initialized {
            return Err(Error::Setup(format!("'{}' is already set up", self.name)));
        }

        let ids = self
            .bookings()
            .iter()
            .map(|def| def.book(hists, &self.name))
            .collect::<Result<Vec<_>>>()?;
        if let [pt, eta, phi, mass, energy] = ids[..] {
            log::debug!("'{}': booked kinematic histograms", self.name);
            self.kinematic = Some(KinematicHists { pt, eta, phi, mass, energy });
        }
        self.initialized = true;
        Ok(())
    }

    /// Forget all handles and return to the pre-setup state.
    pub(crate) fn reset(&mut self) {
        self.kinematic = None;
        self.initialized = false;
    }

    /// Fills for one object with kinematics `p4` (GeV), without applying
    /// them. Fails if kinematics are switched on but were never booked.
    pub fn plan(&self, p4: &FourMomentum) -> Result<Vec<(HistId, f64)>> {
        if !self.switch.kinematic {
            return Ok(Vec::new());
        }
        let k = self.kinematic.ok_or_else(|| {
            Error::Lookup(format!("'{}': kinematic histograms not booked", self.name))
        })?;
        Ok(vec![
            (k.pt, p4.pt),
            (k.eta, p4.eta),
            (k.phi, p4.phi),
            (k.mass, p4.m),
            (k.energy, p4.e()),
        ])
    }

    /// Fill the kinematic histograms for one object (GeV).
    pub fn process(
        &self,
        p4: &FourMomentum,
        weight: f64,
        hists: &mut dyn HistogramService,
    ) -> Result<()> {
        for (id, value) in self.plan(p4)? {
            hists.fill(id, value, weight)?;
        }
        Ok(())
    }
}
