//! Common data types for phists
//!
//! Two object representations are modelled side by side:
//!
//! - the **native** shape ([`NativeParticle`]) mirrors a framework object:
//!   kinematics and isolation in MeV plus an [`AuxStore`] of dynamically named
//!   decorations whose presence varies between input samples;
//! - the **plain** shape ([`PlainParticle`]) is a flat transient record with
//!   everything already in GeV and working-point flags stored in maps.
//!
//! Both are closed enums: callers narrow with `as_electron()` once, at the
//! boundary, instead of downcasting inside the aggregators.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::{Error, Result};

/// Opaque handle to a booked histogram.
///
/// `set` identifies the service instance that issued the handle, `index` the
/// histogram within it. A service must reject handles it did not issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HistId {
    /// Issuing service instance.
    pub set: u64,
    /// Position within the issuing service.
    pub index: usize,
}

impl HistId {
    /// Handle `index` issued by service instance `set`.
    pub fn new(set: u64, index: usize) -> Self {
        Self { set, index }
    }
}

impl fmt::Display for HistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.index, self.set)
    }
}

/// Four-momentum in (pt, eta, phi, m) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FourMomentum {
    /// Transverse momentum.
    pub pt: f64,
    /// Pseudorapidity.
    pub eta: f64,
    /// Azimuthal angle.
    pub phi: f64,
    /// Invariant mass.
    #[serde(default)]
    pub m: f64,
}

impl FourMomentum {
    /// Create a four-momentum.
    pub fn new(pt: f64, eta: f64, phi: f64, m: f64) -> Self {
        Self { pt, eta, phi, m }
    }

    /// Momentum magnitude.
    pub fn p(&self) -> f64 {
        self.pt * self.eta.cosh()
    }

    /// Energy.
    pub fn e(&self) -> f64 {
        let p = self.p();
        (p * p + self.m * self.m).sqrt()
    }

    /// Copy with momentum and mass expressed in multiples of `unit`
    /// (e.g. `in_units(1e3)` turns MeV into GeV).
    pub fn in_units(&self, unit: f64) -> Self {
        Self { pt: self.pt / unit, m: self.m / unit, ..*self }
    }
}

/// Cone isolation variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IsolationType {
    /// Track isolation, ΔR = 0.2
    PtCone20,
    /// Track isolation, ΔR = 0.3
    PtCone30,
    /// Track isolation, ΔR = 0.4
    PtCone40,
    /// Variable-radius track isolation, max ΔR = 0.2
    PtVarCone20,
    /// Variable-radius track isolation, max ΔR = 0.3
    PtVarCone30,
    /// Variable-radius track isolation, max ΔR = 0.4
    PtVarCone40,
    /// Topo-cluster calorimeter isolation, ΔR = 0.2
    TopoEtCone20,
    /// Topo-cluster calorimeter isolation, ΔR = 0.3
    TopoEtCone30,
    /// Topo-cluster calorimeter isolation, ΔR = 0.4
    TopoEtCone40,
}

impl IsolationType {
    /// All variables, in booking order.
    pub const ALL: [IsolationType; 9] = [
        IsolationType::PtCone20,
        IsolationType::PtCone30,
        IsolationType::PtCone40,
        IsolationType::PtVarCone20,
        IsolationType::PtVarCone30,
        IsolationType::PtVarCone40,
        IsolationType::TopoEtCone20,
        IsolationType::TopoEtCone30,
        IsolationType::TopoEtCone40,
    ];

    /// Variable name, also used as the histogram name.
    pub fn name(self) -> &'static str {
        match self {
            IsolationType::PtCone20 => "ptcone20",
            IsolationType::PtCone30 => "ptcone30",
            IsolationType::PtCone40 => "ptcone40",
            IsolationType::PtVarCone20 => "ptvarcone20",
            IsolationType::PtVarCone30 => "ptvarcone30",
            IsolationType::PtVarCone40 => "ptvarcone40",
            IsolationType::TopoEtCone20 => "topoetcone20",
            IsolationType::TopoEtCone30 => "topoetcone30",
            IsolationType::TopoEtCone40 => "topoetcone40",
        }
    }
}

impl fmt::Display for IsolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The nine cone isolation quantities of one object.
///
/// Units follow the owning representation (MeV native, GeV plain).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IsolationCones {
    /// ptcone20
    pub ptcone20: f64,
    /// ptcone30
    pub ptcone30: f64,
    /// ptcone40
    pub ptcone40: f64,
    /// ptvarcone20
    pub ptvarcone20: f64,
    /// ptvarcone30
    pub ptvarcone30: f64,
    /// ptvarcone40
    pub ptvarcone40: f64,
    /// topoetcone20
    pub topoetcone20: f64,
    /// topoetcone30
    pub topoetcone30: f64,
    /// topoetcone40
    pub topoetcone40: f64,
}

impl IsolationCones {
    /// Value of one variable.
    pub fn get(&self, kind: IsolationType) -> f64 {
        match kind {
            IsolationType::PtCone20 => self.ptcone20,
            IsolationType::PtCone30 => self.ptcone30,
            IsolationType::PtCone40 => self.ptcone40,
            IsolationType::PtVarCone20 => self.ptvarcone20,
            IsolationType::PtVarCone30 => self.ptvarcone30,
            IsolationType::PtVarCone40 => self.ptvarcone40,
            IsolationType::TopoEtCone20 => self.topoetcone20,
            IsolationType::TopoEtCone30 => self.topoetcone30,
            IsolationType::TopoEtCone40 => self.topoetcone40,
        }
    }

    /// Mutable access to one variable.
    pub fn get_mut(&mut self, kind: IsolationType) -> &mut f64 {
        match kind {
            IsolationType::PtCone20 => &mut self.ptcone20,
            IsolationType::PtCone30 => &mut self.ptcone30,
            IsolationType::PtCone40 => &mut self.ptcone40,
            IsolationType::PtVarCone20 => &mut self.ptvarcone20,
            IsolationType::PtVarCone30 => &mut self.ptvarcone30,
            IsolationType::PtVarCone40 => &mut self.ptvarcone40,
            IsolationType::TopoEtCone20 => &mut self.topoetcone20,
            IsolationType::TopoEtCone30 => &mut self.topoetcone30,
            IsolationType::TopoEtCone40 => &mut self.topoetcone40,
        }
    }

    /// All values in [`IsolationType::ALL`] order.
    pub fn values(&self) -> [f64; 9] {
        IsolationType::ALL.map(|k| self.get(k))
    }
}

/// A single auxiliary decoration value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuxValue {
    /// `char` decoration (flags).
    Char(i8),
    /// Integer decoration.
    Int(i32),
    /// Floating-point decoration.
    Float(f32),
}

impl AuxValue {
    /// Numeric value as `f64`.
    pub fn as_f64(self) -> f64 {
        match self {
            AuxValue::Char(v) => f64::from(v),
            AuxValue::Int(v) => f64::from(v),
            AuxValue::Float(v) => f64::from(v),
        }
    }
}

/// Dynamically named decorations attached to a native object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuxStore {
    values: BTreeMap<String, AuxValue>,
}

impl AuxStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) a decoration.
    pub fn insert(&mut self, name: impl Into<String>, value: AuxValue) {
        self.values.insert(name.into(), value);
    }

    /// Decoration value, if present.
    pub fn get(&self, name: &str) -> Option<AuxValue> {
        self.values.get(name).copied()
    }

    /// Whether a decoration with this name is present.
    pub fn is_available(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of decorations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Particle species shared by both representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleKind {
    /// Electron
    Electron,
    /// Muon
    Muon,
    /// Photon
    Photon,
    /// Jet
    Jet,
}

impl fmt::Display for ParticleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParticleKind::Electron => "electron",
            ParticleKind::Muon => "muon",
            ParticleKind::Photon => "photon",
            ParticleKind::Jet => "jet",
        };
        f.write_str(s)
    }
}

/// Native electron. Momenta and isolation in MeV.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NativeElectron {
    /// Four-momentum (MeV).
    pub p4: FourMomentum,
    /// Cone isolation (MeV).
    #[serde(default)]
    pub isolation: IsolationCones,
    /// Auxiliary decorations.
    #[serde(default)]
    pub aux: AuxStore,
}

impl NativeElectron {
    /// Electron with the given kinematics and no isolation or decorations.
    pub fn new(p4: FourMomentum) -> Self {
        Self { p4, ..Self::default() }
    }

    /// Isolation quantity in MeV.
    pub fn isolation(&self, kind: IsolationType) -> f64 {
        self.isolation.get(kind)
    }

    /// Transverse momentum in MeV.
    pub fn pt(&self) -> f64 {
        self.p4.pt
    }
}

/// Native non-electron object: kinematics and decorations only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NativeObject {
    /// Four-momentum (MeV).
    pub p4: FourMomentum,
    /// Auxiliary decorations.
    #[serde(default)]
    pub aux: AuxStore,
}

/// Framework-native particle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NativeParticle {
    /// Electron
    Electron(NativeElectron),
    /// Muon
    Muon(NativeObject),
    /// Photon
    Photon(NativeObject),
    /// Jet
    Jet(NativeObject),
}

impl NativeParticle {
    /// Species tag.
    pub fn kind(&self) -> ParticleKind {
        match self {
            NativeParticle::Electron(_) => ParticleKind::Electron,
            NativeParticle::Muon(_) => ParticleKind::Muon,
            NativeParticle::Photon(_) => ParticleKind::Photon,
            NativeParticle::Jet(_) => ParticleKind::Jet,
        }
    }

    /// Four-momentum (MeV).
    pub fn p4(&self) -> &FourMomentum {
        match self {
            NativeParticle::Electron(e) => &e.p4,
            NativeParticle::Muon(o) | NativeParticle::Photon(o) | NativeParticle::Jet(o) => &o.p4,
        }
    }

    /// Narrow to the electron variant.
    pub fn as_electron(&self) -> Result<&NativeElectron> {
        match self {
            NativeParticle::Electron(e) => Ok(e),
            other => Err(Error::TypeMismatch { expected: "electron", found: other.kind().to_string() }),
        }
    }
}

/// Plain electron. Momenta and isolation in GeV.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlainElectron {
    /// Four-momentum (GeV).
    pub p4: FourMomentum,
    /// Cone isolation (GeV), stored as top-level fields.
    #[serde(flatten)]
    pub isolation: IsolationCones,
    /// Isolation working point → flag.
    #[serde(default, rename = "isIsolated")]
    pub is_isolated: BTreeMap<String, i32>,
    /// PID working point → flag.
    #[serde(default, rename = "PID")]
    pub pid: BTreeMap<String, i32>,
}

impl PlainElectron {
    /// Electron with the given kinematics and no isolation or flags.
    pub fn new(p4: FourMomentum) -> Self {
        Self { p4, ..Self::default() }
    }
}

/// Plain non-electron object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlainObject {
    /// Four-momentum (GeV).
    pub p4: FourMomentum,
}

/// Plain transient particle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PlainParticle {
    /// Electron
    Electron(PlainElectron),
    /// Muon
    Muon(PlainObject),
    /// Photon
    Photon(PlainObject),
    /// Jet
    Jet(PlainObject),
}

impl PlainParticle {
    /// Species tag.
    pub fn kind(&self) -> ParticleKind {
        match self {
            PlainParticle::Electron(_) => ParticleKind::Electron,
            PlainParticle::Muon(_) => ParticleKind::Muon,
            PlainParticle::Photon(_) => ParticleKind::Photon,
            PlainParticle::Jet(_) => ParticleKind::Jet,
        }
    }

    /// Four-momentum (GeV).
    pub fn p4(&self) -> &FourMomentum {
        match self {
            PlainParticle::Electron(e) => &e.p4,
            PlainParticle::Muon(o) | PlainParticle::Photon(o) | PlainParticle::Jet(o) => &o.p4,
        }
    }

    /// Narrow to the electron variant.
    pub fn as_electron(&self) -> Result<&PlainElectron> {
        match self {
            PlainParticle::Electron(e) => Ok(e),
            other => Err(Error::TypeMismatch { expected: "electron", found: other.kind().to_string() }),
        }
    }
}

/// Per-event context handed to the native entry points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventInfo {
    /// Run number.
    pub run_number: u32,
    /// Event number.
    pub event_number: u64,
    /// MC channel (dataset) number, absent for data.
    pub mc_channel_number: Option<u32>,
    /// Generator event weight.
    pub mc_event_weight: f64,
}

impl Default for EventInfo {
    fn default() -> Self {
        Self { run_number: 0, event_number: 0, mc_channel_number: None, mc_event_weight: 1.0 }
    }
}
