//! Integration tests: booking and filling electron histograms from both
//! object representations.

use approx::assert_relative_eq;
use ph_core::{
    AuxValue, Error, EventInfo, FourMomentum, HistId, HistogramService, IsolationType,
    NativeElectron, NativeObject, NativeParticle, PlainElectron, PlainObject, PlainParticle,
    Result,
};
use ph_histo::HistSet;
use ph_hists::{ElectronHists, MISSING_FLAG};

/// Records every call so tests can check exact values and multiplicities.
#[derive(Default)]
struct Recorder {
    names: Vec<String>,
    fills: Vec<(String, f64, f64)>,
}

impl Recorder {
    fn fills_of(&self, name: &str) -> Vec<(f64, f64)> {
        self.fills.iter().filter(|(n, _, _)| n == name).map(|(_, v, w)| (*v, *w)).collect()
    }
}

impl HistogramService for Recorder {
    fn book(
        &mut self,
        base: &str,
        name: &str,
        _title: &str,
        _n_bins: usize,
        _low: f64,
        _high: f64,
    ) -> Result<HistId> {
        self.names.push(format!("{base}{name}"));
        Ok(HistId::new(0, self.names.len() - 1))
    }

    fn fill(&mut self, id: HistId, value: f64, weight: f64) -> Result<()> {
        let name = self.names[id.index].clone();
        self.fills.push((name, value, weight));
        Ok(())
    }
}

fn native_electron() -> NativeElectron {
    let mut e = NativeElectron::new(FourMomentum::new(40_000.0, 0.7, -2.1, 0.511));
    for (i, k) in IsolationType::ALL.iter().enumerate() {
        *e.isolation.get_mut(*k) = 1_000.0 * (i as f64 + 1.0);
    }
    e.aux.insert("isIsolated_FCTight", AuxValue::Char(1));
    e.aux.insert("isIsolated_FCLoose", AuxValue::Char(0));
    e.aux.insert("LHTight", AuxValue::Char(1));
    e
}

fn plain_electron() -> PlainElectron {
    let mut e = PlainElectron::new(FourMomentum::new(40.0, 0.7, -2.1, 0.000511));
    for (i, k) in IsolationType::ALL.iter().enumerate() {
        *e.isolation.get_mut(*k) = i as f64 + 1.0;
    }
    e.is_isolated.insert("tight".into(), 1);
    e.is_isolated.insert("FCTight".into(), 1);
    e.is_isolated.insert("FCLoose".into(), 0);
    e.pid.insert("LHTight".into(), 1);
    e
}

#[test]
fn isolation_flags_booked_for_configured_working_points_only() {
    let mut hists = HistSet::new();
    let mut eh = ElectronHists::new("electron/", "isolation ISOL_FCTight ISOL_NONE ISOL_FCLoose");
    eh.setup(&mut hists).unwrap();

    let flags: Vec<&str> =
        hists.names().into_iter().filter(|n| n.starts_with("electron/isIsolated_")).collect();
    assert_eq!(flags, vec!["electron/isIsolated_FCTight", "electron/isIsolated_FCLoose"]);
    assert_eq!(hists.len(), 2 + 18);
    assert!(hists.get("electron/isIsolated_NONE").is_none());
}

#[test]
fn pid_flags_booked_for_pid_or_quality() {
    for detail in ["PID PID_LHTight PID_LHLoose", "quality PID_LHTight PID_LHLoose"] {
        let mut hists = HistSet::new();
        let mut eh = ElectronHists::new("electron/", detail);
        eh.setup(&mut hists).unwrap();
        assert_eq!(hists.names(), vec!["electron/LHTight", "electron/LHLoose"], "{detail}");
    }

    let mut hists = HistSet::new();
    ElectronHists::new("electron/", "PID_LHTight").setup(&mut hists).unwrap();
    assert!(hists.is_empty());
}

#[test]
fn native_absolute_cones_are_filled_in_gev_once() {
    let mut rec = Recorder::default();
    let mut eh = ElectronHists::new("e/", "isolation");
    eh.setup(&mut rec).unwrap();

    let e = native_electron();
    eh.process_native_electron(&e, 0.75, &EventInfo::default(), &mut rec).unwrap();

    for (i, k) in IsolationType::ALL.iter().enumerate() {
        let fills = rec.fills_of(&format!("e/{}", k.name()));
        assert_eq!(fills.len(), 1, "{k}");
        assert_relative_eq!(fills[0].0, i as f64 + 1.0, epsilon = 1e-12);
        assert_eq!(fills[0].1, 0.75);
    }
}

#[test]
fn native_relative_cones_are_divided_by_pt_without_conversion() {
    let mut rec = Recorder::default();
    let mut eh = ElectronHists::new("e/", "isolation");
    eh.setup(&mut rec).unwrap();

    let e = native_electron();
    eh.process_native_electron(&e, 2.0, &EventInfo::default(), &mut rec).unwrap();

    for (i, k) in IsolationType::ALL.iter().enumerate() {
        let fills = rec.fills_of(&format!("e/{}_rel", k.name()));
        assert_eq!(fills.len(), 1, "{k}");
        assert_relative_eq!(fills[0].0, 1_000.0 * (i as f64 + 1.0) / 40_000.0, epsilon = 1e-12);
        assert_eq!(fills[0].1, 2.0);
    }
}

#[test]
fn native_missing_decoration_fills_sentinel() {
    let mut hists = HistSet::new();
    let mut eh = ElectronHists::new("e/", "isolation ISOL_FCTight ISOL_Gradient");
    eh.setup(&mut hists).unwrap();

    let p = NativeParticle::Electron(native_electron());
    eh.process_native(&p, 1.0, &EventInfo::default(), &mut hists).unwrap();

    let gradient = hists.get("e/isIsolated_Gradient").unwrap();
    assert_eq!(gradient.bin_content, vec![1.0, 0.0, 0.0]);
    assert_eq!(gradient.bin_center(0), MISSING_FLAG);
    let tight = hists.get("e/isIsolated_FCTight").unwrap();
    assert_eq!(tight.bin_content, vec![0.0, 0.0, 1.0]);
}

#[test]
fn native_accessors_are_memoized_across_objects() {
    let mut hists = HistSet::new();
    let mut eh = ElectronHists::new("e/", "isolation ISOL_FCTight ISOL_FCLoose PID PID_LHTight");
    eh.setup(&mut hists).unwrap();
    assert!(eh.accessors().isolation.is_empty());

    for _ in 0..3 {
        eh.process_native_electron(&native_electron(), 1.0, &EventInfo::default(), &mut hists)
            .unwrap();
    }
    assert_eq!(eh.accessors().isolation.len(), 2);
    assert_eq!(eh.accessors().pid.len(), 1);
    assert_eq!(hists.get("e/isIsolated_FCLoose").unwrap().bin_content, vec![0.0, 3.0, 0.0]);
    assert_eq!(hists.get("e/LHTight").unwrap().bin_content, vec![0.0, 0.0, 3.0]);
}

#[test]
fn plain_flag_fill_uses_value_and_weight() {
    let mut rec = Recorder::default();
    let mut eh = ElectronHists::new("e/", "isolation ISOL_tight");
    eh.setup(&mut rec).unwrap();

    let p = PlainParticle::Electron(plain_electron());
    eh.process_plain(&p, 2.0, &mut rec).unwrap();

    assert_eq!(rec.fills_of("e/isIsolated_tight"), vec![(1.0, 2.0)]);
}

#[test]
fn plain_cones_are_filled_as_stored() {
    let mut rec = Recorder::default();
    let mut eh = ElectronHists::new("e/", "isolation");
    eh.setup(&mut rec).unwrap();

    eh.process_plain_electron(&plain_electron(), 1.0, &mut rec).unwrap();

    assert_eq!(rec.fills_of("e/topoetcone40"), vec![(9.0, 1.0)]);
    let rel = rec.fills_of("e/topoetcone40_rel");
    assert_eq!(rel.len(), 1);
    assert_relative_eq!(rel[0].0, 9.0 / 40.0, epsilon = 1e-12);
    assert_eq!(rec.fills.len(), 18);
}

#[test]
fn plain_pid_flags_filled_from_map() {
    let mut hists = HistSet::new();
    let mut eh = ElectronHists::new("e/", "PID PID_LHTight");
    eh.setup(&mut hists).unwrap();

    eh.process_plain_electron(&plain_electron(), 0.5, &mut hists).unwrap();
    let h = hists.get("e/LHTight").unwrap();
    assert_eq!(h.bin_content, vec![0.0, 0.0, 0.5]);
    assert_eq!(h.sumw2, vec![0.0, 0.0, 0.25]);
}

#[test]
fn plain_missing_working_point_fails_without_fills() {
    let mut hists = HistSet::new();
    let mut eh = ElectronHists::new("e/", "kinematic isolation ISOL_FCTight ISOL_Gradient");
    eh.setup(&mut hists).unwrap();

    let err = eh.process_plain_electron(&plain_electron(), 1.0, &mut hists).unwrap_err();
    assert!(matches!(err, Error::Lookup(_)), "{err}");
    assert_eq!(hists.total_entries(), 0);
}

#[test]
fn non_electrons_are_type_mismatch_without_fills() {
    let mut hists = HistSet::new();
    let mut eh = ElectronHists::new("e/", "kinematic isolation ISOL_FCTight PID PID_LHTight");
    eh.setup(&mut hists).unwrap();

    let muon = NativeParticle::Muon(NativeObject::default());
    let err = eh.process_native(&muon, 1.0, &EventInfo::default(), &mut hists).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }), "{err}");

    let jet = PlainParticle::Jet(PlainObject::default());
    let err = eh.process_plain(&jet, 1.0, &mut hists).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }), "{err}");

    assert_eq!(hists.total_entries(), 0);
}

#[test]
fn process_before_setup_is_lookup_error() {
    let mut hists = HistSet::new();
    let mut eh = ElectronHists::new("e/", "isolation ISOL_tight");

    let err = eh.process_plain_electron(&plain_electron(), 1.0, &mut hists).unwrap_err();
    assert!(matches!(err, Error::Lookup(_)), "{err}");

    let err = eh
        .process_native_electron(&native_electron(), 1.0, &EventInfo::default(), &mut hists)
        .unwrap_err();
    assert!(matches!(err, Error::Lookup(_)), "{err}");

    // Cones alone still need their handles.
    let mut eh = ElectronHists::new("e/", "isolation");
    let err = eh.process_plain_electron(&plain_electron(), 1.0, &mut hists).unwrap_err();
    assert!(matches!(err, Error::Lookup(_)), "{err}");
}

#[test]
fn nothing_enabled_means_nothing_filled() {
    let mut hists = HistSet::new();
    let mut eh = ElectronHists::new("e/", "");
    eh.setup(&mut hists).unwrap();
    eh.process_plain_electron(&plain_electron(), 1.0, &mut hists).unwrap();
    assert!(hists.is_empty());
}

#[test]
fn second_setup_is_rejected_and_fills_count_once() {
    let mut hists = HistSet::new();
    let mut eh = ElectronHists::new("e/", "kinematic isolation ISOL_tight");
    eh.setup(&mut hists).unwrap();
    let booked = hists.len();

    let err = eh.setup(&mut hists).unwrap_err();
    assert!(matches!(err, Error::Setup(_)), "{err}");
    assert_eq!(hists.len(), booked);

    eh.process_plain_electron(&plain_electron(), 1.0, &mut hists).unwrap();
    assert_eq!(hists.get("e/isIsolated_tight").unwrap().entries, 1);
    assert_eq!(hists.get("e/electronPt").unwrap().entries, 1);
}

#[test]
fn aggregators_sharing_a_base_collide() {
    let mut hists = HistSet::new();
    ElectronHists::new("e/", "isolation").setup(&mut hists).unwrap();
    let err = ElectronHists::new("e/", "isolation").setup(&mut hists).unwrap_err();
    assert!(matches!(err, Error::Setup(_)), "{err}");

    ElectronHists::new("tight/", "isolation").setup(&mut hists).unwrap();
    assert_eq!(hists.len(), 36);
}

#[test]
fn kinematics_are_filled_in_gev_for_both_shapes() {
    let mut hists = HistSet::new();
    let mut eh = ElectronHists::new("e/", "kinematic");
    eh.setup(&mut hists).unwrap();

    eh.process_native_electron(&native_electron(), 1.0, &EventInfo::default(), &mut hists)
        .unwrap();
    eh.process_plain_electron(&plain_electron(), 1.0, &mut hists).unwrap();

    let pt = hists.get("e/electronPt").unwrap();
    // 100 bins over [0, 1000): 40 GeV lands in bin 4 for both shapes.
    assert_eq!(pt.bin_content[4], 2.0);
    assert_eq!(pt.entries, 2);
}

#[test]
fn zero_pt_relative_isolation_goes_to_overflow() {
    let mut hists = HistSet::new();
    let mut eh = ElectronHists::new("e/", "isolation");
    eh.setup(&mut hists).unwrap();

    let mut e = native_electron();
    e.p4.pt = 0.0;
    eh.process_native_electron(&e, 1.0, &EventInfo::default(), &mut hists).unwrap();

    let rel = hists.get("e/ptcone20_rel").unwrap();
    assert_eq!(rel.overflow, 1.0);
    assert_eq!(rel.integral(), 0.0);
}

#[test]
fn processing_against_another_set_fails_without_fills() {
    let mut booked = HistSet::new();
    let mut eh = ElectronHists::new("electron/", "isolation");
    eh.setup(&mut booked).unwrap();

    let mut other = HistSet::new();
    for i in 0..18 {
        other.book("muon/", &format!("unrelated{i}"), "unrelated", 3, -1.5, 1.5).unwrap();
    }

    let err = eh
        .process_plain(&PlainParticle::Electron(plain_electron()), 1.0, &mut other)
        .unwrap_err();
    assert!(matches!(err, Error::Lookup(_)), "{err}");
    assert_eq!(other.total_entries(), 0);
    assert_eq!(booked.total_entries(), 0);
}

#[test]
fn kinematic_fills_precede_electron_fills() {
    let mut rec = Recorder::default();
    let mut eh = ElectronHists::new("e/", "kinematic isolation ISOL_tight PID PID_LHTight");
    eh.setup(&mut rec).unwrap();

    eh.process_plain_electron(&plain_electron(), 1.0, &mut rec).unwrap();

    let mut expected: Vec<String> = ["Pt", "Eta", "Phi", "Mass", "Energy"]
        .iter()
        .map(|k| format!("e/electron{k}"))
        .collect();
    expected.push("e/isIsolated_tight".into());
    expected.extend(IsolationType::ALL.iter().map(|k| format!("e/{}", k.name())));
    expected.extend(IsolationType::ALL.iter().map(|k| format!("e/{}_rel", k.name())));
    expected.push("e/LHTight".into());

    let filled: Vec<&str> = rec.fills.iter().map(|(n, _, _)| n.as_str()).collect();
    assert_eq!(filled, expected);

    // Same order on the native path.
    rec.fills.clear();
    let mut e = native_electron();
    e.aux.insert("isIsolated_tight", AuxValue::Char(1));
    eh.process_native_electron(&e, 1.0, &EventInfo::default(), &mut rec).unwrap();
    let filled: Vec<&str> = rec.fills.iter().map(|(n, _, _)| n.as_str()).collect();
    assert_eq!(filled, expected);
}

#[test]
fn failed_setup_leaves_aggregator_unset() {
    let mut taken = HistSet::new();
    taken.book("e/", "ptcone20", "ptcone20", 3, -1.5, 1.5).unwrap();

    let mut eh = ElectronHists::new("e/", "kinematic isolation ISOL_tight");
    let err = eh.setup(&mut taken).unwrap_err();
    assert!(matches!(err, Error::Setup(_)), "{err}");
    assert!(!eh.is_initialized());

    let mut hists = HistSet::new();
    eh.setup(&mut hists).unwrap();
    assert_eq!(hists.len(), 5 + 1 + 18);
    eh.process_plain_electron(&plain_electron(), 1.0, &mut hists).unwrap();
    assert_eq!(hists.get("e/ptcone20").unwrap().entries, 1);
    assert_eq!(hists.get("e/electronPt").unwrap().entries, 1);
}
