//! `phists fill` and `phists describe`.
//!
//! Event file layout (JSON):
//!
//! ```text
//! {"events": [
//!   {"info": {"run_number": 1, "event_number": 7}, "weight": 1.0,
//!    "particles": [
//!      {"shape": "native", "object": {"kind": "electron", "p4": {...}, "isolation": {...}, "aux": {...}}},
//!      {"shape": "plain",  "object": {"kind": "electron", "p4": {...}, "ptcone20": 1.2, "isIsolated": {...}}}
//!    ]}
//! ]}
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use ph_core::{EventInfo, NativeParticle, ParticleKind, PlainParticle};
use ph_histo::HistSet;
use ph_hists::ElectronHists;

use crate::write_json;

/// Default booking base name.
pub const DEFAULT_NAME: &str = "electron/";

/// Run config file (YAML; JSON is accepted as well).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub name: Option<String>,
    pub detail: Option<String>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Fully resolved `fill` invocation.
#[derive(Debug, Clone)]
pub struct FillPlan {
    pub name: String,
    pub detail: String,
    pub input: PathBuf,
    pub output: Option<PathBuf>,
}

/// Read a run config. Relative paths are resolved against the config's
/// directory.
pub fn read_run_config(path: &Path) -> Result<RunConfig> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read run config {}", path.display()))?;
    // YAML parser can also read JSON (YAML is a superset).
    let mut cfg: RunConfig = serde_yaml_ng::from_slice(&bytes)
        .with_context(|| format!("invalid run config {}", path.display()))?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    cfg.input = cfg.input.map(|p| rebase(base_dir, p));
    cfg.output = cfg.output.map(|p| rebase(base_dir, p));
    Ok(cfg)
}

fn rebase(base_dir: &Path, p: PathBuf) -> PathBuf {
    if p.is_absolute() { p } else { base_dir.join(p) }
}

/// Merge the optional run config with command-line flags (flags win).
pub fn resolve_config(
    config: Option<&Path>,
    input: Option<PathBuf>,
    detail: Option<String>,
    name: Option<String>,
    output: Option<PathBuf>,
) -> Result<FillPlan> {
    let cfg = match config {
        Some(path) => read_run_config(path)?,
        None => RunConfig::default(),
    };

    let input = input.or(cfg.input).ok_or_else(|| {
        anyhow::anyhow!("no input events: pass --input or set `input` in the run config")
    })?;
    let detail = detail.or(cfg.detail).unwrap_or_default();
    if detail.trim().is_empty() {
        tracing::warn!("empty detail string: no histograms will be booked");
    }

    Ok(FillPlan {
        name: name.or(cfg.name).unwrap_or_else(|| DEFAULT_NAME.to_string()),
        detail,
        input,
        output: output.or(cfg.output),
    })
}

#[derive(Debug, Deserialize)]
struct EventFile {
    events: Vec<EventRecord>,
}

#[derive(Debug, Deserialize)]
struct EventRecord {
    #[serde(default)]
    info: EventInfo,
    #[serde(default = "default_weight")]
    weight: f64,
    #[serde(default)]
    particles: Vec<InputParticle>,
}

fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
#[serde(tag = "shape", content = "object", rename_all = "lowercase")]
enum InputParticle {
    Native(NativeParticle),
    Plain(PlainParticle),
}

impl InputParticle {
    fn kind(&self) -> ParticleKind {
        match self {
            InputParticle::Native(p) => p.kind(),
            InputParticle::Plain(p) => p.kind(),
        }
    }
}

pub fn cmd_fill(plan: &FillPlan) -> Result<()> {
    tracing::info!("reading events: {}", plan.input.display());
    let bytes = std::fs::read(&plan.input)
        .with_context(|| format!("failed to read events {}", plan.input.display()))?;
    let file: EventFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("invalid event file {}", plan.input.display()))?;

    let mut hists = HistSet::new();
    let mut electrons = ElectronHists::new(plan.name.as_str(), &plan.detail);
    electrons.setup(&mut hists).context("failed to book histograms")?;
    tracing::info!(n_hists = hists.len(), "booked histograms");

    let mut n_electrons = 0usize;
    let mut n_skipped = 0usize;
    for (i, ev) in file.events.iter().enumerate() {
        for p in &ev.particles {
            if p.kind() != ParticleKind::Electron {
                n_skipped += 1;
                continue;
            }
            let filled = match p {
                InputParticle::Native(np) => {
                    electrons.process_native(np, ev.weight, &ev.info, &mut hists)
                }
                InputParticle::Plain(pp) => electrons.process_plain(pp, ev.weight, &mut hists),
            };
            filled.with_context(|| {
                format!("event {i} (run {}, event {})", ev.info.run_number, ev.info.event_number)
            })?;
            n_electrons += 1;
        }
    }
    if n_skipped > 0 {
        tracing::debug!("skipped {n_skipped} non-electron objects");
    }
    tracing::info!(events = file.events.len(), electrons = n_electrons, "fill complete");

    let output_json = serde_json::json!({
        "name": plan.name,
        "detail": plan.detail,
        "n_events": file.events.len(),
        "n_electrons": n_electrons,
        "histograms": hists.to_json()?,
    });
    write_json(plan.output.as_ref(), output_json)
}

pub fn cmd_describe(detail: &str, name: &str, output: Option<&PathBuf>) -> Result<()> {
    let electrons = ElectronHists::new(name, detail);
    let bookings: Vec<serde_json::Value> = electrons
        .bookings()
        .into_iter()
        .map(|d| {
            serde_json::json!({
                "name": format!("{name}{}", d.name),
                "title": d.title,
                "n_bins": d.n_bins,
                "low": d.low,
                "high": d.high,
            })
        })
        .collect();

    let output_json = serde_json::json!({
        "switch": electrons.switch(),
        "histograms": bookings,
    });
    write_json(output, output_json)
}
