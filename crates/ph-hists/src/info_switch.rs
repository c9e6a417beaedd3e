//! Detail-string switches.
//!
//! A detail string is a whitespace-separated list of tokens. Plain tokens
//! (`kinematic`, `isolation`, `PID`, `quality`) turn feature groups on;
//! prefixed tokens (`ISOL_<wp>`, `PID_<wp>`) list working points. Working
//! points keep the order in which they first appear and repeats are dropped.
//!
//! ```text
//! "kinematic isolation ISOL_FCTight ISOL_Gradient PID PID_LHTight"
//! ```

use serde::Serialize;

/// Working-point sentinel meaning "no working point".
pub const NONE_WP: &str = "NONE";

/// Whether a configured working point should be booked and filled.
///
/// Empty names and [`NONE_WP`] are skipped everywhere: booking and both fill
/// paths, for isolation and PID alike.
pub fn is_active_wp(wp: &str) -> bool {
    !wp.is_empty() && wp != NONE_WP
}

const ISOL_PREFIX: &str = "ISOL_";
const PID_PREFIX: &str = "PID_";
const KNOWN_FLAGS: [&str; 4] = ["kinematic", "isolation", "PID", "quality"];

struct DetailTokens<'a> {
    tokens: Vec<&'a str>,
}

impl<'a> DetailTokens<'a> {
    fn new(detail: &'a str) -> Self {
        Self { tokens: detail.split_whitespace().collect() }
    }

    fn has_exact(&self, flag: &str) -> bool {
        self.tokens.contains(&flag)
    }

    fn working_points(&self, prefix: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for wp in self.tokens.iter().filter_map(|t| t.strip_prefix(prefix)) {
            if !out.iter().any(|seen| seen == wp) {
                out.push(wp.to_string());
            }
        }
        out
    }

    fn unknown(&self) -> impl Iterator<Item = &'a str> {
        self.tokens.iter().copied().filter(|t| {
            !KNOWN_FLAGS.contains(t) && !t.starts_with(ISOL_PREFIX) && !t.starts_with(PID_PREFIX)
        })
    }
}

/// Switches of the generic particle aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticleInfoSwitch {
    /// Raw detail string.
    pub detail: String,
    /// Book and fill pt/eta/phi/mass/energy.
    pub kinematic: bool,
}

impl ParticleInfoSwitch {
    /// Parse a detail string.
    pub fn parse(detail: &str) -> Self {
        let tokens = DetailTokens::new(detail);
        Self { detail: detail.to_string(), kinematic: tokens.has_exact("kinematic") }
    }
}

/// Switches of the electron aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElectronInfoSwitch {
    /// Switches inherited by the generic particle aggregator.
    pub particle: ParticleInfoSwitch,
    /// Isolation flags and cone variables.
    pub isolation: bool,
    /// Identification flags.
    pub pid: bool,
    /// Quality flags (booked like PID).
    pub quality: bool,
    /// Isolation working points, in configuration order.
    pub isol_wps: Vec<String>,
    /// PID working points, in configuration order.
    pub pid_wps: Vec<String>,
}

impl ElectronInfoSwitch {
    /// Parse a detail string.
    pub fn parse(detail: &str) -> Self {
        let tokens = DetailTokens::new(detail);
        for t in tokens.unknown() {
            log::debug!("ignoring unknown electron detail token '{t}'");
        }
        Self {
            particle: ParticleInfoSwitch::parse(detail),
            isolation: tokens.has_exact("isolation"),
            pid: tokens.has_exact("PID"),
            quality: tokens.has_exact("quality"),
            isol_wps: tokens.working_points(ISOL_PREFIX),
            pid_wps: tokens.working_points(PID_PREFIX),
        }
    }

    /// PID flag histograms are booked when either `PID` or `quality` is set.
    pub fn pid_or_quality(&self) -> bool {
        self.pid || self.quality
    }

    /// Isolation working points that pass [`is_active_wp`].
    pub fn active_isol_wps(&self) -> impl Iterator<Item = &str> {
        self.isol_wps.iter().map(String::as_str).filter(|wp| is_active_wp(wp))
    }

    /// PID working points that pass [`is_active_wp`].
    pub fn active_pid_wps(&self) -> impl Iterator<Item = &str> {
        self.pid_wps.iter().map(String::as_str).filter(|wp| is_active_wp(wp))
    }
}
