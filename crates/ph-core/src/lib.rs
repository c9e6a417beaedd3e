//! # ph-core
//!
//! Shared building blocks for the phists workspace: the error type, the two
//! electron object representations (framework-native with an auxiliary
//! attribute store, and plain transient data), event context, and the
//! [`HistogramService`] trait that aggregators book and fill through.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::HistogramService;
pub use types::{
    AuxStore, AuxValue, EventInfo, FourMomentum, HistId, IsolationCones, IsolationType,
    NativeElectron, NativeObject, NativeParticle, ParticleKind, PlainElectron, PlainObject,
    PlainParticle,
};

/// Crate version, shared by the `phists` binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
