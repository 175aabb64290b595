//! Treasury Timeline Simulator - Rust Engine
//!
//! Deterministic four-step simulation of a toy treasury portfolio reacting
//! to a market shock, an automatic rebalancing rule, and a scheduled yield
//! distribution.
//!
//! # Architecture
//!
//! - **models**: Domain types (asset catalog, Portfolio, ParameterSet, ActionLog)
//! - **steps**: The fixed four-step timeline and its transition functions
//! - **orchestrator**: Engine state machine, playback loop, snapshots
//!
//! # Critical Invariants
//!
//! 1. Every transition is a pure function of (parameters, previous portfolio)
//! 2. The step sequence is fixed; step N is only applied to step N-1's output
//! 3. No randomness and no wall-clock reads outside the playback timer;
//!    identical command sequences produce identical snapshots

// Module declarations
pub mod models;
pub mod orchestrator;
pub mod steps;

// Re-exports for convenience
pub use models::{
    asset::{asset_class, AssetClass, AssetId, ASSET_CATALOG},
    log::{ActionLog, LogEntry},
    params::{ParamKey, ParameterSet, Preset, PresetName, PRESETS},
    portfolio::{Portfolio, NOMINAL_LIABILITIES},
};
pub use orchestrator::{
    checkpoint::{
        snapshot_digest, snapshot_to_json, validate_snapshot, EngineError, EngineSnapshot,
        MetricsSnapshot,
    },
    engine::{Engine, HistoryEntry},
    playback::{Player, DEFAULT_STEP_INTERVAL},
};
pub use steps::{Step, StepOutcome};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn treasury_simulator_core_rs(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_class::<ffi::engine::PyEngine>()?;
    Ok(())
}
