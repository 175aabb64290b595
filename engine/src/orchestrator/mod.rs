//! Orchestrator - simulation state machine and playback
//!
//! `engine.rs` holds the synchronous state machine; `playback.rs` drives it
//! on a timer; `checkpoint.rs` captures read-only snapshots for the view.

pub mod checkpoint;
pub mod engine;
pub mod playback;

// Re-export main types for convenience
pub use checkpoint::{EngineError, EngineSnapshot, MetricsSnapshot};
pub use engine::{Engine, HistoryEntry};
pub use playback::{Player, DEFAULT_STEP_INTERVAL};
