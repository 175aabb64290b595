//! PyO3 wrapper for the simulation engine
//!
//! # Example (from Python)
//!
//! ```python
//! from treasury_simulator_core_rs import Engine
//!
//! engine = Engine()
//! engine.apply_preset("aggressive")
//! engine.play()
//! ...
//! print(engine.snapshot_json())
//! ```

use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;

use crate::orchestrator::checkpoint::snapshot_to_json;
use crate::orchestrator::playback::Player;

/// Python-facing handle around [`Player`].
#[pyclass(name = "Engine")]
pub struct PyEngine {
    inner: Player,
}

#[pymethods]
impl PyEngine {
    /// Create an engine at step 0 with default (balanced) parameters.
    #[new]
    fn new() -> Self {
        PyEngine {
            inner: Player::new(),
        }
    }

    /// Start automatic stepping; replays from the top when already at the
    /// end of the timeline.
    fn play(&mut self) {
        self.inner.play();
    }

    /// Stop automatic stepping. Idempotent.
    fn pause(&mut self) {
        self.inner.pause();
    }

    /// Return to step 0.
    fn reset(&mut self) {
        self.inner.reset();
    }

    /// Single manual step.
    fn advance(&mut self) {
        self.inner.advance();
    }

    /// Load a preset by key (`conservative`, `balanced`, `aggressive`).
    /// Unknown keys are ignored.
    fn apply_preset(&mut self, name: &str) {
        self.inner.apply_preset(name);
    }

    /// Overwrite one parameter by key (`shockMagnitude`,
    /// `targetReserveRatio`, `yieldDistribution`). Unknown keys are
    /// ignored.
    fn set_parameter(&mut self, name: &str, value: f64) {
        self.inner.set_parameter(name, value);
    }

    #[getter]
    fn current_step_index(&self) -> usize {
        self.inner.current_step_index()
    }

    #[getter]
    fn is_playing(&self) -> bool {
        self.inner.is_playing()
    }

    #[getter]
    fn has_ever_played(&self) -> bool {
        self.inner.has_ever_played()
    }

    #[getter]
    fn total_value(&self) -> f64 {
        self.inner.total_value()
    }

    #[getter]
    fn reserve_ratio(&self) -> f64 {
        self.inner.reserve_ratio()
    }

    #[getter]
    fn risk_score(&self) -> f64 {
        self.inner.risk_score()
    }

    /// Full action log, oldest first.
    fn log_messages(&self) -> Vec<String> {
        self.inner.log_messages()
    }

    /// Per-step value history as `(step_index, total_value)` pairs.
    fn history(&self) -> Vec<(usize, f64)> {
        self.inner
            .history()
            .into_iter()
            .map(|entry| (entry.step_index, entry.total_value))
            .collect()
    }

    /// Complete observable state as a JSON string.
    fn snapshot_json(&self) -> PyResult<String> {
        snapshot_to_json(&self.inner.snapshot())
            .map_err(|e| PyErr::new::<PyRuntimeError, _>(e.to_string()))
    }
}
