//! Simulation engine state machine
//!
//! Owns the complete state of one simulation instance: current step,
//! portfolio, parameters, per-step value history, and the action log.
//! Every operation is synchronous and runs to completion; the playback
//! loop in `playback.rs` is the only caller that drives it on a timer.
//!
//! There is no global state. Each `Engine` is an independent instance, so
//! tests (and embedders) can run as many as they like without leakage.

use crate::models::log::ActionLog;
use crate::models::params::{ParamKey, ParameterSet, Preset, PresetName};
use crate::models::portfolio::Portfolio;
use crate::orchestrator::checkpoint::EngineSnapshot;
use crate::steps::Step;
use serde::{Deserialize, Serialize};

/// Log line appended on every full reset.
const RESET_MESSAGE: &str = "Simulation reset. Ready to play.";

/// Total portfolio value recorded after a step executed.
///
/// One entry per executed step; re-running a step overwrites its entry.
/// The view uses consecutive entries to display per-step value deltas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub step_index: usize,
    pub total_value: f64,
}

/// The simulation engine.
///
/// # Example
///
/// ```
/// use treasury_simulator_core_rs::{Engine, Step};
///
/// let mut engine = Engine::new();
/// assert_eq!(engine.current_step(), Step::Initial);
///
/// engine.advance();
/// engine.advance();
/// engine.advance();
/// assert!(engine.at_terminal_step());
///
/// engine.advance(); // past the end: no-op
/// assert_eq!(engine.current_step(), Step::Distribution);
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    /// Where the timeline currently stands.
    current_step: Step,

    /// The ledger, replaced wholesale by each transition.
    portfolio: Portfolio,

    /// Live tunables; transitions read them, the input surface writes them.
    params: ParameterSet,

    /// Total value after each executed step, indexed by step.
    history: Vec<HistoryEntry>,

    /// Narrative of triggered actions; cleared only by full reset.
    log: ActionLog,

    /// Whether the playback timer is currently armed.
    is_playing: bool,

    /// One-way latch: has play ever been pressed on this instance.
    /// Survives resets; the view uses it for first-run hinting.
    has_ever_played: bool,
}

impl Engine {
    /// Create an engine at step 0 with default parameters.
    pub fn new() -> Self {
        Self::with_params(ParameterSet::default())
    }

    /// Create an engine at step 0 with the given parameters.
    pub fn with_params(params: ParameterSet) -> Self {
        let mut engine = Self {
            current_step: Step::Initial,
            portfolio: Portfolio::initial(),
            params,
            history: Vec::new(),
            log: ActionLog::new(),
            is_playing: false,
            has_ever_played: false,
        };
        engine.reset();
        engine
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current step of the timeline.
    pub fn current_step(&self) -> Step {
        self.current_step
    }

    /// Ordinal position of the current step (0-3).
    pub fn current_step_index(&self) -> usize {
        self.current_step.index()
    }

    /// Whether the timeline has reached its last step.
    pub fn at_terminal_step(&self) -> bool {
        self.current_step.is_terminal()
    }

    /// The current portfolio.
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// The live parameters.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Per-step value history, one entry per executed step.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// The action log.
    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    /// Whether the playback timer is armed.
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Whether play has ever been pressed on this instance.
    pub fn has_ever_played(&self) -> bool {
        self.has_ever_played
    }

    /// Current total portfolio value.
    pub fn total_value(&self) -> f64 {
        self.portfolio.total_value()
    }

    /// Current reserve ratio, in percent.
    pub fn reserve_ratio(&self) -> f64 {
        self.portfolio.reserve_ratio()
    }

    /// Current risk score against the live parameters.
    ///
    /// Recomputed from the mutated parameters on every read, so dragging a
    /// slider previews the score without re-running the timeline.
    pub fn risk_score(&self) -> f64 {
        self.portfolio.risk_score(&self.params)
    }

    /// Change in total value produced by the given step, against the step
    /// before it. `None` for step 0 or steps that have not executed yet.
    pub fn step_delta(&self, step_index: usize) -> Option<f64> {
        if step_index == 0 || step_index >= self.history.len() {
            return None;
        }
        Some(self.history[step_index].total_value - self.history[step_index - 1].total_value)
    }

    /// Read-only snapshot of the full engine state for the view.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot::capture(self)
    }

    // ========================================================================
    // State machine operations
    // ========================================================================

    /// Return to step 0: fresh initial portfolio, single history entry,
    /// cleared log with the reset line. Stops playback. Idempotent.
    pub fn reset(&mut self) {
        self.is_playing = false;
        self.current_step = Step::Initial;
        self.history.clear();
        self.log.clear();
        self.execute_step(Step::Initial);
        self.log.push(None, RESET_MESSAGE);
    }

    /// Execute one step's transition against the current portfolio and
    /// record its history entry and log line.
    pub fn execute_step(&mut self, step: Step) {
        let outcome = step.apply(&self.params, &self.portfolio);
        self.portfolio = outcome.portfolio;
        self.record_history(step);
        if let Some(message) = outcome.message {
            self.log.push(Some(step.index()), message);
        }
    }

    /// Move the timeline one step forward and execute it.
    ///
    /// At the terminal step this is a no-op apart from stopping playback;
    /// reaching the terminal step also stops playback.
    pub fn advance(&mut self) {
        let Some(next) = self.current_step.next() else {
            self.is_playing = false;
            return;
        };
        self.current_step = next;
        self.execute_step(next);
        if next.is_terminal() {
            self.is_playing = false;
        }
    }

    /// Load a built-in preset by wire key: overwrite all three parameters,
    /// fully reset, and log the load. Unknown keys are a silent no-op.
    pub fn apply_preset(&mut self, key: &str) {
        if let Some(preset) = Preset::lookup(key) {
            self.load_preset(preset.name);
        }
    }

    /// Load a built-in preset by name.
    pub fn load_preset(&mut self, name: PresetName) {
        let preset = Preset::get(name);
        self.params = preset.params();
        self.reset();
        self.log
            .push(None, format!("Preset loaded: {}", preset.label));
    }

    /// Overwrite a single parameter. Does not reset and does not re-run
    /// any step; metric reads pick the new value up immediately.
    pub fn set_parameter(&mut self, key: ParamKey, value: f64) {
        self.params.set(key, value);
    }

    /// [`Engine::set_parameter`] addressed by wire key. Unknown keys are a
    /// silent no-op.
    pub fn set_parameter_by_key(&mut self, key: &str, value: f64) {
        if let Some(key) = ParamKey::from_key(key) {
            self.set_parameter(key, value);
        }
    }

    /// Arm the playing flag and the one-way `has_ever_played` latch.
    /// Called by the playback loop; harmless on its own.
    pub fn mark_playing(&mut self) {
        self.is_playing = true;
        self.has_ever_played = true;
    }

    /// Clear the playing flag. Idempotent.
    pub fn mark_paused(&mut self) {
        self.is_playing = false;
    }

    fn record_history(&mut self, step: Step) {
        let entry = HistoryEntry {
            step_index: step.index(),
            total_value: self.portfolio.total_value(),
        };
        let index = step.index();
        if index < self.history.len() {
            self.history[index] = entry;
        } else {
            self.history.push(entry);
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_engine_starts_reset() {
        let engine = Engine::new();
        assert_eq!(engine.current_step(), Step::Initial);
        assert_eq!(*engine.portfolio(), Portfolio::initial());
        assert_eq!(engine.history().len(), 1);
        assert_eq!(engine.history()[0].step_index, 0);
        assert_eq!(engine.history()[0].total_value, 1_000_000.0);
        assert_eq!(engine.log().len(), 1);
        assert!(!engine.is_playing());
        assert!(!engine.has_ever_played());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut engine = Engine::new();
        engine.advance();
        engine.advance();
        engine.reset();
        let first = engine.clone();
        engine.reset();

        assert_eq!(engine.current_step(), first.current_step());
        assert_eq!(engine.portfolio(), first.portfolio());
        assert_eq!(engine.history(), first.history());
        assert_eq!(engine.log(), first.log());
    }

    #[test]
    fn test_advance_walks_the_sequence() {
        let mut engine = Engine::new();
        engine.advance();
        assert_eq!(engine.current_step(), Step::Shock);
        engine.advance();
        assert_eq!(engine.current_step(), Step::Rebalance);
        engine.advance();
        assert_eq!(engine.current_step(), Step::Distribution);
        assert!(engine.at_terminal_step());
        assert_eq!(engine.history().len(), 4);
    }

    #[test]
    fn test_advance_past_terminal_is_noop() {
        let mut engine = Engine::new();
        for _ in 0..3 {
            engine.advance();
        }
        let before = engine.clone();
        engine.advance();
        assert_eq!(engine.current_step(), before.current_step());
        assert_eq!(engine.portfolio(), before.portfolio());
        assert_eq!(engine.history(), before.history());
        assert_eq!(engine.log(), before.log());
    }

    #[test]
    fn test_set_parameter_does_not_reset() {
        let mut engine = Engine::new();
        engine.advance();
        let log_len = engine.log().len();

        engine.set_parameter(ParamKey::ShockMagnitude, 42.0);
        assert_eq!(engine.current_step(), Step::Shock);
        assert_eq!(engine.log().len(), log_len);
        assert_eq!(engine.params().shock_magnitude, 42.0);
    }

    #[test]
    fn test_set_parameter_previews_risk_live() {
        let mut engine = Engine::new();
        let before = engine.risk_score();
        engine.set_parameter(ParamKey::ShockMagnitude, 50.0);
        let after = engine.risk_score();
        assert!(after > before);
        // The portfolio itself did not move
        assert_eq!(*engine.portfolio(), Portfolio::initial());
    }

    #[test]
    fn test_unknown_parameter_key_is_silent_noop() {
        let mut engine = Engine::new();
        let params = *engine.params();
        engine.set_parameter_by_key("liabilities", 5.0);
        assert_eq!(*engine.params(), params);
    }

    #[test]
    fn test_apply_preset_resets_and_logs() {
        let mut engine = Engine::new();
        engine.advance();
        engine.advance();

        engine.apply_preset("aggressive");
        assert_eq!(engine.current_step(), Step::Initial);
        assert_eq!(*engine.portfolio(), Portfolio::initial());
        assert_eq!(engine.params().shock_magnitude, 35.0);
        assert_eq!(engine.params().target_reserve_ratio, 105.0);
        assert_eq!(engine.params().yield_distribution, 8.0);

        let messages = engine.log().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], RESET_MESSAGE);
        assert_eq!(messages[1], "Preset loaded: Aggressive");
    }

    #[test]
    fn test_unknown_preset_is_silent_noop() {
        let mut engine = Engine::new();
        engine.advance();
        let before = engine.clone();

        engine.apply_preset("degen");
        assert_eq!(engine.current_step(), before.current_step());
        assert_eq!(engine.params(), before.params());
        assert_eq!(engine.log(), before.log());
        assert_eq!(engine.history(), before.history());
    }

    #[test]
    fn test_history_overwritten_on_replay() {
        let mut engine = Engine::new();
        for _ in 0..3 {
            engine.advance();
        }
        assert_eq!(engine.history().len(), 4);

        engine.set_parameter(ParamKey::ShockMagnitude, 0.0);
        engine.reset();
        assert_eq!(engine.history().len(), 1);

        for _ in 0..3 {
            engine.advance();
        }
        assert_eq!(engine.history().len(), 4);
        // Shock of zero: the shock step keeps full value this run
        assert_eq!(engine.history()[1].total_value, 1_000_000.0);
    }

    #[test]
    fn test_step_delta() {
        let mut engine = Engine::new();
        engine.advance(); // shock 20% of 200k bonds
        assert_eq!(engine.step_delta(0), None);
        let delta = engine.step_delta(1).unwrap();
        assert!((delta + 40_000.0).abs() < 1e-6);
        assert_eq!(engine.step_delta(2), None);
    }

    #[test]
    fn test_mark_playing_latch_survives_reset() {
        let mut engine = Engine::new();
        engine.mark_playing();
        assert!(engine.is_playing());
        assert!(engine.has_ever_played());

        engine.reset();
        assert!(!engine.is_playing());
        assert!(engine.has_ever_played());

        engine.mark_paused();
        engine.mark_paused();
        assert!(!engine.is_playing());
    }

    #[test]
    fn test_terminal_advance_clears_playing() {
        let mut engine = Engine::new();
        engine.mark_playing();
        engine.advance();
        assert!(engine.is_playing());
        engine.advance();
        assert!(engine.is_playing());
        engine.advance(); // lands on the terminal step
        assert!(!engine.is_playing());
    }
}
