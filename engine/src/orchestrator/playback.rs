//! Playback - the play/pause scheduling loop
//!
//! "Play" arms a recurring timer that advances the timeline once per
//! interval until the terminal step stops it; "pause" cancels the timer.
//! At most one timer is armed at any moment: playing again cancels the
//! previous timer before arming a new one, and a cancelled timer can
//! never advance the engine again (the token is re-checked under the
//! engine lock right before each advance).
//!
//! Everything else is a straight delegate to the synchronous [`Engine`]
//! under the lock, so views and embedders talk to one object.

use crate::models::params::Preset;
use crate::orchestrator::checkpoint::EngineSnapshot;
use crate::orchestrator::engine::{Engine, HistoryEntry};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

/// Default cadence between automatic steps.
pub const DEFAULT_STEP_INTERVAL: Duration = Duration::from_secs(2);

/// Cancellation token for one armed timer.
struct PlaybackToken {
    cancelled: Arc<AtomicBool>,
}

impl PlaybackToken {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

/// Owns one [`Engine`] and drives it on a timer.
///
/// # Example
///
/// ```
/// use treasury_simulator_core_rs::Player;
///
/// let mut player = Player::new();
/// player.play();
/// assert!(player.is_playing());
/// player.pause();
/// assert!(!player.is_playing());
/// ```
pub struct Player {
    engine: Arc<Mutex<Engine>>,
    timer: Option<PlaybackToken>,
    interval: Duration,
}

impl Player {
    /// Create a player around a fresh engine with the default cadence.
    pub fn new() -> Self {
        Self::with_engine(Engine::new())
    }

    /// Create a player around an existing engine.
    pub fn with_engine(engine: Engine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            timer: None,
            interval: DEFAULT_STEP_INTERVAL,
        }
    }

    /// Override the step cadence (tests use a short one).
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    fn engine(&self) -> MutexGuard<'_, Engine> {
        self.engine.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn cancel_timer(&mut self) {
        if let Some(token) = self.timer.take() {
            token.cancel();
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Start automatic stepping.
    ///
    /// Cancels any previously armed timer first. When the timeline already
    /// sits at the terminal step, performs a full reset so play replays
    /// the story from the top. The first advance fires one interval after
    /// this call.
    pub fn play(&mut self) {
        self.cancel_timer();
        {
            let mut engine = self.engine();
            if engine.at_terminal_step() {
                engine.reset();
            }
            engine.mark_playing();
        }

        let cancelled = Arc::new(AtomicBool::new(false));
        let token = Arc::clone(&cancelled);
        let engine = Arc::clone(&self.engine);
        let interval = self.interval;

        thread::spawn(move || loop {
            thread::sleep(interval);
            let mut engine = match engine.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if token.load(Ordering::SeqCst) || !engine.is_playing() {
                return;
            }
            engine.advance();
            if engine.at_terminal_step() {
                // advance() already cleared the playing flag
                return;
            }
        });

        self.timer = Some(PlaybackToken { cancelled });
    }

    /// Stop automatic stepping. Idempotent; pausing while paused changes
    /// nothing.
    pub fn pause(&mut self) {
        self.cancel_timer();
        self.engine().mark_paused();
    }

    /// Full reset: cancels the timer and returns the engine to step 0.
    pub fn reset(&mut self) {
        self.cancel_timer();
        self.engine().reset();
    }

    /// Single manual step.
    pub fn advance(&mut self) {
        self.engine().advance();
    }

    /// Load a preset by wire key. Unknown keys are a complete no-op: the
    /// timer stays armed and no state changes.
    pub fn apply_preset(&mut self, key: &str) {
        if Preset::lookup(key).is_none() {
            return;
        }
        self.cancel_timer();
        self.engine().apply_preset(key);
    }

    /// Overwrite a single parameter by wire key. Unknown keys are a
    /// silent no-op. Never resets or re-runs the timeline.
    pub fn set_parameter(&mut self, key: &str, value: f64) {
        self.engine().set_parameter_by_key(key, value);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Whether the timer is currently armed.
    pub fn is_playing(&self) -> bool {
        self.engine().is_playing()
    }

    /// Whether play has ever been pressed on this instance.
    pub fn has_ever_played(&self) -> bool {
        self.engine().has_ever_played()
    }

    /// Ordinal position of the current step (0-3).
    pub fn current_step_index(&self) -> usize {
        self.engine().current_step_index()
    }

    /// Current total portfolio value.
    pub fn total_value(&self) -> f64 {
        self.engine().total_value()
    }

    /// Current reserve ratio, in percent.
    pub fn reserve_ratio(&self) -> f64 {
        self.engine().reserve_ratio()
    }

    /// Current risk score against the live parameters.
    pub fn risk_score(&self) -> f64 {
        self.engine().risk_score()
    }

    /// Full action log, oldest first.
    pub fn log_messages(&self) -> Vec<String> {
        self.engine().log().messages()
    }

    /// Per-step value history.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.engine().history().to_vec()
    }

    /// Read-only snapshot of the full engine state.
    pub fn snapshot(&self) -> EngineSnapshot {
        self.engine().snapshot()
    }

    /// Run a closure against the engine under the lock. Escape hatch for
    /// embedders needing queries not mirrored above.
    pub fn with_engine_state<R>(&self, f: impl FnOnce(&Engine) -> R) -> R {
        f(&self.engine())
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
