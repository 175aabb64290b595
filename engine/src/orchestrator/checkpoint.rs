//! Snapshot - read-only engine state for the view
//!
//! The view never touches the engine's internals; after every command it
//! re-reads an `EngineSnapshot`. Snapshots also back the determinism
//! checks: canonical-JSON hashing gives a digest that is equal exactly
//! when two engines are in the same observable state.
//!
//! Snapshots are in-memory values. Nothing here touches the filesystem;
//! the simulation has no cross-session persistence.

use crate::models::log::LogEntry;
use crate::models::params::ParameterSet;
use crate::models::portfolio::Portfolio;
use crate::orchestrator::engine::{Engine, HistoryEntry};
use crate::steps::Step;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors at the snapshot boundary.
///
/// Command operations on the engine itself are total and never fail;
/// these only surface when serializing or validating snapshots.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("Snapshot serialization failed: {0}")]
    SerializationError(String),

    #[error("Snapshot validation failed: {0}")]
    StateValidationError(String),
}

/// Derived metrics, precomputed so the view never re-implements them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub total_value: f64,
    pub reserve_ratio: f64,
    pub risk_score: f64,
}

/// Complete observable engine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
    /// Ordinal position of the current step (0-3).
    pub step_index: usize,

    /// Symbolic key of the current step (`INITIAL`...`DISTRIBUTION`).
    pub step_key: String,

    pub is_playing: bool,
    pub has_ever_played: bool,

    pub params: ParameterSet,
    pub portfolio: Portfolio,
    pub metrics: MetricsSnapshot,

    /// One entry per executed step.
    pub history: Vec<HistoryEntry>,

    /// Full action log, oldest first.
    pub log: Vec<LogEntry>,
}

impl EngineSnapshot {
    /// Capture the engine's observable state.
    pub fn capture(engine: &Engine) -> Self {
        EngineSnapshot {
            step_index: engine.current_step_index(),
            step_key: engine.current_step().key().to_string(),
            is_playing: engine.is_playing(),
            has_ever_played: engine.has_ever_played(),
            params: *engine.params(),
            portfolio: *engine.portfolio(),
            metrics: MetricsSnapshot {
                total_value: engine.total_value(),
                reserve_ratio: engine.reserve_ratio(),
                risk_score: engine.risk_score(),
            },
            history: engine.history().to_vec(),
            log: engine.log().entries().to_vec(),
        }
    }
}

// ============================================================================
// Serialization & Digest
// ============================================================================

/// Serialize a snapshot to JSON for an embedding view layer.
pub fn snapshot_to_json(snapshot: &EngineSnapshot) -> Result<String, EngineError> {
    serde_json::to_string(snapshot)
        .map_err(|e| EngineError::SerializationError(format!("Snapshot serialization failed: {}", e)))
}

/// Compute a deterministic SHA256 digest of a snapshot.
///
/// Serializes through `serde_json::Value` with recursively sorted object
/// keys, so the digest depends only on the observable state, never on
/// field ordering. Two engines driven through the same command sequence
/// produce the same digest.
pub fn snapshot_digest(snapshot: &EngineSnapshot) -> Result<String, EngineError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(snapshot)
        .map_err(|e| EngineError::SerializationError(format!("Snapshot serialization failed: {}", e)))?;

    // Recursively sort all object keys for a canonical representation
    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let canonical = canonicalize(value);
    let json = serde_json::to_string(&canonical)
        .map_err(|e| EngineError::SerializationError(format!("Snapshot serialization failed: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    let result = hasher.finalize();

    Ok(format!("{:x}", result))
}

// ============================================================================
// Validation
// ============================================================================

/// Validate a snapshot's internal consistency.
///
/// Checks the structural invariants every reachable engine state holds:
/// - step index within the fixed sequence, key matching the index
/// - exactly one history entry per executed step, indices aligned
/// - finite holdings; usdc and cash never negative (cash floors at zero
///   in the distribution step; usdc is never debited)
/// - a non-empty log (the reset line is always present)
pub fn validate_snapshot(snapshot: &EngineSnapshot) -> Result<(), EngineError> {
    let step = Step::from_index(snapshot.step_index).ok_or_else(|| {
        EngineError::StateValidationError(format!(
            "Step index out of range: {}",
            snapshot.step_index
        ))
    })?;

    if step.key() != snapshot.step_key {
        return Err(EngineError::StateValidationError(format!(
            "Step key mismatch: index {} expects {}, found {}",
            snapshot.step_index,
            step.key(),
            snapshot.step_key
        )));
    }

    if snapshot.history.len() != snapshot.step_index + 1 {
        return Err(EngineError::StateValidationError(format!(
            "History length {} does not match step index {}",
            snapshot.history.len(),
            snapshot.step_index
        )));
    }

    for (position, entry) in snapshot.history.iter().enumerate() {
        if entry.step_index != position {
            return Err(EngineError::StateValidationError(format!(
                "History entry at position {} records step {}",
                position, entry.step_index
            )));
        }
    }

    let holdings = [
        ("usdc", snapshot.portfolio.usdc),
        ("tBills", snapshot.portfolio.t_bills),
        ("bonds", snapshot.portfolio.bonds),
        ("cash", snapshot.portfolio.cash),
    ];
    for (name, amount) in holdings {
        if !amount.is_finite() {
            return Err(EngineError::StateValidationError(format!(
                "Holding {} is not finite: {}",
                name, amount
            )));
        }
    }
    if snapshot.portfolio.usdc < 0.0 || snapshot.portfolio.cash < 0.0 {
        return Err(EngineError::StateValidationError(format!(
            "Negative liquid holding: usdc {}, cash {}",
            snapshot.portfolio.usdc, snapshot.portfolio.cash
        )));
    }

    if snapshot.log.is_empty() {
        return Err(EngineError::StateValidationError(
            "Log is empty; reset line missing".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_matches_engine_state() {
        let mut engine = Engine::new();
        engine.advance();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.step_index, 1);
        assert_eq!(snapshot.step_key, "SHOCK");
        assert_eq!(snapshot.portfolio, *engine.portfolio());
        assert_eq!(snapshot.history.len(), 2);
        assert_eq!(snapshot.metrics.total_value, engine.total_value());
        assert_eq!(snapshot.metrics.risk_score, engine.risk_score());
    }

    #[test]
    fn test_digest_is_deterministic() {
        let engine_a = Engine::new();
        let engine_b = Engine::new();

        let digest_a = snapshot_digest(&engine_a.snapshot()).unwrap();
        let digest_b = snapshot_digest(&engine_b.snapshot()).unwrap();
        assert_eq!(digest_a, digest_b);
    }

    #[test]
    fn test_digest_differs_after_divergence() {
        let engine_a = Engine::new();
        let mut engine_b = Engine::new();
        engine_b.advance();

        let digest_a = snapshot_digest(&engine_a.snapshot()).unwrap();
        let digest_b = snapshot_digest(&engine_b.snapshot()).unwrap();
        assert_ne!(digest_a, digest_b);
    }

    #[test]
    fn test_validate_accepts_fresh_engine() {
        let snapshot = Engine::new().snapshot();
        assert!(validate_snapshot(&snapshot).is_ok());
    }

    #[test]
    fn test_validate_rejects_misaligned_history() {
        let mut snapshot = Engine::new().snapshot();
        snapshot.history.push(HistoryEntry {
            step_index: 1,
            total_value: 0.0,
        });
        assert!(matches!(
            validate_snapshot(&snapshot),
            Err(EngineError::StateValidationError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_step_key() {
        let mut snapshot = Engine::new().snapshot();
        snapshot.step_key = "SHOCK".to_string();
        assert!(validate_snapshot(&snapshot).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let snapshot = Engine::new().snapshot();
        let json = snapshot_to_json(&snapshot).unwrap();
        let restored: EngineSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, snapshot);
    }
}
