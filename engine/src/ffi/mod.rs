//! FFI boundary (PyO3)
//!
//! Thin wrapper exposing the engine's command/query surface to an
//! embedding frontend. Kept minimal: commands are fire-and-forget with
//! the same silent-no-op semantics as the Rust API, queries hand back
//! scalars or JSON.

pub mod engine;
