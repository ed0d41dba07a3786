//! Serializable engine snapshot (import/export JSON).

/// `EngineConfig` and its validation rules.
pub mod snapshot;
