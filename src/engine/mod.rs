//! Animation orchestrator: the [`Engine`](orchestrator::Engine) state machine
//! and the operations it accepts.

/// Bundle and container editing outside animate mode.
pub mod authoring;
/// Open and close cascades.
pub mod cascade;
/// The engine, its frame loop and input surface.
pub mod orchestrator;
mod population;
/// Direction scrolling and its speed curve.
pub mod scroll;
pub(crate) mod steps;
mod toggle;

#[cfg(test)]
#[path = "../../tests/unit/engine/fixtures.rs"]
pub(crate) mod fixtures;
