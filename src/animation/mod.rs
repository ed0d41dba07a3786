/// Easing curves.
pub mod ease;
/// Interpolation tasks and the per-element registry.
pub mod tween;
/// Sequenced lanes of steps multiplexed on one frame clock.
pub mod timeline;
