/// Shared value types: points, quads, colors.
pub mod core;
/// Crate-wide error taxonomy.
pub mod error;
/// Small numeric helpers for premultiplied pixels and interpolation.
pub mod math;
