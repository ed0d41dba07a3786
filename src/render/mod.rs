//! Rasterization: SVG path parsing and warping, inverse-mapped image warping,
//! text layout and the frame renderer built on `vello_cpu`.

/// SVG path-data parsing, arc flattening and projective path mapping.
pub mod path;
/// Frame snapshot rendering.
pub mod scene;
/// Column layout of display strings.
pub mod text;
/// Inverse-mapped bilinear image warping.
pub mod warp;
