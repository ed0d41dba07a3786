//! Quadmorph is a container choreography and perspective-warp rendering engine.
//!
//! Content lives in user-authored quadrilateral containers grouped into bundles.
//! In animate mode each bundle's content elements morph between containers along
//! a ring, wrap through hidden staging slots, scroll a circular window over long
//! item lists and cascade open or closed from a button. Frames are rasterized on
//! the CPU with every glyph and image projectively warped into its quad.
//!
//! - Load and validate an [`EngineConfig`]
//! - Drive an [`Engine`] with input and [`Engine::tick`]
//! - Rasterize its [`FrameSnapshot`]s with a [`FrameRenderer`]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Animation primitives: easing, tweens and lanes.
pub mod animation;
/// Image decoding, the image store and the glyph dictionary.
pub mod assets;
/// Circular item window for scrolling lists.
pub mod buffer;
/// Import/export snapshot.
pub mod config;
/// The orchestrator and its operations.
pub mod engine;
/// Shared value types and errors.
pub mod foundation;
/// Perspective transforms.
pub mod geometry;
/// Bundles, containers and content elements.
pub mod graph;
/// CPU rasterization.
pub mod render;

pub use crate::assets::decode::decode_image;
pub use crate::assets::dictionary::GlyphDictionary;
pub use crate::assets::store::{ImageStore, PreparedImage};
pub use crate::buffer::circular::CircularBuffer;
pub use crate::config::snapshot::EngineConfig;
pub use crate::engine::authoring::Link;
pub use crate::engine::orchestrator::Engine;
pub use crate::engine::scroll::scroll_duration;
pub use crate::foundation::core::{BoxRegion, Point, Quad, Rect};
pub use crate::foundation::error::{QuadmorphError, QuadmorphResult};
pub use crate::geometry::perspective::PerspectiveTransform;
pub use crate::graph::model::{Direction, TeleportRole};
pub use crate::render::scene::{FrameRGBA, FrameRenderer, FrameSnapshot, RenderSettings};
