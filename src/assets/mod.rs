/// Raster decoding into premultiplied RGBA8.
pub mod decode;
/// Glyph outline dictionary.
pub mod dictionary;
/// Decoded images keyed by their URL.
pub mod store;
