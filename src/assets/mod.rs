/// Text color values.
pub mod color;
/// Raster image decoding.
pub mod decode;
/// Font discovery and family resolution.
pub mod fonts;
/// Template image and its store.
pub mod template;
