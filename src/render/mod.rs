//! Overlay rendering.
//!
//! [`backend::OverlayRenderer`] is the seam; [`cpu::CpuRenderer`] is the shipped backend and
//! [`preview::PreviewSynchronizer`] drives any backend at reduced size.

/// Render targets, raster views and the renderer trait.
pub mod backend;
/// `vello_cpu` renderer.
pub mod cpu;
/// Scaled-down live preview.
pub mod preview;
pub(crate) mod scratch;
pub(crate) mod text;

pub use scratch::ScratchStats;
