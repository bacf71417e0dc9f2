//! certstamp personalizes a certificate template once per recipient.
//!
//! A run loads one raster template, draws each name from a list at a configured position and
//! style, encodes every result as PNG, JPEG or single-page PDF, and bundles the files into one
//! zip archive:
//!
//! - Load a template into a [`TemplateStore`]
//! - Freeze style, format and naming into a [`BatchJob`]
//! - Call [`run_batch`] with a [`CpuRenderer`] and a [`ZipArchive`]
//!
//! [`PreviewSynchronizer`] keeps a scaled-down render in step with edits to the same inputs.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Template, font and color inputs.
pub mod assets;
/// Batch orchestration.
pub mod batch;
/// JSON job configuration.
pub mod config;
/// Output encoders.
pub mod encode;
/// Shared types and errors.
pub mod foundation;
/// Overlay rendering and preview.
pub mod render;
/// Text style configuration.
pub mod style;

pub use crate::assets::color::TextColor;
pub use crate::assets::fonts::{FontCatalog, FontFace};
pub use crate::assets::template::{TemplateId, TemplateImage, TemplateStore};
pub use crate::batch::archive::{ArchiveSink, EntryWrite, InMemoryArchive, ZipArchive};
pub use crate::batch::names::{NameEntry, NameList};
pub use crate::batch::orchestrator::{
    ArchiveBlob, BatchJob, BatchReport, EntryOutcome, EntryStatus, NamingConfig, run_batch,
    sanitize_filename,
};
pub use crate::config::{FontSettings, JobConfig, PreviewSettings};
pub use crate::encode::{OutputFormat, PageOrientation, encode};
pub use crate::foundation::core::{PixelSize, Point};
pub use crate::foundation::error::{CertstampError, CertstampResult};
pub use crate::render::backend::{OverlayRenderer, RasterRGBA, RasterRef, RenderTarget};
pub use crate::render::cpu::CpuRenderer;
pub use crate::render::preview::{PreviewStatus, PreviewSynchronizer};
pub use crate::style::config::{FontWeight, TextPosition, TextStyleConfig};
