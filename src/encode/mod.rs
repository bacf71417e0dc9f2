//! Per-entry output encoders.
//!
//! Every encoder consumes a [`RasterRef`] (premultiplied RGBA8) and returns the complete file
//! bytes, so the borrowed surface is free again as soon as [`encode`] returns.

/// Output format selection.
pub mod format;
/// Single-page PDF writer.
pub mod pdf;
/// PNG and JPEG encoders.
pub mod raster;

use crate::foundation::error::{CertstampError, CertstampResult};
use crate::render::backend::RasterRef;

pub use format::OutputFormat;
pub use pdf::PageOrientation;

/// Serialize a rendered surface as `format`.
#[tracing::instrument(level = "debug", skip(raster), fields(width = raster.width, height = raster.height))]
pub fn encode(raster: RasterRef<'_>, format: OutputFormat) -> CertstampResult<Vec<u8>> {
    if raster.size().is_empty() {
        return Err(CertstampError::encode(format!(
            "cannot encode a zero-area surface ({}x{})",
            raster.width, raster.height
        )));
    }
    if raster.data.len() != raster.size().rgba8_len() {
        return Err(CertstampError::encode(format!(
            "surface buffer is {} bytes, expected {}",
            raster.data.len(),
            raster.size().rgba8_len()
        )));
    }

    let bytes = match format {
        OutputFormat::Png => raster::encode_png(raster)?,
        OutputFormat::Jpeg => raster::encode_jpeg(raster)?,
        OutputFormat::Pdf => pdf::encode_pdf(raster)?,
    };
    tracing::debug!(bytes = bytes.len(), "encoded");
    Ok(bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/encode.rs"]
mod tests;
