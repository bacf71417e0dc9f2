use std::io::Cursor;

use crate::{
    foundation::core::unpremultiply_rgba8,
    foundation::error::{CertstampError, CertstampResult},
    render::backend::RasterRef,
};

/// JPEG quality used for every JPEG export.
pub const JPEG_QUALITY: u8 = 95;

/// Encode premultiplied pixels as an RGBA PNG.
pub(crate) fn encode_png(raster: RasterRef<'_>) -> CertstampResult<Vec<u8>> {
    let straight = unpremultiply_rgba8(raster.data);
    let img = image::RgbaImage::from_raw(raster.width, raster.height, straight)
        .ok_or_else(|| CertstampError::encode("png: pixel buffer size mismatch"))?;
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| CertstampError::encode(format!("png: {e}")))?;
    Ok(buf)
}

/// Encode premultiplied pixels as an RGB JPEG.
///
/// Premultiplied color channels equal the pixel composited over black, so alpha is dropped
/// without a separate flatten pass.
pub(crate) fn encode_jpeg(raster: RasterRef<'_>) -> CertstampResult<Vec<u8>> {
    let rgb: Vec<u8> = raster
        .data
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    let img = image::RgbImage::from_raw(raster.width, raster.height, rgb)
        .ok_or_else(|| CertstampError::encode("jpeg: pixel buffer size mismatch"))?;
    let mut buf = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    img.write_with_encoder(encoder)
        .map_err(|e| CertstampError::encode(format!("jpeg: {e}")))?;
    Ok(buf)
}
