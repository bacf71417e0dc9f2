use std::io::Write;

use crate::{
    encode::raster::encode_png,
    foundation::error::{CertstampError, CertstampResult},
    render::backend::RasterRef,
};

const PRODUCER: &str = "certstamp";

/// Page orientation chosen from the image aspect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageOrientation {
    /// Wider than tall.
    Landscape,
    /// Taller than wide, or square.
    Portrait,
}

impl PageOrientation {
    /// `Landscape` iff `width > height`.
    pub fn for_size(width: u32, height: u32) -> Self {
        if width > height {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }

    /// Page width and height for an image of `width` x `height` pixels: the long edge runs
    /// horizontally for `Landscape` and vertically for `Portrait`.
    pub fn page_size(self, width: u32, height: u32) -> (u32, u32) {
        let (long, short) = (width.max(height), width.min(height));
        match self {
            Self::Landscape => (long, short),
            Self::Portrait => (short, long),
        }
    }
}

struct PdfImage {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

/// Single-page PDF whose page is exactly the image size (one user unit per pixel).
pub(crate) fn encode_pdf(raster: RasterRef<'_>) -> CertstampResult<Vec<u8>> {
    // Lossless intermediate; the page embeds exactly what the PNG export would hold.
    let png = encode_png(raster)?;
    let image = pdf_image_from_png(&png)?;
    let orientation = PageOrientation::for_size(image.width, image.height);
    tracing::debug!(
        width = image.width,
        height = image.height,
        ?orientation,
        has_alpha = image.alpha.is_some(),
        "building pdf page"
    );
    build_single_image_pdf(&image, orientation)
}

fn pdf_image_from_png(png: &[u8]) -> CertstampResult<PdfImage> {
    let decoded = image::load_from_memory(png)
        .map_err(|e| CertstampError::encode(format!("pdf: png intermediate: {e}")))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgb = Vec::with_capacity((width as usize) * (height as usize) * 3);
    let mut alpha = Vec::with_capacity((width as usize) * (height as usize));
    let mut has_alpha = false;
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        has_alpha |= a != 255;
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }

    Ok(PdfImage {
        width,
        height,
        rgb,
        alpha: has_alpha.then_some(alpha),
    })
}

fn build_single_image_pdf(
    image: &PdfImage,
    orientation: PageOrientation,
) -> CertstampResult<Vec<u8>> {
    const CATALOG_ID: usize = 1;
    const PAGES_ID: usize = 2;
    const PAGE_ID: usize = 3;
    const CONTENT_ID: usize = 4;
    const IMAGE_ID: usize = 5;

    let (w, h) = (image.width, image.height);
    let (page_w, page_h) = orientation.page_size(w, h);
    let mut objects: Vec<Vec<u8>> = Vec::with_capacity(7);

    objects.push(format!("<< /Type /Catalog /Pages {PAGES_ID} 0 R >>").into_bytes());
    objects.push(format!("<< /Type /Pages /Kids [{PAGE_ID} 0 R] /Count 1 >>").into_bytes());
    objects.push(
        format!(
            "<< /Type /Page /Parent {PAGES_ID} 0 R /MediaBox [0 0 {page_w} {page_h}] \
             /Resources << /XObject << /Im0 {IMAGE_ID} 0 R >> >> /Contents {CONTENT_ID} 0 R >>"
        )
        .into_bytes(),
    );

    let content = format!("q\n{page_w} 0 0 {page_h} 0 0 cm\n/Im0 Do\nQ\n");
    objects.push(stream_object(
        &format!("<< /Length {} >>", content.len()),
        content.as_bytes(),
    ));

    let smask_id = image.alpha.as_ref().map(|_| IMAGE_ID + 1);
    let rgb = flate_compress(&image.rgb)?;
    let smask = smask_id
        .map(|id| format!(" /SMask {id} 0 R"))
        .unwrap_or_default();
    objects.push(stream_object(
        &format!(
            "<< /Type /XObject /Subtype /Image /Width {w} /Height {h} /ColorSpace /DeviceRGB \
             /BitsPerComponent 8 /Length {} /Filter /FlateDecode{smask} >>",
            rgb.len()
        ),
        &rgb,
    ));

    if let Some(alpha) = &image.alpha {
        let alpha = flate_compress(alpha)?;
        objects.push(stream_object(
            &format!(
                "<< /Type /XObject /Subtype /Image /Width {w} /Height {h} /ColorSpace /DeviceGray \
                 /BitsPerComponent 8 /Length {} /Filter /FlateDecode >>",
                alpha.len()
            ),
            &alpha,
        ));
    }

    objects.push(format!("<< /Producer ({PRODUCER}) >>").into_bytes());
    let info_id = objects.len();

    Ok(build_pdf(&objects, CATALOG_ID, info_id))
}

fn stream_object(dict: &str, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(dict.len() + data.len() + 20);
    out.extend_from_slice(dict.as_bytes());
    out.extend_from_slice(b"\nstream\n");
    out.extend_from_slice(data);
    out.extend_from_slice(b"\nendstream");
    out
}

/// Serialize numbered objects (ids are 1-based positions) with an xref table and trailer.
fn build_pdf(objects: &[Vec<u8>], catalog_id: usize, info_id: usize) -> Vec<u8> {
    let body_len: usize = objects.iter().map(Vec::len).sum();
    let mut out: Vec<u8> = Vec::with_capacity(body_len + 64 * objects.len() + 256);
    out.extend_from_slice(b"%PDF-1.7\n");
    out.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (index, obj) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", index + 1).as_bytes());
        out.extend_from_slice(obj);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_start = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root {catalog_id} 0 R /Info {info_id} 0 R >>\nstartxref\n{xref_start}\n%%EOF",
            objects.len() + 1
        )
        .as_bytes(),
    );
    out
}

fn flate_compress(data: &[u8]) -> CertstampResult<Vec<u8>> {
    use flate2::Compression;
    use flate2::write::ZlibEncoder;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .and_then(|()| encoder.finish())
        .map_err(|e| CertstampError::encode(format!("pdf: deflate: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/pdf.rs"]
mod tests;
