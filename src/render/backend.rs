use crate::{
    assets::template::TemplateImage,
    foundation::core::PixelSize,
    foundation::error::CertstampResult,
    style::config::TextStyleConfig,
};

/// Output resolution of one render plus the factor applied to the style's font size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderTarget {
    /// Surface dimensions in pixels.
    pub size: PixelSize,
    /// Multiplier applied to `TextStyleConfig::font_size`.
    pub scale: f32,
}

impl RenderTarget {
    /// Explicit target.
    pub fn new(size: PixelSize, scale: f32) -> Self {
        Self { size, scale }
    }

    /// Full template resolution, font size unscaled. Used by the export path.
    pub fn native(template: &TemplateImage) -> Self {
        Self {
            size: template.size(),
            scale: 1.0,
        }
    }

    /// Uniformly scaled-down target no wider than `max_width`.
    ///
    /// `scale = min(1, max_width / width)` is applied to both axes, so the aspect ratio is kept
    /// up to pixel truncation.
    pub fn preview(template: &TemplateImage, max_width: u32) -> Self {
        let size = template.size();
        if size.is_empty() {
            return Self { size, scale: 1.0 };
        }
        let scale = (f64::from(max_width) / f64::from(size.width)).min(1.0);
        // The epsilon absorbs `w * (max / w)` landing a hair below an integer.
        let scaled = |v: u32| ((f64::from(v) * scale + 1e-9).floor() as u32).max(1);
        Self {
            size: PixelSize::new(scaled(size.width), scaled(size.height)),
            scale: scale as f32,
        }
    }
}

/// Borrowed view of a rendered surface (premultiplied RGBA8, row-major).
///
/// The view borrows the renderer's scratch surface: it must be consumed (encoded or copied)
/// before the renderer can be used again.
#[derive(Clone, Copy, Debug)]
pub struct RasterRef<'a> {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes, tightly packed.
    pub data: &'a [u8],
}

impl RasterRef<'_> {
    /// Surface dimensions.
    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }

    /// Copy the pixels out of the scratch surface.
    pub fn to_owned_raster(&self) -> RasterRGBA {
        RasterRGBA {
            width: self.width,
            height: self.height,
            data: self.data.to_vec(),
        }
    }
}

/// Owned rendered surface (premultiplied RGBA8, row-major).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes, tightly packed.
    pub data: Vec<u8>,
}

impl RasterRGBA {
    /// Borrow as a [`RasterRef`].
    pub fn as_raster_ref(&self) -> RasterRef<'_> {
        RasterRef {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

/// Composites one overlay string onto a fresh copy of a template.
///
/// Implementations own their drawing surfaces; one renderer serves one task at a time.
pub trait OverlayRenderer {
    /// Draw `template` scaled to `target.size`, then `text` centered at the style's position.
    ///
    /// Empty `text` draws nothing and is not an error. Zero-area templates or targets fail with
    /// `InvalidTemplate` before any drawing happens.
    fn render(
        &mut self,
        template: &TemplateImage,
        text: &str,
        style: &TextStyleConfig,
        target: RenderTarget,
    ) -> CertstampResult<RasterRef<'_>>;
}

impl<R: OverlayRenderer + ?Sized> OverlayRenderer for Box<R> {
    fn render(
        &mut self,
        template: &TemplateImage,
        text: &str,
        style: &TextStyleConfig,
        target: RenderTarget,
    ) -> CertstampResult<RasterRef<'_>> {
        (**self).render(template, text, style, target)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
