use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use anyhow::Context;

use crate::{
    assets::decode::{DecodedImage, decode_image},
    foundation::core::PixelSize,
    foundation::error::{CertstampError, CertstampResult},
};

static NEXT_TEMPLATE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one loaded template.
///
/// Renderers key their resampling caches on this, so two loads of the same bytes still get
/// distinct ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TemplateId(u64);

impl TemplateId {
    fn next() -> Self {
        Self(NEXT_TEMPLATE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Access raw 64-bit identifier.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Decoded template image. Immutable once built; replaced wholesale on re-upload.
#[derive(Clone, Debug)]
pub struct TemplateImage {
    id: TemplateId,
    size: PixelSize,
    rgba8_premul: Arc<Vec<u8>>,
}

impl TemplateImage {
    /// Wrap a decoded image under a fresh [`TemplateId`].
    pub fn from_decoded(decoded: DecodedImage) -> Self {
        Self {
            id: TemplateId::next(),
            size: PixelSize::new(decoded.width, decoded.height),
            rgba8_premul: decoded.rgba8_premul,
        }
    }

    /// Build a template directly from premultiplied RGBA8 pixels.
    ///
    /// Zero-sized templates are accepted here and rejected at render time.
    pub fn from_rgba8_premul(width: u32, height: u32, pixels: Vec<u8>) -> CertstampResult<Self> {
        let size = PixelSize::new(width, height);
        if pixels.len() != size.rgba8_len() {
            return Err(CertstampError::validation(format!(
                "template pixel buffer is {} bytes, expected {} for {width}x{height}",
                pixels.len(),
                size.rgba8_len()
            )));
        }
        Ok(Self {
            id: TemplateId::next(),
            size,
            rgba8_premul: Arc::new(pixels),
        })
    }

    /// Identity of this load.
    pub fn id(&self) -> TemplateId {
        self.id
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Native pixel dimensions.
    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Row-major premultiplied RGBA8 pixels.
    pub fn pixels(&self) -> &[u8] {
        &self.rgba8_premul
    }

    /// Fail with [`CertstampError::InvalidTemplate`] when the template has no area.
    pub fn ensure_renderable(&self) -> CertstampResult<()> {
        if self.size.is_empty() {
            return Err(CertstampError::invalid_template(format!(
                "template has zero area ({}x{})",
                self.size.width, self.size.height
            )));
        }
        Ok(())
    }
}

/// Holder of the current template.
///
/// Loading needs `&mut self`, while batch runs and previews borrow the template immutably, so a
/// replacement can never land in the middle of a run.
#[derive(Debug, Default)]
pub struct TemplateStore {
    current: Option<TemplateImage>,
}

impl TemplateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `bytes` and replace the current template.
    ///
    /// On failure the previous template (if any) is kept untouched.
    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn load(&mut self, bytes: &[u8]) -> CertstampResult<&TemplateImage> {
        let decoded = decode_image(bytes).inspect_err(|e| {
            tracing::warn!(error = %e, "template decode failed; keeping previous template");
        })?;
        let template = TemplateImage::from_decoded(decoded);
        tracing::debug!(
            id = template.id().as_u64(),
            width = template.width(),
            height = template.height(),
            "template loaded"
        );
        Ok(&*self.current.insert(template))
    }

    /// Read a template file from disk and load it.
    pub fn load_path(&mut self, path: &Path) -> CertstampResult<&TemplateImage> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read template '{}'", path.display()))?;
        self.load(&bytes)
    }

    /// Replace the current template with an already-built image.
    pub fn replace(&mut self, template: TemplateImage) -> &TemplateImage {
        self.current.insert(template)
    }

    /// Borrow the current template, if one is loaded.
    pub fn current(&self) -> Option<&TemplateImage> {
        self.current.as_ref()
    }

    /// Borrow the current template or fail with [`CertstampError::Precondition`].
    pub fn require(&self) -> CertstampResult<&TemplateImage> {
        self.current
            .as_ref()
            .ok_or_else(|| CertstampError::precondition("no template loaded"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/template.rs"]
mod tests;
