use crate::{
    assets::template::{TemplateId, TemplateImage},
    batch::names::NameList,
    render::backend::{OverlayRenderer, RasterRGBA, RenderTarget},
    style::config::TextStyleConfig,
};

/// Default preview width cap in pixels.
pub const DEFAULT_PREVIEW_MAX_WIDTH: u32 = 600;
/// Default sample text when the name list is empty.
pub const DEFAULT_PLACEHOLDER: &str = "Sample Name";

/// Result of one [`PreviewSynchronizer::refresh`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreviewStatus {
    /// A new preview was rendered.
    Rendered,
    /// Inputs match the last attempt; nothing was drawn.
    Unchanged,
    /// No template is loaded; any previous preview was dropped.
    NoTemplate,
    /// Rendering failed. The previous preview, if any, is kept.
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
struct PreviewKey {
    template: TemplateId,
    style: TextStyleConfig,
    sample: String,
}

/// Keeps a scaled-down preview in step with the current template, style and first name.
///
/// Owns its renderer, so preview drawing never shares a surface with batch export. Failures are
/// logged and reported through [`PreviewStatus`] only.
pub struct PreviewSynchronizer<R> {
    renderer: R,
    max_width: u32,
    placeholder: String,
    last: Option<PreviewKey>,
    preview: Option<RasterRGBA>,
    renders: u64,
}

impl<R: OverlayRenderer> PreviewSynchronizer<R> {
    /// Synchronizer with the default width cap and placeholder.
    pub fn new(renderer: R) -> Self {
        Self::with_settings(renderer, DEFAULT_PREVIEW_MAX_WIDTH, DEFAULT_PLACEHOLDER)
    }

    /// Synchronizer with explicit width cap and placeholder text.
    pub fn with_settings(renderer: R, max_width: u32, placeholder: impl Into<String>) -> Self {
        Self {
            renderer,
            max_width: max_width.max(1),
            placeholder: placeholder.into(),
            last: None,
            preview: None,
            renders: 0,
        }
    }

    /// Recompute the preview if any input changed since the last attempt.
    pub fn refresh(
        &mut self,
        template: Option<&TemplateImage>,
        style: &TextStyleConfig,
        names: &NameList,
    ) -> PreviewStatus {
        let Some(template) = template else {
            self.last = None;
            self.preview = None;
            return PreviewStatus::NoTemplate;
        };

        let key = PreviewKey {
            template: template.id(),
            style: style.clone(),
            sample: self.sample_text(names).to_owned(),
        };
        if self.last.as_ref() == Some(&key) {
            return PreviewStatus::Unchanged;
        }

        let target = RenderTarget::preview(template, self.max_width);
        let status = match self.renderer.render(template, &key.sample, style, target) {
            Ok(raster) => {
                self.preview = Some(raster.to_owned_raster());
                self.renders += 1;
                tracing::debug!(
                    width = target.size.width,
                    height = target.size.height,
                    scale = target.scale,
                    "preview rendered"
                );
                PreviewStatus::Rendered
            }
            Err(e) => {
                tracing::warn!(error = %e, "preview render failed");
                PreviewStatus::Failed(e.to_string())
            }
        };
        self.last = Some(key);
        status
    }

    /// Text the next refresh would draw.
    pub fn sample_text<'a>(&'a self, names: &'a NameList) -> &'a str {
        names.first_name().unwrap_or(&self.placeholder)
    }

    /// Latest successful preview.
    pub fn preview(&self) -> Option<&RasterRGBA> {
        self.preview.as_ref()
    }

    /// Completed preview renders so far.
    pub fn renders(&self) -> u64 {
        self.renders
    }

    /// Borrow the owned renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/preview.rs"]
mod tests;
