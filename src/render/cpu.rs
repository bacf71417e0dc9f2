use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    assets::fonts::FontCatalog,
    assets::template::{TemplateId, TemplateImage},
    foundation::core::{PixelSize, Vec2, premul_over_in_place},
    foundation::error::{CertstampError, CertstampResult},
    render::backend::{OverlayRenderer, RasterRef, RenderTarget},
    render::scratch::{ScratchStats, ScratchSurface, surface_dims},
    render::text::{LayoutFace, TextBrushRgba8, TextLayoutEngine, centering_offset},
    style::config::{FontWeight, TextStyleConfig},
};

/// Template resampled to a non-native target size.
struct ScaledTemplate {
    id: TemplateId,
    size: PixelSize,
    rgba8_premul: Vec<u8>,
}

/// CPU overlay renderer built on `vello_cpu` with Parley text shaping.
///
/// Holds one scratch surface pair and one rasterizer context, reused across renders of the same
/// size. Font lookups and the most recent resampled template are cached.
pub struct CpuRenderer {
    fonts: Arc<FontCatalog>,
    scratch: ScratchSurface,
    ctx: Option<vello_cpu::RenderContext>,
    text: TextLayoutEngine,
    faces: HashMap<(String, FontWeight), LayoutFace>,
    scaled: Option<ScaledTemplate>,
}

impl CpuRenderer {
    /// Create a renderer drawing text from `fonts`.
    pub fn new(fonts: Arc<FontCatalog>) -> Self {
        Self {
            fonts,
            scratch: ScratchSurface::new(),
            ctx: None,
            text: TextLayoutEngine::new(),
            faces: HashMap::new(),
            scaled: None,
        }
    }

    /// Font catalog used for family resolution.
    pub fn fonts(&self) -> &FontCatalog {
        &self.fonts
    }

    /// Scratch surface allocation counters.
    pub fn scratch_stats(&self) -> ScratchStats {
        self.scratch.stats()
    }

    fn font_for(&mut self, family: &str, weight: FontWeight) -> CertstampResult<LayoutFace> {
        let key = (family.to_owned(), weight);
        if let Some(f) = self.faces.get(&key) {
            return Ok(f.clone());
        }

        let face = self.fonts.resolve(family, weight)?;
        let layout = self.text.register_face(&face)?;
        self.faces.insert(key, layout.clone());
        Ok(layout)
    }

    /// Make sure `self.scaled` holds `template` at `size`. Native size never touches the cache.
    fn ensure_scaled(&mut self, template: &TemplateImage, size: PixelSize) -> CertstampResult<()> {
        if size == template.size() {
            return Ok(());
        }
        if self
            .scaled
            .as_ref()
            .is_some_and(|s| s.id == template.id() && s.size == size)
        {
            return Ok(());
        }

        let src = image::RgbaImage::from_raw(
            template.width(),
            template.height(),
            template.pixels().to_vec(),
        )
        .ok_or_else(|| CertstampError::invalid_template("template pixel buffer size mismatch"))?;
        // Input is premultiplied.
        let resized = image::imageops::resize(
            &src,
            size.width,
            size.height,
            image::imageops::FilterType::Triangle,
        );
        tracing::debug!(
            template = template.id().as_u64(),
            from_w = template.width(),
            from_h = template.height(),
            to_w = size.width,
            to_h = size.height,
            "resampled template"
        );
        self.scaled = Some(ScaledTemplate {
            id: template.id(),
            size,
            rgba8_premul: resized.into_raw(),
        });
        Ok(())
    }
}

fn with_ctx_mut<R>(
    slot: &mut Option<vello_cpu::RenderContext>,
    width: u16,
    height: u16,
    f: impl FnOnce(&mut vello_cpu::RenderContext) -> CertstampResult<R>,
) -> CertstampResult<R> {
    let mut ctx = match slot.take() {
        None => vello_cpu::RenderContext::new(width, height),
        Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
        Some(_) => vello_cpu::RenderContext::new(width, height),
    };
    ctx.reset();
    let out = f(&mut ctx)?;
    *slot = Some(ctx);
    Ok(out)
}

/// Draw every glyph run with the font Parley shaped it with.
fn draw_layout(
    ctx: &mut vello_cpu::RenderContext,
    layout: &parley::Layout<TextBrushRgba8>,
    offset: Vec2,
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((offset.x, offset.y)));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            let shaped = run.run();
            ctx.glyph_run(shaped.font())
                .font_size(shaped.font_size())
                .fill_glyphs(glyphs);
        }
    }
}

impl OverlayRenderer for CpuRenderer {
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(
            template = template.id().as_u64(),
            width = target.size.width,
            height = target.size.height,
            font = %style.font_string(target.scale),
        )
    )]
    fn render(
        &mut self,
        template: &TemplateImage,
        text: &str,
        style: &TextStyleConfig,
        target: RenderTarget,
    ) -> CertstampResult<RasterRef<'_>> {
        template.ensure_renderable()?;
        if target.size.is_empty() {
            return Err(CertstampError::invalid_template(format!(
                "render target has zero area ({}x{})",
                target.size.width, target.size.height
            )));
        }
        let (w, h) = surface_dims(target.size)?;

        self.ensure_scaled(template, target.size)?;

        // Shape before borrowing the scratch surfaces so font errors leave them untouched.
        let shaped = if text.is_empty() {
            None
        } else {
            let face = self.font_for(&style.font_family, style.font_weight)?;
            let brush = {
                let c = style.color;
                TextBrushRgba8 {
                    r: c.r,
                    g: c.g,
                    b: c.b,
                    a: c.a,
                }
            };
            let layout = self.text.layout_line(
                text,
                &face,
                style.scaled_font_size(target.scale),
                brush,
            )?;
            let offset = centering_offset(&layout, style.position.resolve(target.size));
            Some((layout, offset))
        };

        let background: &[u8] = match &self.scaled {
            Some(s) if target.size != template.size() => &s.rgba8_premul,
            _ => template.pixels(),
        };

        match shaped {
            None => {
                let base = self.scratch.base(target.size)?;
                base.data_as_u8_slice_mut().copy_from_slice(background);
            }
            Some((layout, offset)) => {
                let (base, layer) = self.scratch.base_and_layer(target.size)?;
                base.data_as_u8_slice_mut().copy_from_slice(background);
                // `vello_cpu` renders into a fresh buffer, so text goes to the cleared layer and
                // is then composited over the template copy.
                with_ctx_mut(&mut self.ctx, w, h, |ctx| {
                    draw_layout(ctx, &layout, offset);
                    ctx.flush();
                    ctx.render_to_pixmap(layer);
                    Ok(())
                })?;
                premul_over_in_place(base.data_as_u8_slice_mut(), layer.data_as_u8_slice())?;
            }
        }

        let data = self
            .scratch
            .base_bytes()
            .ok_or_else(|| CertstampError::render("scratch surface missing after render"))?;
        Ok(RasterRef {
            width: target.size.width,
            height: target.size.height,
            data,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
