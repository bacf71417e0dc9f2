use std::borrow::Cow;
use std::collections::HashMap;

use usvg::fontdb;

use crate::assets::fonts::FontFace;
use crate::foundation::core::{Point, Vec2};
use crate::foundation::error::{CertstampError, CertstampResult};

/// RGBA8 brush color used by Parley text layout (straight alpha).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    /// Red channel.
    pub(crate) r: u8,
    /// Green channel.
    pub(crate) g: u8,
    /// Blue channel.
    pub(crate) b: u8,
    /// Alpha channel.
    pub(crate) a: u8,
}

/// How a registered catalog face is selected from the layout collection.
///
/// Every face lives alone in a private family, so a query for `family` at `weight` can only
/// match the bytes the rasterizer draws with.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LayoutFace {
    pub(crate) family: String,
    pub(crate) weight: parley::style::FontWeight,
}

/// Parley contexts plus the faces already registered with them.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    registered: HashMap<fontdb::ID, LayoutFace>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        // Registered faces only: glyph ids must belong to the face the rasterizer draws with.
        let collection = parley::fontique::Collection::new(parley::fontique::CollectionOptions {
            shared: false,
            system_fonts: false,
        });
        Self {
            font_ctx: parley::FontContext {
                collection,
                source_cache: parley::fontique::SourceCache::default(),
            },
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
        }
    }

    /// Register `face` with the layout collection and return how to select it.
    ///
    /// Registering the same catalog face twice is a lookup.
    pub(crate) fn register_face(&mut self, face: &FontFace) -> CertstampResult<LayoutFace> {
        if let Some(found) = self.registered.get(&face.id) {
            return Ok(found.clone());
        }

        let alias = format!("certstamp-face-{}", self.registered.len());
        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(face.bytes.as_ref().clone()),
            Some(parley::fontique::FontInfoOverride {
                family_name: Some(alias.as_str()),
                ..Default::default()
            }),
        );
        let info = families
            .iter()
            .flat_map(|(_, fonts)| fonts.iter())
            .find(|info| info.index() == face.index)
            .ok_or_else(|| {
                CertstampError::render(format!(
                    "font '{}' (index {}) could not be registered for shaping",
                    face.family, face.index
                ))
            })?;

        let layout_face = LayoutFace {
            family: alias,
            weight: info.weight(),
        };
        tracing::debug!(
            family = %face.family,
            index = face.index,
            weight = face.weight,
            alias = %layout_face.family,
            "registered face for shaping"
        );
        self.registered.insert(face.id, layout_face.clone());
        Ok(layout_face)
    }

    /// Shape `text` as a single unbroken line in `face`.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        face: &LayoutFace,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> CertstampResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CertstampError::render(
                "font size must be finite and > 0 after scaling",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(face.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(face.weight));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// Translation that centers `layout` on `anchor`: horizontally on the advance width, vertically
/// on the first line's ascent/descent box.
pub(crate) fn centering_offset(layout: &parley::Layout<TextBrushRgba8>, anchor: Point) -> Vec2 {
    let width = f64::from(layout.width());
    let Some(line) = layout.lines().next() else {
        return Vec2::new(anchor.x - width / 2.0, anchor.y);
    };
    let m = line.metrics();
    let baseline = f64::from(m.baseline);
    let ascent = f64::from(m.ascent);
    let descent = f64::from(m.descent);
    // Glyph y coordinates are baselines; shift so the ascent/descent midpoint sits on the anchor.
    let mid_from_top = baseline - ascent + (ascent + descent) / 2.0;
    Vec2::new(anchor.x - width / 2.0, anchor.y - mid_from_top)
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
