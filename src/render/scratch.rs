use crate::foundation::core::PixelSize;
use crate::foundation::error::{CertstampError, CertstampResult};

/// Allocation counters for a [`ScratchSurface`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScratchStats {
    /// Pixmaps allocated (first use or size change).
    pub alloc_surfaces: u64,
    /// Bytes allocated across all pixmap allocations.
    pub alloc_bytes: u64,
    /// Renders that reused an existing pixmap of the right size.
    pub reuses: u64,
}

/// Reusable drawing targets owned by one renderer.
///
/// `base` receives the template copy and ends up holding the final composite; `layer` is the
/// transparent target text is rasterized into before being composited over `base`. Both are
/// reallocated only when the requested size changes.
pub(crate) struct ScratchSurface {
    base: Option<vello_cpu::Pixmap>,
    layer: Option<vello_cpu::Pixmap>,
    stats: ScratchStats,
}

impl ScratchSurface {
    pub(crate) fn new() -> Self {
        Self {
            base: None,
            layer: None,
            stats: ScratchStats::default(),
        }
    }

    pub(crate) fn stats(&self) -> ScratchStats {
        self.stats
    }

    /// Borrow the base surface sized `size`, allocating only on first use or size change.
    pub(crate) fn base(&mut self, size: PixelSize) -> CertstampResult<&mut vello_cpu::Pixmap> {
        Self::ensure(&mut self.base, &mut self.stats, size)
    }

    /// Borrow base and text layer together, both sized `size`. The layer is cleared.
    pub(crate) fn base_and_layer(
        &mut self,
        size: PixelSize,
    ) -> CertstampResult<(&mut vello_cpu::Pixmap, &mut vello_cpu::Pixmap)> {
        Self::ensure(&mut self.base, &mut self.stats, size)?;
        let layer = Self::ensure(&mut self.layer, &mut self.stats, size)?;
        layer.data_as_u8_slice_mut().fill(0);
        let base = self
            .base
            .as_mut()
            .ok_or_else(|| CertstampError::render("scratch base surface missing"))?;
        Ok((base, layer))
    }

    /// Borrow the current base pixels, if a render has happened.
    pub(crate) fn base_bytes(&self) -> Option<&[u8]> {
        self.base.as_ref().map(|p| p.data_as_u8_slice())
    }

    fn ensure<'a>(
        slot: &'a mut Option<vello_cpu::Pixmap>,
        stats: &mut ScratchStats,
        size: PixelSize,
    ) -> CertstampResult<&'a mut vello_cpu::Pixmap> {
        let (w, h) = surface_dims(size)?;
        let fits = slot
            .as_ref()
            .is_some_and(|p| p.width() == w && p.height() == h);
        if fits {
            stats.reuses = stats.reuses.saturating_add(1);
        } else {
            stats.alloc_surfaces = stats.alloc_surfaces.saturating_add(1);
            stats.alloc_bytes = stats.alloc_bytes.saturating_add(size.rgba8_len() as u64);
            *slot = Some(vello_cpu::Pixmap::new(w, h));
        }
        slot.as_mut()
            .ok_or_else(|| CertstampError::render("scratch surface missing"))
    }
}

/// Convert a pixel size into rasterizer dimensions (`u16` per axis).
pub(crate) fn surface_dims(size: PixelSize) -> CertstampResult<(u16, u16)> {
    let w: u16 = size.width.try_into().map_err(|_| {
        CertstampError::render(format!("surface width exceeds u16: {}", size.width))
    })?;
    let h: u16 = size.height.try_into().map_err(|_| {
        CertstampError::render(format!("surface height exceeds u16: {}", size.height))
    })?;
    Ok((w, h))
}
