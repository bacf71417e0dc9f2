use super::*;

fn blank_template(w: u32, h: u32) -> TemplateImage {
    TemplateImage::from_rgba8_premul(w, h, vec![255; (w * h * 4) as usize]).unwrap()
}

#[test]
fn native_target_matches_template() {
    let t = blank_template(80, 60);
    let target = RenderTarget::native(&t);
    assert_eq!(target.size, PixelSize::new(80, 60));
    assert_eq!(target.scale, 1.0);
}

#[test]
fn preview_never_upscales() {
    let t = blank_template(300, 200);
    let target = RenderTarget::preview(&t, 600);
    assert_eq!(target.size, PixelSize::new(300, 200));
    assert_eq!(target.scale, 1.0);
}

#[test]
fn preview_scales_both_axes_uniformly() {
    let t = blank_template(1200, 900);
    let target = RenderTarget::preview(&t, 600);
    assert_eq!(target.scale, 0.5);
    assert_eq!(target.size, PixelSize::new(600, 450));

    let t = blank_template(1000, 333);
    let target = RenderTarget::preview(&t, 600);
    assert_eq!(target.size, PixelSize::new(600, 199));
}

#[test]
fn raster_ref_copies_out() {
    let owned = RasterRGBA {
        width: 1,
        height: 1,
        data: vec![1, 2, 3, 4],
    };
    let view = owned.as_raster_ref();
    assert_eq!(view.size(), PixelSize::new(1, 1));
    assert_eq!(view.to_owned_raster(), owned);
}
