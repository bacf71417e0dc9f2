use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn load_records_dimensions() {
    let mut store = TemplateStore::new();
    let t = store.load(&png_bytes(8, 5, [1, 2, 3, 255])).unwrap();
    assert_eq!((t.width(), t.height()), (8, 5));
    assert_eq!(t.pixels().len(), 8 * 5 * 4);
}

#[test]
fn failed_load_keeps_previous_template() {
    let mut store = TemplateStore::new();
    let first_id = store.load(&png_bytes(4, 4, [9, 9, 9, 255])).unwrap().id();

    let err = store.load(b"not an image").unwrap_err();
    assert!(matches!(err, CertstampError::Decode(_)));

    let current = store.current().unwrap();
    assert_eq!(current.id(), first_id);
    assert_eq!(current.width(), 4);
}

#[test]
fn reload_replaces_and_gets_new_identity() {
    let mut store = TemplateStore::new();
    let bytes = png_bytes(2, 2, [0, 0, 0, 255]);
    let a = store.load(&bytes).unwrap().id();
    let b = store.load(&bytes).unwrap().id();
    assert_ne!(a, b);
}

#[test]
fn require_without_template_is_precondition_error() {
    let store = TemplateStore::new();
    assert!(matches!(
        store.require().unwrap_err(),
        CertstampError::Precondition(_)
    ));
}

#[test]
fn zero_area_template_is_not_renderable() {
    let t = TemplateImage::from_rgba8_premul(0, 10, vec![]).unwrap();
    assert!(matches!(
        t.ensure_renderable().unwrap_err(),
        CertstampError::InvalidTemplate(_)
    ));
    assert!(TemplateImage::from_rgba8_premul(2, 2, vec![0; 3]).is_err());
}
