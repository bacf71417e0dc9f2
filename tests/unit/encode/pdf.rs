use super::*;
use crate::render::backend::RasterRGBA;

fn pdf_for(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let r = RasterRGBA {
        width: w,
        height: h,
        data: px.repeat((w * h) as usize),
    };
    encode_pdf(r.as_raster_ref()).unwrap()
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|w| w == needle.as_bytes())
}

fn media_box(pdf: &[u8]) -> (u32, u32) {
    let marker = b"/MediaBox [0 0 ";
    let start = pdf
        .windows(marker.len())
        .position(|w| w == marker)
        .unwrap()
        + marker.len();
    let end = start + pdf[start..].iter().position(|&b| b == b']').unwrap();
    let dims = std::str::from_utf8(&pdf[start..end]).unwrap();
    let mut it = dims.split_whitespace().map(|v| v.parse::<u32>().unwrap());
    (it.next().unwrap(), it.next().unwrap())
}

#[test]
fn orientation_follows_aspect() {
    assert_eq!(PageOrientation::for_size(800, 600), PageOrientation::Landscape);
    assert_eq!(PageOrientation::for_size(600, 800), PageOrientation::Portrait);
    assert_eq!(PageOrientation::for_size(500, 500), PageOrientation::Portrait);
}

#[test]
fn page_size_places_long_edge_by_orientation() {
    assert_eq!(PageOrientation::Landscape.page_size(60, 80), (80, 60));
    assert_eq!(PageOrientation::Portrait.page_size(80, 60), (60, 80));
    assert_eq!(PageOrientation::Portrait.page_size(5, 5), (5, 5));
}

#[test]
fn document_page_carries_the_orientation() {
    for (w, h) in [(80, 60), (60, 80), (50, 50)] {
        let (page_w, page_h) = media_box(&pdf_for(w, h, [255, 255, 255, 255]));
        assert_eq!((page_w, page_h), (w, h));
        assert_eq!(
            PageOrientation::for_size(page_w, page_h),
            PageOrientation::for_size(w, h)
        );
    }
}

#[test]
fn landscape_page_matches_image_size() {
    let pdf = pdf_for(80, 60, [255, 255, 255, 255]);
    assert!(contains(&pdf, "/MediaBox [0 0 80 60]"));
    assert!(contains(&pdf, "/Count 1"));
    assert!(contains(&pdf, "80 0 0 60 0 0 cm"));
}

#[test]
fn portrait_page_matches_image_size() {
    let pdf = pdf_for(60, 80, [0, 0, 0, 255]);
    assert!(contains(&pdf, "/MediaBox [0 0 60 80]"));
}

#[test]
fn opaque_image_has_no_soft_mask() {
    let pdf = pdf_for(4, 4, [10, 20, 30, 255]);
    assert!(!contains(&pdf, "/SMask"));
    assert!(contains(&pdf, "/Producer (certstamp)"));
}

#[test]
fn translucent_image_gets_soft_mask() {
    let pdf = pdf_for(4, 4, [0, 0, 0, 0]);
    assert!(contains(&pdf, "/SMask 6 0 R"));
    assert!(contains(&pdf, "/ColorSpace /DeviceGray"));
}

#[test]
fn xref_offsets_point_at_objects() {
    let pdf = pdf_for(3, 3, [1, 2, 3, 255]);
    let marker = b"startxref\n";
    let pos = pdf
        .windows(marker.len())
        .rposition(|w| w == marker)
        .unwrap();
    let tail = std::str::from_utf8(&pdf[pos + marker.len()..]).unwrap();
    let xref_at: usize = tail.lines().next().unwrap().parse().unwrap();
    assert!(pdf[xref_at..].starts_with(b"xref\n0 "));

    let table = std::str::from_utf8(&pdf[xref_at..]).unwrap();
    for (i, line) in table.lines().skip(3).take(3).enumerate() {
        let offset: usize = line[..10].parse().unwrap();
        let expected = format!("{} 0 obj", i + 1);
        assert!(pdf[offset..].starts_with(expected.as_bytes()), "object {}", i + 1);
    }
}

#[test]
fn image_stream_inflates_to_rgb() {
    use std::io::Read;

    let pixels = [7, 8, 9, 255].repeat(4);
    let image = pdf_image_from_png(
        &encode_png(
            RasterRGBA {
                width: 2,
                height: 2,
                data: pixels,
            }
            .as_raster_ref(),
        )
        .unwrap(),
    )
    .unwrap();
    assert!(image.alpha.is_none());

    let packed = flate_compress(&image.rgb).unwrap();
    let mut out = Vec::new();
    flate2::read::ZlibDecoder::new(packed.as_slice())
        .read_to_end(&mut out)
        .unwrap();
    assert_eq!(out, [7, 8, 9].repeat(4));
}
