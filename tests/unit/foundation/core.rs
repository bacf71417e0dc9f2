use super::*;

#[test]
fn premultiply_rounds_and_clears_transparent() {
    let mut px = [100u8, 50, 200, 128, 9, 9, 9, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(
        px,
        [
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128,
            0,
            0,
            0,
            0
        ]
    );
}

#[test]
fn pixel_size_reports_empty_axes() {
    assert!(PixelSize::new(0, 10).is_empty());
    assert!(PixelSize::new(10, 0).is_empty());
    assert!(!PixelSize::new(1, 1).is_empty());
    assert_eq!(PixelSize::new(3, 2).rgba8_len(), 24);
}

#[test]
fn unpremultiply_inverts_opaque_and_clears_transparent() {
    let premul = [10u8, 20, 30, 255, 5, 5, 5, 0];
    assert_eq!(unpremultiply_rgba8(&premul), vec![10, 20, 30, 255, 0, 0, 0, 0]);

    let mut px = [200u8, 100, 50, 128];
    premultiply_rgba8_in_place(&mut px);
    let back = unpremultiply_rgba8(&px);
    for (a, b) in back.iter().zip([200u8, 100, 50, 128]) {
        assert!((*a as i16 - b as i16).abs() <= 2, "{a} vs {b}");
    }
}

#[test]
fn over_composites_opaque_and_skips_transparent() {
    let mut dst = vec![10u8, 20, 30, 255, 10, 20, 30, 255];
    let src = vec![0u8, 0, 0, 0, 255, 0, 0, 255];
    premul_over_in_place(&mut dst, &src).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255, 255, 0, 0, 255]);
}

#[test]
fn over_blends_half_alpha() {
    let mut dst = vec![0u8, 0, 255, 255];
    let src = vec![128u8, 0, 0, 128];
    premul_over_in_place(&mut dst, &src).unwrap();
    assert_eq!(dst[0], 128);
    assert_eq!(dst[2], 127);
    assert_eq!(dst[3], 255);
}

#[test]
fn over_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(premul_over_in_place(&mut dst, &[0u8; 4]).is_err());
}
