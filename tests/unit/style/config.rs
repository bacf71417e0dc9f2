use serde_json::json;

use super::*;

#[test]
fn defaults_match_documented_values() {
    let s = TextStyleConfig::default();
    assert_eq!(s.position, TextPosition::new(50.0, 50.0));
    assert_eq!(s.font_size, 48.0);
    assert_eq!(s.font_family, "Poppins");
    assert_eq!(s.font_weight, FontWeight::Bold);
    assert_eq!(s.color, TextColor::BLACK);
    s.validate().unwrap();
}

#[test]
fn font_string_composes_weight_size_family() {
    let s = TextStyleConfig::default();
    assert_eq!(s.font_string(1.0), "bold 48px Poppins");
    assert_eq!(s.font_string(0.5), "bold 24px Poppins");

    let s = TextStyleConfig {
        font_weight: FontWeight::SemiBold,
        font_family: "Times New Roman".to_owned(),
        font_size: 30.0,
        ..TextStyleConfig::default()
    };
    assert_eq!(s.font_string(1.0), "600 30px Times New Roman");
}

#[test]
fn position_resolves_against_target_dimensions() {
    let p = TextPosition::new(25.0, 75.0);
    let a = p.resolve(PixelSize::new(800, 600));
    assert_eq!((a.x, a.y), (200.0, 450.0));
}

#[test]
fn anchor_scales_linearly_with_target_width() {
    for &(x, y) in &[(0.0, 0.0), (33.3, 66.6), (50.0, 50.0), (99.9, 0.1), (100.0, 100.0)] {
        let p = TextPosition::new(x, y);
        for w in [1u32, 7, 333, 800, 1921] {
            let h = w / 2 + 1;
            let small = p.resolve(PixelSize::new(w, h));
            let big = p.resolve(PixelSize::new(2 * w, 2 * h));
            assert_eq!(big.x, 2.0 * small.x, "x={x} w={w}");
            assert_eq!(big.y, 2.0 * small.y, "y={y} h={h}");
        }
    }
}

#[test]
fn validation_rejects_out_of_range_values() {
    let bad_pos = TextStyleConfig {
        position: TextPosition::new(101.0, 0.0),
        ..TextStyleConfig::default()
    };
    assert!(bad_pos.validate().is_err());

    let nan_pos = TextStyleConfig {
        position: TextPosition::new(f64::NAN, 0.0),
        ..TextStyleConfig::default()
    };
    assert!(nan_pos.validate().is_err());

    let bad_size = TextStyleConfig {
        font_size: 0.0,
        ..TextStyleConfig::default()
    };
    assert!(bad_size.validate().is_err());

    let bad_family = TextStyleConfig {
        font_family: "   ".to_owned(),
        ..TextStyleConfig::default()
    };
    assert!(bad_family.validate().is_err());
}

#[test]
fn weight_parses_keywords_and_numbers() {
    assert_eq!("bold".parse::<FontWeight>().unwrap(), FontWeight::Bold);
    assert_eq!("Normal".parse::<FontWeight>().unwrap(), FontWeight::Normal);
    assert_eq!("300".parse::<FontWeight>().unwrap(), FontWeight::Light);
    assert_eq!("700".parse::<FontWeight>().unwrap(), FontWeight::Bold);
    assert!("750".parse::<FontWeight>().is_err());
    assert!("heavy".parse::<FontWeight>().is_err());

    let w: FontWeight = serde_json::from_value(json!(900)).unwrap();
    assert_eq!(w, FontWeight::Black);
    let w: FontWeight = serde_json::from_value(json!("100")).unwrap();
    assert_eq!(w, FontWeight::Thin);
    assert_eq!(serde_json::to_value(FontWeight::Bold).unwrap(), json!("bold"));
}

#[test]
fn style_deserializes_with_defaults_and_rejects_unknown_fields() {
    let s: TextStyleConfig = serde_json::from_value(json!({
        "position": {"x": 10.0, "y": 90.0},
        "color": "#ff0000"
    }))
    .unwrap();
    assert_eq!(s.position, TextPosition::new(10.0, 90.0));
    assert_eq!(s.font_size, 48.0);
    assert_eq!(s.color, TextColor::rgb(255, 0, 0));

    let err = serde_json::from_value::<TextStyleConfig>(json!({"fontSize": 12}));
    assert!(err.is_err());
}
