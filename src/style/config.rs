use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    assets::color::TextColor,
    foundation::core::{PixelSize, Point},
    foundation::error::{CertstampError, CertstampResult},
};

/// Overlay anchor as percentages of the target width/height.
///
/// Never cached in pixels: [`TextPosition::resolve`] maps it against whatever resolution is
/// being rendered (full size for export, scaled size for preview).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextPosition {
    /// Horizontal position in `[0, 100]`.
    pub x: f64,
    /// Vertical position in `[0, 100]`.
    pub y: f64,
}

impl Default for TextPosition {
    fn default() -> Self {
        Self { x: 50.0, y: 50.0 }
    }
}

impl TextPosition {
    /// Construct a position (unvalidated).
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Check both axes are finite and inside `[0, 100]`.
    pub fn validate(&self) -> CertstampResult<()> {
        for (axis, v) in [("x", self.x), ("y", self.y)] {
            if !v.is_finite() || !(0.0..=100.0).contains(&v) {
                return Err(CertstampError::validation(format!(
                    "text position {axis} must be within [0, 100], got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Pixel anchor for a target of `size`: `position * dimension / 100`.
    pub fn resolve(&self, size: PixelSize) -> Point {
        Point::new(
            self.x / 100.0 * f64::from(size.width),
            self.y / 100.0 * f64::from(size.height),
        )
    }
}

/// Recognized font weights (CSS keywords and the numeric 100..900 scale).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontWeight {
    /// 100
    Thin,
    /// 200
    ExtraLight,
    /// 300
    Light,
    /// 400, `normal`
    #[default]
    Normal,
    /// 500
    Medium,
    /// 600
    SemiBold,
    /// 700, `bold`
    Bold,
    /// 800
    ExtraBold,
    /// 900
    Black,
}

impl FontWeight {
    /// All recognized weights, lightest first.
    pub const ALL: [FontWeight; 9] = [
        Self::Thin,
        Self::ExtraLight,
        Self::Light,
        Self::Normal,
        Self::Medium,
        Self::SemiBold,
        Self::Bold,
        Self::ExtraBold,
        Self::Black,
    ];

    /// Numeric OpenType weight.
    pub fn value(self) -> u16 {
        match self {
            Self::Thin => 100,
            Self::ExtraLight => 200,
            Self::Light => 300,
            Self::Normal => 400,
            Self::Medium => 500,
            Self::SemiBold => 600,
            Self::Bold => 700,
            Self::ExtraBold => 800,
            Self::Black => 900,
        }
    }

    /// Weight for an exact numeric value on the 100-step scale.
    pub fn from_value(v: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.value() == v)
    }

    /// Token used in the composed font string (`normal`, `bold` or the number).
    pub fn css_token(self) -> &'static str {
        match self {
            Self::Thin => "100",
            Self::ExtraLight => "200",
            Self::Light => "300",
            Self::Normal => "normal",
            Self::Medium => "500",
            Self::SemiBold => "600",
            Self::Bold => "bold",
            Self::ExtraBold => "800",
            Self::Black => "900",
        }
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_token())
    }
}

impl FromStr for FontWeight {
    type Err = CertstampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        match t.to_ascii_lowercase().as_str() {
            "normal" | "regular" => return Ok(Self::Normal),
            "bold" => return Ok(Self::Bold),
            _ => {}
        }
        t.parse::<u16>()
            .ok()
            .and_then(Self::from_value)
            .ok_or_else(|| {
                CertstampError::validation(format!(
                    "unknown font weight \"{s}\" (expected normal, bold or 100..900)"
                ))
            })
    }
}

impl Serialize for FontWeight {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.css_token())
    }
}

impl<'de> Deserialize<'de> for FontWeight {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(u16),
            Str(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Num(v) => Self::from_value(v).ok_or_else(|| {
                serde::de::Error::custom(format!("unsupported font weight {v}"))
            }),
            Repr::Str(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

fn default_font_size() -> f32 {
    48.0
}

fn default_font_family() -> String {
    "Poppins".to_owned()
}

fn default_font_weight() -> FontWeight {
    FontWeight::Bold
}

/// Overlay parameters for the single text field drawn on every artifact.
///
/// `font_size` is expressed at full template resolution; scaled renders multiply it by their
/// scale factor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextStyleConfig {
    /// Anchor position in percent.
    #[serde(default)]
    pub position: TextPosition,
    /// Logical font size in pixels at full resolution.
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// Requested family name (resolved against the font catalog at render time).
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Requested weight.
    #[serde(default = "default_font_weight")]
    pub font_weight: FontWeight,
    /// Fill color.
    #[serde(default)]
    pub color: TextColor,
}

impl Default for TextStyleConfig {
    fn default() -> Self {
        Self {
            position: TextPosition::default(),
            font_size: default_font_size(),
            font_family: default_font_family(),
            font_weight: default_font_weight(),
            color: TextColor::BLACK,
        }
    }
}

impl TextStyleConfig {
    /// Validate every field.
    pub fn validate(&self) -> CertstampResult<()> {
        self.position.validate()?;
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(CertstampError::validation(format!(
                "font_size must be finite and > 0, got {}",
                self.font_size
            )));
        }
        let family = self.font_family.trim();
        if family.is_empty() {
            return Err(CertstampError::validation("font_family must be non-empty"));
        }
        if family.chars().any(char::is_control) {
            return Err(CertstampError::validation(
                "font_family must not contain control characters",
            ));
        }
        Ok(())
    }

    /// Font size after applying a render scale factor.
    pub fn scaled_font_size(&self, scale: f32) -> f32 {
        self.font_size * scale
    }

    /// Composed font string `"<weight> <size>px <family>"` at the given scale.
    pub fn font_string(&self, scale: f32) -> String {
        format!(
            "{} {}px {}",
            self.font_weight.css_token(),
            self.scaled_font_size(scale),
            self.font_family.trim()
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/config.rs"]
mod tests;
