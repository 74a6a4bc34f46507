use std::fmt;
use std::str::FromStr;

use image::Rgba;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::error::ConsoleError;

/// Upper bound for every numeric style input.
pub const MAX_STYLE_VALUE: u32 = 999;
/// Padding forced on when a border is switched on over an unpadded code.
pub const SAFE_PADDING_PX: u32 = 15;

pub const DEFAULT_CODE_SIZE: u32 = 600;
pub const DEFAULT_BORDER_WIDTH: u32 = 4;
pub const DEFAULT_CORNER_RADIUS: u32 = 20;

/// An opaque RGB color written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor([u8; 3]);

impl HexColor {
    pub const BLACK: HexColor = HexColor([0x00, 0x00, 0x00]);
    pub const WHITE: HexColor = HexColor([0xff, 0xff, 0xff]);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        HexColor([r, g, b])
    }

    pub fn rgb(self) -> [u8; 3] {
        self.0
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        let [r, g, b] = self.0;
        Rgba([r, g, b, 0xff])
    }
}

impl FromStr for HexColor {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConsoleError::InvalidColor(s.to_string());
        let digits = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(HexColor([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Download resolution presets offered by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportQuality {
    Web,
    #[default]
    Standard,
    Print,
    Highres,
}

impl ExportQuality {
    pub fn all() -> [ExportQuality; 4] {
        [
            ExportQuality::Web,
            ExportQuality::Standard,
            ExportQuality::Print,
            ExportQuality::Highres,
        ]
    }

    pub fn scale_factor(self) -> f32 {
        match self {
            ExportQuality::Web => 0.5,
            ExportQuality::Standard => 1.0,
            ExportQuality::Print => 2.0,
            ExportQuality::Highres => 4.0,
        }
    }

    pub fn nominal_size(self) -> u32 {
        match self {
            ExportQuality::Web => 300,
            ExportQuality::Standard => 600,
            ExportQuality::Print => 1200,
            ExportQuality::Highres => 2400,
        }
    }

    /// Scale factor multiplied by the 2x supersampling factor. Always a whole number.
    pub fn supersampled_scale(self) -> u32 {
        match self {
            ExportQuality::Web => 1,
            ExportQuality::Standard => 2,
            ExportQuality::Print => 4,
            ExportQuality::Highres => 8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExportQuality::Web => "web",
            ExportQuality::Standard => "standard",
            ExportQuality::Print => "print",
            ExportQuality::Highres => "highres",
        }
    }
}

impl FromStr for ExportQuality {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportQuality::all()
            .into_iter()
            .find(|q| q.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConsoleError::InvalidValue {
                path: "exportQuality".to_string(),
                reason: format!("unknown quality `{}`", s),
            })
    }
}

impl fmt::Display for ExportQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BorderStyle {
    pub enabled: bool,
    pub width_px: u32,
    pub color: HexColor,
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self {
            enabled: false,
            width_px: DEFAULT_BORDER_WIDTH,
            color: HexColor::BLACK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaddingStyle {
    pub enabled: bool,
    pub amount_px: u32,
    pub color: HexColor,
}

impl Default for PaddingStyle {
    fn default() -> Self {
        Self {
            enabled: false,
            amount_px: SAFE_PADDING_PX,
            color: HexColor::WHITE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CornerStyle {
    pub enabled: bool,
    pub radius_px: u32,
}

impl Default for CornerStyle {
    fn default() -> Self {
        Self {
            enabled: false,
            radius_px: DEFAULT_CORNER_RADIUS,
        }
    }
}

/// One visual rendering of a QR code.
///
/// Disabled sections keep their values so that switching them back on
/// restores what the user had before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleConfig {
    pub code_size: u32,
    pub foreground_color: HexColor,
    pub border: BorderStyle,
    pub padding: PaddingStyle,
    pub corners: CornerStyle,
    pub export_quality: ExportQuality,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            code_size: DEFAULT_CODE_SIZE,
            foreground_color: HexColor::BLACK,
            border: BorderStyle::default(),
            padding: PaddingStyle::default(),
            corners: CornerStyle::default(),
            export_quality: ExportQuality::default(),
        }
    }
}

impl StyleConfig {
    pub fn effective_padding(&self) -> u32 {
        if self.padding.enabled {
            self.padding.amount_px
        } else {
            0
        }
    }

    pub fn effective_border(&self) -> u32 {
        if self.border.enabled {
            self.border.width_px
        } else {
            0
        }
    }

    /// Corners are only rounded on bordered codes.
    pub fn effective_radius(&self) -> u32 {
        if self.border.enabled && self.corners.enabled {
            self.corners.radius_px
        } else {
            0
        }
    }

    pub fn background(&self) -> HexColor {
        if self.padding.enabled {
            self.padding.color
        } else {
            HexColor::WHITE
        }
    }

    /// Clamp every numeric field into the accepted input range.
    pub fn clamped(mut self) -> Self {
        self.code_size = self.code_size.clamp(1, MAX_STYLE_VALUE);
        self.border.width_px = self.border.width_px.min(MAX_STYLE_VALUE);
        self.padding.amount_px = self.padding.amount_px.min(MAX_STYLE_VALUE);
        self.corners.radius_px = self.corners.radius_px.min(MAX_STYLE_VALUE);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn defaults_match_console_defaults() {
        let style = StyleConfig::default();
        assert_eq!(style.code_size, 600);
        assert_eq!(style.foreground_color, HexColor::BLACK);
        assert!(!style.border.enabled);
        assert_eq!(style.border.width_px, 4);
        assert_eq!(style.border.color, HexColor::BLACK);
        assert!(!style.padding.enabled);
        assert_eq!(style.padding.amount_px, 15);
        assert_eq!(style.padding.color, HexColor::WHITE);
        assert!(!style.corners.enabled);
        assert_eq!(style.corners.radius_px, 20);
        assert_eq!(style.export_quality, ExportQuality::Standard);
    }

    #[test_case("#000000", [0, 0, 0] ; "black")]
    #[test_case("#FFFFFF", [255, 255, 255] ; "uppercase white")]
    #[test_case("#3e53f6", [0x3e, 0x53, 0xf6] ; "brand blue")]
    #[test_case(" #ff0000 ", [255, 0, 0] ; "surrounding whitespace")]
    fn parses_hex_colors(input: &str, rgb: [u8; 3]) {
        let color: HexColor = input.parse().unwrap();
        assert_eq!(color.rgb(), rgb);
    }

    #[test_case("000000" ; "missing hash")]
    #[test_case("#fff" ; "short form")]
    #[test_case("#gggggg" ; "not hex")]
    #[test_case("#1234567" ; "too long")]
    #[test_case("" ; "empty")]
    fn rejects_malformed_colors(input: &str) {
        assert!(input.parse::<HexColor>().is_err());
    }

    #[test]
    fn colors_serialize_lowercase() {
        let color: HexColor = "#AABBCC".parse().unwrap();
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"#aabbcc\"");
    }

    #[test_case(ExportQuality::Web, 0.5, 300, 1)]
    #[test_case(ExportQuality::Standard, 1.0, 600, 2)]
    #[test_case(ExportQuality::Print, 2.0, 1200, 4)]
    #[test_case(ExportQuality::Highres, 4.0, 2400, 8)]
    fn quality_presets(quality: ExportQuality, scale: f32, nominal: u32, supersampled: u32) {
        assert_eq!(quality.scale_factor(), scale);
        assert_eq!(quality.nominal_size(), nominal);
        assert_eq!(quality.supersampled_scale(), supersampled);
        assert_eq!(quality.as_str().parse::<ExportQuality>().unwrap(), quality);
    }

    #[test]
    fn radius_needs_border() {
        let mut style = StyleConfig::default();
        style.corners.enabled = true;
        assert_eq!(style.effective_radius(), 0);
        style.border.enabled = true;
        assert_eq!(style.effective_radius(), 20);
    }

    #[test]
    fn background_follows_padding() {
        let mut style = StyleConfig::default();
        style.padding.color = "#ffd700".parse().unwrap();
        assert_eq!(style.background(), HexColor::WHITE);
        style.padding.enabled = true;
        assert_eq!(style.background(), HexColor::new(0xff, 0xd7, 0x00));
    }

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let style: StyleConfig = serde_json::from_str(
            r##"{"codeSize": 300, "border": {"enabled": true, "widthPx": 8}}"##,
        )
        .unwrap();
        assert_eq!(style.code_size, 300);
        assert!(style.border.enabled);
        assert_eq!(style.border.width_px, 8);
        assert_eq!(style.border.color, HexColor::BLACK);
        assert_eq!(style.padding, PaddingStyle::default());
    }

    #[test]
    fn clamped_limits_numbers() {
        let mut style = StyleConfig::default();
        style.code_size = 0;
        style.border.width_px = 5000;
        let style = style.clamped();
        assert_eq!(style.code_size, 1);
        assert_eq!(style.border.width_px, 999);
    }
}
