//! Style state controller: the single place where style edits are applied.

use serde_json::Value;

use crate::error::ConsoleError;
use crate::models::style::{ExportQuality, HexColor, MAX_STYLE_VALUE, SAFE_PADDING_PX, StyleConfig};

/// One leaf of [`StyleConfig`] together with its new value.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleField {
    CodeSize(i64),
    ForegroundColor(HexColor),
    BorderEnabled(bool),
    BorderWidth(i64),
    BorderColor(HexColor),
    PaddingEnabled(bool),
    PaddingAmount(i64),
    PaddingColor(HexColor),
    CornersEnabled(bool),
    CornerRadius(i64),
    ExportQuality(ExportQuality),
}

fn number(path: &str, value: &Value) -> Result<i64, ConsoleError> {
    let invalid = |reason: &str| ConsoleError::InvalidValue {
        path: path.to_string(),
        reason: reason.to_string(),
    };
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .ok_or_else(|| invalid("not a number")),
        // A cleared input field reads as zero.
        Value::String(s) if s.trim().is_empty() => Ok(0),
        Value::String(s) => s.trim().parse().map_err(|_| invalid("not a number")),
        _ => Err(invalid("expected a number")),
    }
}

fn flag(path: &str, value: &Value) -> Result<bool, ConsoleError> {
    value.as_bool().ok_or_else(|| ConsoleError::InvalidValue {
        path: path.to_string(),
        reason: "expected true or false".to_string(),
    })
}

fn color(path: &str, value: &Value) -> Result<HexColor, ConsoleError> {
    value
        .as_str()
        .ok_or_else(|| ConsoleError::InvalidValue {
            path: path.to_string(),
            reason: "expected a hex color string".to_string(),
        })?
        .parse()
}

impl StyleField {
    /// Resolve a dotted path such as `border.widthPx` and its JSON value.
    pub fn from_path(path: &str, value: &Value) -> Result<Self, ConsoleError> {
        let field = match path {
            "codeSize" => StyleField::CodeSize(number(path, value)?),
            "foregroundColor" => StyleField::ForegroundColor(color(path, value)?),
            "border.enabled" => StyleField::BorderEnabled(flag(path, value)?),
            "border.widthPx" => StyleField::BorderWidth(number(path, value)?),
            "border.color" => StyleField::BorderColor(color(path, value)?),
            "padding.enabled" => StyleField::PaddingEnabled(flag(path, value)?),
            "padding.amountPx" => StyleField::PaddingAmount(number(path, value)?),
            "padding.color" => StyleField::PaddingColor(color(path, value)?),
            "corners.enabled" => StyleField::CornersEnabled(flag(path, value)?),
            "corners.radiusPx" => StyleField::CornerRadius(number(path, value)?),
            "exportQuality" => {
                let raw = value.as_str().ok_or_else(|| ConsoleError::InvalidValue {
                    path: path.to_string(),
                    reason: "expected a quality name".to_string(),
                })?;
                StyleField::ExportQuality(raw.parse()?)
            }
            other => return Err(ConsoleError::UnknownField(other.to_string())),
        };
        Ok(field)
    }
}

fn clamp_input(value: i64) -> u32 {
    value.clamp(0, MAX_STYLE_VALUE as i64) as u32
}

/// Owns the working [`StyleConfig`] of one editor.
#[derive(Debug, Clone, Default)]
pub struct StyleController {
    config: StyleConfig,
}

impl StyleController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StyleConfig) -> Self {
        Self {
            config: config.clamped(),
        }
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    /// Apply one edit. Numbers clamp to `[0, 999]`, the code size to at least 1.
    ///
    /// Switching the border on while padding is off also turns padding on at
    /// [`SAFE_PADDING_PX`] so the code keeps a quiet zone. Padding the user has
    /// already enabled is left alone.
    pub fn set(&mut self, field: StyleField) {
        let config = &mut self.config;
        match field {
            StyleField::CodeSize(v) => config.code_size = clamp_input(v).max(1),
            StyleField::ForegroundColor(c) => config.foreground_color = c,
            StyleField::BorderEnabled(enabled) => {
                let switched_on = enabled && !config.border.enabled;
                config.border.enabled = enabled;
                if switched_on && !config.padding.enabled {
                    config.padding.enabled = true;
                    config.padding.amount_px = SAFE_PADDING_PX;
                }
            }
            StyleField::BorderWidth(v) => config.border.width_px = clamp_input(v),
            StyleField::BorderColor(c) => config.border.color = c,
            StyleField::PaddingEnabled(enabled) => config.padding.enabled = enabled,
            StyleField::PaddingAmount(v) => config.padding.amount_px = clamp_input(v),
            StyleField::PaddingColor(c) => config.padding.color = c,
            StyleField::CornersEnabled(enabled) => config.corners.enabled = enabled,
            StyleField::CornerRadius(v) => config.corners.radius_px = clamp_input(v),
            StyleField::ExportQuality(q) => config.export_quality = q,
        }
    }

    /// Parse and apply an edit. A rejected edit leaves the state untouched.
    pub fn set_field(&mut self, path: &str, value: &Value) -> Result<(), ConsoleError> {
        let field = StyleField::from_path(path, value)?;
        self.set(field);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.config = StyleConfig::default();
    }

    /// Replace the whole configuration, e.g. with a loaded design.
    pub fn load(&mut self, config: StyleConfig) {
        self.config = config.clamped();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn enabling_border_forces_safe_padding_once() {
        let mut controller = StyleController::new();
        controller.set(StyleField::PaddingAmount(0));
        controller.set(StyleField::BorderEnabled(true));
        assert!(controller.config().padding.enabled);
        assert_eq!(controller.config().padding.amount_px, 15);

        controller.set(StyleField::PaddingAmount(40));
        controller.set(StyleField::BorderEnabled(false));
        controller.set(StyleField::BorderEnabled(true));
        assert!(controller.config().padding.enabled);
        assert_eq!(controller.config().padding.amount_px, 40);
    }

    #[test]
    fn padding_switched_off_in_between_is_forced_again() {
        let mut controller = StyleController::new();
        controller.set(StyleField::BorderEnabled(true));
        controller.set(StyleField::BorderEnabled(false));
        controller.set(StyleField::PaddingEnabled(false));
        controller.set(StyleField::PaddingAmount(3));
        controller.set(StyleField::BorderEnabled(true));
        assert!(controller.config().padding.enabled);
        assert_eq!(controller.config().padding.amount_px, 15);
    }

    #[test]
    fn border_already_on_does_not_touch_padding() {
        let mut controller = StyleController::new();
        controller.set(StyleField::BorderEnabled(true));
        controller.set(StyleField::PaddingEnabled(false));
        controller.set(StyleField::BorderEnabled(true));
        assert!(!controller.config().padding.enabled);
    }

    #[test]
    fn user_padding_is_kept_when_border_turns_on() {
        let mut controller = StyleController::new();
        controller.set(StyleField::PaddingEnabled(true));
        controller.set(StyleField::PaddingAmount(50));
        controller.set(StyleField::BorderEnabled(true));
        assert_eq!(controller.config().padding.amount_px, 50);
    }

    #[test_case("border.widthPx", json!(1500), 999 ; "above range")]
    #[test_case("border.widthPx", json!(-5), 0 ; "below range")]
    #[test_case("border.widthPx", json!("12"), 12 ; "numeric string")]
    #[test_case("border.widthPx", json!(""), 0 ; "cleared input")]
    #[test_case("border.widthPx", json!(7.9), 7 ; "fraction truncates")]
    fn numeric_inputs_clamp(path: &str, value: Value, expected: u32) {
        let mut controller = StyleController::new();
        controller.set_field(path, &value).unwrap();
        assert_eq!(controller.config().border.width_px, expected);
    }

    #[test]
    fn code_size_never_reaches_zero() {
        let mut controller = StyleController::new();
        controller.set_field("codeSize", &json!(0)).unwrap();
        assert_eq!(controller.config().code_size, 1);
        controller.set_field("codeSize", &json!(2000)).unwrap();
        assert_eq!(controller.config().code_size, 999);
    }

    #[test]
    fn every_path_resolves() {
        let mut controller = StyleController::new();
        let edits = [
            ("codeSize", json!(300)),
            ("foregroundColor", json!("#112233")),
            ("border.enabled", json!(true)),
            ("border.widthPx", json!(6)),
            ("border.color", json!("#445566")),
            ("padding.enabled", json!(true)),
            ("padding.amountPx", json!(25)),
            ("padding.color", json!("#778899")),
            ("corners.enabled", json!(true)),
            ("corners.radiusPx", json!(30)),
            ("exportQuality", json!("print")),
        ];
        for (path, value) in &edits {
            controller.set_field(path, value).unwrap();
        }
        let config = controller.config();
        assert_eq!(config.code_size, 300);
        assert_eq!(config.foreground_color.to_string(), "#112233");
        assert_eq!(config.border.width_px, 6);
        assert_eq!(config.border.color.to_string(), "#445566");
        assert_eq!(config.padding.amount_px, 25);
        assert_eq!(config.padding.color.to_string(), "#778899");
        assert!(config.corners.enabled);
        assert_eq!(config.corners.radius_px, 30);
        assert_eq!(config.export_quality, ExportQuality::Print);
    }

    #[test]
    fn rejected_edits_leave_state_unchanged() {
        let mut controller = StyleController::new();
        assert!(matches!(
            controller.set_field("border.style", &json!("dashed")),
            Err(ConsoleError::UnknownField(_))
        ));
        assert!(controller.set_field("border.color", &json!("#12345")).is_err());
        assert!(controller.set_field("border.enabled", &json!("yes")).is_err());
        assert!(controller.set_field("exportQuality", &json!("ultra")).is_err());
        assert!(controller.set_field("codeSize", &json!([1])).is_err());
        assert_eq!(controller.config(), &StyleConfig::default());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut controller = StyleController::new();
        controller.set(StyleField::BorderEnabled(true));
        controller.set(StyleField::CornerRadius(80));
        controller.set(StyleField::ExportQuality(ExportQuality::Web));
        controller.reset();
        assert_eq!(controller.config(), &StyleConfig::default());
    }
}
