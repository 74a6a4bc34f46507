use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::style::{
    BorderStyle, CornerStyle, ExportQuality, MAX_STYLE_VALUE, PaddingStyle, StyleConfig,
};
use crate::utils::lenient::{read_bool, read_color, read_quality, read_text, read_u32};

/// Identifier issued by the persistence API. Older backends use integers, newer ones strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(n) => RecordId::Number(n),
            Err(_) => RecordId::Text(s.to_string()),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Number(n)
    }
}

/// Body of `POST /api/qr/{qrId}/designs`: a saved design minus its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesignFields {
    pub design_name: String,
    pub qr_size: u32,
    pub qr_color: String,
    pub border_enabled: bool,
    pub border_width: u32,
    pub border_color: String,
    pub padding_enabled: bool,
    pub padding: u32,
    pub padding_color: String,
    pub corners_enabled: bool,
    pub corner_radius: u32,
    pub download_quality: ExportQuality,
}

impl DesignFields {
    pub fn new(name: &str, style: &StyleConfig) -> Self {
        Self {
            design_name: name.to_string(),
            qr_size: style.code_size,
            qr_color: style.foreground_color.to_string(),
            border_enabled: style.border.enabled,
            border_width: style.border.width_px,
            border_color: style.border.color.to_string(),
            padding_enabled: style.padding.enabled,
            padding: style.padding.amount_px,
            padding_color: style.padding.color.to_string(),
            corners_enabled: style.corners.enabled,
            corner_radius: style.corners.radius_px,
            download_quality: style.export_quality,
        }
    }

    /// The record the persistence API would echo back for these fields.
    pub fn into_record(self, id: RecordId) -> DesignRecord {
        DesignRecord {
            id: Some(id),
            design_name: Value::String(self.design_name),
            qr_size: self.qr_size.into(),
            qr_color: Value::String(self.qr_color),
            border_enabled: Value::Bool(self.border_enabled),
            border_width: self.border_width.into(),
            border_color: Value::String(self.border_color),
            padding_enabled: Value::Bool(self.padding_enabled),
            padding: self.padding.into(),
            padding_color: Value::String(self.padding_color),
            corners_enabled: Value::Bool(self.corners_enabled),
            corner_radius: self.corner_radius.into(),
            download_quality: Value::String(self.download_quality.to_string()),
        }
    }
}

/// A design record exactly as stored. Fields stay untyped until [`DesignRecord::style`]
/// resolves them, so one bad column never rejects the whole design.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DesignRecord {
    pub id: Option<RecordId>,
    pub design_name: Value,
    pub qr_size: Value,
    pub qr_color: Value,
    pub border_enabled: Value,
    pub border_width: Value,
    pub border_color: Value,
    pub padding_enabled: Value,
    pub padding: Value,
    pub padding_color: Value,
    pub corners_enabled: Value,
    pub corner_radius: Value,
    pub download_quality: Value,
}

impl DesignRecord {
    pub fn name(&self) -> String {
        read_text(&self.design_name).unwrap_or_default()
    }

    /// Resolve every field independently, falling back to its default when malformed.
    pub fn style(&self) -> StyleConfig {
        let defaults = StyleConfig::default();
        let border = BorderStyle::default();
        let padding = PaddingStyle::default();
        let corners = CornerStyle::default();

        StyleConfig {
            code_size: read_u32(&self.qr_size, 1, MAX_STYLE_VALUE).unwrap_or(defaults.code_size),
            foreground_color: read_color(&self.qr_color).unwrap_or(defaults.foreground_color),
            border: BorderStyle {
                enabled: read_bool(&self.border_enabled).unwrap_or(border.enabled),
                width_px: read_u32(&self.border_width, 0, MAX_STYLE_VALUE)
                    .unwrap_or(border.width_px),
                color: read_color(&self.border_color).unwrap_or(border.color),
            },
            padding: PaddingStyle {
                enabled: read_bool(&self.padding_enabled).unwrap_or(padding.enabled),
                amount_px: read_u32(&self.padding, 0, MAX_STYLE_VALUE)
                    .unwrap_or(padding.amount_px),
                color: read_color(&self.padding_color).unwrap_or(padding.color),
            },
            corners: CornerStyle {
                enabled: read_bool(&self.corners_enabled).unwrap_or(corners.enabled),
                radius_px: read_u32(&self.corner_radius, 0, MAX_STYLE_VALUE)
                    .unwrap_or(corners.radius_px),
            },
            export_quality: read_quality(&self.download_quality)
                .unwrap_or(defaults.export_quality),
        }
    }
}

/// A named style preset attached to one QR code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDesign {
    pub id: RecordId,
    pub name: String,
    pub style: StyleConfig,
}

impl SavedDesign {
    /// Records without an id cannot be loaded or deleted later, so they are skipped.
    pub fn from_record(record: &DesignRecord) -> Option<Self> {
        Some(Self {
            id: record.id.clone()?,
            name: record.name(),
            style: record.style(),
        })
    }

    pub fn fields(&self) -> DesignFields {
        DesignFields::new(&self.name, &self.style)
    }
}

/// Wire shape returned to the console: the record fields plus the id.
#[derive(Debug, Serialize)]
pub struct DesignView {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: DesignFields,
}

impl From<&SavedDesign> for DesignView {
    fn from(design: &SavedDesign) -> Self {
        Self {
            id: design.id.clone(),
            fields: design.fields(),
        }
    }
}
