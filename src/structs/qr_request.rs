use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ConsoleError;
use crate::models::customer::Customer;
use crate::models::design::RecordId;
use crate::models::style::StyleConfig;
use crate::qr::compose::LogoOverlay;

/// One style edit, applied in order through the style controller.
#[derive(Debug, Deserialize)]
pub struct StyleEdit {
    pub path: String,
    pub value: Value,
}

/// Body of the preview and export endpoints.
#[derive(Debug, Deserialize)]
pub struct QrRenderRequest {
    pub customer: Customer,
    #[serde(default)]
    pub style: Option<StyleConfig>,
    #[serde(default)]
    pub design_id: Option<RecordId>, // Saved design loaded before the edits are applied
    #[serde(default)]
    pub edits: Vec<StyleEdit>,
    #[serde(default)]
    pub logo: Option<String>, // PNG as base64 or a data URI
    #[serde(default)]
    pub logo_percent: Option<u32>,
}

impl QrRenderRequest {
    pub fn logo_overlay(&self) -> Result<Option<LogoOverlay>, ConsoleError> {
        let Some(raw) = self.logo.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        let encoded = match raw.split_once(";base64,") {
            Some((_, data)) => data,
            None => raw,
        };
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| ConsoleError::InvalidLogo(e.to_string()))?;
        LogoOverlay::from_png_bytes(&bytes, self.logo_percent).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::compose::encode_png;
    use image::{Rgba, RgbaImage};

    fn request_with_logo(logo: Option<String>) -> QrRenderRequest {
        QrRenderRequest {
            customer: Customer::default(),
            style: None,
            design_id: None,
            edits: Vec::new(),
            logo,
            logo_percent: Some(30),
        }
    }

    #[test]
    fn decodes_data_uri_logo() {
        let png = encode_png(&RgbaImage::from_pixel(8, 4, Rgba([1, 2, 3, 255]))).unwrap();
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(&png));
        let logo = request_with_logo(Some(uri)).logo_overlay().unwrap().unwrap();
        assert_eq!(logo.percent(), 30);

        let raw = request_with_logo(Some(STANDARD.encode(&png)));
        assert!(raw.logo_overlay().unwrap().is_some());
    }

    #[test]
    fn missing_logo_is_none() {
        assert!(request_with_logo(None).logo_overlay().unwrap().is_none());
        assert!(request_with_logo(Some("  ".into())).logo_overlay().unwrap().is_none());
    }

    #[test]
    fn garbage_logo_is_rejected() {
        let err = request_with_logo(Some("%%%".into())).logo_overlay().unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidLogo(_)));
        let not_png = request_with_logo(Some(STANDARD.encode(b"hello")));
        assert!(matches!(not_png.logo_overlay(), Err(ConsoleError::InvalidLogo(_))));
    }

    #[test]
    fn parses_minimal_body() {
        let req: QrRenderRequest = serde_json::from_str(
            r##"{"customer": {"redirect_code": "abc123"}, "edits": [{"path": "border.enabled", "value": true}]}"##,
        )
        .unwrap();
        assert_eq!(req.customer.redirect_code(), "abc123");
        assert!(req.style.is_none());
        assert_eq!(req.edits.len(), 1);
    }
}
