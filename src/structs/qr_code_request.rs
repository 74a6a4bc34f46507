use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::qr_record::QrType;

/// Create or edit form for one of a customer's QR codes.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct QrCodeForm {
    #[validate(length(min = 1, message = "Please enter a URL"), url(message = "Invalid URL format"))]
    pub qr_url: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub qr_type: QrType,
}

impl QrCodeForm {
    /// Trim the fields and assume `https://` when the scheme was left out.
    pub fn normalized(self) -> Self {
        let url = self.qr_url.trim();
        let qr_url = if url.is_empty() || url.starts_with("http") {
            url.to_string()
        } else {
            format!("https://{}", url)
        };
        Self {
            qr_url,
            label: self.label.trim().to_string(),
            qr_type: self.qr_type,
        }
    }
}
