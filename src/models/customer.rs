use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::design::RecordId;
use crate::qr::payload::EncodedPayload;

/// A customer as returned by `GET /api/customers`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub qr_url: Option<String>, // Destination behind the redirect, never encoded directly
    #[serde(default)]
    pub redirect_code: Option<String>, // Null on rows created before redirects existed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Customer {
    pub fn redirect_code(&self) -> &str {
        non_empty(&self.redirect_code).unwrap_or_default()
    }

    /// Company name, else "first last".
    pub fn display_name(&self) -> String {
        if let Some(company) = non_empty(&self.company_name) {
            return company.to_string();
        }
        let first = self.first_name.as_deref().unwrap_or("");
        let last = self.last_name.as_deref().unwrap_or("");
        format!("{} {}", first, last).trim().to_string()
    }

    /// Human-readable destination shown under the code: the host of the
    /// destination URL without `www.`, else the display name.
    pub fn caption(&self) -> String {
        non_empty(&self.qr_url)
            .and_then(|raw| Url::parse(raw).ok())
            .and_then(|url| url.host_str().map(|h| h.replacen("www.", "", 1)))
            .filter(|host| !host.is_empty())
            .unwrap_or_else(|| self.display_name())
    }

    pub fn export_label(&self) -> String {
        non_empty(&self.label)
            .or_else(|| non_empty(&self.qr_label))
            .map(str::to_string)
            .or_else(|| Some(self.display_name()).filter(|name| !name.is_empty()))
            .unwrap_or_else(|| "QR".to_string())
    }

    pub fn export_filename(&self) -> String {
        format!("{}_QR.png", self.export_label())
    }
}

/// Customer list entry enriched with what the console shows next to each row.
#[derive(Serialize, Debug)]
pub struct CustomerView {
    #[serde(flatten)]
    pub customer: Customer,
    pub display_name: String,
    pub caption: String,
    pub qr_value: Option<String>,
}

impl CustomerView {
    /// Rows without a redirect code have no QR value yet.
    pub fn new(customer: Customer, redirect_base: &str) -> Self {
        let qr_value = EncodedPayload::for_redirect(redirect_base, customer.redirect_code())
            .ok()
            .map(|payload| payload.as_str().to_string());
        Self {
            display_name: customer.display_name(),
            caption: customer.caption(),
            qr_value,
            customer,
        }
    }
}
