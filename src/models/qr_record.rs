use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::customer::Customer;
use crate::models::design::RecordId;
use crate::qr::payload::EncodedPayload;

/// Whether the destination behind a code may change after printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrType {
    #[default]
    Dynamic,
    Static,
}

impl QrType {
    /// Unknown or missing values read as dynamic.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("static") => QrType::Static,
            _ => QrType::Dynamic,
        }
    }
}

impl fmt::Display for QrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QrType::Dynamic => "dynamic",
            QrType::Static => "static",
        })
    }
}

/// One of a customer's QR codes, from `GET /api/customers/{id}/qrcodes`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct QrRecord {
    pub id: Option<RecordId>,
    pub customer_id: Option<RecordId>,
    pub qr_url: Option<String>,
    pub label: Option<String>,
    pub qr_type: Option<String>,
    pub redirect_code: Option<String>,
    pub total_scans: Option<u64>,
    pub created_at: Option<String>,
}

impl QrRecord {
    pub fn qr_type(&self) -> QrType {
        QrType::parse_lenient(self.qr_type.as_deref())
    }

    pub fn display_label(&self) -> String {
        self.label
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or("Untitled QR")
            .to_string()
    }

    /// The customer as the editor sees it when this code is opened: the
    /// record's id, destination, label and redirect code win over the owner's.
    pub fn editor_customer(&self, owner: &Customer) -> Customer {
        let mut customer = owner.clone();
        customer.qr_id = self.id.clone();
        if self.qr_url.is_some() {
            customer.qr_url = self.qr_url.clone();
        }
        if self.label.is_some() {
            customer.qr_label = self.label.clone();
        }
        if self.redirect_code.is_some() {
            customer.redirect_code = self.redirect_code.clone();
        }
        customer
    }
}

/// QR list entry with the value its code encodes.
#[derive(Serialize, Debug)]
pub struct QrRecordView {
    #[serde(flatten)]
    pub record: QrRecord,
    pub display_label: String,
    pub qr_value: Option<String>,
}

impl QrRecordView {
    pub fn new(record: QrRecord, redirect_base: &str) -> Self {
        let code = record.redirect_code.as_deref().unwrap_or_default();
        let qr_value = EncodedPayload::for_redirect(redirect_base, code)
            .ok()
            .map(|payload| payload.as_str().to_string());
        Self {
            display_label: record.display_label(),
            qr_value,
            record,
        }
    }
}
