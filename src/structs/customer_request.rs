use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create-customer form, validated before anything is sent upstream.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct NewCustomer {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub company_name: String,
    #[validate(url(message = "Invalid URL format"))]
    pub qr_url: String,
}

/// Edit form for an existing customer. It carries the same fields and rules
/// as the create form; the redirect code is never part of it, so a printed
/// code keeps pointing at the customer while the destination changes.
pub type CustomerUpdate = NewCustomer;

impl NewCustomer {
    pub fn trimmed(self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            company_name: self.company_name.trim().to_string(),
            qr_url: self.qr_url.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(first_name: &str, qr_url: &str) -> NewCustomer {
        NewCustomer {
            first_name: first_name.to_string(),
            last_name: " Reyes ".to_string(),
            email: String::new(),
            phone_number: String::new(),
            company_name: " Acme Oil ".to_string(),
            qr_url: qr_url.to_string(),
        }
    }

    #[test]
    fn valid_form_passes_after_trimming() {
        let customer = form(" Dana ", " https://example.com/menu ").trimmed();
        assert!(customer.validate().is_ok());
        assert_eq!(customer.first_name, "Dana");
        assert_eq!(customer.company_name, "Acme Oil");
        assert_eq!(customer.qr_url, "https://example.com/menu");
    }

    #[test]
    fn blank_first_name_is_rejected() {
        let errors = form("   ", "https://example.com").trimmed().validate().unwrap_err();
        assert!(errors.field_errors().contains_key("first_name"));
    }

    #[test]
    fn missing_or_bad_url_is_rejected() {
        for url in ["", "example dot com"] {
            let errors = form("Dana", url).trimmed().validate().unwrap_err();
            assert!(errors.field_errors().contains_key("qr_url"), "{url}");
        }
    }
}
