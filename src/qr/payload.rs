use std::fmt;

use crate::error::ConsoleError;

/// The string embedded in the QR matrix: always `{redirect_base}/r/{redirect_code}`.
///
/// The customer's destination URL is resolved server-side through the redirect,
/// so a printed code keeps working when the destination changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    pub fn for_redirect(redirect_base: &str, redirect_code: &str) -> Result<Self, ConsoleError> {
        let base = redirect_base.trim().trim_end_matches('/');
        let code = redirect_code.trim();
        if base.is_empty() {
            return Err(ConsoleError::validation("Redirect base URL is not configured"));
        }
        if code.is_empty() {
            return Err(ConsoleError::validation("Customer has no redirect code"));
        }
        Ok(Self(format!("{}/r/{}", base, code)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncodedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
