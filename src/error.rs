use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use qrcode::types::QrError;
use thiserror::Error;

/// Every failure the console can surface, from local validation to upstream API errors.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("{0}")]
    Validation(String),

    #[error("unknown style field `{0}`")]
    UnknownField(String),

    #[error("invalid value for `{path}`: {reason}")]
    InvalidValue { path: String, reason: String },

    #[error("invalid hex color `{0}`")]
    InvalidColor(String),

    #[error("invalid logo image: {0}")]
    InvalidLogo(String),

    #[error("QR code generation error: {0}")]
    Encode(#[from] QrError),

    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("QR code preview has not rendered yet")]
    NotRendered,

    #[error("canvas of {size}px exceeds the {max}px limit, reduce the size, border or padding")]
    CanvasTooLarge { size: u32, max: u32 },

    #[error("{0} not found")]
    NotFound(String),

    #[error("session expired, please log in again")]
    Unauthorized { login_url: String },

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("upstream returned {status}: {message}")]
    UpstreamStatus { status: u16, message: String },
}

impl ConsoleError {
    pub fn validation(message: impl Into<String>) -> Self {
        ConsoleError::Validation(message.into())
    }

    /// Network and upstream failures, as opposed to problems with the caller's input.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ConsoleError::Upstream(_) | ConsoleError::UpstreamStatus { .. }
        )
    }
}

impl ResponseError for ConsoleError {
    fn status_code(&self) -> StatusCode {
        match self {
            ConsoleError::Validation(_)
            | ConsoleError::UnknownField(_)
            | ConsoleError::InvalidValue { .. }
            | ConsoleError::InvalidColor(_)
            | ConsoleError::InvalidLogo(_) => StatusCode::BAD_REQUEST,
            ConsoleError::Encode(_)
            | ConsoleError::NotRendered
            | ConsoleError::CanvasTooLarge { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ConsoleError::Image(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ConsoleError::NotFound(_) => StatusCode::NOT_FOUND,
            ConsoleError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ConsoleError::UpstreamStatus { status: 404, .. } => StatusCode::NOT_FOUND,
            ConsoleError::Upstream(_) | ConsoleError::UpstreamStatus { .. } => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = serde_json::json!({ "error": self.to_string() });
        if let ConsoleError::Unauthorized { login_url } = self {
            body["login_url"] = serde_json::Value::String(login_url.clone());
        }
        HttpResponse::build(self.status_code()).json(body)
    }
}
