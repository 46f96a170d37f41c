use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<DonationError> for AppError {
    fn from(err: DonationError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Rejected donation input. The message is shown to the visitor as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DonationError {
    #[error("Please select or enter a valid amount!")]
    InvalidAmount,
    #[error("${0} is not one of the preset amounts")]
    UnknownPreset(f64),
}

#[derive(Debug, Error)]
pub enum ClimateFetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("response has no numeric `{0}` field")]
    MissingField(&'static str),
    #[error("`{field}` is not a finite number: {value}")]
    NonFinite { field: &'static str, value: f64 },
}
