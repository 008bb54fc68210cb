//! Weather lookup error types.

use thiserror::Error;
use weathlytics_core::{NetworkError, ReqwestErrorExt};

pub const NOT_FOUND_MESSAGE: &str = "Oops! City not found. Please recheck and try again.";
pub const TRANSIENT_FAILURE_MESSAGE: &str =
    "Oh! My bad... Failed to fetch weather data. Please try again later.";

/// The two ways a fetch can fail, as far as the user is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    NotFound,
    TransientFailure,
}

/// A settled fetch failure held in controller state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn not_found() -> Self {
        Self {
            kind: FetchErrorKind::NotFound,
            message: NOT_FOUND_MESSAGE.to_string(),
        }
    }

    pub fn transient() -> Self {
        Self {
            kind: FetchErrorKind::TransientFailure,
            message: TRANSIENT_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Errors raised by a [`WeatherGateway`](crate::WeatherGateway).
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Weather API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        GatewayError::Network(e.into_network_error())
    }
}

impl GatewayError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::CityNotFound(_) => FetchErrorKind::NotFound,
            Self::Status { status: 404, .. } => FetchErrorKind::NotFound,
            _ => FetchErrorKind::TransientFailure,
        }
    }

    /// User-friendly error message for display.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            FetchErrorKind::NotFound => NOT_FOUND_MESSAGE,
            FetchErrorKind::TransientFailure => TRANSIENT_FAILURE_MESSAGE,
        }
    }
}

impl From<&GatewayError> for FetchError {
    fn from(e: &GatewayError) -> Self {
        match e.kind() {
            FetchErrorKind::NotFound => FetchError::not_found(),
            FetchErrorKind::TransientFailure => FetchError::transient(),
        }
    }
}
