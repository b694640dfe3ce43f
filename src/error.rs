use thiserror::Error;

/// Every way a user action can be refused or fail.
///
/// The `Display` text of each variant is what ends up in the error
/// notification shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Please enter a video URL")]
    Validation,
    #[error("Another request is still in progress")]
    Busy,
    #[error("Load a video before selecting a quality")]
    NotLoaded,
    #[error("This quality is not available for the current video ({0})")]
    Unavailable(String),
    #[error("Please select a download quality")]
    NoQualitySelected,
    #[error("No video URL found")]
    NoVideo,
    /// The service answered with an explicit `error` payload.
    #[error("{0}")]
    Remote(String),
    #[error("Could not reach the download service: {0}")]
    Transport(String),
    #[error("Could not open the download: {0}")]
    Launch(String),
}

/// Failures of a single exchange with the external service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Remote(String),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response (HTTP {status}): {detail}")]
    Malformed {
        status: reqwest::StatusCode,
        detail: String,
    },
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Remote(msg) => AppError::Remote(msg),
            other => AppError::Transport(other.to_string()),
        }
    }
}
