use thiserror::Error;

pub use anyhow::Context;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error("unsupported chart range `{0}` (expected one of 1m, 3m, 6m, 1y, ytd, 2y, 5y)")]
    InvalidChartRange(String),
    #[error("invalid base URL `{0}`: expected an http:// or https:// address")]
    InvalidBaseUrl(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn message<T: Into<String>>(msg: T) -> Self {
        AppError::Message(msg.into())
    }

    /// True when the failure came from the network layer rather than from decoding.
    pub fn is_network(&self) -> bool {
        match self {
            AppError::Reqwest(_) => true,
            AppError::Other(err) => err.chain().any(|cause| {
                cause.is::<reqwest::Error>()
                    || cause.downcast_ref::<AppError>().is_some_and(AppError::is_network)
            }),
            _ => false,
        }
    }

    /// True when the response body could not be decoded as the expected JSON.
    pub fn is_parse(&self) -> bool {
        match self {
            AppError::Json(_) => true,
            AppError::Other(err) => err.chain().any(|cause| {
                cause.is::<serde_json::Error>()
                    || cause.downcast_ref::<AppError>().is_some_and(AppError::is_parse)
            }),
            _ => false,
        }
    }
}
