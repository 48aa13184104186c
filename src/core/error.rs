//! Errors raised while talking to the indicator backend

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndicatorError {
    /// The backend could not be reached or answered with a non-success status.
    #[error("Failed to reach indicator backend at {url}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered, but the body could not be read as indicator data.
    #[error("Unexpected indicator payload: {0}")]
    FormatMismatch(String),
}

impl IndicatorError {
    pub fn connection(url: &str, source: reqwest::Error) -> Self {
        IndicatorError::Connection {
            url: url.to_string(),
            source,
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, IndicatorError::Connection { .. })
    }
}
