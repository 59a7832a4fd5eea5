//! Error types for the API client.

/// Errors that can occur when fetching or filtering chart records.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request could not be sent or its body could not be read.
    #[error("Request failed: {0}")]
    Fetch(#[from] reqwest::Error),
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The response body was not a JSON array of chart records.
    #[error("Failed to parse chart response: {0}")]
    Parse(#[source] serde_json::Error),
    /// A record carried a date that does not match the configured format.
    #[error("Invalid record date '{date}'")]
    InvalidDate {
        date: String,
        #[source]
        source: chrono::ParseError,
    },
    /// The ticker symbol was empty.
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),
    /// The configured base URL could not be parsed or cannot carry a path.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}
