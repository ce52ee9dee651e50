use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::document::Encoding;

/// All different error types this crate uses.
#[derive(Error, Debug)]
pub enum PresstrendError {
    /// Received a response, but not a 2xx Success.
    #[error("Expected a 2xx Success from {url} but got: {status}")]
    NoHttpSuccessResponse {
        /// The status of the response.
        status: StatusCode,
        /// The requested url.
        url: Url,
    },
    /// Failed to get a response.
    #[error("Request failed: {error}")]
    HttpRequestFailure {
        /// The reqwest error.
        error: reqwest::Error,
    },
    /// The content of a file is not valid for the expected encoding.
    #[error("{} is not valid {}", .path.display(), .encoding)]
    Decode {
        /// The file that was read.
        path: PathBuf,
        /// The encoding used to decode the file.
        encoding: Encoding,
    },
    /// No decoder for that label.
    #[error("Unknown encoding `{0}`")]
    UnknownEncoding(String),
    /// The leading segment of a date string is not a year.
    #[error("Can not read a year from date `{date}`")]
    InvalidYear {
        /// The sliced date string.
        date: String,
    },
}
