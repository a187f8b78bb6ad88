//! Client error types

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{context} failed with status {status}")]
    UnexpectedStatus { status: StatusCode, context: String },
}
