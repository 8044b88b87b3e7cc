//! Client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Advisory request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Advisory server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse advisory response: {0}")]
    Decode(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
