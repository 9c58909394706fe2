//! Error types for the settings codec.
//!
//! Decoding a record never fails; these errors only surface at the text and
//! identifier boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown action identifier: {0}")]
    UnknownAction(String),

    #[error("Settings record is not a JSON object (found {0})")]
    NotAnObject(&'static str),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
