//! Error types for the inspector session

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Host message has no event name")]
    MissingEvent,

    #[error("Action info has no action identifier")]
    MissingAction,

    #[error("Host message {event} has no settings payload")]
    MissingSettings { event: String },

    #[error("Settings error: {0}")]
    Settings(#[from] midibutton_settings::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
