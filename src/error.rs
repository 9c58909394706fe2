//! Centralized error type for the midibutton umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Settings(#[from] midibutton_settings::Error),

    #[cfg(feature = "inspector")]
    #[error("Inspector: {0}")]
    Inspector(#[from] midibutton_inspector::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
