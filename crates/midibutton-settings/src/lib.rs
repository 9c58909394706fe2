//! Settings codec for MIDI button actions.
//!
//! Maps typed per-button configuration to the flat record the host persists,
//! and back. Also renders the MIDI bytes a configured button sends and the
//! fade curves used by Control Change fades.
//!
//! # Features
//!
//! - **Action configs**: one typed variant per button kind
//! - **Codec**: encode to and decode from current and legacy record layouts
//! - **Global settings**: port selection and debug output
//! - **Wire rendering**: key press/release to raw MIDI
//! - **Fades**: precomputed linear and exponential CC fade tables
//!
//! # Example
//!
//! ```
//! use midibutton_settings::{decode, encode, ActionConfig, ActionKind, NoteOffMode};
//!
//! let config = ActionConfig::NoteOn {
//!     channel: 1,
//!     note: 60,
//!     velocity: 100,
//!     note_off_mode: NoteOffMode::OnRelease,
//! };
//! let record = encode(&config);
//! assert_eq!(record.int("statusByte"), Some(143));
//! assert_eq!(decode(ActionKind::NoteOn, &record).config, config);
//! ```

// Error types
pub mod error;
pub use error::{Error, Result};

pub mod action;
pub mod codec;
pub mod fade;
pub mod global;
pub mod note;
pub mod record;
pub mod wire;

// Core model
pub use action::{
    clamp_channel, clamp_data, clamp_fade_curve, clamp_fade_time, ActionConfig, ActionKind,
    CcMode, Channel, DataByte, MmcCommand, NoteOffMode,
};
pub use record::SettingsRecord;

// Codec
pub use codec::{
    channel_from_status, decode, encode, keys, status_byte, switch_kind, Decoded,
    SchemaRevision, WireBytes, WireLayout,
};
pub use note::{midi_note, pitch_to_note};

// Global settings
pub use global::{GlobalConfig, HostPlatform, DEFAULT_PORT_NAME};

// Playback
pub use fade::{FadeDirection, FadeTable, Fader, DEFAULT_SAMPLE_INTERVAL_MS};
pub use wire::{mmc_sysex, respond, FadeCommand, KeyEvent, KeyResponse, MidiBytes, ToggleState};
