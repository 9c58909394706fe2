//! # midibutton - MIDI button plugin configuration
//!
//! Configuration core of a hardware-button plugin that sends MIDI.
//!
//! ## Architecture
//!
//! midibutton is an umbrella crate that coordinates:
//! - **midibutton-settings** - Action configs, the persisted settings record,
//!   wire bytes, global settings and fade tables
//! - **midibutton-inspector** - Inspector session, host protocol and bridge,
//!   MIDI port selection
//!
//! ## Quick Start
//!
//! ```
//! use midibutton::prelude::*;
//!
//! let config = ActionConfig::ControlChange {
//!     channel: 16,
//!     controller: 7,
//!     value: 127,
//!     secondary_value: 0,
//!     mode: CcMode::Single,
//!     fade_time_secs: 1.0,
//!     fade_curve: 0.0,
//! };
//! let record = encode(&config);
//! assert_eq!(record.int("statusByte"), Some(190));
//!
//! let pressed = respond(&config, KeyEvent::press());
//! assert_eq!(pressed.messages[0].as_slice(), &[0xBF, 7, 127]);
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Codec and inspector session
//! - `inspector` - Inspector session, host protocol and bridge

mod error;
pub use error::{Error, Result};

/// Re-export of midibutton-settings for direct access
pub use midibutton_settings as settings;

// Core types
pub use midibutton_settings::{
    decode, encode, midi_note, respond, switch_kind, ActionConfig, ActionKind, CcMode, Decoded,
    FadeDirection, FadeTable, Fader, GlobalConfig, HostPlatform, KeyEvent, KeyResponse,
    MmcCommand, NoteOffMode, SchemaRevision, SettingsRecord, ToggleState,
};

// Inspector session
#[cfg(feature = "inspector")]
pub use midibutton_inspector as inspector;

#[cfg(feature = "inspector")]
pub use midibutton_inspector::{
    bridge_channel, ChannelBridge, ConnectInfo, FieldEdit, GlobalEdit, HostBridge, HostRequest,
    InboundMessage, PropertyInspector,
};

/// Convenience prelude for common imports
pub mod prelude {
    // Model and codec
    pub use crate::settings::{
        decode, encode, switch_kind, ActionConfig, ActionKind, CcMode, GlobalConfig,
        HostPlatform, MmcCommand, NoteOffMode, SettingsRecord,
    };

    // Playback
    pub use crate::settings::{respond, FadeDirection, FadeTable, KeyEvent, ToggleState};

    // Inspector
    #[cfg(feature = "inspector")]
    pub use crate::inspector::{
        bridge_channel, ConnectInfo, FieldEdit, GlobalEdit, HostBridge, PropertyInspector,
    };
}
