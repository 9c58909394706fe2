//! Property inspector session for MIDI button actions.
//!
//! Keeps one button's configuration in sync with the host: decodes what the
//! host stored, applies form edits, re-encodes and stores the full record, and
//! relays MIDI port lists between the plugin and the global settings.
//!
//! The transport to the host is not part of this crate. Outbound requests go
//! through a [`HostBridge`]; [`bridge_channel`] gives a channel-backed bridge
//! whose receiver a transport can drain.
//!
//! # Example
//!
//! ```
//! use midibutton_inspector::{bridge_channel, ConnectInfo, FieldEdit, PropertyInspector};
//! use midibutton_settings::{ActionKind, HostPlatform, SettingsRecord};
//!
//! let (bridge, requests) = bridge_channel();
//! let info = ConnectInfo {
//!     uuid: "PI".to_string(),
//!     action: ActionKind::ProgramChange,
//!     settings: SettingsRecord::new(),
//! };
//! let mut inspector = PropertyInspector::connect(bridge, info, HostPlatform::current());
//! assert!(inspector.apply(FieldEdit::Program(42)));
//! assert_eq!(requests.try_iter().count(), 2);
//! ```

// Error types
pub mod error;
pub use error::{Error, Result};

pub mod bridge;
pub mod inspector;
pub mod port;
pub mod protocol;

pub use bridge::{bridge_channel, ChannelBridge, HostBridge};
pub use inspector::{ConnectInfo, FieldEdit, GlobalEdit, PropertyInspector};
pub use port::PortList;
pub use protocol::{HostRequest, InboundMessage, PluginEvent, PluginRequest};
