//! Plugin-wide settings: debug output and MIDI port selection.

use crate::record::SettingsRecord;

pub const DEFAULT_PORT_NAME: &str = "Streamdeck MIDI";

pub mod keys {
    pub const PRINT_DEBUG: &str = "printDebug";
    pub const PORT_NAME: &str = "portName";
    pub const USE_VIRTUAL_PORT: &str = "useVirtualPort";
    pub const SELECTED_OUT_PORT_INDEX: &str = "selectedOutPortIndex";
    pub const SELECTED_IN_PORT_INDEX: &str = "selectedInPortIndex";
    pub const SELECTED_OUT_PORT_NAME: &str = "selectedOutPortName";
    pub const SELECTED_IN_PORT_NAME: &str = "selectedInPortName";
}

use keys::*;

/// Operating system the host runs on. Virtual ports exist on macOS only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostPlatform {
    MacOs,
    Windows,
}

impl HostPlatform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            HostPlatform::MacOs
        } else {
            HostPlatform::Windows
        }
    }

    #[inline]
    pub fn supports_virtual_port(self) -> bool {
        self == HostPlatform::MacOs
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalConfig {
    pub print_debug: bool,
    /// Name of the virtual port the plugin creates.
    pub port_name: String,
    pub use_virtual_port: bool,
    pub selected_out_port_index: u32,
    pub selected_in_port_index: u32,
    /// Display name of the selected output port, cached when it was chosen.
    pub selected_out_port_name: Option<String>,
    pub selected_in_port_name: Option<String>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            print_debug: false,
            port_name: DEFAULT_PORT_NAME.to_string(),
            use_virtual_port: false,
            selected_out_port_index: 0,
            selected_in_port_index: 0,
            selected_out_port_name: None,
            selected_in_port_name: None,
        }
    }
}

impl GlobalConfig {
    /// Read from the host record, falling back to defaults field by field.
    pub fn from_record(record: &SettingsRecord) -> Self {
        let defaults = Self::default();
        Self {
            print_debug: record.flag(PRINT_DEBUG).unwrap_or(defaults.print_debug),
            port_name: record
                .text(PORT_NAME)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .unwrap_or(defaults.port_name),
            use_virtual_port: record
                .flag(USE_VIRTUAL_PORT)
                .unwrap_or(defaults.use_virtual_port),
            selected_out_port_index: port_index(record, SELECTED_OUT_PORT_INDEX),
            selected_in_port_index: port_index(record, SELECTED_IN_PORT_INDEX),
            selected_out_port_name: record.text(SELECTED_OUT_PORT_NAME).map(str::to_string),
            selected_in_port_name: record.text(SELECTED_IN_PORT_NAME).map(str::to_string),
        }
    }

    /// Build a fresh record. `useVirtualPort` is only written where the platform
    /// supports virtual ports.
    pub fn to_record(&self, platform: HostPlatform) -> SettingsRecord {
        let mut record = SettingsRecord::new();
        record.insert_bool(PRINT_DEBUG, self.print_debug);
        if platform.supports_virtual_port() {
            record.insert_bool(USE_VIRTUAL_PORT, self.use_virtual_port);
        }
        record.insert_str(PORT_NAME, &self.port_name);
        record.insert_int(SELECTED_OUT_PORT_INDEX, self.selected_out_port_index as i64);
        record.insert_int(SELECTED_IN_PORT_INDEX, self.selected_in_port_index as i64);
        if let Some(name) = &self.selected_out_port_name {
            record.insert_str(SELECTED_OUT_PORT_NAME, name);
        }
        if let Some(name) = &self.selected_in_port_name {
            record.insert_str(SELECTED_IN_PORT_NAME, name);
        }
        record
    }

    /// Whether the plugin should use its virtual port on `platform`.
    #[inline]
    pub fn virtual_port_active(&self, platform: HostPlatform) -> bool {
        self.use_virtual_port && platform.supports_virtual_port()
    }
}

fn port_index(record: &SettingsRecord, key: &str) -> u32 {
    record
        .int(key)
        .and_then(|index| u32::try_from(index).ok())
        .unwrap_or(0)
}
