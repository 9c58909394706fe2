//! The property inspector session for one button.
//!
//! A [`PropertyInspector`] owns the button's typed config and the plugin-wide
//! settings. Every accepted edit re-encodes the full record and hands it to the
//! [`HostBridge`]; nothing is merged with what the host stored before.

use crate::bridge::HostBridge;
use crate::error::{Error, Result};
use crate::port::PortList;
use crate::protocol::{HostRequest, InboundMessage, PluginEvent, PluginRequest};
use midibutton_settings::{
    clamp_channel, clamp_data, clamp_fade_curve, clamp_fade_time, decode, encode, midi_note,
    switch_kind, ActionConfig, ActionKind, CcMode, GlobalConfig, HostPlatform, MmcCommand,
    NoteOffMode, SchemaRevision, SettingsRecord,
};
use serde_json::Value;
use tracing::{debug, trace};

/// What the host hands the inspector when it opens.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectInfo {
    /// The inspector's own context, used on every outbound request.
    pub uuid: String,
    pub action: ActionKind,
    pub settings: SettingsRecord,
}

impl ConnectInfo {
    /// Build from the host's action-info JSON
    /// (`{ "action", "context", "payload": { "settings" } }`).
    pub fn from_action_info(uuid: &str, action_info: &str) -> Result<Self> {
        let info: Value = serde_json::from_str(action_info)?;
        let action = info
            .get("action")
            .and_then(Value::as_str)
            .ok_or(Error::MissingAction)?
            .parse::<ActionKind>()?;
        let settings = info
            .pointer("/payload/settings")
            .cloned()
            .unwrap_or(Value::Null);
        Ok(Self {
            uuid: uuid.to_string(),
            action,
            settings: SettingsRecord::from_value(settings)?,
        })
    }
}

/// One edited form field. Numbers arrive as typed by the user and are clamped.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Channel(i64),
    /// Number, numeric string, or `[pitchClass, octave]`.
    Note(Value),
    Velocity(i64),
    NoteOffMode(NoteOffMode),
    Controller(i64),
    Value(i64),
    SecondaryValue(i64),
    CcMode(CcMode),
    OffValue(i64),
    OnValue(i64),
    FadeEnabled(bool),
    FadeTime(f64),
    FadeCurve(f64),
    Program(i64),
    TransportCommand(MmcCommand),
}

/// One edited global setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalEdit {
    PrintDebug(bool),
    UseVirtualPort(bool),
    PortName(String),
    OutPort(u32),
    InPort(u32),
}

pub struct PropertyInspector<B: HostBridge> {
    bridge: B,
    uuid: String,
    platform: HostPlatform,
    config: ActionConfig,
    revision: SchemaRevision,
    global: GlobalConfig,
    out_ports: PortList,
    in_ports: PortList,
}

impl<B: HostBridge> PropertyInspector<B> {
    /// Decode the button's stored record and ask the host for global settings.
    pub fn connect(bridge: B, info: ConnectInfo, platform: HostPlatform) -> Self {
        let decoded = decode(info.action, &info.settings);
        debug!(
            "Inspector connected for {} ({:?} record)",
            info.action, decoded.revision
        );
        let inspector = Self {
            bridge,
            uuid: info.uuid,
            platform,
            config: decoded.config,
            revision: decoded.revision,
            global: GlobalConfig::default(),
            out_ports: PortList::new(),
            in_ports: PortList::new(),
        };
        inspector.bridge.send(HostRequest::GetGlobalSettings {
            context: inspector.uuid.clone(),
        });
        inspector
    }

    pub fn config(&self) -> &ActionConfig {
        &self.config
    }

    pub fn kind(&self) -> ActionKind {
        self.config.kind()
    }

    /// Layout the current config was last read from.
    pub fn revision(&self) -> SchemaRevision {
        self.revision
    }

    pub fn global(&self) -> &GlobalConfig {
        &self.global
    }

    pub fn out_ports(&self) -> &PortList {
        &self.out_ports
    }

    pub fn in_ports(&self) -> &PortList {
        &self.in_ports
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Apply a field edit and store the result. Returns `false`, storing
    /// nothing, when the field does not belong to the active kind or the value
    /// is unusable.
    pub fn apply(&mut self, edit: FieldEdit) -> bool {
        if !apply_edit(&mut self.config, &edit) {
            debug!("Ignoring {:?} for {}", edit, self.kind());
            return false;
        }
        self.store();
        true
    }

    /// Reassign the button to `kind`, starting from its defaults.
    pub fn switch_action(&mut self, kind: ActionKind) {
        let (config, record) = switch_kind(kind);
        debug!("Switching {} -> {}", self.kind(), kind);
        self.config = config;
        self.revision = SchemaRevision::Current;
        self.send_settings(record);
    }

    /// Update one global setting, store the whole global record, and refresh
    /// the port lists when hardware ports are in use.
    pub fn edit_global(&mut self, edit: GlobalEdit) {
        match edit {
            GlobalEdit::PrintDebug(on) => self.global.print_debug = on,
            GlobalEdit::UseVirtualPort(on) => self.global.use_virtual_port = on,
            GlobalEdit::PortName(name) => self.global.port_name = name,
            GlobalEdit::OutPort(index) => self.select_out_port(index),
            GlobalEdit::InPort(index) => self.select_in_port(index),
        }

        let record = self.global.to_record(self.platform);
        if self.global.print_debug {
            debug!("Storing global settings {}", record.to_json());
        }
        self.bridge.send(HostRequest::SetGlobalSettings {
            context: self.uuid.clone(),
            payload: record,
        });
        self.request_ports();
    }

    /// Dispatch one inbound host message. Unknown messages are ignored.
    pub fn handle(&mut self, message: InboundMessage) {
        match message {
            InboundMessage::GlobalSettings(record) => {
                self.global = GlobalConfig::from_record(&record);
                if self.global.print_debug {
                    debug!("Received global settings {}", record.to_json());
                }
                self.request_ports();
            }
            InboundMessage::Settings {
                action, settings, ..
            } => {
                let kind = action
                    .as_deref()
                    .and_then(ActionKind::from_uuid)
                    .unwrap_or_else(|| self.kind());
                let decoded = decode(kind, &settings);
                if self.global.print_debug {
                    debug!(
                        "Received {:?} settings for {}: {}",
                        decoded.revision,
                        kind,
                        settings.to_json()
                    );
                }
                self.config = decoded.config;
                self.revision = decoded.revision;
            }
            InboundMessage::Plugin(event) => self.handle_plugin_event(event),
            InboundMessage::Unrecognized(event) => trace!("Ignoring host message {}", event),
        }
    }

    /// Parse and dispatch a raw host message.
    pub fn handle_text(&mut self, text: &str) -> Result<()> {
        let message = InboundMessage::parse(text)?;
        self.handle(message);
        Ok(())
    }

    fn handle_plugin_event(&mut self, event: PluginEvent) {
        match event {
            PluginEvent::OutPorts(list) => {
                debug!("Plugin reported {} output ports", list.len());
                self.out_ports = list;
            }
            PluginEvent::InPorts(list) => {
                debug!("Plugin reported {} input ports", list.len());
                self.in_ports = list;
            }
            PluginEvent::OutPortSelected(index) => self.select_out_port(index),
            PluginEvent::InPortSelected(index) => self.select_in_port(index),
        }
    }

    /// Set the output index; the cached name is kept when the list has no such port.
    fn select_out_port(&mut self, index: u32) {
        self.global.selected_out_port_index = index;
        match self.out_ports.name_of(index) {
            Some(name) => self.global.selected_out_port_name = Some(name.to_string()),
            None => debug!("No output port {}, keeping cached name", index),
        }
    }

    fn select_in_port(&mut self, index: u32) {
        self.global.selected_in_port_index = index;
        match self.in_ports.name_of(index) {
            Some(name) => self.global.selected_in_port_name = Some(name.to_string()),
            None => debug!("No input port {}, keeping cached name", index),
        }
    }

    fn store(&mut self) {
        self.revision = SchemaRevision::Current;
        let record = encode(&self.config);
        self.send_settings(record);
        if let ActionConfig::TransportCommand { command } = self.config {
            self.send_to_plugin(PluginRequest::TransportCommand(command));
        }
    }

    fn send_settings(&self, record: SettingsRecord) {
        if self.global.print_debug {
            debug!("Storing {} settings {}", self.kind(), record.to_json());
        }
        self.bridge.send(HostRequest::SetSettings {
            context: self.uuid.clone(),
            payload: record,
        });
    }

    fn request_ports(&self) {
        if !self.global.virtual_port_active(self.platform) {
            self.send_to_plugin(PluginRequest::GetMidiPorts);
        }
    }

    fn send_to_plugin(&self, payload: PluginRequest) {
        self.bridge.send(HostRequest::SendToPlugin {
            action: self.kind().uuid().to_string(),
            context: self.uuid.clone(),
            payload,
        });
    }
}

/// Write `edit` into `config` if the field exists on its variant.
fn apply_edit(config: &mut ActionConfig, edit: &FieldEdit) -> bool {
    use ActionConfig as C;
    use FieldEdit as E;

    match (config, edit) {
        (
            C::NoteOn { channel, .. }
            | C::NoteOnToggle { channel, .. }
            | C::ControlChange { channel, .. }
            | C::ControlChangeToggle { channel, .. }
            | C::ProgramChange { channel, .. },
            E::Channel(v),
        ) => *channel = clamp_channel(*v),

        (C::NoteOn { note, .. } | C::NoteOnToggle { note, .. }, E::Note(v)) => match midi_note(v) {
            Some(n) => *note = n,
            None => return false,
        },
        (C::NoteOn { velocity, .. } | C::NoteOnToggle { velocity, .. }, E::Velocity(v)) => {
            *velocity = clamp_data(*v)
        }
        (C::NoteOn { note_off_mode, .. }, E::NoteOffMode(mode)) => *note_off_mode = *mode,

        (
            C::ControlChange { controller, .. } | C::ControlChangeToggle { controller, .. },
            E::Controller(v),
        ) => *controller = clamp_data(*v),
        (C::ControlChange { value, .. }, E::Value(v)) => *value = clamp_data(*v),
        (C::ControlChange { secondary_value, .. }, E::SecondaryValue(v)) => {
            *secondary_value = clamp_data(*v)
        }
        (C::ControlChange { mode, .. }, E::CcMode(m)) => *mode = *m,
        (C::ControlChangeToggle { off_value, .. }, E::OffValue(v)) => *off_value = clamp_data(*v),
        (C::ControlChangeToggle { on_value, .. }, E::OnValue(v)) => *on_value = clamp_data(*v),
        (C::ControlChangeToggle { fade_enabled, .. }, E::FadeEnabled(on)) => *fade_enabled = *on,
        (
            C::ControlChange { fade_time_secs, .. } | C::ControlChangeToggle { fade_time_secs, .. },
            E::FadeTime(secs),
        ) => *fade_time_secs = clamp_fade_time(*secs),
        (
            C::ControlChange { fade_curve, .. } | C::ControlChangeToggle { fade_curve, .. },
            E::FadeCurve(curve),
        ) => *fade_curve = clamp_fade_curve(*curve),

        (C::ProgramChange { program, .. }, E::Program(v)) => *program = clamp_data(*v),
        (C::TransportCommand { command }, E::TransportCommand(cmd)) => *command = *cmd,

        _ => return false,
    }
    true
}
