//! Host message protocol.
//!
//! Messages travel as JSON envelopes `{ "event", "action", "context", "payload" }`.
//! Inbound envelopes are parsed into [`InboundMessage`]; outbound requests are
//! serialized from [`HostRequest`].

use crate::error::{Error, Result};
use crate::port::{port_index, PortList};
use midibutton_settings::{MmcCommand, SettingsRecord};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

pub const DID_RECEIVE_SETTINGS: &str = "didReceiveSettings";
pub const DID_RECEIVE_GLOBAL_SETTINGS: &str = "didReceiveGlobalSettings";
pub const SEND_TO_PROPERTY_INSPECTOR: &str = "sendToPropertyInspector";

#[derive(Debug, Deserialize)]
struct Envelope {
    event: Option<String>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    context: Option<String>,
    #[serde(default)]
    payload: Value,
}

/// Events the plugin pushes to the inspector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginEvent {
    OutPorts(PortList),
    OutPortSelected(u32),
    InPorts(PortList),
    InPortSelected(u32),
}

impl PluginEvent {
    /// Parse a `sendToPropertyInspector` payload. `None` for unknown events or
    /// unreadable port indices.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let event = payload.get("event")?.as_str()?;
        let field = |key: &str| payload.get(key).unwrap_or(&Value::Null);
        match event {
            "midiOutPorts" => Some(PluginEvent::OutPorts(PortList::from_value(field(
                "midiOutPortList",
            )))),
            "midiOutPortSelected" => {
                port_index(field("midiOutPortSelected")).map(PluginEvent::OutPortSelected)
            }
            "midiInPorts" => Some(PluginEvent::InPorts(PortList::from_value(field(
                "midiInPortList",
            )))),
            "midiInPortSelected" => {
                port_index(field("midiInPortSelected")).map(PluginEvent::InPortSelected)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// `didReceiveGlobalSettings`.
    GlobalSettings(SettingsRecord),
    /// `didReceiveSettings` for the button being edited.
    Settings {
        action: Option<String>,
        context: Option<String>,
        settings: SettingsRecord,
    },
    /// `sendToPropertyInspector` with a recognised payload.
    Plugin(PluginEvent),
    /// Anything else. Carries the event name for logging.
    Unrecognized(String),
}

impl InboundMessage {
    pub fn parse(text: &str) -> Result<Self> {
        let envelope: Envelope = serde_json::from_str(text)?;
        Self::from_envelope(envelope)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let envelope: Envelope = serde_json::from_value(value)?;
        Self::from_envelope(envelope)
    }

    fn from_envelope(envelope: Envelope) -> Result<Self> {
        let event = envelope.event.ok_or(Error::MissingEvent)?;
        match event.as_str() {
            DID_RECEIVE_GLOBAL_SETTINGS => {
                Ok(InboundMessage::GlobalSettings(settings_of(&event, envelope.payload)?))
            }
            DID_RECEIVE_SETTINGS => Ok(InboundMessage::Settings {
                action: envelope.action,
                context: envelope.context,
                settings: settings_of(&event, envelope.payload)?,
            }),
            SEND_TO_PROPERTY_INSPECTOR => Ok(match PluginEvent::from_payload(&envelope.payload) {
                Some(plugin_event) => InboundMessage::Plugin(plugin_event),
                None => {
                    let name = envelope
                        .payload
                        .get("event")
                        .and_then(Value::as_str)
                        .unwrap_or("?");
                    InboundMessage::Unrecognized(format!("{event}/{name}"))
                }
            }),
            _ => Ok(InboundMessage::Unrecognized(event)),
        }
    }
}

fn settings_of(event: &str, mut payload: Value) -> Result<SettingsRecord> {
    let settings = payload
        .get_mut("settings")
        .map(Value::take)
        .ok_or_else(|| Error::MissingSettings {
            event: event.to_string(),
        })?;
    Ok(SettingsRecord::from_value(settings)?)
}

/// Payloads the inspector sends to the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginRequest {
    /// Ask for the current MIDI port lists.
    GetMidiPorts,
    /// A transport button changed command; the plugin redraws its icon.
    TransportCommand(MmcCommand),
}

impl Serialize for PluginRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            PluginRequest::GetMidiPorts => map.serialize_entry("event", "getMidiPorts")?,
            PluginRequest::TransportCommand(command) => {
                map.serialize_entry("midiMMC", &command.code())?
            }
        }
        map.end()
    }
}

/// Requests the inspector sends to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum HostRequest {
    /// Persist the button's settings record (full replace).
    SetSettings {
        context: String,
        payload: SettingsRecord,
    },
    /// Persist the plugin-wide settings record.
    SetGlobalSettings {
        context: String,
        payload: SettingsRecord,
    },
    GetGlobalSettings { context: String },
    SendToPlugin {
        action: String,
        context: String,
        payload: PluginRequest,
    },
}

impl HostRequest {
    pub fn event(&self) -> &'static str {
        match self {
            HostRequest::SetSettings { .. } => "setSettings",
            HostRequest::SetGlobalSettings { .. } => "setGlobalSettings",
            HostRequest::GetGlobalSettings { .. } => "getGlobalSettings",
            HostRequest::SendToPlugin { .. } => "sendToPlugin",
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_settings() {
        let msg = InboundMessage::parse(
            r#"{"event":"didReceiveSettings","action":"uk.co.clarionmusic.midibutton.cc",
                "context":"ABC","payload":{"settings":{"statusByte":176}}}"#,
        )
        .unwrap();
        match msg {
            InboundMessage::Settings {
                action,
                context,
                settings,
            } => {
                assert_eq!(action.as_deref(), Some("uk.co.clarionmusic.midibutton.cc"));
                assert_eq!(context.as_deref(), Some("ABC"));
                assert_eq!(settings.int("statusByte"), Some(176));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_settings_null() {
        let msg = InboundMessage::from_value(json!({
            "event": "didReceiveGlobalSettings",
            "payload": { "settings": null },
        }))
        .unwrap();
        assert_eq!(msg, InboundMessage::GlobalSettings(SettingsRecord::new()));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            InboundMessage::parse(r#"{"payload":{}}"#),
            Err(Error::MissingEvent)
        ));
        assert!(matches!(
            InboundMessage::parse(r#"{"event":"didReceiveSettings","payload":{}}"#),
            Err(Error::MissingSettings { .. })
        ));
        assert!(matches!(
            InboundMessage::parse(r#"{"event":"didReceiveSettings","payload":{"settings":3}}"#),
            Err(Error::Settings(_))
        ));
        assert!(matches!(InboundMessage::parse("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_plugin_events() {
        let msg = InboundMessage::from_value(json!({
            "event": "sendToPropertyInspector",
            "payload": { "event": "midiOutPortSelected", "midiOutPortSelected": "2" },
        }))
        .unwrap();
        assert_eq!(msg, InboundMessage::Plugin(PluginEvent::OutPortSelected(2)));

        let msg = InboundMessage::from_value(json!({
            "event": "sendToPropertyInspector",
            "payload": { "event": "midiInPorts", "midiInPortList": { "Keys": 0 } },
        }))
        .unwrap();
        match msg {
            InboundMessage::Plugin(PluginEvent::InPorts(list)) => {
                assert_eq!(list.name_of(0), Some("Keys"))
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unknown_messages_are_unrecognized() {
        let msg = InboundMessage::from_value(json!({
            "event": "sendToPropertyInspector",
            "payload": { "event": "somethingNew" },
        }))
        .unwrap();
        assert_eq!(
            msg,
            InboundMessage::Unrecognized("sendToPropertyInspector/somethingNew".to_string())
        );

        let msg = InboundMessage::from_value(json!({ "event": "titleParametersDidChange" })).unwrap();
        assert_eq!(
            msg,
            InboundMessage::Unrecognized("titleParametersDidChange".to_string())
        );
    }

    #[test]
    fn test_host_request_envelopes() {
        let mut record = SettingsRecord::new();
        record.insert_int("statusByte", 143);
        let request = HostRequest::SetSettings {
            context: "PI".to_string(),
            payload: record,
        };
        assert_eq!(
            request.to_value().unwrap(),
            json!({"event": "setSettings", "context": "PI", "payload": {"statusByte": 143}})
        );

        let request = HostRequest::GetGlobalSettings {
            context: "PI".to_string(),
        };
        assert_eq!(
            request.to_value().unwrap(),
            json!({"event": "getGlobalSettings", "context": "PI"})
        );
        assert_eq!(request.event(), "getGlobalSettings");
    }

    #[test]
    fn test_send_to_plugin_payloads() {
        let ports = HostRequest::SendToPlugin {
            action: "uk.co.clarionmusic.midibutton.noteon".to_string(),
            context: "PI".to_string(),
            payload: PluginRequest::GetMidiPorts,
        };
        assert_eq!(
            ports.to_value().unwrap(),
            json!({
                "event": "sendToPlugin",
                "action": "uk.co.clarionmusic.midibutton.noteon",
                "context": "PI",
                "payload": {"event": "getMidiPorts"},
            })
        );

        let mmc = PluginRequest::TransportCommand(MmcCommand::Record);
        assert_eq!(serde_json::to_value(mmc).unwrap(), json!({"midiMMC": 6}));
    }
}
