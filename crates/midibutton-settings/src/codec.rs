//! Mapping between [`ActionConfig`] and the persisted [`SettingsRecord`].
//!
//! Message-emitting kinds are stored as a status byte plus up to three data
//! bytes, laid out by [`ActionKind::wire_layout`]. Records written by older
//! inspectors use human-named keys instead; [`decode`] reads either and
//! reports which one it used.

use crate::action::{
    ActionConfig, ActionKind, CcMode, Channel, DataByte, MmcCommand, NoteOffMode,
    DEFAULT_CHANNEL, DEFAULT_FADE_TIME_SECS, DEFAULT_VELOCITY, MAX_CHANNEL, MAX_DATA,
    MAX_FADE_CURVE, MAX_FADE_TIME_SECS, MIN_CHANNEL, MIN_FADE_CURVE,
};
use crate::record::SettingsRecord;
use tracing::trace;

/// Record keys.
pub mod keys {
    pub const STATUS_BYTE: &str = "statusByte";
    pub const DATA_BYTE_1: &str = "dataByte1";
    pub const DATA_BYTE_2: &str = "dataByte2";
    pub const DATA_BYTE_2_ALT: &str = "dataByte2Alt";
    pub const DATA_BYTE_5: &str = "dataByte5";
    pub const NOTE_OFF_MODE: &str = "noteOffMode";
    pub const CC_MODE: &str = "ccMode";
    pub const FADE_TIME: &str = "fadeTime";
    pub const FADE_CURVE: &str = "fadeCurve";
    pub const TOGGLE_FADE: &str = "toggleFade";

    pub const LEGACY_CHANNEL: &str = "midiChannel";
    pub const LEGACY_NOTE: &str = "midiNote";
    pub const LEGACY_VELOCITY: &str = "midiVelocity";
    pub const LEGACY_NOTE_OFF: &str = "noteOffParams";
    pub const LEGACY_CC: &str = "midiCC";
    pub const LEGACY_VALUE: &str = "midiValue";
    pub const LEGACY_VALUE_SEC: &str = "midiValueSec";
    pub const LEGACY_TOGGLE_CC: &str = "toggleCC";
    pub const LEGACY_PROGRAM: &str = "midiProgramChange";
    pub const LEGACY_MMC: &str = "midiMMC";
}

use keys::*;

pub const NOTE_ON_BASE: u8 = 143;
pub const CONTROL_CHANGE_BASE: u8 = 175;
pub const PROGRAM_CHANGE_BASE: u8 = 191;

/// Which status/data bytes a kind stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireLayout {
    /// Added to the 0-based channel to form `statusByte`.
    pub base_status: u8,
    pub has_data2: bool,
    pub has_data2_alt: bool,
    legacy_data1: &'static str,
    legacy_data2: Option<&'static str>,
    legacy_data2_alt: Option<&'static str>,
}

const NOTE_LAYOUT: WireLayout = WireLayout {
    base_status: NOTE_ON_BASE,
    has_data2: true,
    has_data2_alt: false,
    legacy_data1: LEGACY_NOTE,
    legacy_data2: Some(LEGACY_VELOCITY),
    legacy_data2_alt: None,
};

const CC_LAYOUT: WireLayout = WireLayout {
    base_status: CONTROL_CHANGE_BASE,
    has_data2: true,
    has_data2_alt: true,
    legacy_data1: LEGACY_CC,
    legacy_data2: Some(LEGACY_VALUE),
    legacy_data2_alt: Some(LEGACY_VALUE_SEC),
};

const PROGRAM_LAYOUT: WireLayout = WireLayout {
    base_status: PROGRAM_CHANGE_BASE,
    has_data2: false,
    has_data2_alt: false,
    legacy_data1: LEGACY_PROGRAM,
    legacy_data2: None,
    legacy_data2_alt: None,
};

impl ActionKind {
    /// Status/data layout, or `None` for kinds that store no status byte.
    pub const fn wire_layout(self) -> Option<WireLayout> {
        match self {
            ActionKind::NoteOn | ActionKind::NoteOnToggle => Some(NOTE_LAYOUT),
            ActionKind::ControlChange | ActionKind::ControlChangeToggle => Some(CC_LAYOUT),
            ActionKind::ProgramChange => Some(PROGRAM_LAYOUT),
            ActionKind::TransportCommand => None,
        }
    }

    /// Key whose presence marks a record of the current revision.
    const fn marker_key(self) -> &'static str {
        match self {
            ActionKind::TransportCommand => DATA_BYTE_5,
            _ => STATUS_BYTE,
        }
    }

    /// Keys written by older inspectors for this kind.
    fn legacy_keys(self) -> &'static [&'static str] {
        match self {
            ActionKind::NoteOn => &[
                LEGACY_CHANNEL,
                LEGACY_NOTE,
                LEGACY_VELOCITY,
                LEGACY_NOTE_OFF,
            ],
            ActionKind::NoteOnToggle => &[LEGACY_CHANNEL, LEGACY_NOTE, LEGACY_VELOCITY],
            ActionKind::ControlChange => &[
                LEGACY_CHANNEL,
                LEGACY_CC,
                LEGACY_VALUE,
                LEGACY_VALUE_SEC,
                LEGACY_TOGGLE_CC,
            ],
            ActionKind::ControlChangeToggle => {
                &[LEGACY_CHANNEL, LEGACY_CC, LEGACY_VALUE, LEGACY_VALUE_SEC]
            }
            ActionKind::ProgramChange => &[LEGACY_CHANNEL, LEGACY_PROGRAM],
            ActionKind::TransportCommand => &[LEGACY_MMC],
        }
    }
}

/// Status and data bytes of a message-emitting config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireBytes {
    pub status: u8,
    pub data1: DataByte,
    pub data2: Option<DataByte>,
    pub data2_alt: Option<DataByte>,
}

impl WireBytes {
    /// Status byte sent on the wire. The stored byte sits one below it.
    #[inline]
    pub fn midi_status(&self) -> u8 {
        self.status + 1
    }
}

impl ActionConfig {
    /// The stored status/data bytes, or `None` for transport commands.
    pub fn wire_bytes(&self) -> Option<WireBytes> {
        let layout = self.kind().wire_layout()?;
        let (channel, data1, data2, data2_alt) = match *self {
            ActionConfig::NoteOn {
                channel,
                note,
                velocity,
                ..
            }
            | ActionConfig::NoteOnToggle {
                channel,
                note,
                velocity,
            } => (channel, note, Some(velocity), None),
            ActionConfig::ControlChange {
                channel,
                controller,
                value,
                secondary_value,
                ..
            } => (channel, controller, Some(value), Some(secondary_value)),
            ActionConfig::ControlChangeToggle {
                channel,
                controller,
                off_value,
                on_value,
                ..
            } => (channel, controller, Some(off_value), Some(on_value)),
            ActionConfig::ProgramChange { channel, program } => (channel, program, None, None),
            ActionConfig::TransportCommand { .. } => return None,
        };
        Some(WireBytes {
            status: status_byte(channel, layout.base_status),
            data1,
            data2: data2.filter(|_| layout.has_data2),
            data2_alt: data2_alt.filter(|_| layout.has_data2_alt),
        })
    }
}

/// `(channel - 1) + base`, with the channel held to 1-16.
#[inline]
pub fn status_byte(channel: Channel, base: u8) -> u8 {
    base + (channel.clamp(MIN_CHANNEL, MAX_CHANNEL) - 1)
}

/// Inverse of [`status_byte`]; `None` when the byte is outside the kind's 16 channels.
#[inline]
pub fn channel_from_status(status: i64, base: u8) -> Option<Channel> {
    let channel = status - base as i64 + 1;
    in_channel_range(channel)
}

/// Which stored representation a decode read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaRevision {
    /// Wire-oriented keys (`statusByte`, `dataByte1`, ...).
    Current,
    /// Human-named keys (`midiChannel`, `midiNote`, ...). Channels are stored 1-based.
    Legacy,
    /// Neither representation was present; every field is a default.
    Empty,
}

impl SchemaRevision {
    /// Detect the revision of `record` for `kind`. The current layout wins when
    /// both are present.
    pub fn detect(kind: ActionKind, record: &SettingsRecord) -> Self {
        if record.contains(kind.marker_key()) {
            SchemaRevision::Current
        } else if kind.legacy_keys().iter().any(|key| record.contains(key)) {
            SchemaRevision::Legacy
        } else {
            SchemaRevision::Empty
        }
    }
}

/// Result of [`decode`].
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub config: ActionConfig,
    pub revision: SchemaRevision,
}

/// Generic status/data fields before they are assigned to a variant.
struct RawFields {
    channel: Channel,
    data1: DataByte,
    data2: Option<DataByte>,
    data2_alt: Option<DataByte>,
}

impl Default for RawFields {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL,
            data1: 0,
            data2: None,
            data2_alt: None,
        }
    }
}

fn read_raw(layout: &WireLayout, record: &SettingsRecord, revision: SchemaRevision) -> RawFields {
    match revision {
        SchemaRevision::Current => RawFields {
            channel: record
                .int(STATUS_BYTE)
                .and_then(|status| channel_from_status(status, layout.base_status))
                .unwrap_or(DEFAULT_CHANNEL),
            data1: data_field(record, DATA_BYTE_1).unwrap_or(0),
            data2: data_field(record, DATA_BYTE_2),
            data2_alt: data_field(record, DATA_BYTE_2_ALT),
        },
        SchemaRevision::Legacy => RawFields {
            channel: record
                .int(LEGACY_CHANNEL)
                .and_then(in_channel_range)
                .unwrap_or(DEFAULT_CHANNEL),
            data1: data_field(record, layout.legacy_data1).unwrap_or(0),
            data2: layout.legacy_data2.and_then(|key| data_field(record, key)),
            data2_alt: layout.legacy_data2_alt.and_then(|key| data_field(record, key)),
        },
        SchemaRevision::Empty => RawFields::default(),
    }
}

/// Decode the fields of `kind` from `record`. Never fails: absent or
/// out-of-range values take their defaults.
pub fn decode(kind: ActionKind, record: &SettingsRecord) -> Decoded {
    let revision = SchemaRevision::detect(kind, record);
    let legacy = revision == SchemaRevision::Legacy;

    let raw = kind
        .wire_layout()
        .map(|layout| read_raw(&layout, record, revision))
        .unwrap_or_default();

    let config = match kind {
        ActionKind::NoteOn => {
            let key = if legacy { LEGACY_NOTE_OFF } else { NOTE_OFF_MODE };
            ActionConfig::NoteOn {
                channel: raw.channel,
                note: raw.data1,
                velocity: raw.data2.unwrap_or(DEFAULT_VELOCITY),
                note_off_mode: record
                    .int(key)
                    .and_then(NoteOffMode::from_code)
                    .unwrap_or_default(),
            }
        }
        ActionKind::NoteOnToggle => ActionConfig::NoteOnToggle {
            channel: raw.channel,
            note: raw.data1,
            velocity: raw.data2.unwrap_or(DEFAULT_VELOCITY),
        },
        ActionKind::ControlChange => {
            let mode = if legacy {
                match record.flag(LEGACY_TOGGLE_CC) {
                    Some(true) => CcMode::Momentary,
                    _ => CcMode::Single,
                }
            } else {
                record
                    .int(CC_MODE)
                    .and_then(CcMode::from_code)
                    .unwrap_or_default()
            };
            ActionConfig::ControlChange {
                channel: raw.channel,
                controller: raw.data1,
                value: raw.data2.unwrap_or(0),
                secondary_value: raw.data2_alt.unwrap_or(0),
                mode,
                fade_time_secs: fade_time(record),
                fade_curve: fade_curve(record),
            }
        }
        ActionKind::ControlChangeToggle => ActionConfig::ControlChangeToggle {
            channel: raw.channel,
            controller: raw.data1,
            off_value: raw.data2.unwrap_or(0),
            on_value: raw.data2_alt.unwrap_or(0),
            fade_enabled: record.flag(TOGGLE_FADE).unwrap_or(false),
            fade_time_secs: fade_time(record),
            fade_curve: fade_curve(record),
        },
        ActionKind::ProgramChange => ActionConfig::ProgramChange {
            channel: raw.channel,
            program: raw.data1,
        },
        ActionKind::TransportCommand => {
            let key = if legacy { LEGACY_MMC } else { DATA_BYTE_5 };
            ActionConfig::TransportCommand {
                command: record
                    .int(key)
                    .and_then(MmcCommand::from_code)
                    .unwrap_or_default(),
            }
        }
    };

    trace!("Decoded {} settings ({:?} revision)", kind, revision);
    Decoded { config, revision }
}

/// Build a fresh record holding exactly the fields of `config`'s kind.
///
/// The result replaces whatever the button stored before; nothing is merged.
pub fn encode(config: &ActionConfig) -> SettingsRecord {
    let mut record = SettingsRecord::new();

    if let Some(bytes) = config.wire_bytes() {
        record.insert_int(STATUS_BYTE, bytes.status as i64);
        record.insert_int(DATA_BYTE_1, bytes.data1 as i64);
        if let Some(data2) = bytes.data2 {
            record.insert_int(DATA_BYTE_2, data2 as i64);
        }
        if let Some(alt) = bytes.data2_alt {
            record.insert_int(DATA_BYTE_2_ALT, alt as i64);
        }
    }

    match *config {
        ActionConfig::NoteOn { note_off_mode, .. } => {
            record.insert_int(NOTE_OFF_MODE, note_off_mode.code());
        }
        ActionConfig::ControlChange {
            mode,
            fade_time_secs,
            fade_curve,
            ..
        } => {
            record.insert_int(CC_MODE, mode.code());
            record.insert_float(FADE_TIME, fade_time_secs);
            record.insert_float(FADE_CURVE, fade_curve);
        }
        ActionConfig::ControlChangeToggle {
            fade_enabled,
            fade_time_secs,
            fade_curve,
            ..
        } => {
            record.insert_float(FADE_TIME, fade_time_secs);
            record.insert_float(FADE_CURVE, fade_curve);
            record.insert_bool(TOGGLE_FADE, fade_enabled);
        }
        ActionConfig::TransportCommand { command } => {
            record.insert_int(DATA_BYTE_5, command.code());
        }
        ActionConfig::NoteOnToggle { .. } | ActionConfig::ProgramChange { .. } => {}
    }

    record
}

/// Reassign a button to `kind`: the previous kind's fields are dropped and the
/// new kind starts from its defaults.
pub fn switch_kind(kind: ActionKind) -> (ActionConfig, SettingsRecord) {
    let config = ActionConfig::defaults(kind);
    let record = encode(&config);
    (config, record)
}

fn in_channel_range(channel: i64) -> Option<Channel> {
    (MIN_CHANNEL as i64..=MAX_CHANNEL as i64)
        .contains(&channel)
        .then_some(channel as Channel)
}

fn data_field(record: &SettingsRecord, key: &str) -> Option<DataByte> {
    record
        .int(key)
        .filter(|v| (0..=MAX_DATA as i64).contains(v))
        .map(|v| v as DataByte)
}

fn fade_time(record: &SettingsRecord) -> f64 {
    record
        .float(FADE_TIME)
        .filter(|t| (0.0..=MAX_FADE_TIME_SECS).contains(t))
        .unwrap_or(DEFAULT_FADE_TIME_SECS)
}

fn fade_curve(record: &SettingsRecord) -> f64 {
    record
        .float(FADE_CURVE)
        .filter(|c| (MIN_FADE_CURVE..=MAX_FADE_CURVE).contains(c))
        .unwrap_or(0.0)
}
