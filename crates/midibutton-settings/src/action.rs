//! Button action kinds and their typed configurations.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// MIDI channel as shown to the user (1-16).
pub type Channel = u8;

/// A 7-bit MIDI data value (0-127).
pub type DataByte = u8;

pub const MIN_CHANNEL: Channel = 1;
pub const MAX_CHANNEL: Channel = 16;
pub const MAX_DATA: DataByte = 127;

pub const MAX_FADE_TIME_SECS: f64 = 360.0;
pub const MIN_FADE_CURVE: f64 = -5.0;
pub const MAX_FADE_CURVE: f64 = 5.0;

/// The closed set of button behaviours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    NoteOn,
    NoteOnToggle,
    ControlChange,
    ControlChangeToggle,
    ProgramChange,
    /// MIDI Machine Control transport command.
    TransportCommand,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::NoteOn,
        ActionKind::NoteOnToggle,
        ActionKind::ControlChange,
        ActionKind::ControlChangeToggle,
        ActionKind::ProgramChange,
        ActionKind::TransportCommand,
    ];

    /// Action identifier used by the host.
    pub const fn uuid(self) -> &'static str {
        match self {
            ActionKind::NoteOn => "uk.co.clarionmusic.midibutton.noteon",
            ActionKind::NoteOnToggle => "uk.co.clarionmusic.midibutton.noteontoggle",
            ActionKind::ControlChange => "uk.co.clarionmusic.midibutton.cc",
            ActionKind::ControlChangeToggle => "uk.co.clarionmusic.midibutton.cctoggle",
            ActionKind::ProgramChange => "uk.co.clarionmusic.midibutton.programchange",
            ActionKind::TransportCommand => "uk.co.clarionmusic.midibutton.mmc",
        }
    }

    pub fn from_uuid(uuid: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.uuid() == uuid)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uuid())
    }
}

impl FromStr for ActionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_uuid(s).ok_or_else(|| Error::UnknownAction(s.to_string()))
    }
}

/// When a Note On button sends its matching note off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NoteOffMode {
    #[default]
    None = 0,
    OnPush = 1,
    OnRelease = 2,
}

impl NoteOffMode {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(NoteOffMode::None),
            1 => Some(NoteOffMode::OnPush),
            2 => Some(NoteOffMode::OnRelease),
            _ => None,
        }
    }

    #[inline]
    pub fn code(self) -> i64 {
        self as i64
    }
}

/// Behaviour of a Control Change button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CcMode {
    /// Send the primary value on press.
    #[default]
    Single = 0,
    /// Primary value on press, secondary value on release.
    Momentary = 1,
    /// Fade from primary to secondary while held, back on release.
    FadeIn = 2,
    /// Fade from secondary to primary while held, back on release.
    FadeOut = 3,
}

impl CcMode {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(CcMode::Single),
            1 => Some(CcMode::Momentary),
            2 => Some(CcMode::FadeIn),
            3 => Some(CcMode::FadeOut),
            _ => None,
        }
    }

    #[inline]
    pub fn code(self) -> i64 {
        self as i64
    }

    #[inline]
    pub fn is_fade(self) -> bool {
        matches!(self, CcMode::FadeIn | CcMode::FadeOut)
    }
}

/// MMC transport commands offered by the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MmcCommand {
    #[default]
    Stop = 1,
    Play = 2,
    FastForward = 4,
    Rewind = 5,
    Record = 6,
    Pause = 9,
}

impl MmcCommand {
    pub const ALL: [MmcCommand; 6] = [
        MmcCommand::Stop,
        MmcCommand::Play,
        MmcCommand::FastForward,
        MmcCommand::Rewind,
        MmcCommand::Record,
        MmcCommand::Pause,
    ];

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.code() == code)
    }

    #[inline]
    pub fn code(self) -> i64 {
        self as i64
    }
}

/// Configuration of one button. Exactly one variant is active per button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionConfig {
    NoteOn {
        channel: Channel,
        note: DataByte,
        velocity: DataByte,
        note_off_mode: NoteOffMode,
    },
    NoteOnToggle {
        channel: Channel,
        note: DataByte,
        velocity: DataByte,
    },
    ControlChange {
        channel: Channel,
        controller: DataByte,
        value: DataByte,
        secondary_value: DataByte,
        mode: CcMode,
        fade_time_secs: f64,
        fade_curve: f64,
    },
    ControlChangeToggle {
        channel: Channel,
        controller: DataByte,
        off_value: DataByte,
        on_value: DataByte,
        fade_enabled: bool,
        fade_time_secs: f64,
        fade_curve: f64,
    },
    ProgramChange {
        channel: Channel,
        program: DataByte,
    },
    TransportCommand {
        command: MmcCommand,
    },
}

pub(crate) const DEFAULT_CHANNEL: Channel = 1;
pub(crate) const DEFAULT_VELOCITY: DataByte = 1;
pub(crate) const DEFAULT_FADE_TIME_SECS: f64 = 1.0;

impl ActionConfig {
    /// A freshly configured button of `kind`.
    pub fn defaults(kind: ActionKind) -> Self {
        match kind {
            ActionKind::NoteOn => ActionConfig::NoteOn {
                channel: DEFAULT_CHANNEL,
                note: 0,
                velocity: DEFAULT_VELOCITY,
                note_off_mode: NoteOffMode::default(),
            },
            ActionKind::NoteOnToggle => ActionConfig::NoteOnToggle {
                channel: DEFAULT_CHANNEL,
                note: 0,
                velocity: DEFAULT_VELOCITY,
            },
            ActionKind::ControlChange => ActionConfig::ControlChange {
                channel: DEFAULT_CHANNEL,
                controller: 0,
                value: 0,
                secondary_value: 0,
                mode: CcMode::default(),
                fade_time_secs: DEFAULT_FADE_TIME_SECS,
                fade_curve: 0.0,
            },
            ActionKind::ControlChangeToggle => ActionConfig::ControlChangeToggle {
                channel: DEFAULT_CHANNEL,
                controller: 0,
                off_value: 0,
                on_value: 0,
                fade_enabled: false,
                fade_time_secs: DEFAULT_FADE_TIME_SECS,
                fade_curve: 0.0,
            },
            ActionKind::ProgramChange => ActionConfig::ProgramChange {
                channel: DEFAULT_CHANNEL,
                program: 0,
            },
            ActionKind::TransportCommand => ActionConfig::TransportCommand {
                command: MmcCommand::default(),
            },
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            ActionConfig::NoteOn { .. } => ActionKind::NoteOn,
            ActionConfig::NoteOnToggle { .. } => ActionKind::NoteOnToggle,
            ActionConfig::ControlChange { .. } => ActionKind::ControlChange,
            ActionConfig::ControlChangeToggle { .. } => ActionKind::ControlChangeToggle,
            ActionConfig::ProgramChange { .. } => ActionKind::ProgramChange,
            ActionConfig::TransportCommand { .. } => ActionKind::TransportCommand,
        }
    }

    /// The 1-based channel, for message-emitting kinds.
    pub fn channel(&self) -> Option<Channel> {
        match *self {
            ActionConfig::NoteOn { channel, .. }
            | ActionConfig::NoteOnToggle { channel, .. }
            | ActionConfig::ControlChange { channel, .. }
            | ActionConfig::ControlChangeToggle { channel, .. }
            | ActionConfig::ProgramChange { channel, .. } => Some(channel),
            ActionConfig::TransportCommand { .. } => None,
        }
    }
}

/// Clamp a user-supplied channel into 1-16.
#[inline]
pub fn clamp_channel(channel: i64) -> Channel {
    channel.clamp(MIN_CHANNEL as i64, MAX_CHANNEL as i64) as Channel
}

/// Clamp a user-supplied data value into 0-127.
#[inline]
pub fn clamp_data(value: i64) -> DataByte {
    value.clamp(0, MAX_DATA as i64) as DataByte
}

/// Clamp a fade time into 0-360 seconds, rounded to the 0.1 s step.
pub fn clamp_fade_time(secs: f64) -> f64 {
    if !secs.is_finite() {
        return DEFAULT_FADE_TIME_SECS;
    }
    round_tenth(secs.clamp(0.0, MAX_FADE_TIME_SECS))
}

/// Clamp a fade curve into -5..5, rounded to the 0.1 step.
pub fn clamp_fade_curve(curve: f64) -> f64 {
    if !curve.is_finite() {
        return 0.0;
    }
    round_tenth(curve.clamp(MIN_FADE_CURVE, MAX_FADE_CURVE))
}

fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
