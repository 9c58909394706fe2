//! What a button sends when it is pressed or released.
//!
//! Messages are built from the same status/data bytes [`encode`](crate::encode)
//! stores. The stored status is one below the real MIDI status, so channel
//! messages go out as `0x90 | (channel - 1)` and friends.

use crate::action::{ActionConfig, CcMode, NoteOffMode};
use crate::fade::FadeDirection;
use smallvec::{smallvec, SmallVec};

/// One raw MIDI message. Six bytes covers the MMC SysEx.
pub type MidiBytes = SmallVec<[u8; 6]>;

pub const SYSEX_START: u8 = 0xF0;
pub const SYSEX_END: u8 = 0xF7;
const MMC_UNIVERSAL_REALTIME: u8 = 0x7F;
const MMC_ALL_DEVICES: u8 = 0x7F;
const MMC_COMMAND_SUB_ID: u8 = 0x06;

/// State reported by the host for two-state (toggle) buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ToggleState {
    #[default]
    Primary,
    Secondary,
}

impl ToggleState {
    /// Host state number: 0 for primary, anything else secondary.
    pub fn from_index(state: i64) -> Self {
        if state == 0 {
            ToggleState::Primary
        } else {
            ToggleState::Secondary
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Press(ToggleState),
    Release,
}

impl KeyEvent {
    /// Press of a single-state button.
    pub const fn press() -> Self {
        KeyEvent::Press(ToggleState::Primary)
    }
}

/// What the playback side should do with a running fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeCommand {
    Start(FadeDirection),
    Reverse,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyResponse {
    pub messages: SmallVec<[MidiBytes; 2]>,
    pub fade: Option<FadeCommand>,
}

impl KeyResponse {
    fn send(message: MidiBytes) -> Self {
        Self {
            messages: smallvec![message],
            fade: None,
        }
    }

    fn fade(command: FadeCommand) -> Self {
        Self {
            messages: SmallVec::new(),
            fade: Some(command),
        }
    }

    /// True when the event produces nothing.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.fade.is_none()
    }
}

/// MMC command SysEx: `F0 7F 7F 06 <command> F7`.
pub fn mmc_sysex(command: u8) -> MidiBytes {
    smallvec![
        SYSEX_START,
        MMC_UNIVERSAL_REALTIME,
        MMC_ALL_DEVICES,
        MMC_COMMAND_SUB_ID,
        command,
        SYSEX_END
    ]
}

/// Render the response of a button configured as `config` to `event`.
///
/// Fades with a zero fade time jump straight to their end value.
pub fn respond(config: &ActionConfig, event: KeyEvent) -> KeyResponse {
    if let ActionConfig::TransportCommand { command } = *config {
        return match event {
            KeyEvent::Press(_) => KeyResponse::send(mmc_sysex(command.code() as u8)),
            KeyEvent::Release => KeyResponse::default(),
        };
    }

    let Some(bytes) = config.wire_bytes() else {
        return KeyResponse::default();
    };
    let status = bytes.midi_status();
    let data1 = bytes.data1;
    let data2 = bytes.data2.unwrap_or(0);
    let data2_alt = bytes.data2_alt.unwrap_or(0);
    let message = |value: u8| -> MidiBytes { smallvec![status, data1, value] };

    match (*config, event) {
        (ActionConfig::NoteOn { note_off_mode, .. }, KeyEvent::Press(_)) => {
            let mut response = KeyResponse::send(message(data2));
            if note_off_mode == NoteOffMode::OnPush {
                response.messages.push(message(0));
            }
            response
        }
        (
            ActionConfig::NoteOn {
                note_off_mode: NoteOffMode::OnRelease,
                ..
            },
            KeyEvent::Release,
        ) => KeyResponse::send(message(0)),

        (ActionConfig::NoteOnToggle { .. }, KeyEvent::Press(ToggleState::Primary)) => {
            KeyResponse::send(message(data2))
        }
        (ActionConfig::NoteOnToggle { .. }, KeyEvent::Press(ToggleState::Secondary)) => {
            KeyResponse::send(message(0))
        }

        (
            ActionConfig::ControlChange {
                mode,
                fade_time_secs,
                ..
            },
            event,
        ) => match (mode, event) {
            (CcMode::Single | CcMode::Momentary, KeyEvent::Press(_)) => {
                KeyResponse::send(message(data2))
            }
            (CcMode::Momentary, KeyEvent::Release) => KeyResponse::send(message(data2_alt)),
            (CcMode::Single, KeyEvent::Release) => KeyResponse::default(),
            (CcMode::FadeIn | CcMode::FadeOut, _) if fade_time_secs <= 0.0 => {
                // In ends on the secondary value, Out on the primary one.
                let pressed = matches!(event, KeyEvent::Press(_));
                let value = if (mode == CcMode::FadeIn) == pressed {
                    data2_alt
                } else {
                    data2
                };
                KeyResponse::send(message(value))
            }
            (CcMode::FadeIn, KeyEvent::Press(_)) => {
                KeyResponse::fade(FadeCommand::Start(FadeDirection::In))
            }
            (CcMode::FadeOut, KeyEvent::Press(_)) => {
                KeyResponse::fade(FadeCommand::Start(FadeDirection::Out))
            }
            (CcMode::FadeIn | CcMode::FadeOut, KeyEvent::Release) => {
                KeyResponse::fade(FadeCommand::Reverse)
            }
        },

        (
            ActionConfig::ControlChangeToggle {
                fade_enabled,
                fade_time_secs,
                ..
            },
            KeyEvent::Press(state),
        ) => {
            let fading = fade_enabled && fade_time_secs > 0.0;
            match (state, fading) {
                (ToggleState::Primary, false) => KeyResponse::send(message(data2)),
                (ToggleState::Secondary, false) => KeyResponse::send(message(data2_alt)),
                (ToggleState::Primary, true) => {
                    KeyResponse::fade(FadeCommand::Start(FadeDirection::In))
                }
                (ToggleState::Secondary, true) => {
                    KeyResponse::fade(FadeCommand::Start(FadeDirection::Out))
                }
            }
        }

        (ActionConfig::ProgramChange { .. }, KeyEvent::Press(_)) => {
            KeyResponse::send(smallvec![status, data1])
        }

        _ => KeyResponse::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::MmcCommand;

    fn note_on(mode: NoteOffMode) -> ActionConfig {
        ActionConfig::NoteOn {
            channel: 1,
            note: 60,
            velocity: 100,
            note_off_mode: mode,
        }
    }

    fn cc(mode: CcMode, fade_time_secs: f64) -> ActionConfig {
        ActionConfig::ControlChange {
            channel: 2,
            controller: 7,
            value: 100,
            secondary_value: 20,
            mode,
            fade_time_secs,
            fade_curve: 0.0,
        }
    }

    fn bytes(response: &KeyResponse) -> Vec<Vec<u8>> {
        response.messages.iter().map(|m| m.to_vec()).collect()
    }

    #[test]
    fn test_note_on_modes() {
        let held = respond(&note_on(NoteOffMode::None), KeyEvent::press());
        assert_eq!(bytes(&held), vec![vec![0x90, 60, 100]]);
        assert!(respond(&note_on(NoteOffMode::None), KeyEvent::Release).is_empty());

        let push = respond(&note_on(NoteOffMode::OnPush), KeyEvent::press());
        assert_eq!(bytes(&push), vec![vec![0x90, 60, 100], vec![0x90, 60, 0]]);

        let release = respond(&note_on(NoteOffMode::OnRelease), KeyEvent::Release);
        assert_eq!(bytes(&release), vec![vec![0x90, 60, 0]]);
    }

    #[test]
    fn test_note_on_toggle_states() {
        let config = ActionConfig::NoteOnToggle {
            channel: 3,
            note: 40,
            velocity: 90,
        };
        let on = respond(&config, KeyEvent::Press(ToggleState::Primary));
        assert_eq!(bytes(&on), vec![vec![0x92, 40, 90]]);
        let off = respond(&config, KeyEvent::Press(ToggleState::Secondary));
        assert_eq!(bytes(&off), vec![vec![0x92, 40, 0]]);
    }

    #[test]
    fn test_control_change_modes() {
        let single = cc(CcMode::Single, 1.0);
        assert_eq!(bytes(&respond(&single, KeyEvent::press())), vec![vec![0xB1, 7, 100]]);
        assert!(respond(&single, KeyEvent::Release).is_empty());

        let momentary = cc(CcMode::Momentary, 1.0);
        assert_eq!(
            bytes(&respond(&momentary, KeyEvent::Release)),
            vec![vec![0xB1, 7, 20]]
        );

        let fade_in = cc(CcMode::FadeIn, 1.0);
        assert_eq!(
            respond(&fade_in, KeyEvent::press()).fade,
            Some(FadeCommand::Start(FadeDirection::In))
        );
        assert_eq!(
            respond(&fade_in, KeyEvent::Release).fade,
            Some(FadeCommand::Reverse)
        );
        assert_eq!(
            respond(&cc(CcMode::FadeOut, 1.0), KeyEvent::press()).fade,
            Some(FadeCommand::Start(FadeDirection::Out))
        );
    }

    #[test]
    fn test_zero_time_fade_jumps() {
        let fade_in = cc(CcMode::FadeIn, 0.0);
        assert_eq!(bytes(&respond(&fade_in, KeyEvent::press())), vec![vec![0xB1, 7, 20]]);
        assert_eq!(bytes(&respond(&fade_in, KeyEvent::Release)), vec![vec![0xB1, 7, 100]]);

        let fade_out = cc(CcMode::FadeOut, 0.0);
        assert_eq!(bytes(&respond(&fade_out, KeyEvent::press())), vec![vec![0xB1, 7, 100]]);
    }

    #[test]
    fn test_control_change_toggle() {
        let mut config = ActionConfig::ControlChangeToggle {
            channel: 1,
            controller: 64,
            off_value: 0,
            on_value: 127,
            fade_enabled: false,
            fade_time_secs: 1.0,
            fade_curve: 0.0,
        };
        assert_eq!(
            bytes(&respond(&config, KeyEvent::Press(ToggleState::Primary))),
            vec![vec![0xB0, 64, 0]]
        );
        assert_eq!(
            bytes(&respond(&config, KeyEvent::Press(ToggleState::Secondary))),
            vec![vec![0xB0, 64, 127]]
        );

        if let ActionConfig::ControlChangeToggle { fade_enabled, .. } = &mut config {
            *fade_enabled = true;
        }
        assert_eq!(
            respond(&config, KeyEvent::Press(ToggleState::Secondary)).fade,
            Some(FadeCommand::Start(FadeDirection::Out))
        );
        assert!(respond(&config, KeyEvent::Release).is_empty());
    }

    #[test]
    fn test_program_change_and_mmc() {
        let pc = ActionConfig::ProgramChange {
            channel: 10,
            program: 5,
        };
        assert_eq!(bytes(&respond(&pc, KeyEvent::press())), vec![vec![0xC9, 5]]);

        let mmc = ActionConfig::TransportCommand {
            command: MmcCommand::Play,
        };
        assert_eq!(
            bytes(&respond(&mmc, KeyEvent::press())),
            vec![vec![0xF0, 0x7F, 0x7F, 0x06, 0x02, 0xF7]]
        );
        assert!(respond(&mmc, KeyEvent::Release).is_empty());
    }

    #[test]
    fn test_channel_one_sends_real_status_bytes() {
        let note = respond(&note_on(NoteOffMode::None), KeyEvent::press());
        assert_eq!(note.messages[0][0], 0x90);

        let mut control = cc(CcMode::Single, 1.0);
        if let ActionConfig::ControlChange { channel, .. } = &mut control {
            *channel = 1;
        }
        assert_eq!(respond(&control, KeyEvent::press()).messages[0][0], 0xB0);

        let pc = ActionConfig::ProgramChange {
            channel: 1,
            program: 0,
        };
        assert_eq!(respond(&pc, KeyEvent::press()).messages[0][0], 0xC0);
    }

    #[test]
    fn test_channel_sixteen_note_on() {
        let config = ActionConfig::NoteOn {
            channel: 16,
            note: 60,
            velocity: 1,
            note_off_mode: NoteOffMode::None,
        };
        assert_eq!(encode_status(&config), 158);
        assert_eq!(respond(&config, KeyEvent::press()).messages[0][0], 0x9F);
    }

    fn encode_status(config: &ActionConfig) -> i64 {
        crate::encode(config).int("statusByte").unwrap()
    }

    #[test]
    fn test_toggle_state_from_index() {
        assert_eq!(ToggleState::from_index(0), ToggleState::Primary);
        assert_eq!(ToggleState::from_index(1), ToggleState::Secondary);
    }
}
