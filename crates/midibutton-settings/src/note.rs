//! Loose note-number parsing for form input.
//!
//! A note may arrive as a number, a numeric string, or a `[pitchClass, octave]`
//! descriptor. `None` means "leave the field unset", never note 0.

use serde_json::Value;

/// Parse a note from a form value.
///
/// Plain numbers must be integral and in 1-127. Descriptors map to
/// `pitchClass * 7 + octave * 12 + 12` and must land in 0-127.
///
/// ```
/// use midibutton_settings::midi_note;
/// use serde_json::json;
///
/// assert_eq!(midi_note(&json!(5)), Some(5));
/// assert_eq!(midi_note(&json!([2, 3])), Some(50));
/// assert_eq!(midi_note(&json!([1])), None);
/// ```
pub fn midi_note(value: &Value) -> Option<u8> {
    match value {
        Value::Number(n) => note_number(n.as_f64()?),
        Value::String(s) => note_number(s.trim().parse::<f64>().ok()?),
        Value::Array(items) if items.len() >= 2 => {
            pitch_to_note(descriptor_part(&items[0])?, descriptor_part(&items[1])?)
        }
        _ => None,
    }
}

/// `pitch_class * 7 + octave * 12 + 12`, if the result is a valid MIDI note.
pub fn pitch_to_note(pitch_class: i64, octave: i64) -> Option<u8> {
    let note = pitch_class
        .checked_mul(7)?
        .checked_add(octave.checked_mul(12)?)?
        .checked_add(12)?;
    (0..=127).contains(&note).then_some(note as u8)
}

fn note_number(v: f64) -> Option<u8> {
    (v.fract() == 0.0 && v > 0.0 && v < 128.0).then_some(v as u8)
}

fn descriptor_part(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(midi_note(&json!(5)), Some(5));
        assert_eq!(midi_note(&json!(127)), Some(127));
        assert_eq!(midi_note(&json!(200)), None);
        assert_eq!(midi_note(&json!(0)), None);
        assert_eq!(midi_note(&json!(-3)), None);
        assert_eq!(midi_note(&json!(60.5)), None);
    }

    #[test]
    fn test_numeric_strings() {
        assert_eq!(midi_note(&json!("64")), Some(64));
        assert_eq!(midi_note(&json!(" 12 ")), Some(12));
        assert_eq!(midi_note(&json!("128")), None);
        assert_eq!(midi_note(&json!("C4")), None);
    }

    #[test]
    fn test_pitch_descriptors() {
        assert_eq!(midi_note(&json!([2, 3])), Some(50));
        assert_eq!(midi_note(&json!([0, 4])), Some(60));
        assert_eq!(midi_note(&json!(["1", "2"])), Some(43));
        assert_eq!(midi_note(&json!([1])), None);
        assert_eq!(midi_note(&json!([])), None);
        assert_eq!(midi_note(&json!([0, 20])), None);
        assert_eq!(midi_note(&json!([null, 2])), None);
    }

    #[test]
    fn test_other_values_are_absent() {
        assert_eq!(midi_note(&json!(null)), None);
        assert_eq!(midi_note(&json!(true)), None);
        assert_eq!(midi_note(&json!({"note": 60})), None);
    }

    #[test]
    fn test_pitch_to_note_overflow() {
        assert_eq!(pitch_to_note(i64::MAX, 0), None);
        assert_eq!(pitch_to_note(-10, 0), None);
    }
}
