use crate::DatasetError;

pub const MIN_MIDI_PITCH: u8 = 0;
pub const MAX_MIDI_PITCH: u8 = 127;

/// MIDI pitch number of the lowest note on the piano (A0).
pub const MIN_MIDI_PITCH_PIANO: u8 = 21;
/// MIDI pitch number of the highest note on the piano (C8).
pub const MAX_MIDI_PITCH_PIANO: u8 = 108;

const NOTES_IN_OCTAVE: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Converts a spelled pitch such as `C#4` or `Bb3` to its MIDI number.
///
/// Accepts `#` and `b` accidentals, possibly repeated.
pub fn note_name_to_midi_number(name: &str) -> Result<u8, DatasetError> {
    let mut chars = name.chars();
    let letter = chars
        .next()
        .ok_or_else(|| DatasetError::validation("empty note name"))?;
    let mut semitone: i32 = match letter.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        other => {
            return Err(DatasetError::validation(format!(
                "unknown note letter '{other}' in '{name}'"
            )))
        }
    };

    let mut rest = chars.as_str();
    while let Some(stripped) = rest.strip_prefix('#') {
        semitone += 1;
        rest = stripped;
    }
    while let Some(stripped) = rest.strip_prefix('b') {
        semitone -= 1;
        rest = stripped;
    }

    let octave: i32 = rest
        .parse()
        .map_err(|_| DatasetError::validation(format!("bad octave in note name '{name}'")))?;

    let number = (octave + 1) * 12 + semitone;
    if !(MIN_MIDI_PITCH as i32..=MAX_MIDI_PITCH as i32).contains(&number) {
        return Err(DatasetError::validation(format!(
            "note '{name}' is outside the MIDI range"
        )));
    }
    Ok(number as u8)
}

/// Inverse of [`note_name_to_midi_number`], using sharps for accidentals.
pub fn midi_number_to_note_name(number: u8) -> String {
    let octave = number as i32 / 12 - 1;
    let name = NOTES_IN_OCTAVE[number as usize % 12];
    format!("{name}{octave}")
}

pub fn is_piano_pitch(number: u8) -> bool {
    (MIN_MIDI_PITCH_PIANO..=MAX_MIDI_PITCH_PIANO).contains(&number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_pitches_convert() {
        assert_eq!(note_name_to_midi_number("C4").unwrap(), 60);
        assert_eq!(note_name_to_midi_number("C#4").unwrap(), 61);
        assert_eq!(note_name_to_midi_number("Db4").unwrap(), 61);
        assert_eq!(note_name_to_midi_number("A0").unwrap(), 21);
        assert_eq!(note_name_to_midi_number("C8").unwrap(), 108);
    }

    #[test]
    fn bad_names_are_rejected() {
        assert!(note_name_to_midi_number("").is_err());
        assert!(note_name_to_midi_number("H4").is_err());
        assert!(note_name_to_midi_number("C#").is_err());
        assert!(note_name_to_midi_number("C99").is_err());
    }

    #[test]
    fn names_round_trip() {
        for number in MIN_MIDI_PITCH_PIANO..=MAX_MIDI_PITCH_PIANO {
            let name = midi_number_to_note_name(number);
            assert_eq!(note_name_to_midi_number(&name).unwrap(), number);
        }
    }

    #[test]
    fn piano_range() {
        assert!(!is_piano_pitch(20));
        assert!(is_piano_pitch(21));
        assert!(is_piano_pitch(108));
        assert!(!is_piano_pitch(109));
    }
}
