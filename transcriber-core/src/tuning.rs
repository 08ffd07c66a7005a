//! # Tuning Module
//!
//! Pitch helpers shared by the segmentation engine and the sequence assembler.
//! Everything here assumes equal temperament with A4 = 440 Hz.
//!
//! ## Features
//! - Frequency to MIDI number conversion
//! - 88-key piano note table (A0 to C8)
//! - Note name lookups in both directions

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// MIDI number of A0, the lowest piano key.
pub const LOWEST_PIANO_KEY: u8 = 21;
/// MIDI number of C8, the highest piano key.
pub const HIGHEST_PIANO_KEY: u8 = 108;

const A4_FREQUENCY: f32 = 440.0;
const A4_MIDI: f32 = 69.0;

/// Statically computed key names for a standard 88-key piano (A0 to C8).
static KEYS: Lazy<Vec<String>> = Lazy::new(|| {
    const NOTE_NAMES: [&str; 12] = [
        "A", "A#", "B", "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#",
    ];
    let mut keys = Vec::with_capacity(88);

    for i in 0..88 {
        // The octave number changes at C, three keys above A0.
        let octave = (i + 9) / 12;
        keys.push(format!("{}{}", NOTE_NAMES[i % 12], octave));
    }
    keys
});

/// Reverse lookup from note name to MIDI number.
static NAME_MAP: Lazy<BTreeMap<&'static str, u8>> = Lazy::new(|| {
    KEYS.iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), LOWEST_PIANO_KEY + i as u8))
        .collect()
});

/// Converts a frequency to the nearest MIDI note number.
///
/// Uses `round(12 * log2(hz / 440) + 69)`. The result is not range checked;
/// a non-finite input (e.g. from a zero frequency) saturates to 0 or
/// `i32::MIN`/`i32::MAX`, all of which fall outside the piano range.
pub fn frequency_to_midi(hz: f32) -> i32 {
    (12.0 * (hz / A4_FREQUENCY).log2() + A4_MIDI).round() as i32
}

/// Equal-tempered frequency of a MIDI note number.
pub fn midi_to_frequency(midi: u8) -> f32 {
    A4_FREQUENCY * 2.0_f32.powf((midi as f32 - A4_MIDI) / 12.0)
}

/// Returns true if the MIDI number lies on the piano keyboard.
pub fn is_piano_key(midi: i32) -> bool {
    (LOWEST_PIANO_KEY as i32..=HIGHEST_PIANO_KEY as i32).contains(&midi)
}

/// Scientific pitch name of a piano key ("A0" to "C8").
///
/// # Returns
/// * `None` if `midi` is outside 21-108
pub fn note_name(midi: u8) -> Option<&'static str> {
    if !is_piano_key(midi as i32) {
        return None;
    }
    KEYS.get((midi - LOWEST_PIANO_KEY) as usize)
        .map(|name| name.as_str())
}

/// MIDI number for a scientific pitch name such as "C#4".
pub fn midi_from_name(name: &str) -> Option<u8> {
    NAME_MAP.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a440_is_midi_69() {
        assert_eq!(frequency_to_midi(440.0), 69);
        assert_eq!(frequency_to_midi(261.63), 60);
        assert_eq!(frequency_to_midi(27.5), 21);
        assert_eq!(frequency_to_midi(4186.0), 108);
    }

    #[test]
    fn rounding_goes_to_nearest_semitone() {
        // 40 cents sharp of A4 stays A4, 60 cents sharp rounds up.
        assert_eq!(frequency_to_midi(440.0 * 2.0_f32.powf(0.4 / 12.0)), 69);
        assert_eq!(frequency_to_midi(440.0 * 2.0_f32.powf(0.6 / 12.0)), 70);
    }

    #[test]
    fn zero_frequency_is_off_the_keyboard() {
        assert!(!is_piano_key(frequency_to_midi(0.0)));
    }

    #[test]
    fn names_follow_scientific_notation() {
        assert_eq!(note_name(21), Some("A0"));
        assert_eq!(note_name(60), Some("C4"));
        assert_eq!(note_name(61), Some("C#4"));
        assert_eq!(note_name(69), Some("A4"));
        assert_eq!(note_name(108), Some("C8"));
        assert_eq!(note_name(20), None);
        assert_eq!(note_name(109), None);
    }

    #[test]
    fn name_lookup_is_inverse() {
        for midi in LOWEST_PIANO_KEY..=HIGHEST_PIANO_KEY {
            let name = note_name(midi).unwrap();
            assert_eq!(midi_from_name(name), Some(midi));
        }
        assert_eq!(midi_from_name("H4"), None);
    }

    #[test]
    fn frequencies_agree() {
        assert!((midi_to_frequency(69) - 440.0).abs() < 1e-3);
        assert!((midi_to_frequency(21) - 27.5).abs() < 1e-3);
    }
}
