//! # Note Events Module
//!
//! Maps finalized notes onto note-on/note-off event pairs for a single
//! instrument, the shape a symbolic-music container serializer expects.

use serde::{Deserialize, Serialize};

use crate::Note;

/// General MIDI program 0, acoustic grand piano.
pub const DEFAULT_PROGRAM: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    NoteOn,
    NoteOff,
}

/// A timed note-on or note-off.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Seconds from the start of the recording.
    pub time: f64,
    pub kind: EventKind,
    pub pitch: u8,
    /// Velocity of the note-on; note-offs carry the same value.
    pub velocity: u8,
}

/// The single instrument track handed to a container writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteTrack {
    pub program: u8,
    pub notes: Vec<Note>,
}

impl NoteTrack {
    pub fn new(notes: Vec<Note>) -> Self {
        NoteTrack {
            program: DEFAULT_PROGRAM,
            notes,
        }
    }

    pub fn events(&self) -> Vec<NoteEvent> {
        to_events(&self.notes)
    }
}

/// Expands each note into an on/off pair, ordered by time.
///
/// At equal timestamps note-offs come first, so a note ending exactly where
/// the next one starts never overlaps it.
pub fn to_events(notes: &[Note]) -> Vec<NoteEvent> {
    let mut events: Vec<NoteEvent> = notes
        .iter()
        .flat_map(|note| {
            [
                NoteEvent {
                    time: note.start,
                    kind: EventKind::NoteOn,
                    pitch: note.pitch,
                    velocity: note.velocity,
                },
                NoteEvent {
                    time: note.end,
                    kind: EventKind::NoteOff,
                    pitch: note.pitch,
                    velocity: note.velocity,
                },
            ]
        })
        .collect();

    events.sort_by(|a, b| {
        a.time
            .total_cmp(&b.time)
            .then_with(|| rank(a.kind).cmp(&rank(b.kind)))
    });
    events
}

fn rank(kind: EventKind) -> u8 {
    match kind {
        EventKind::NoteOff => 0,
        EventKind::NoteOn => 1,
    }
}
