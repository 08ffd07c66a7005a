// transcriber-core/src/lib.rs

//! The core logic for the melody transcriber.
//! This crate turns frame-wise pitch estimates into discrete note events,
//! summarizes them as text and maps them onto note-on/note-off pairs.
//! It is completely headless and performs no I/O beyond config files.

pub mod analysis;
pub mod config;
pub mod events;
pub mod fft;
pub mod frames;
pub mod segmentation;
pub mod sequence;
pub mod tuning;

use serde::{Deserialize, Serialize};

/// One (frequency, magnitude) estimate within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Estimated fundamental frequency in Hz. Zero means "no pitch in this bin".
    pub frequency: f32,
    /// Magnitude or confidence of the estimate.
    pub magnitude: f32,
}

impl Candidate {
    pub fn new(frequency: f32, magnitude: f32) -> Self {
        Candidate { frequency, magnitude }
    }
}

/// Represents a single analysis frame as produced by a frame source.
///
/// Candidates are index-aligned across a sequence: entry `i` always refers
/// to the same frequency bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Frame timestamp in seconds.
    pub time: f64,
    pub candidates: Vec<Candidate>,
}

impl Frame {
    pub fn new(time: f64, candidates: Vec<Candidate>) -> Self {
        Frame { time, candidates }
    }

    /// The candidate with the largest magnitude. Ties resolve to the lowest index.
    pub fn strongest(&self) -> Option<&Candidate> {
        self.candidates.iter().fold(None, |best: Option<&Candidate>, c| match best {
            Some(b) if c.magnitude <= b.magnitude => Some(b),
            _ => Some(c),
        })
    }

    /// The largest magnitude in this frame, or 0.0 for a frame without candidates.
    pub fn peak_magnitude(&self) -> f32 {
        self.strongest().map_or(0.0, |c| c.magnitude)
    }
}

/// A finalized note event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// MIDI note number, always within the piano range (21-108).
    pub pitch: u8,
    /// Onset in seconds.
    pub start: f64,
    /// Offset in seconds.
    pub end: f64,
    /// MIDI velocity (1-127).
    pub velocity: u8,
}

impl Note {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Scientific pitch name, e.g. "A4".
    pub fn name(&self) -> &'static str {
        tuning::note_name(self.pitch).unwrap_or("?")
    }
}

/// Everything derived from one frame sequence.
#[derive(Debug, Clone)]
pub struct Transcription {
    /// Notes in onset order.
    pub notes: Vec<Note>,
    /// Text summary, see [`sequence::summarize`].
    pub summary: String,
    pub analysis: analysis::Analysis,
}

/// Runs segmentation, assembly and analysis over a complete frame sequence.
pub fn transcribe(frames: &[Frame], config: &segmentation::SegmenterConfig) -> Transcription {
    let notes = sequence::assemble(&segmentation::segment(frames, config));
    let summary = sequence::summarize(&notes);
    let analysis = analysis::analyze(&summary);

    Transcription {
        notes,
        summary,
        analysis,
    }
}
