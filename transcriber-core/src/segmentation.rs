//! # Note Segmentation Module
//!
//! Converts a sequence of analysis frames into discrete notes.
//!
//! The segmenter is a two-state machine (`Idle` / `Active`) driven one frame
//! at a time in temporal order. A note opens on the first frame with a usable
//! pitch, is extended while later frames stay within the pitch tolerance, and
//! is finalized when one of the following happens:
//! - silence persists for at least `silence_duration`
//! - a frame has no usable pitch (non-positive frequency)
//! - a frame's pitch falls outside the piano range
//! - a frame's pitch deviates by more than `pitch_tolerance`
//! - the frame sequence ends
//!
//! Finalized notes shorter than `min_note_duration` are discarded.

use serde::{Deserialize, Serialize};

use crate::{tuning, Frame, Note};

/// Parameters of the segmentation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Notes shorter than this (seconds) are dropped when finalized.
    pub min_note_duration: f64,
    /// Largest semitone deviation still treated as the same note.
    pub pitch_tolerance: u8,
    /// A frame whose peak magnitude is at or below this is silent.
    pub silence_threshold: f32,
    /// Continuous silence (seconds) needed before an open note is closed.
    pub silence_duration: f64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        SegmenterConfig {
            min_note_duration: 0.1,
            pitch_tolerance: 2,
            silence_threshold: 0.05,
            silence_duration: 0.05,
        }
    }
}

/// A note that is still accumulating frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingNote {
    pub pitch: u8,
    pub start: f64,
    pub end: f64,
    pub velocity: u8,
}

impl PendingNote {
    fn open(pitch: u8, time: f64, velocity: u8) -> Self {
        PendingNote {
            pitch,
            start: time,
            end: time,
            velocity,
        }
    }

    fn deviation(&self, pitch: u8) -> u8 {
        self.pitch.abs_diff(pitch)
    }
}

/// Segmenter state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum State {
    #[default]
    Idle,
    Active(PendingNote),
}

/// Streaming note segmenter. Feed frames with [`Segmenter::push`] and
/// collect the notes with [`Segmenter::finish`].
#[derive(Debug, Clone)]
pub struct Segmenter {
    config: SegmenterConfig,
    state: State,
    /// Time of the first silent frame of the current silent run.
    silence_start: Option<f64>,
    notes: Vec<Note>,
    discarded: usize,
}

impl Segmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Segmenter {
            config,
            state: State::Idle,
            silence_start: None,
            notes: Vec::new(),
            discarded: 0,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Notes finalized so far, in finalize order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Processes the next frame. Frames must arrive in non-decreasing time order.
    pub fn push(&mut self, frame: &Frame) {
        let strongest = match frame.strongest() {
            Some(c) if c.magnitude > self.config.silence_threshold => *c,
            _ => {
                self.on_silence(frame.time);
                return;
            }
        };
        self.silence_start = None;

        if strongest.frequency <= 0.0 {
            log::trace!("t={:.3}: no usable pitch", frame.time);
            self.close();
            return;
        }

        let midi = tuning::frequency_to_midi(strongest.frequency);
        if !tuning::is_piano_key(midi) {
            log::trace!("t={:.3}: pitch {} outside piano range", frame.time, midi);
            self.close();
            return;
        }
        let pitch = midi as u8;
        let velocity = velocity_from_magnitude(strongest.magnitude);

        match self.state {
            State::Idle => {
                log::trace!("t={:.3}: open note {}", frame.time, pitch);
                self.state = State::Active(PendingNote::open(pitch, frame.time, velocity));
            }
            State::Active(ref mut pending)
                if pending.deviation(pitch) <= self.config.pitch_tolerance =>
            {
                pending.end = frame.time;
            }
            State::Active(_) => {
                log::trace!("t={:.3}: pitch jump to {}", frame.time, pitch);
                self.close();
                self.state = State::Active(PendingNote::open(pitch, frame.time, velocity));
            }
        }
    }

    /// Flushes any open note and returns every emitted note.
    pub fn finish(mut self) -> Vec<Note> {
        self.close();
        log::debug!(
            "segmentation finished: {} notes emitted, {} discarded as too short",
            self.notes.len(),
            self.discarded
        );
        self.notes
    }

    fn on_silence(&mut self, time: f64) {
        let silence_start = *self.silence_start.get_or_insert(time);
        if matches!(self.state, State::Active(_))
            && time - silence_start >= self.config.silence_duration
        {
            log::trace!("t={:.3}: silence since {:.3}", time, silence_start);
            self.close();
        }
    }

    /// Finalizes the pending note, if any, and returns to `Idle`.
    fn close(&mut self) {
        if let State::Active(pending) = std::mem::take(&mut self.state) {
            let note = Note {
                pitch: pending.pitch,
                start: pending.start,
                end: pending.end,
                velocity: pending.velocity,
            };
            if note.duration() >= self.config.min_note_duration {
                self.notes.push(note);
            } else {
                self.discarded += 1;
            }
        }
    }
}

/// Maps a magnitude in [0, 1] onto MIDI velocity 1-127.
pub fn velocity_from_magnitude(magnitude: f32) -> u8 {
    (magnitude * 127.0).round().clamp(1.0, 127.0) as u8
}

/// Runs a fresh segmenter over a complete frame sequence.
pub fn segment(frames: &[Frame], config: &SegmenterConfig) -> Vec<Note> {
    let mut segmenter = Segmenter::new(config.clone());
    for frame in frames {
        segmenter.push(frame);
    }
    segmenter.finish()
}
