//! # Note Sequence Module
//!
//! Orders finalized notes by onset and renders them as a compact text
//! summary such as `C4(0.50s) E4(0.25s) G4(1.00s)`. The summary can be parsed
//! back into pitch names and durations.

use anyhow::{anyhow, Context, Result};

use crate::{tuning, Note};

/// One token of a parsed summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryEntry {
    pub name: String,
    pub pitch: u8,
    /// Duration in seconds, at the two-decimal precision of the summary.
    pub duration: f64,
}

/// Returns the notes sorted by onset. Equal onsets keep their input order.
pub fn assemble(notes: &[Note]) -> Vec<Note> {
    let mut sorted = notes.to_vec();
    sorted.sort_by(|a, b| a.start.total_cmp(&b.start));
    sorted
}

/// Renders a single note as `Name(d.dds)`.
pub fn format_note(note: &Note) -> String {
    format!("{}({:.2}s)", note.name(), note.duration())
}

/// Renders the onset-ordered summary of a note sequence.
pub fn summarize(notes: &[Note]) -> String {
    assemble(notes)
        .iter()
        .map(format_note)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses a summary produced by [`summarize`].
///
/// # Errors
/// Fails on the first token that is not of the form `Name(d.dds)` or whose
/// name is not a piano key.
pub fn parse_summary(summary: &str) -> Result<Vec<SummaryEntry>> {
    summary
        .split_whitespace()
        .map(|token| {
            parse_token(token).with_context(|| format!("invalid summary token `{}`", token))
        })
        .collect()
}

fn parse_token(token: &str) -> Result<SummaryEntry> {
    let (name, rest) = token
        .split_once('(')
        .ok_or_else(|| anyhow!("missing '('"))?;
    let seconds = rest
        .strip_suffix("s)")
        .ok_or_else(|| anyhow!("missing 's)' suffix"))?;
    let duration: f64 = seconds.parse().context("duration is not a number")?;
    let pitch = tuning::midi_from_name(name).ok_or_else(|| anyhow!("unknown note name"))?;

    Ok(SummaryEntry {
        name: name.to_string(),
        pitch,
        duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(pitch: u8, start: f64, end: f64) -> Note {
        Note {
            pitch,
            start,
            end,
            velocity: 100,
        }
    }

    #[test]
    fn empty_sequence_renders_empty_string() {
        assert_eq!(summarize(&[]), "");
        assert!(parse_summary("").unwrap().is_empty());
    }

    #[test]
    fn summary_is_sorted_by_onset() {
        let notes = [note(64, 1.0, 1.25), note(60, 0.0, 0.5), note(67, 2.0, 3.0)];
        assert_eq!(summarize(&notes), "C4(0.50s) E4(0.25s) G4(1.00s)");
    }

    #[test]
    fn sort_is_stable_for_equal_onsets() {
        let notes = [note(64, 1.0, 1.5), note(60, 1.0, 1.2)];
        let sorted = assemble(&notes);
        assert_eq!(sorted[0].pitch, 64);
        assert_eq!(sorted[1].pitch, 60);
    }

    #[test]
    fn sharps_and_extremes_render() {
        let notes = [note(21, 0.0, 0.126), note(61, 1.0, 1.3), note(108, 2.0, 2.2)];
        assert_eq!(summarize(&notes), "A0(0.13s) C#4(0.30s) C8(0.20s)");
    }

    #[test]
    fn parse_recovers_entries() {
        let entries = parse_summary("A4(0.50s) C#5(1.25s)").unwrap();
        assert_eq!(
            entries,
            vec![
                SummaryEntry { name: "A4".into(), pitch: 69, duration: 0.5 },
                SummaryEntry { name: "C#5".into(), pitch: 73, duration: 1.25 },
            ]
        );
    }

    #[test]
    fn parse_rejects_malformed_tokens() {
        assert!(parse_summary("A4").is_err());
        assert!(parse_summary("A4(0.50)").is_err());
        assert!(parse_summary("A4(abcs)").is_err());
        assert!(parse_summary("H4(0.50s)").is_err());
    }
}
