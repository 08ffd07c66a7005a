//! # Transcriber - command line front end
//!
//! Loads a frame sequence (or a WAV file through the spectral frame source),
//! runs the note segmenter and prints the note summary and analysis.
//! Optionally exports the note track and its note-on/note-off events as JSON.

mod cli;
mod input;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use transcriber_core::{config::TranscriptionConfig, events::NoteTrack, transcribe};

fn main() -> Result<()> {
    let args = cli::Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let config = match &args.config {
        Some(path) => TranscriptionConfig::load(path)?,
        None => TranscriptionConfig::default(),
    };

    if args.dump_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let frames = match (&args.frames, &args.wav) {
        (Some(path), _) => input::load_frames(path)?,
        (None, Some(path)) => input::frames_from_wav(path, &config.frames)?,
        (None, None) => bail!("no input given; pass --frames or --wav"),
    };

    let transcription = transcribe(&frames, &config.segmentation);
    log::info!("transcribed {} notes", transcription.notes.len());

    println!("{}", transcription.summary);
    println!("{}", transcription.analysis);

    let track = NoteTrack::new(transcription.notes);
    if let Some(path) = &args.notes_out {
        write_json(path, &track)?;
        log::info!("wrote note track to {}", path.display());
    }
    if let Some(path) = &args.events_out {
        write_json(path, &track.events())?;
        log::info!("wrote note events to {}", path.display());
    }

    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("cannot write {}", path.display()))?;
    Ok(())
}
