use std::path::PathBuf;

use clap::{ArgGroup, Parser};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("input").args(["frames", "wav"])))]
///Transcribe a monophonic recording into note events
pub struct Args {
    #[arg(short, long)]
    ///Frame sequence as a JSON array of {time, candidates}
    pub frames: Option<PathBuf>,

    #[arg(short, long)]
    ///PCM or float WAV file, mixed down to mono
    pub wav: Option<PathBuf>,

    #[arg(short, long)]
    ///JSON config file; missing fields use defaults
    pub config: Option<PathBuf>,

    #[arg(short, long)]
    ///Write the note track as JSON
    pub notes_out: Option<PathBuf>,

    #[arg(short, long)]
    ///Write note-on/note-off events as JSON
    pub events_out: Option<PathBuf>,

    #[arg(long)]
    ///Print the effective config as JSON and exit
    pub dump_config: bool,

    #[arg(short, long)]
    ///Enable debug logging
    pub verbose: bool,
}
