//! Loading frame sequences and audio for the transcriber.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use transcriber_core::{
    frames::{frames_from_samples, FrameSourceConfig},
    Frame,
};

/// Reads a JSON array of frames.
pub fn load_frames(path: &Path) -> Result<Vec<Frame>> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let frames: Vec<Frame> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("{} is not a valid frame sequence", path.display()))?;

    if frames.windows(2).any(|w| w[1].time < w[0].time) {
        log::warn!("{}: frame times are not sorted; results are undefined", path.display());
    }
    log::info!("loaded {} frames from {}", frames.len(), path.display());
    Ok(frames)
}

/// Decodes a WAV file and runs it through the spectral frame source.
pub fn frames_from_wav(path: &Path, config: &FrameSourceConfig) -> Result<Vec<Frame>> {
    let (samples, sample_rate) = load_wav(path)?;
    log::info!(
        "decoded {} samples at {} Hz from {}",
        samples.len(),
        sample_rate,
        path.display()
    );
    frames_from_samples(&samples, sample_rate, config)
}

/// Returns mono samples in [-1, 1] and the sample rate.
fn load_wav(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let (header, data) =
        wav::read(&mut file).with_context(|| format!("cannot read WAV file {}", path.display()))?;

    let interleaved: Vec<f32> = match data {
        wav::BitDepth::Eight(v) => v.iter().map(|&s| (s as f32 - 128.0) / 128.0).collect(),
        wav::BitDepth::Sixteen(v) => v.iter().map(|&s| s as f32 / 32768.0).collect(),
        wav::BitDepth::TwentyFour(v) => v.iter().map(|&s| s as f32 / 8_388_608.0).collect(),
        wav::BitDepth::ThirtyTwoFloat(v) => v,
        wav::BitDepth::Empty => bail!("{} contains no audio data", path.display()),
    };

    let channels = header.channel_count.max(1) as usize;
    if channels > 1 {
        log::debug!("mixing {} channels down to mono", channels);
    }
    Ok((mix_down(&interleaved, channels), header.sampling_rate))
}

fn mix_down(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_is_averaged() {
        assert_eq!(mix_down(&[1.0, 0.0, 0.5, 0.5], 2), vec![0.5, 0.5]);
    }

    #[test]
    fn mono_is_unchanged() {
        assert_eq!(mix_down(&[0.1, 0.2], 1), vec![0.1, 0.2]);
    }

    #[test]
    fn frames_json_loads() {
        let path = std::env::temp_dir()
            .join(format!("transcriber-frames-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[{"time": 0.0, "candidates": [{"frequency": 440.0, "magnitude": 0.8}]},
                {"time": 0.023, "candidates": [{"frequency": 0.0, "magnitude": 0.0}]}]"#,
        )
        .unwrap();
        let frames = load_frames(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].candidates[0].frequency, 440.0);
    }
}
