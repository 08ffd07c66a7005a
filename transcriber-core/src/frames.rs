//! # Spectral Frame Source
//!
//! A reference frame source that turns mono audio samples into the
//! candidate frames consumed by the segmentation engine.
//!
//! Each frame is a short-time magnitude spectrum. Every bin between `fmin`
//! and `fmax` that is a local spectral peak above `threshold` times the
//! frame's loudest bin yields a candidate whose frequency and magnitude are
//! refined by parabolic interpolation. All other bins carry `(0, 0)`, so
//! candidate `i` refers to the same FFT bin in every frame.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::fft::SpectrumAnalyzer;
use crate::{Candidate, Frame};

/// Parameters of the spectral frame source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameSourceConfig {
    /// FFT size in samples.
    pub n_fft: usize,
    /// Samples between successive frames.
    pub hop_length: usize,
    /// Peaks below `threshold * max(frame)` are ignored.
    pub threshold: f32,
    /// Lowest frequency considered, in Hz.
    pub fmin: f32,
    /// Highest frequency considered (exclusive), in Hz.
    pub fmax: f32,
}

impl Default for FrameSourceConfig {
    fn default() -> Self {
        FrameSourceConfig {
            n_fft: 2048,
            hop_length: 512,
            threshold: 0.1,
            fmin: 150.0,
            fmax: 4000.0,
        }
    }
}

impl FrameSourceConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.n_fft >= 4, "n_fft must be at least 4, got {}", self.n_fft);
        ensure!(self.hop_length > 0, "hop_length must be positive");
        ensure!(
            self.fmin < self.fmax,
            "fmin ({}) must be below fmax ({})",
            self.fmin,
            self.fmax
        );
        Ok(())
    }
}

/// Computes candidate frames for a mono signal.
///
/// Frames are centred: frame `t` covers samples around `t * hop_length`,
/// with zero padding at both ends. Timestamps divide the signal duration
/// evenly across the frames.
///
/// # Errors
/// Returns an error for a zero sample rate or an invalid config.
pub fn frames_from_samples(
    samples: &[f32],
    sample_rate: u32,
    config: &FrameSourceConfig,
) -> Result<Vec<Frame>> {
    ensure!(sample_rate > 0, "sample rate must be positive");
    config.validate()?;

    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let n_fft = config.n_fft;
    let half = n_fft / 2;
    let mut padded = vec![0.0; samples.len() + n_fft];
    padded[half..half + samples.len()].copy_from_slice(samples);

    let frame_count = 1 + samples.len() / config.hop_length;
    let duration = samples.len() as f64 / sample_rate as f64;
    let bin_hz = sample_rate as f32 / n_fft as f32;
    let nyquist = sample_rate as f32 / 2.0;
    let fmax = config.fmax.min(nyquist);

    let mut analyzer = SpectrumAnalyzer::new(n_fft);
    let mut frames = Vec::with_capacity(frame_count);

    for t in 0..frame_count {
        let offset = t * config.hop_length;
        let spectrum = analyzer.magnitudes(&padded[offset..offset + n_fft]);
        let candidates = pick_peaks(&spectrum, bin_hz, config.fmin, fmax, config.threshold);
        let time = t as f64 * duration / frame_count as f64;
        frames.push(Frame::new(time, candidates));
    }

    log::debug!(
        "computed {} frames ({} bins each) from {:.2}s of audio",
        frames.len(),
        half + 1,
        duration
    );
    Ok(frames)
}

/// Interpolated spectral peaks, one slot per bin.
fn pick_peaks(
    spectrum: &[f32],
    bin_hz: f32,
    fmin: f32,
    fmax: f32,
    threshold: f32,
) -> Vec<Candidate> {
    let mut candidates = vec![Candidate::new(0.0, 0.0); spectrum.len()];
    let peak = spectrum.iter().cloned().fold(0.0_f32, f32::max);
    let floor = threshold * peak;

    if peak <= 0.0 || spectrum.len() < 3 {
        return candidates;
    }

    let gated = |i: usize| if spectrum[i] > floor { spectrum[i] } else { 0.0 };

    for i in 1..spectrum.len() - 1 {
        let freq = i as f32 * bin_hz;
        if freq < fmin || freq >= fmax {
            continue;
        }
        let here = gated(i);
        if here <= 0.0 || here <= gated(i - 1) || here < gated(i + 1) {
            continue;
        }

        let (left, right) = (spectrum[i - 1], spectrum[i + 1]);
        let avg = 0.5 * (right - left);
        let curvature = 2.0 * here - right - left;
        let shift = if curvature.abs() > f32::EPSILON { avg / curvature } else { 0.0 };

        candidates[i] = Candidate::new((i as f32 + shift) * bin_hz, here + 0.5 * avg * shift);
    }
    candidates
}
