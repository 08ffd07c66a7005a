//! # Fast Fourier Transform (FFT) Module
//!
//! Windowed magnitude spectra for the spectral frame source.
//!
//! ## Features
//! - FFT using RustFFT, planned once per frame size
//! - Hann windowing for reduced spectral leakage
//! - DC offset removal
//! - Amplitude-normalized magnitudes

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Removes the DC offset from a signal by making its average value zero.
fn remove_dc_offset(signal: &mut [f32]) {
    let len = signal.len();
    if len == 0 { return; }
    let avg = signal.iter().sum::<f32>() / len as f32;
    if avg.abs() > 1e-6 {
        for sample in signal.iter_mut() {
            *sample -= avg;
        }
    }
}

/// Builds a periodic Hann window of length `n`.
fn hann_window(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / n as f32).cos()))
        .collect()
}

/// Computes magnitude spectra of fixed-size frames.
///
/// Magnitudes are scaled by `2 / sum(window)`, so a sinusoid of amplitude
/// `A` that sits on a bin centre shows up with magnitude close to `A`.
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    scale: f32,
    buffer: Vec<Complex<f32>>,
}

impl SpectrumAnalyzer {
    pub fn new(frame_size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(frame_size);
        let window = hann_window(frame_size);
        let window_sum: f32 = window.iter().sum();
        let scale = if window_sum > 0.0 { 2.0 / window_sum } else { 0.0 };

        SpectrumAnalyzer {
            fft,
            window,
            scale,
            buffer: vec![Complex { re: 0.0, im: 0.0 }; frame_size],
        }
    }

    pub fn frame_size(&self) -> usize {
        self.window.len()
    }

    /// Returns `frame_size / 2 + 1` magnitudes, DC through Nyquist.
    ///
    /// `frame` shorter than the frame size is zero-padded, longer is truncated.
    pub fn magnitudes(&mut self, frame: &[f32]) -> Vec<f32> {
        let n = self.frame_size();
        let mut processed = vec![0.0; n];
        let len = frame.len().min(n);
        processed[..len].copy_from_slice(&frame[..len]);
        remove_dc_offset(&mut processed);

        for ((slot, sample), w) in self.buffer.iter_mut().zip(processed).zip(&self.window) {
            *slot = Complex { re: sample * w, im: 0.0 };
        }

        self.fft.process(&mut self.buffer);

        self.buffer
            .iter()
            .take(n / 2 + 1)
            .map(|c| c.norm() * self.scale) // .norm() is sqrt(re^2 + im^2)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(hz: f32, amplitude: f32, sample_rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| amplitude * (2.0 * std::f32::consts::PI * hz * i as f32 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn dc_offset_is_removed() {
        let mut signal = vec![1.0, 2.0, 3.0];
        remove_dc_offset(&mut signal);
        assert!(signal.iter().sum::<f32>().abs() < 1e-6);
    }

    #[test]
    fn silence_has_no_energy() {
        let mut analyzer = SpectrumAnalyzer::new(256);
        let mags = analyzer.magnitudes(&vec![0.0; 256]);
        assert_eq!(mags.len(), 129);
        assert!(mags.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn bin_centred_sine_has_unit_scale() {
        // 1024 samples at 1024 Hz: bin k is exactly k Hz.
        let mut analyzer = SpectrumAnalyzer::new(1024);
        let mags = analyzer.magnitudes(&sine(100.0, 0.5, 1024.0, 1024));
        let (peak, &mag) = mags
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .unwrap();
        assert_eq!(peak, 100);
        assert!((mag - 0.5).abs() < 0.01, "magnitude was {}", mag);
    }
}
