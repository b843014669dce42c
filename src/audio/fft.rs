//! Magnitude spectrum extraction from time-domain samples.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use tracing::debug;

use crate::error::Result;
use crate::params::audio_constants::SPECTRUM_BINS;
use crate::params::FFTConfig;

/// Turns a window of mono samples into the analyzer's magnitude bins
pub struct SpectrumExtractor {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl SpectrumExtractor {
    pub fn new(config: &FFTConfig) -> Result<Self> {
        config.validate()?;

        let fft_size = config.fft_size;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];
        let window = (0..fft_size).map(|i| blackman_window(i, fft_size)).collect();

        debug!(
            fft_size,
            bin_width_hz = config.bin_width_hz(),
            "spectrum extractor ready"
        );

        Ok(Self {
            fft,
            fft_size,
            window,
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            scratch,
        })
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Window, transform and write the first `SPECTRUM_BINS` magnitudes
    ///
    /// `samples` shorter than the FFT size are zero-padded at the end;
    /// extra samples are ignored. Magnitudes are scaled by `2 / fft_size`.
    pub fn process(&mut self, samples: &[f32], spectrum: &mut [f32; SPECTRUM_BINS]) {
        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = samples.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        let scale = 2.0 / self.fft_size as f32;
        for (bin, value) in spectrum.iter_mut().enumerate() {
            *value = self.buffer[bin].norm() * scale;
        }
    }
}

/// Blackman window function for FFT analysis
pub fn blackman_window(index: usize, size: usize) -> f32 {
    let phase = (2.0 * PI * index as f32) / (size as f32 - 1.0);
    0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos()
}
