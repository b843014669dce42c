//! Spectrum-to-band analysis.
//!
//! 512 magnitude bins → 8 exponentially widening bands, each with a
//! fast-attack / accelerating-release buffer and a running peak used to
//! normalize it into roughly [0, 1].

use serde::Serialize;
use tracing::trace;

use crate::params::audio_constants::{BAND_COUNT, SPECTRUM_BINS};
use crate::params::{BandSignal, SpectrumConfig};

/// Per-band analyzer state, indexed by band
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrequencyBands {
    /// Weighted band average (scaled by the band gain)
    pub freq_band: [f32; BAND_COUNT],
    /// Decay-buffered band value
    pub band_buffer: [f32; BAND_COUNT],
    /// Current release rate of each buffer
    pub buffer_decrease: [f32; BAND_COUNT],
    /// Highest band value seen so far
    pub freq_band_highest: [f32; BAND_COUNT],
    /// `freq_band / freq_band_highest`
    pub audio_band: [f32; BAND_COUNT],
    /// `band_buffer / freq_band_highest`
    pub audio_band_buffer: [f32; BAND_COUNT],
}

impl FrequencyBands {
    /// Read one band through the selected signal
    pub fn value(&self, band: usize, signal: BandSignal) -> f32 {
        match signal {
            BandSignal::Raw => self.freq_band[band],
            BandSignal::Buffered => self.band_buffer[band],
            BandSignal::Normalized => self.audio_band[band],
            BandSignal::NormalizedBuffered => self.audio_band_buffer[band],
        }
    }
}

/// Global amplitude derived from the normalized bands
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Amplitude {
    /// Sum of normalized bands divided by the decaying peak
    pub amplitude: f32,
    /// Sum of normalized buffered bands divided by the same peak
    pub amplitude_buffer: f32,
    /// Decaying peak of the normalized band sum
    pub peak: f32,
}

/// Number of bins in each band: 2, 4, 8, ..., 256 (+2 on the last band)
pub fn band_bin_counts() -> [usize; BAND_COUNT] {
    let mut counts = [0; BAND_COUNT];
    for (i, count) in counts.iter_mut().enumerate() {
        *count = 2usize.pow(i as u32) * 2;
    }
    counts[BAND_COUNT - 1] += 2;
    counts
}

/// Band analyzer; one instance per independent consumer
#[derive(Debug, Clone)]
pub struct SpectrumAnalyzer {
    config: SpectrumConfig,
    bands: FrequencyBands,
    amplitude: Amplitude,
}

impl SpectrumAnalyzer {
    pub fn new(config: SpectrumConfig) -> Self {
        Self {
            config,
            bands: FrequencyBands::default(),
            amplitude: Amplitude::default(),
        }
    }

    /// Run one analysis tick over a magnitude spectrum
    ///
    /// Non-finite bins are read as silence.
    pub fn analyze(&mut self, spectrum: &[f32; SPECTRUM_BINS]) {
        self.make_frequency_bands(spectrum);
        self.update_band_buffers();
        self.normalize_bands();
        self.update_amplitude();

        trace!(
            amplitude = self.amplitude.amplitude,
            amplitude_buffer = self.amplitude.amplitude_buffer,
            peak = self.amplitude.peak,
            "spectrum analyzed"
        );
    }

    /// Group bins into bands with a bin-index weighted average
    ///
    /// Higher bins get more weight to compensate for the lower energy
    /// density at high frequencies. The divisor is the number of bins
    /// consumed so far, not the group width.
    fn make_frequency_bands(&mut self, spectrum: &[f32; SPECTRUM_BINS]) {
        let mut count = 0usize;
        for (band, bins) in band_bin_counts().into_iter().enumerate() {
            let mut average = 0.0f32;
            for _ in 0..bins {
                let sample = spectrum[count];
                if sample.is_finite() {
                    average += sample * (count + 1) as f32;
                }
                count += 1;
            }
            average /= count as f32;
            self.bands.freq_band[band] = average * self.config.band_gain;
        }
    }

    /// Snap up on a new high, otherwise fall at an accelerating rate
    fn update_band_buffers(&mut self) {
        let bands = &mut self.bands;
        for band in 0..BAND_COUNT {
            if bands.freq_band[band] > bands.band_buffer[band] {
                bands.band_buffer[band] = bands.freq_band[band];
                bands.buffer_decrease[band] = self.config.buffer_initial_decrease;
            }

            if bands.freq_band[band] < bands.band_buffer[band] {
                bands.band_buffer[band] -= bands.buffer_decrease[band];
                bands.buffer_decrease[band] *= self.config.buffer_decrease_growth;
            }
        }
    }

    /// Divide by the running peak; a zero peak (silence so far) yields 0
    fn normalize_bands(&mut self) {
        let bands = &mut self.bands;
        for band in 0..BAND_COUNT {
            if bands.freq_band[band] > bands.freq_band_highest[band] {
                bands.freq_band_highest[band] = bands.freq_band[band];
            }

            let highest = bands.freq_band_highest[band];
            if highest > 0.0 {
                bands.audio_band[band] = bands.freq_band[band] / highest;
                bands.audio_band_buffer[band] = bands.band_buffer[band] / highest;
            } else {
                bands.audio_band[band] = 0.0;
                bands.audio_band_buffer[band] = 0.0;
            }
        }
    }

    fn update_amplitude(&mut self) {
        let current: f32 = self.bands.audio_band.iter().sum();
        let current_buffer: f32 = self.bands.audio_band_buffer.iter().sum();

        let amplitude = &mut self.amplitude;
        if current > amplitude.peak {
            amplitude.peak = current;
        } else {
            amplitude.peak *= self.config.amplitude_peak_decay;
        }

        if amplitude.peak == 0.0 {
            amplitude.amplitude = 0.0;
            amplitude.amplitude_buffer = 0.0;
        } else {
            amplitude.amplitude = current / amplitude.peak;
            amplitude.amplitude_buffer = current_buffer / amplitude.peak;
        }
    }

    pub fn bands(&self) -> &FrequencyBands {
        &self.bands
    }

    pub fn amplitude(&self) -> Amplitude {
        self.amplitude
    }

    /// Convenience accessor for one band through the selected signal
    pub fn band_value(&self, band: usize, signal: BandSignal) -> f32 {
        self.bands.value(band, signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> SpectrumAnalyzer {
        SpectrumAnalyzer::new(SpectrumConfig::default())
    }

    /// Deterministic pseudo-random spectrum (LCG) for property checks
    fn noisy_spectrum(seed: &mut u32) -> [f32; SPECTRUM_BINS] {
        let mut spectrum = [0.0; SPECTRUM_BINS];
        for bin in spectrum.iter_mut() {
            *seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            *bin = (*seed >> 8) as f32 / (1u32 << 24) as f32 * 0.01;
        }
        spectrum
    }

    #[test]
    fn test_band_bin_counts_cover_spectrum() {
        let counts = band_bin_counts();
        assert_eq!(counts, [2, 4, 8, 16, 32, 64, 128, 258]);
        assert_eq!(counts.iter().sum::<usize>(), SPECTRUM_BINS);
    }

    #[test]
    fn test_silence_yields_zero() {
        let mut analyzer = analyzer();
        for _ in 0..10 {
            analyzer.analyze(&[0.0; SPECTRUM_BINS]);
        }

        let bands = analyzer.bands();
        assert!(bands.audio_band.iter().all(|&v| v == 0.0));
        assert!(bands.audio_band_buffer.iter().all(|&v| v == 0.0));
        assert_eq!(analyzer.amplitude().amplitude, 0.0);
        assert_eq!(analyzer.amplitude().amplitude_buffer, 0.0);
    }

    #[test]
    fn test_weighted_band_average() {
        let mut analyzer = analyzer();
        analyzer.analyze(&[1.0; SPECTRUM_BINS]);

        let bands = analyzer.bands();
        // Band 0: bins 0,1 → (1 + 2) / 2 * 10
        assert!((bands.freq_band[0] - 15.0).abs() < 1e-4);
        // Band 1: bins 2..6 → (3 + 4 + 5 + 6) / 6 * 10
        assert!((bands.freq_band[1] - 30.0).abs() < 1e-4);
        // Band 7: bins 254..512 → sum(255..=512) / 512 * 10
        let expected = (255..=512).sum::<usize>() as f32 / 512.0 * 10.0;
        assert!((bands.freq_band[7] - expected).abs() / expected < 1e-5);
    }

    #[test]
    fn test_impulse_only_reaches_its_band() {
        let mut analyzer = analyzer();
        let mut spectrum = [0.0; SPECTRUM_BINS];
        spectrum[20] = 1.0; // band 3 covers bins 14..30
        analyzer.analyze(&spectrum);

        for (band, &value) in analyzer.bands().freq_band.iter().enumerate() {
            if band == 3 {
                assert!(value > 0.0);
            } else {
                assert_eq!(value, 0.0);
            }
        }
        assert_eq!(analyzer.bands().audio_band[3], 1.0);
    }

    #[test]
    fn test_constant_spectrum_buffer_converges() {
        let mut analyzer = analyzer();
        for _ in 0..5 {
            analyzer.analyze(&[0.02; SPECTRUM_BINS]);
        }

        let bands = analyzer.bands();
        assert_eq!(bands.band_buffer, bands.freq_band);
        assert!(bands.audio_band.iter().all(|&v| v == 1.0));
        assert!(analyzer.amplitude().amplitude > 0.0);
    }

    #[test]
    fn test_buffer_release_accelerates() {
        let mut analyzer = analyzer();
        analyzer.analyze(&[0.01; SPECTRUM_BINS]);
        let start = analyzer.bands().band_buffer[0];

        analyzer.analyze(&[0.0; SPECTRUM_BINS]);
        let after_one = analyzer.bands().band_buffer[0];
        analyzer.analyze(&[0.0; SPECTRUM_BINS]);
        let after_two = analyzer.bands().band_buffer[0];

        assert!((start - after_one - 0.005).abs() < 1e-6);
        assert!((after_one - after_two - 0.006).abs() < 1e-6);
        assert!((analyzer.bands().buffer_decrease[0] - 0.0072).abs() < 1e-6);
    }

    #[test]
    fn test_peaks_monotonic_except_decay() {
        let mut analyzer = analyzer();
        let mut seed = 7u32;

        for tick in 0..200 {
            let previous_bands = analyzer.bands().freq_band_highest;
            let previous_peak = analyzer.amplitude().peak;

            // Every third tick is silent to exercise the decay branch
            let spectrum = if tick % 3 == 2 {
                [0.0; SPECTRUM_BINS]
            } else {
                noisy_spectrum(&mut seed)
            };
            analyzer.analyze(&spectrum);

            for band in 0..BAND_COUNT {
                assert!(analyzer.bands().freq_band_highest[band] >= previous_bands[band]);
                assert!(analyzer.bands().audio_band[band] <= 1.0);
            }

            let peak = analyzer.amplitude().peak;
            let sum: f32 = analyzer.bands().audio_band.iter().sum();
            if sum > previous_peak {
                assert_eq!(peak, sum);
            } else {
                assert_eq!(peak, previous_peak * 0.98);
            }
        }
    }

    #[test]
    fn test_non_finite_bins_read_as_silence() {
        let mut analyzer = analyzer();
        let mut spectrum = [0.0; SPECTRUM_BINS];
        spectrum[0] = f32::NAN;
        spectrum[100] = f32::INFINITY;
        analyzer.analyze(&spectrum);

        assert!(analyzer.bands().freq_band.iter().all(|v| v.is_finite()));
        assert_eq!(analyzer.amplitude().amplitude, 0.0);
    }

    #[test]
    fn test_band_value_selects_signal() {
        let mut analyzer = analyzer();
        analyzer.analyze(&[0.01; SPECTRUM_BINS]);
        analyzer.analyze(&[0.0; SPECTRUM_BINS]);

        let bands = analyzer.bands();
        assert_eq!(analyzer.band_value(2, BandSignal::Raw), bands.freq_band[2]);
        assert_eq!(
            analyzer.band_value(2, BandSignal::Buffered),
            bands.band_buffer[2]
        );
        assert_eq!(analyzer.band_value(2, BandSignal::Normalized), 0.0);
        assert!(analyzer.band_value(2, BandSignal::NormalizedBuffered) > 0.0);
    }
}
