//! Audio analysis: sample source, FFT front-end and band analyzer.
//!
//! The analyzer consumes a fixed 512-bin magnitude spectrum per tick and
//! produces eight normalized control signals plus a global amplitude.

mod fft;
mod source;
mod spectrum;

// Re-export public types
pub use fft::{blackman_window, SpectrumExtractor};
pub use source::WavSource;
pub use spectrum::{band_bin_counts, Amplitude, FrequencyBands, SpectrumAnalyzer};
