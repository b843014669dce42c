//! Error types for geometry generation and audio analysis.

use thiserror::Error;

/// Errors raised while configuring or driving the generator
#[derive(Error, Debug)]
pub enum KochError {
    /// Side count outside the supported 3..=8 range
    #[error("invalid initiator: {0} sides (expected 3..=8)")]
    InvalidInitiator(usize),

    /// Generator profile keyframes break an ordering or anchor rule
    #[error("invalid generator profile: {0}")]
    InvalidProfile(String),

    /// Parameter value out of its documented range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Blend inputs must be the same length
    #[error("length mismatch: source has {source_len} points, target has {target_len}")]
    LengthMismatch { source_len: usize, target_len: usize },

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// WAV decoding error
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// Configuration file parse error
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Frame export error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, KochError>;
