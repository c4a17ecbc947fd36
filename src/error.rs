use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResampleError {
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Audio stream error: {0}")]
    AudioStream(String),

    #[error("Filter design failed: {0}")]
    FilterDesign(String),

    #[error("Output buffer too small: need {needed} samples, have {available}")]
    OutputTooSmall { needed: usize, available: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),
}

pub type Result<T> = std::result::Result<T, ResampleError>;
