mod noise;
mod signal;

pub use noise::{AdditiveNoiseConfig, NoiseConfig, apply_noise, signal_power};
pub use signal::{generate_chirp, generate_sine, generate_tones};
