pub mod audio;
pub mod bridge;
pub mod config;
pub mod constants;
pub mod error;
pub mod output;
pub mod signal_processing;
pub mod wav;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use bridge::{Loopback, NarrowbandProcessor, RateBridge, Silence};
pub use config::BridgeConfig;
pub use error::{ResampleError, Result};
pub use signal_processing::Resampler;
pub use wav::save_wav;
