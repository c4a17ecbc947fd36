//! Numeric constants for the resampler and its filter design
//!
//! The defaults describe the canonical 48 kHz <-> 8 kHz bridge between a
//! sound card and a narrowband modem chain.

/// Default integer ratio between the high and low sample rates.
pub const DEFAULT_RATIO: usize = 6;

/// Default number of filter taps per polyphase branch.
pub const DEFAULT_TAPS_PER_PHASE: usize = 8;

/// Default wideband (sound card) sample rate in Hz.
pub const DEFAULT_HIGH_RATE: u32 = 48_000;

/// Lowpass cutoff as a fraction of the low rate. In cycles per high-rate
/// sample this becomes `CUTOFF_FACTOR / ratio`.
pub const CUTOFF_FACTOR: f64 = 0.45;

/// Distance from the kernel centre below which the sinc is replaced by its limit.
pub const SINC_EPSILON: f64 = 1e-6;

/// Hamming window coefficients.
pub const HAMMING_ALPHA: f64 = 0.54;
pub const HAMMING_BETA: f64 = 0.46;

/// Floor used when converting levels to dBFS so silence stays finite.
pub const MIN_LEVEL: f32 = 1e-10;
