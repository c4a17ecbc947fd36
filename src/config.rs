//! Configuration for the rate bridge.
//!
//! Defaults describe the canonical 48 kHz sound card feeding an 8 kHz
//! narrowband chain. A TOML file can override any subset of fields:
//!
//! ```toml
//! [audio]
//! sample_rate = 48000
//! buffer_size = 960
//!
//! [resampler]
//! ratio = 6
//! taps_per_phase = 8
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::constants::{DEFAULT_HIGH_RATE, DEFAULT_RATIO, DEFAULT_TAPS_PER_PHASE};
use crate::error::{ResampleError, Result};

/// Integer resampling ratio
///
/// Can be given directly or as a pair of sample rates whose quotient is an
/// integer.
///
/// # Parsing formats
/// - `6` - ratio
/// - `48000:8000` or `48000/8000` - high and low rates in Hz
/// - `48k:8k` - rates with a `k` (kHz) suffix
///
/// # Example
/// ```
/// use ratebridge::config::RateRatio;
///
/// let ratio: RateRatio = "48k:8k".parse().unwrap();
/// assert_eq!(ratio.get(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateRatio(usize);

impl RateRatio {
    /// Create from an integer ratio
    ///
    /// # Errors
    /// Returns `ResampleError::Config` for a zero ratio
    pub fn new(ratio: usize) -> Result<Self> {
        if ratio == 0 {
            return Err(ResampleError::Config("ratio must be at least 1".into()));
        }
        Ok(Self(ratio))
    }

    /// Create from a pair of sample rates
    ///
    /// # Errors
    /// Returns `ResampleError::Config` unless `high_hz` is a positive integer
    /// multiple of `low_hz`
    pub fn from_rates(high_hz: u32, low_hz: u32) -> Result<Self> {
        if low_hz == 0 || high_hz < low_hz || high_hz % low_hz != 0 {
            return Err(ResampleError::Config(format!(
                "{} Hz is not an integer multiple of {} Hz",
                high_hz, low_hz
            )));
        }
        Self::new((high_hz / low_hz) as usize)
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for RateRatio {
    fn default() -> Self {
        Self(DEFAULT_RATIO)
    }
}

impl fmt::Display for RateRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn parse_rate(s: &str) -> std::result::Result<u32, String> {
    let s = s.trim();
    let (num, scale) = match s.strip_suffix('k').or_else(|| s.strip_suffix('K')) {
        Some(num) => (num, 1000.0),
        None => (s, 1.0),
    };
    let value: f64 = num
        .trim()
        .parse()
        .map_err(|_| format!("invalid sample rate: {}", s))?;
    let hz = value * scale;
    if hz <= 0.0 || hz.fract() != 0.0 || hz > u32::MAX as f64 {
        return Err(format!("invalid sample rate: {}", s));
    }
    Ok(hz as u32)
}

impl FromStr for RateRatio {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();

        if let Some((high, low)) = s.split_once(':').or_else(|| s.split_once('/')) {
            let high = parse_rate(high)?;
            let low = parse_rate(low)?;
            return Self::from_rates(high, low).map_err(|e| e.to_string());
        }

        let ratio: usize = s.parse().map_err(|_| format!("invalid ratio: {}", s))?;
        Self::new(ratio).map_err(|e| e.to_string())
    }
}

/// Resampler dimensions
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResamplerConfig {
    /// High rate divided by low rate
    pub ratio: usize,
    /// Filter taps per polyphase branch
    pub taps_per_phase: usize,
}

impl ResamplerConfig {
    /// Check that both dimensions are usable
    pub fn validate(&self) -> Result<()> {
        crate::signal_processing::filter_design::validate_design(
            self.ratio,
            self.taps_per_phase,
        )
        .map(|_| ())
    }
}

impl Default for ResamplerConfig {
    fn default() -> Self {
        Self {
            ratio: DEFAULT_RATIO,
            taps_per_phase: DEFAULT_TAPS_PER_PHASE,
        }
    }
}

/// Audio device configuration
///
/// Describes the wideband side. The narrowband rate follows from the ratio.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Device sample rate in Hz (typically 48000)
    pub sample_rate: u32,
    /// Frames per device callback
    pub buffer_size: usize,
    /// Number of interleaved channels delivered by the device
    pub channels: u16,
    /// Channel carrying the radio audio (0-based)
    pub input_channel: usize,
    /// Preferred input device name; default device when absent
    pub device: Option<String>,
}

impl AudioConfig {
    /// Pull one channel out of interleaved device samples into `out`
    pub fn extract_channel(&self, interleaved: &[f32], out: &mut Vec<f32>) {
        out.clear();
        let channels = self.channels.max(1) as usize;
        out.extend(
            interleaved
                .chunks_exact(channels)
                .map(|frame| frame[self.input_channel.min(channels - 1)]),
        );
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_HIGH_RATE,
            // 20 ms at 48 kHz, a whole number of 8 kHz samples
            buffer_size: 960,
            channels: 1,
            input_channel: 0,
            device: None,
        }
    }
}

/// Level report configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Seconds between level reports
    pub interval_secs: f32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { interval_secs: 1.0 }
    }
}

/// System-wide configuration
///
/// # Example
/// ```
/// use ratebridge::config::BridgeConfig;
///
/// let config = BridgeConfig::from_toml_str("[resampler]\nratio = 4\n").unwrap();
/// assert_eq!(config.resampler.ratio, 4);
/// assert_eq!(config.resampler.taps_per_phase, 8);
/// assert_eq!(config.narrowband_rate(), 12000);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub audio: AudioConfig,
    pub resampler: ResamplerConfig,
    pub report: ReportConfig,
}

impl BridgeConfig {
    /// Parse a TOML document without checking cross-field constraints
    ///
    /// For callers that apply further overrides before calling
    /// [`validate`](Self::validate).
    pub fn parse_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ResampleError::Config(e.to_string()))
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config = Self::parse_toml_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file without validating it
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ResampleError::Config(format!("{}: {}", path.display(), e)))?;
        Self::parse_toml_str(&text)
    }

    /// Load and validate a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::load_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Round the device block up to a whole number of narrowband samples
    pub fn align_buffer_size(&mut self) {
        let ratio = self.resampler.ratio.max(1);
        self.audio.buffer_size = self.audio.buffer_size.div_ceil(ratio) * ratio;
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        self.resampler.validate()?;

        let ratio = self.resampler.ratio;
        if self.audio.sample_rate as usize % ratio != 0 {
            return Err(ResampleError::Config(format!(
                "sample rate {} Hz is not divisible by ratio {}",
                self.audio.sample_rate, ratio
            )));
        }
        if self.audio.buffer_size == 0 || self.audio.buffer_size % ratio != 0 {
            return Err(ResampleError::Config(format!(
                "buffer size {} must be a positive multiple of ratio {}",
                self.audio.buffer_size, ratio
            )));
        }
        if self.audio.channels == 0 || self.audio.input_channel >= self.audio.channels as usize {
            return Err(ResampleError::Config(format!(
                "input channel {} not available with {} channels",
                self.audio.input_channel, self.audio.channels
            )));
        }
        if self.report.interval_secs <= 0.0 {
            return Err(ResampleError::Config(
                "report interval must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Narrowband sample rate in Hz
    pub fn narrowband_rate(&self) -> u32 {
        self.audio.sample_rate / self.resampler.ratio.max(1) as u32
    }
}
