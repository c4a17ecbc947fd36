use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crossbeam_channel::Receiver;
use hound::WavReader;

use super::AudioCapture;
use crate::config::AudioConfig;

/// Source of mono wideband sample blocks
pub trait AudioSource: Send {
    fn next_buffer(&mut self) -> anyhow::Result<Option<Vec<f32>>>;
    fn sample_rate(&self) -> u32;
}

pub struct DeviceSource {
    rx: Receiver<Vec<f32>>,
    config: AudioConfig,
    _capture: AudioCapture,
}

impl DeviceSource {
    pub fn new(config: &AudioConfig) -> anyhow::Result<Self> {
        let (tx, rx) = crossbeam_channel::bounded(10);
        let capture = AudioCapture::new(config, tx, config.device.as_deref())?;
        Ok(Self {
            rx,
            config: config.clone(),
            _capture: capture,
        })
    }
}

impl AudioSource for DeviceSource {
    fn next_buffer(&mut self) -> anyhow::Result<Option<Vec<f32>>> {
        match self.rx.recv() {
            Ok(data) => {
                let mut mono = Vec::with_capacity(data.len() / self.config.channels.max(1) as usize);
                self.config.extract_channel(&data, &mut mono);
                Ok(Some(mono))
            }
            Err(_) => Ok(None),
        }
    }

    fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }
}

/// Mono samples read from one channel of a WAV file, served in fixed chunks
pub struct WavFileSource {
    samples: Vec<f32>,
    position: usize,
    chunk_size: usize,
    sample_rate: u32,
}

impl WavFileSource {
    /// Open `path` and keep `channel` (0-based)
    pub fn new<P: AsRef<Path>>(path: P, channel: usize, chunk_size: usize) -> anyhow::Result<Self> {
        if chunk_size == 0 {
            anyhow::bail!("Chunk size must be positive");
        }

        let reader = WavReader::open(path.as_ref())?;
        let spec = reader.spec();

        if channel >= spec.channels as usize {
            anyhow::bail!(
                "Channel {} requested but WAV file has {} channels",
                channel,
                spec.channels
            );
        }

        let sample_rate = spec.sample_rate;
        let interleaved = Self::read_samples(reader, &spec)?;
        let samples = interleaved
            .chunks_exact(spec.channels as usize)
            .map(|frame| frame[channel])
            .collect();

        Ok(Self {
            samples,
            position: 0,
            chunk_size,
            sample_rate,
        })
    }

    fn read_samples(
        mut reader: WavReader<BufReader<File>>,
        spec: &hound::WavSpec,
    ) -> anyhow::Result<Vec<f32>> {
        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => {
                if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                    anyhow::bail!(
                        "Unsupported integer sample width: {} bits",
                        spec.bits_per_sample
                    );
                }
                let max_val = (1_i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max_val))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(samples)
    }

    /// Total mono samples in the file
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl AudioSource for WavFileSource {
    fn next_buffer(&mut self) -> anyhow::Result<Option<Vec<f32>>> {
        if self.position >= self.samples.len() {
            return Ok(None);
        }

        let end = (self.position + self.chunk_size).min(self.samples.len());
        let chunk = self.samples[self.position..end].to_vec();
        self.position = end;

        Ok(Some(chunk))
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
