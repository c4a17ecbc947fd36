use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use ratebridge::audio::{AudioSource, DeviceSource, WavFileSource, list_input_devices};
use ratebridge::config::{BridgeConfig, RateRatio};
use ratebridge::output::{Formatter, LevelReport, OutputFormat, create_formatter};
use ratebridge::{RateBridge, save_wav};

#[derive(Parser, Debug)]
#[command(name = "ratebridge")]
#[command(about = "Decimate live or recorded wideband audio to the narrowband rate", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Resampling ratio (e.g., "6", "48000:8000", "48k/8k")
    #[arg(short, long)]
    ratio: Option<RateRatio>,

    /// Filter taps per polyphase branch
    #[arg(short, long)]
    taps: Option<usize>,

    /// Input device name (default device when omitted)
    #[arg(short, long)]
    device: Option<String>,

    /// Read from a WAV file instead of a device
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Input channel to use (0-based)
    #[arg(long)]
    channel: Option<usize>,

    /// Stop after this many seconds of audio
    #[arg(long)]
    duration: Option<f32>,

    /// Write the narrowband stream to a WAV file
    #[arg(long)]
    record: Option<PathBuf>,

    /// Level report format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Seconds between level reports
    #[arg(long)]
    interval: Option<f32>,

    /// List input devices and exit
    #[arg(long)]
    list_devices: bool,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if args.list_devices {
        let devices = list_input_devices()?;
        if devices.is_empty() {
            eprintln!("No input devices found.");
        }
        for name in &devices {
            println!("{}", name);
        }
        return Ok(());
    }

    let config = build_config(&args)?;

    let mut source: Box<dyn AudioSource> = match args.input {
        Some(ref path) => Box::new(
            WavFileSource::new(path, config.audio.input_channel, config.audio.buffer_size)
                .with_context(|| format!("opening {}", path.display()))?,
        ),
        None => Box::new(DeviceSource::new(&config.audio)?),
    };

    let wideband_rate = source.sample_rate();
    let ratio = config.resampler.ratio;
    if wideband_rate as usize % ratio != 0 {
        anyhow::bail!(
            "Input rate {} Hz is not divisible by ratio {}",
            wideband_rate,
            ratio
        );
    }
    let narrowband_rate = wideband_rate / ratio as u32;

    eprintln!("=== Rate Bridge ===");
    eprintln!("Wideband rate: {} Hz", wideband_rate);
    eprintln!("Narrowband rate: {} Hz", narrowband_rate);
    eprintln!(
        "Filter: {} taps ({} per phase)",
        ratio * config.resampler.taps_per_phase,
        config.resampler.taps_per_phase
    );
    eprintln!();

    let mut bridge = RateBridge::new(&config.resampler, config.audio.buffer_size)?;
    let formatter = create_formatter(args.format, args.verbose > 0);
    if let Some(header) = formatter.header() {
        println!("{}", header);
    }

    let report_every = (config.report.interval_secs * wideband_rate as f32) as usize;
    let max_samples = args
        .duration
        .map(|secs| (secs * wideband_rate as f32) as usize);

    let mut meter = LevelMeter::default();
    let mut recording = args.record.as_ref().map(|_| Vec::new());
    let mut pending: Vec<f32> = Vec::with_capacity(config.audio.buffer_size * 2);
    let mut consumed = 0usize;

    while let Some(mut block) = source.next_buffer()? {
        if let Some(limit) = max_samples {
            block.truncate(limit.saturating_sub(consumed));
        }
        consumed += block.len();
        pending.extend_from_slice(&block);

        let usable = pending.len() - pending.len() % ratio;
        for chunk in pending[..usable].chunks(bridge.max_block()) {
            let narrow = bridge.process_rx(chunk)?;
            meter.add(chunk, narrow);
            if let Some(ref mut rec) = recording {
                rec.extend_from_slice(narrow);
            }
        }
        pending.drain(..usable);

        if meter.wideband_samples >= report_every.max(1) {
            emit(formatter.as_ref(), &meter.take());
        }

        if max_samples.is_some_and(|limit| consumed >= limit) {
            break;
        }
    }

    if meter.blocks > 0 {
        emit(formatter.as_ref(), &meter.take());
    }

    if let (Some(path), Some(rec)) = (args.record.as_ref(), recording) {
        save_wav(path, &rec, narrowband_rate)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!(
            "Recorded {} narrowband samples to {}",
            rec.len(),
            path.display()
        );
    }

    Ok(())
}

fn build_config(args: &Args) -> anyhow::Result<BridgeConfig> {
    let mut config = match args.config {
        Some(ref path) => BridgeConfig::load_file(path)?,
        None => BridgeConfig::default(),
    };

    if let Some(ratio) = args.ratio {
        config.resampler.ratio = ratio.get();
    }
    if let Some(taps) = args.taps {
        config.resampler.taps_per_phase = taps;
    }
    if let Some(ref device) = args.device {
        config.audio.device = Some(device.clone());
    }
    if let Some(channel) = args.channel {
        config.audio.input_channel = channel;
        config.audio.channels = config.audio.channels.max(channel as u16 + 1);
    }
    if let Some(interval) = args.interval {
        config.report.interval_secs = interval;
    }

    config.align_buffer_size();
    config.validate()?;
    Ok(config)
}

fn emit(formatter: &dyn Formatter, report: &LevelReport) {
    println!("{}", formatter.format(report));
}

#[derive(Default)]
struct LevelMeter {
    wideband_energy: f64,
    wideband_samples: usize,
    narrowband_energy: f64,
    narrowband_samples: usize,
    narrowband_peak: f32,
    blocks: usize,
}

impl LevelMeter {
    fn add(&mut self, wideband: &[f32], narrowband: &[f32]) {
        self.wideband_energy += wideband.iter().map(|&s| (s * s) as f64).sum::<f64>();
        self.wideband_samples += wideband.len();
        self.narrowband_energy += narrowband.iter().map(|&s| (s * s) as f64).sum::<f64>();
        self.narrowband_samples += narrowband.len();
        self.narrowband_peak = narrowband
            .iter()
            .fold(self.narrowband_peak, |m, s| m.max(s.abs()));
        self.blocks += 1;
    }

    fn take(&mut self) -> LevelReport {
        let mean = |energy: f64, n: usize| {
            if n == 0 {
                0.0
            } else {
                (energy / n as f64).sqrt() as f32
            }
        };
        let report = LevelReport {
            wideband_rms: mean(self.wideband_energy, self.wideband_samples),
            narrowband_rms: mean(self.narrowband_energy, self.narrowband_samples),
            narrowband_peak: self.narrowband_peak,
            blocks: self.blocks,
            samples: self.narrowband_samples,
        };
        *self = Self::default();
        report
    }
}
