use anyhow::Context;
use clap::Parser;
use rolling_stats::Stats;
use std::path::PathBuf;

use ratebridge::Resampler;
use ratebridge::audio::{AudioSource, WavFileSource};
use ratebridge::config::RateRatio;
use ratebridge::save_wav;
use ratebridge::signal_processing::{peak, to_dbfs};

#[derive(Parser, Debug)]
#[command(name = "resample_wav")]
#[command(about = "Decimate or interpolate a WAV file by an integer ratio", long_about = None)]
struct Args {
    /// Input WAV file
    input: PathBuf,

    /// Output WAV file (mono, 32-bit float)
    output: PathBuf,

    /// Direction: down (decimate) or up (interpolate)
    #[arg(short, long, value_enum, default_value = "down")]
    mode: Mode,

    /// Resampling ratio (e.g., "6", "48000:8000", "48k/8k")
    #[arg(short, long, default_value_t = RateRatio::default())]
    ratio: RateRatio,

    /// Filter taps per polyphase branch
    #[arg(short, long, default_value_t = 8)]
    taps: usize,

    /// Input channel to use (0-based)
    #[arg(short, long, default_value_t = 0)]
    channel: usize,

    /// Input samples per processing call
    #[arg(long, default_value_t = 960)]
    chunk: usize,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Mode {
    Down,
    Up,
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

    let ratio = args.ratio.get();
    let mut resampler = Resampler::new(ratio, args.taps)?;

    // Whole multiples of the ratio keep decimation phase continuous across chunks
    let chunk = args.chunk.max(1).div_ceil(ratio) * ratio;
    let mut source = WavFileSource::new(&args.input, args.channel, chunk)
        .with_context(|| format!("opening {}", args.input.display()))?;

    let input_rate = source.sample_rate();
    let output_rate = match args.mode {
        Mode::Down => {
            if input_rate as usize % ratio != 0 {
                anyhow::bail!(
                    "Input rate {} Hz is not divisible by ratio {}",
                    input_rate,
                    ratio
                );
            }
            input_rate / ratio as u32
        }
        Mode::Up => input_rate
            .checked_mul(ratio as u32)
            .context("output sample rate overflows")?,
    };

    log::info!(
        "{}: {} samples at {} Hz -> {} Hz",
        args.input.display(),
        source.len(),
        input_rate,
        output_rate
    );

    let expected = match args.mode {
        Mode::Down => resampler.decimated_len(source.len()),
        Mode::Up => resampler.interpolated_len(source.len()).unwrap_or(0),
    };
    let mut output = Vec::with_capacity(expected);
    let mut block = Vec::new();
    let mut chunk_peaks: Stats<f32> = Stats::new();

    while let Some(input) = source.next_buffer()? {
        let needed = match args.mode {
            Mode::Down => resampler.decimated_len(input.len()),
            Mode::Up => resampler
                .interpolated_len(input.len())
                .context("chunk too large")?,
        };
        block.resize(needed, 0.0);

        let produced = match args.mode {
            Mode::Down => resampler.decimate(&input, &mut block)?,
            Mode::Up => resampler.interpolate(&input, &mut block)?,
        };

        if produced > 0 {
            chunk_peaks.update(peak(&block[..produced]));
        }
        output.extend_from_slice(&block[..produced]);
    }

    let clipped = output.iter().filter(|s| s.abs() > 1.0).count();
    if clipped > 0 {
        log::warn!("{} output samples exceed full scale", clipped);
    }

    save_wav(&args.output, &output, output_rate)
        .with_context(|| format!("writing {}", args.output.display()))?;

    println!(
        "{} -> {}: {} samples at {} Hz -> {} samples at {} Hz",
        args.input.display(),
        args.output.display(),
        source.len(),
        input_rate,
        output.len(),
        output_rate
    );
    if chunk_peaks.count > 0 {
        println!(
            "Chunk peak: mean {:.1} dBFS, max {:.1} dBFS over {} chunks",
            to_dbfs(chunk_peaks.mean),
            to_dbfs(chunk_peaks.max),
            chunk_peaks.count
        );
    }
    if clipped > 0 {
        println!("Clipped samples: {}", clipped);
    }

    Ok(())
}
