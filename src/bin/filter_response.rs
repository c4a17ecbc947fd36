use clap::Parser;
use rolling_stats::Stats;
use serde::Serialize;
use std::f32::consts::PI;

use ratebridge::Resampler;
use ratebridge::config::RateRatio;
use ratebridge::signal_processing::{frequency_response, max_abs_error};

#[derive(Parser, Debug)]
#[command(name = "filter_response")]
#[command(about = "Inspect the resampler's anti-aliasing kernel", long_about = None)]
struct Args {
    /// Resampling ratio (e.g., "6", "48000:8000", "48k/8k")
    #[arg(short, long, default_value_t = RateRatio::default())]
    ratio: RateRatio,

    /// Filter taps per polyphase branch
    #[arg(short, long, default_value_t = 8)]
    taps: usize,

    /// High (wideband) sample rate in Hz
    #[arg(long, default_value_t = 48000.0)]
    sample_rate: f32,

    /// Number of points in the response table
    #[arg(short, long, default_value_t = 64)]
    points: usize,

    /// Output format: text, csv, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Print the kernel taps
    #[arg(long)]
    show_taps: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Csv,
    Json,
}

#[derive(Debug, Clone, Serialize)]
struct ResponsePoint {
    freq_hz: f32,
    magnitude: f64,
    magnitude_db: f64,
}

#[derive(Debug, Clone, Serialize)]
struct StatsSummary {
    count: usize,
    mean: f32,
    std_dev: f32,
    min: f32,
    max: f32,
}

impl StatsSummary {
    fn from_stats(stats: &Stats<f32>) -> Option<Self> {
        if stats.count == 0 {
            return None;
        }
        Some(Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
struct FilterAnalysis {
    ratio: usize,
    taps_per_phase: usize,
    total_taps: usize,
    high_rate_hz: f32,
    low_rate_hz: f32,
    group_delay_samples: f32,
    dc_gain: f64,
    passband_edge_hz: f32,
    passband_min_db: f64,
    passband_max_db: f64,
    stopband_start_hz: f32,
    stopband_max_db: f64,
    round_trip_error: Option<StatsSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    taps: Option<Vec<f64>>,
    response: Vec<ResponsePoint>,
}

fn to_db(magnitude: f64) -> f64 {
    20.0 * magnitude.max(1e-12).log10()
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let resampler = Resampler::new(args.ratio.get(), args.taps)?;
    let analysis = analyze(&resampler, &args)?;

    match args.format {
        OutputFormat::Text => print_text(&analysis),
        OutputFormat::Csv => print_csv(&analysis),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
    }

    Ok(())
}

fn analyze(resampler: &Resampler, args: &Args) -> anyhow::Result<FilterAnalysis> {
    let kernel = resampler.kernel();
    let high_rate = args.sample_rate;
    let low_rate = high_rate / resampler.ratio() as f32;
    let normalize = |hz: f32| (hz / high_rate) as f64;

    let points = args.points.max(2);
    let response: Vec<ResponsePoint> = (0..points)
        .map(|i| {
            let freq_hz = 0.5 * high_rate * i as f32 / (points - 1) as f32;
            let magnitude = frequency_response(kernel, normalize(freq_hz));
            ResponsePoint {
                freq_hz,
                magnitude,
                magnitude_db: to_db(magnitude),
            }
        })
        .collect();

    let passband_edge_hz = 0.35 * low_rate;
    // Content above this folds back into the kept band after decimation
    let stopband_start_hz = 0.55 * low_rate;

    let dense = 512;
    let mut passband_min_db = f64::INFINITY;
    let mut passband_max_db = f64::NEG_INFINITY;
    let mut stopband_max_db = f64::NEG_INFINITY;
    for i in 0..=dense {
        let freq_hz = 0.5 * high_rate * i as f32 / dense as f32;
        let db = to_db(frequency_response(kernel, normalize(freq_hz)));
        if freq_hz <= passband_edge_hz {
            passband_min_db = passband_min_db.min(db);
            passband_max_db = passband_max_db.max(db);
        } else if freq_hz >= stopband_start_hz {
            stopband_max_db = stopband_max_db.max(db);
        }
    }

    let round_trip_error = StatsSummary::from_stats(&round_trip_errors(resampler, args)?);

    Ok(FilterAnalysis {
        ratio: resampler.ratio(),
        taps_per_phase: resampler.taps_per_phase(),
        total_taps: resampler.total_taps(),
        high_rate_hz: high_rate,
        low_rate_hz: low_rate,
        group_delay_samples: resampler.group_delay_samples(),
        dc_gain: kernel.iter().sum(),
        passband_edge_hz,
        passband_min_db,
        passband_max_db,
        stopband_start_hz,
        stopband_max_db,
        round_trip_error,
        taps: args.show_taps.then(|| kernel.to_vec()),
        response,
    })
}

/// Peak decimate-then-interpolate error for tones across the passband
fn round_trip_errors(resampler: &Resampler, args: &Args) -> anyhow::Result<Stats<f32>> {
    let high_rate = args.sample_rate;
    let low_rate = high_rate / resampler.ratio() as f32;
    let delay = resampler.round_trip_delay_samples();
    let len = (high_rate * 0.1) as usize / resampler.ratio() * resampler.ratio();
    let skip = resampler.total_taps() * 2;

    let mut stats: Stats<f32> = Stats::new();
    for step in 1..=8 {
        let freq = 0.35 * low_rate * step as f32 / 8.0;
        let input: Vec<f32> = (0..len)
            .map(|i| (2.0 * PI * freq * i as f32 / high_rate).sin())
            .collect();

        let mut down = Resampler::new(resampler.ratio(), resampler.taps_per_phase())?;
        let mut up = Resampler::new(resampler.ratio(), resampler.taps_per_phase())?;
        let narrow = down.decimate_to_vec(&input)?;
        let restored = up.interpolate_to_vec(&narrow)?;

        if restored.len() > delay + 2 * skip {
            let error = max_abs_error(&input[..restored.len() - delay], &restored[delay..], skip);
            log::debug!("Round trip at {:.0} Hz: max error {:.4}", freq, error);
            stats.update(error);
        }
    }
    Ok(stats)
}

fn print_text(analysis: &FilterAnalysis) {
    println!(
        "Ratio {} ({} Hz -> {} Hz), {} taps ({} per phase)",
        analysis.ratio,
        analysis.high_rate_hz,
        analysis.low_rate_hz,
        analysis.total_taps,
        analysis.taps_per_phase
    );
    println!("Group delay: {:.1} samples", analysis.group_delay_samples);
    println!("DC gain: {:.6}", analysis.dc_gain);
    println!(
        "Passband 0-{:.0} Hz: {:+.3} to {:+.3} dB",
        analysis.passband_edge_hz, analysis.passband_min_db, analysis.passband_max_db
    );
    println!(
        "Stopband from {:.0} Hz: {:.1} dB max",
        analysis.stopband_start_hz, analysis.stopband_max_db
    );
    if let Some(ref err) = analysis.round_trip_error {
        println!(
            "Round-trip error: mean {:.4}, max {:.4} over {} tones",
            err.mean, err.max, err.count
        );
    }

    if let Some(ref taps) = analysis.taps {
        println!();
        for (i, tap) in taps.iter().enumerate() {
            println!("  h[{:>3}] = {:>+.8}", i, tap);
        }
    }

    println!();
    println!("{:>10}  {:>10}", "Freq (Hz)", "Gain (dB)");
    for point in &analysis.response {
        println!("{:>10.1}  {:>10.2}", point.freq_hz, point.magnitude_db);
    }
}

fn print_csv(analysis: &FilterAnalysis) {
    println!("freq_hz,magnitude,magnitude_db");
    for point in &analysis.response {
        println!(
            "{:.3},{:.8},{:.3}",
            point.freq_hz, point.magnitude, point.magnitude_db
        );
    }
}
