mod test_signals;

use ratebridge::audio::{AudioSource, WavFileSource};
use ratebridge::config::{BridgeConfig, ResamplerConfig};
use ratebridge::signal_processing::{max_abs_error, rms};
use ratebridge::simulation::{NoiseConfig, apply_noise, generate_chirp, generate_tones};
use ratebridge::{Loopback, RateBridge, Resampler, save_wav};
use test_signals::{generate_sine, measure_frequency_power};

const HIGH_RATE: f32 = 48000.0;
const LOW_RATE: f32 = 8000.0;

fn temp_wav(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "ratebridge_stream_{}_{}.wav",
        name,
        std::process::id()
    ))
}

#[test]
fn test_chunked_streams_match_single_call() {
    let input = generate_sine(1300.0, HIGH_RATE, 4800);

    let mut whole = Resampler::new(6, 8).unwrap();
    let expected_down = whole.decimate_to_vec(&input).unwrap();
    whole.reset();
    let expected_up = whole.interpolate_to_vec(&expected_down).unwrap();

    for chunk_size in [6, 48, 60, 480, 960] {
        let mut down = Resampler::new(6, 8).unwrap();
        let mut up = Resampler::new(6, 8).unwrap();
        let mut narrow = Vec::new();
        let mut wide = Vec::new();

        for chunk in input.chunks(chunk_size) {
            let n = down.decimate_to_vec(chunk).unwrap();
            wide.extend(up.interpolate_to_vec(&n).unwrap());
            narrow.extend(n);
        }

        assert_eq!(narrow, expected_down, "decimation with chunk {}", chunk_size);
        assert_eq!(wide, expected_up, "interpolation with chunk {}", chunk_size);
    }
}

#[test]
fn test_noisy_tone_survives_decimation() {
    let mut input = generate_tones(&[(1000.0, 1.0), (5000.0, 0.5)], HIGH_RATE, 4800);
    apply_noise(&mut input, &NoiseConfig::default().with_seed(7).with_awgn(20.0));

    let mut resampler = Resampler::new(6, 8).unwrap();
    let output = resampler.decimate_to_vec(&input).unwrap();

    let wanted = measure_frequency_power(&output, 1000.0, LOW_RATE);
    let alias = measure_frequency_power(&output, 3000.0, LOW_RATE);
    assert!(wanted > 0.4, "1 kHz content too weak: {}", wanted);
    assert!(alias < 0.05, "5 kHz interferer folded to 3 kHz: {}", alias);
}

#[test]
fn test_chirp_passband_and_stopband() {
    let mut resampler = Resampler::new(6, 8).unwrap();
    let in_band = generate_chirp(100.0, 3000.0, HIGH_RATE, 9600);
    let output = resampler.decimate_to_vec(&in_band).unwrap();
    let level = rms(&output[16..]);
    assert!(
        (level - std::f32::consts::FRAC_1_SQRT_2).abs() < 0.05,
        "In-band chirp level changed: {}",
        level
    );

    resampler.reset();
    let out_of_band = generate_chirp(6000.0, 20000.0, HIGH_RATE, 9600);
    let output = resampler.decimate_to_vec(&out_of_band).unwrap();
    let level = rms(&output[16..]);
    assert!(level < 0.02, "Out-of-band chirp leaked: {}", level);
}

#[test]
fn test_bridge_from_toml_config() {
    let config = BridgeConfig::from_toml_str(
        r#"
        [audio]
        sample_rate = 48000
        buffer_size = 480

        [resampler]
        ratio = 6
        taps_per_phase = 8
        "#,
    )
    .unwrap();
    assert_eq!(config.narrowband_rate(), 8000);

    let mut bridge = RateBridge::new(&config.resampler, config.audio.buffer_size).unwrap();
    let input: Vec<f32> = generate_sine(440.0, HIGH_RATE, 4800)
        .iter()
        .map(|s| 0.5 * s)
        .collect();
    let mut output = vec![0.0; input.len()];

    for (rx, tx) in input.chunks(480).zip(output.chunks_mut(480)) {
        assert_eq!(bridge.process(rx, tx, &mut Loopback).unwrap(), 80);
    }

    let delay = bridge.loopback_delay_samples();
    let error = max_abs_error(&input[..input.len() - delay], &output[delay..], 100);
    assert!(error < 0.02, "Loopback error too large: {}", error);
}

#[test]
fn test_wav_file_roundtrip_through_decimator() {
    let path = temp_wav("decimate");
    let input = generate_sine(1000.0, HIGH_RATE, 4800);
    save_wav(&path, &input, 48000).unwrap();

    let mut source = WavFileSource::new(&path, 0, 960).unwrap();
    assert_eq!(source.sample_rate(), 48000);
    assert_eq!(source.len(), 4800);

    let mut bridge = RateBridge::new(&ResamplerConfig::default(), 960).unwrap();
    let mut narrow = Vec::new();
    while let Some(block) = source.next_buffer().unwrap() {
        narrow.extend_from_slice(bridge.process_rx(&block).unwrap());
    }

    let out_path = temp_wav("narrow");
    save_wav(&out_path, &narrow, 8000).unwrap();
    let reread = WavFileSource::new(&out_path, 0, 8000).unwrap();
    assert_eq!(reread.sample_rate(), 8000);
    assert_eq!(reread.len(), 800);

    let power = measure_frequency_power(&narrow, 1000.0, LOW_RATE);
    assert!(power > 0.3, "1 kHz content too weak: {}", power);

    std::fs::remove_file(&path).ok();
    std::fs::remove_file(&out_path).ok();
}
