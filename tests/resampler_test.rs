mod test_signals;

use ratebridge::signal_processing::{max_abs_error, tone_magnitude};
use ratebridge::{ResampleError, Resampler};
use test_signals::{generate_sine, measure_frequency_power};

const HIGH_RATE: f32 = 48000.0;
const LOW_RATE: f32 = 8000.0;

#[test]
fn test_decimate_preserves_frequency() {
    let mut resampler = Resampler::new(6, 8).unwrap();

    // 1 kHz is well inside the 4 kHz output Nyquist band
    let input = generate_sine(1000.0, HIGH_RATE, 4800);
    let mut output = vec![0.0; input.len() / 6 + 16];

    let out_count = resampler.decimate(&input, &mut output).unwrap();
    assert!(
        (790..=810).contains(&out_count),
        "Expected ~800 samples, got {}",
        out_count
    );

    let power = measure_frequency_power(&output[..out_count], 1000.0, LOW_RATE);
    assert!(power > 0.3, "1 kHz content too weak: {}", power);
}

#[test]
fn test_interpolate_preserves_frequency() {
    let mut resampler = Resampler::new(6, 8).unwrap();

    let input = generate_sine(1000.0, LOW_RATE, 800);
    let mut output = vec![0.0; input.len() * 6 + 96];

    let out_count = resampler.interpolate(&input, &mut output).unwrap();
    assert!(
        (4790..=4810).contains(&out_count),
        "Expected ~4800 samples, got {}",
        out_count
    );

    let power = measure_frequency_power(&output[..out_count], 1000.0, HIGH_RATE);
    assert!(power > 0.3, "1 kHz content too weak: {}", power);
}

#[test]
fn test_decimate_rejects_alias() {
    let mut resampler = Resampler::new(6, 8).unwrap();

    // 5 kHz is above the 4 kHz output Nyquist and would fold to 3 kHz
    let input = generate_sine(5000.0, HIGH_RATE, 4800);
    let mut output = vec![0.0; input.len() / 6 + 16];

    let out_count = resampler.decimate(&input, &mut output).unwrap();
    let power_at_3k = measure_frequency_power(&output[..out_count], 3000.0, LOW_RATE);

    assert!(power_at_3k < 0.1, "Alias at 3 kHz too strong: {}", power_at_3k);
}

#[test]
fn test_interpolate_rejects_images() {
    let mut resampler = Resampler::new(6, 8).unwrap();

    let input = generate_sine(1000.0, LOW_RATE, 800);
    let output = resampler.interpolate_to_vec(&input).unwrap();

    // Zero-stuffing images land at 8 kHz +/- 1 kHz
    for image in [7000.0, 9000.0, 15000.0, 17000.0] {
        let power = measure_frequency_power(&output, image, HIGH_RATE);
        assert!(power < 0.05, "Image at {} Hz too strong: {}", image, power);
    }
}

#[test]
fn test_roundtrip() {
    let mut dec_resampler = Resampler::new(6, 8).unwrap();
    let mut int_resampler = Resampler::new(6, 8).unwrap();

    let input = generate_sine(1000.0, HIGH_RATE, 4800);
    let mut decimated = vec![0.0; input.len() / 6 + 16];
    let mut restored = vec![0.0; input.len() + 96];

    let dec_count = dec_resampler.decimate(&input, &mut decimated).unwrap();
    let int_count = int_resampler
        .interpolate(&decimated[..dec_count], &mut restored)
        .unwrap();
    assert_eq!(int_count, input.len());

    // Compare with the combined filter delay removed, skipping edge transients
    let delay = dec_resampler.round_trip_delay_samples();
    assert_eq!(delay, 42);

    let max_error = max_abs_error(&input[..int_count - delay], &restored[delay..int_count], 100);
    assert!(max_error < 0.2, "Round trip error too large: {}", max_error);
}

#[test]
fn test_reset_clears_history() {
    let mut resampler = Resampler::new(6, 8).unwrap();

    let input = generate_sine(1000.0, HIGH_RATE, 480);
    let mut output = vec![0.0; 100];
    resampler.decimate(&input, &mut output).unwrap();

    resampler.reset();

    let zeros = vec![0.0f32; 480];
    let mut output = vec![0.0; 100];
    let count = resampler.decimate(&zeros, &mut output).unwrap();
    assert_eq!(count, 80);

    let max_val = output[10..count]
        .iter()
        .fold(0.0f32, |m, s| m.max(s.abs()));
    assert!(max_val < 0.01, "Stale history leaked: {}", max_val);
}

#[test]
fn test_without_reset_history_carries_over() {
    let mut resampler = Resampler::new(6, 8).unwrap();
    resampler
        .decimate_to_vec(&generate_sine(1000.0, HIGH_RATE, 480))
        .unwrap();

    let output = resampler.decimate_to_vec(&[0.0; 48]).unwrap();
    assert!(
        output.iter().any(|s| s.abs() > 0.01),
        "Previous samples should still be in the history"
    );
}

#[test]
fn test_length_laws() {
    for ratio in 1..=8 {
        let mut resampler = Resampler::new(ratio, 4).unwrap();
        for n in [0, 1, ratio - 1, ratio, ratio + 1, 97, 480] {
            let input = vec![0.25; n];
            assert_eq!(resampler.decimate_to_vec(&input).unwrap().len(), n / ratio);
            assert_eq!(resampler.interpolate_to_vec(&input).unwrap().len(), n * ratio);
        }
    }
}

#[test]
fn test_kernel_sums_to_unity() {
    for (ratio, taps) in [(1, 1), (2, 8), (3, 12), (4, 16), (6, 8), (6, 16), (8, 4)] {
        let resampler = Resampler::new(ratio, taps).unwrap();
        let sum: f64 = resampler.kernel().iter().sum();
        assert!(
            (sum - 1.0).abs() < 1e-9,
            "ratio {} taps {} sums to {}",
            ratio,
            taps,
            sum
        );
    }
}

#[test]
fn test_output_capacity_is_checked() {
    let mut resampler = Resampler::new(6, 8).unwrap();
    let input = generate_sine(1000.0, HIGH_RATE, 600);

    let mut small = vec![0.0; 99];
    let err = resampler.decimate(&input, &mut small).unwrap_err();
    assert!(matches!(
        err,
        ResampleError::OutputTooSmall {
            needed: 100,
            available: 99
        }
    ));

    let mut small = vec![0.0; 3599];
    assert!(resampler.interpolate(&input, &mut small).is_err());

    // A rejected call leaves the stream untouched
    let mut fresh = Resampler::new(6, 8).unwrap();
    assert_eq!(
        resampler.decimate_to_vec(&input).unwrap(),
        fresh.decimate_to_vec(&input).unwrap()
    );
}

#[test]
fn test_measurements_agree() {
    let signal = generate_sine(1000.0, LOW_RATE, 800);
    let reference = measure_frequency_power(&signal, 1000.0, LOW_RATE);
    let library = tone_magnitude(&signal, 1000.0, LOW_RATE);
    assert!((reference - library).abs() < 1e-3);
}

#[test]
fn test_other_ratios_preserve_passband() {
    // 48 kHz -> 16 kHz and 48 kHz -> 12 kHz
    for (ratio, low_rate) in [(3, 16000.0), (4, 12000.0)] {
        let mut resampler = Resampler::new(ratio, 8).unwrap();
        let input = generate_sine(1000.0, HIGH_RATE, 4800);
        let output = resampler.decimate_to_vec(&input).unwrap();

        let power = measure_frequency_power(&output, 1000.0, low_rate);
        assert!(power > 0.3, "ratio {}: 1 kHz content too weak: {}", ratio, power);
    }
}
