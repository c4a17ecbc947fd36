use std::f32::consts::PI;

/// Unit-amplitude sine sampled at `sample_rate`
pub fn generate_sine(freq: f32, sample_rate: f32, count: usize) -> Vec<f32> {
    (0..count)
        .map(|i| (2.0 * PI * freq * i as f32 / sample_rate).sin())
        .collect()
}

/// Normalized DFT magnitude at a single frequency
///
/// Correlates against cos/sin at `target_freq` and divides by the sample
/// count, so a unit sine on-bin measures about 0.5.
pub fn measure_frequency_power(samples: &[f32], target_freq: f32, sample_rate: f32) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let mut real = 0.0f32;
    let mut imag = 0.0f32;
    for (i, &s) in samples.iter().enumerate() {
        let phase = 2.0 * PI * target_freq * i as f32 / sample_rate;
        real += s * phase.cos();
        imag += s * phase.sin();
    }
    (real * real + imag * imag).sqrt() / samples.len() as f32
}
