use std::f32::consts::PI;

/// Sine of unit amplitude at `freq_hz`
pub fn generate_sine(freq_hz: f32, sample_rate: f32, count: usize) -> Vec<f32> {
    generate_tones(&[(freq_hz, 1.0)], sample_rate, count)
}

/// Sum of sines given as `(frequency_hz, amplitude)` pairs
pub fn generate_tones(tones: &[(f32, f32)], sample_rate: f32, count: usize) -> Vec<f32> {
    (0..count)
        .map(|i| {
            let t = i as f32 / sample_rate;
            tones
                .iter()
                .map(|&(freq, amplitude)| amplitude * (2.0 * PI * freq * t).sin())
                .sum()
        })
        .collect()
}

/// Linear chirp from `start_hz` to `end_hz` over `count` samples
pub fn generate_chirp(start_hz: f32, end_hz: f32, sample_rate: f32, count: usize) -> Vec<f32> {
    let duration = count as f32 / sample_rate;
    let sweep_rate = (end_hz - start_hz) / duration.max(f32::EPSILON);
    (0..count)
        .map(|i| {
            let t = i as f32 / sample_rate;
            (2.0 * PI * (start_hz * t + 0.5 * sweep_rate * t * t)).sin()
        })
        .collect()
}
