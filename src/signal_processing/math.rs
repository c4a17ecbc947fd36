use std::f32::consts::PI;

use num_complex::Complex32;

use crate::constants::MIN_LEVEL;

/// Normalized single-bin DFT magnitude at `freq_hz`
///
/// Returns `|Σ x[i]·e^(-jωi)| / N`. A full-scale sine at exactly `freq_hz`
/// measures close to 0.5; content elsewhere measures near zero over enough
/// periods.
pub fn tone_magnitude(samples: &[f32], freq_hz: f32, sample_rate: f32) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let w = 2.0 * PI * freq_hz / sample_rate;
    let acc: Complex32 = samples
        .iter()
        .enumerate()
        .map(|(i, &s)| Complex32::from_polar(s, -w * i as f32))
        .sum();
    acc.norm() / samples.len() as f32
}

/// Root mean square level
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|&x| x * x).sum::<f32>() / samples.len() as f32).sqrt()
}

/// Largest absolute sample value
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |m, &s| m.max(s.abs()))
}

/// Convert a linear level (1.0 = full scale) to dBFS
pub fn to_dbfs(level: f32) -> f32 {
    20.0 * level.max(MIN_LEVEL).log10()
}

/// Largest absolute difference between two signals, ignoring `skip` samples
/// at both ends of the overlapping region
pub fn max_abs_error(a: &[f32], b: &[f32], skip: usize) -> f32 {
    let len = a.len().min(b.len());
    if len <= 2 * skip {
        return 0.0;
    }
    a[skip..len - skip]
        .iter()
        .zip(&b[skip..len - skip])
        .map(|(x, y)| (x - y).abs())
        .fold(0.0f32, f32::max)
}
