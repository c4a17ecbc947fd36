use std::f64::consts::PI;

use num_complex::Complex64;

use crate::constants::{CUTOFF_FACTOR, HAMMING_ALPHA, HAMMING_BETA, SINC_EPSILON};
use crate::error::{ResampleError, Result};

/// Check resampler dimensions and return the total kernel length
///
/// # Errors
/// Returns `ResampleError::Config` if `ratio` or `taps_per_phase` is zero, or
/// if their product does not fit in `usize`.
pub fn validate_design(ratio: usize, taps_per_phase: usize) -> Result<usize> {
    if ratio == 0 {
        return Err(ResampleError::Config("ratio must be at least 1".into()));
    }
    if taps_per_phase == 0 {
        return Err(ResampleError::Config(
            "taps_per_phase must be at least 1".into(),
        ));
    }
    ratio.checked_mul(taps_per_phase).ok_or_else(|| {
        ResampleError::Config(format!(
            "kernel length overflows: ratio={}, taps_per_phase={}",
            ratio, taps_per_phase
        ))
    })
}

/// Hamming window value for tap `i` of a window spanning `0..=m`
pub fn hamming(i: usize, m: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    HAMMING_ALPHA - HAMMING_BETA * (2.0 * PI * i as f64 / m as f64).cos()
}

/// Design the anti-aliasing lowpass kernel for an integer rate change
///
/// Windowed-sinc design with a Hamming window and normalized cutoff
/// `0.45 / ratio` cycles per high-rate sample. The kernel is symmetric
/// (linear phase) and scaled so its taps sum to exactly one, giving unity
/// gain at DC after truncation.
///
/// Callers are expected to pass dimensions accepted by [`validate_design`];
/// a zero dimension yields an empty kernel.
pub fn windowed_sinc_lowpass(ratio: usize, taps_per_phase: usize) -> Vec<f64> {
    let total_taps = ratio * taps_per_phase;
    if total_taps == 0 {
        return Vec::new();
    }

    let fc = CUTOFF_FACTOR / ratio as f64;
    let m = total_taps - 1;
    let centre = m as f64 / 2.0;

    let mut kernel: Vec<f64> = (0..total_taps)
        .map(|i| {
            let n = i as f64 - centre;
            let sinc = if n.abs() < SINC_EPSILON {
                2.0 * fc
            } else {
                (2.0 * PI * fc * n).sin() / (PI * n)
            };
            sinc * hamming(i, m)
        })
        .collect();

    let sum: f64 = kernel.iter().sum();
    for tap in kernel.iter_mut() {
        *tap /= sum;
    }
    kernel
}

/// Magnitude response of a kernel at a normalized frequency (cycles/sample)
pub fn frequency_response(kernel: &[f64], normalized_freq: f64) -> f64 {
    let w = 2.0 * PI * normalized_freq;
    kernel
        .iter()
        .enumerate()
        .map(|(i, &tap)| Complex64::from_polar(tap, -w * i as f64))
        .sum::<Complex64>()
        .norm()
}
