use crate::config::ResamplerConfig;
use crate::error::{ResampleError, Result};
use crate::signal_processing::HistoryBuffer;
use crate::signal_processing::filter_design::{validate_design, windowed_sinc_lowpass};

/// Fixed-ratio polyphase FIR resampler
///
/// Converts between a high and a low sample rate related by an integer
/// `ratio` (48 kHz <-> 8 kHz with the defaults). A single lowpass kernel of
/// `ratio * taps_per_phase` taps serves both directions:
///
/// - [`decimate`](Self::decimate) filters high-rate input and keeps one output
///   per `ratio` input samples.
/// - [`interpolate`](Self::interpolate) zero-stuffs low-rate input up to the
///   high rate and filters away the images.
///
/// The kernel is designed once at construction. Processing only touches the
/// preallocated history, so both calls are safe to run from an audio callback.
/// An instance carries stream state for one direction; full-duplex use needs
/// two instances.
pub struct Resampler {
    ratio: usize,
    taps_per_phase: usize,
    kernel: Vec<f64>,
    history: HistoryBuffer,
}

impl Resampler {
    /// Create a resampler with the default windowed-sinc kernel
    ///
    /// # Arguments
    /// * `ratio` - High rate divided by low rate (6 for 48 kHz <-> 8 kHz)
    /// * `taps_per_phase` - Filter taps per polyphase branch (8 by default)
    ///
    /// # Errors
    /// Returns `ResampleError::Config` if either argument is zero
    pub fn new(ratio: usize, taps_per_phase: usize) -> Result<Self> {
        Self::with_design(ratio, taps_per_phase, windowed_sinc_lowpass)
    }

    /// Create a resampler from a [`ResamplerConfig`]
    pub fn from_config(config: &ResamplerConfig) -> Result<Self> {
        Self::new(config.ratio, config.taps_per_phase)
    }

    /// Create a resampler with a caller-supplied kernel design
    ///
    /// `design` receives `(ratio, taps_per_phase)` and must return exactly
    /// `ratio * taps_per_phase` finite taps. The kernel is used as-is, so a
    /// design that should preserve DC level must normalize its own taps.
    ///
    /// # Errors
    /// Returns `ResampleError::Config` for zero dimensions and
    /// `ResampleError::FilterDesign` for a kernel of the wrong length or with
    /// non-finite taps.
    pub fn with_design<D>(ratio: usize, taps_per_phase: usize, design: D) -> Result<Self>
    where
        D: FnOnce(usize, usize) -> Vec<f64>,
    {
        let total_taps = validate_design(ratio, taps_per_phase)?;
        let kernel = design(ratio, taps_per_phase);

        if kernel.len() != total_taps {
            return Err(ResampleError::FilterDesign(format!(
                "kernel has {} taps, expected {}",
                kernel.len(),
                total_taps
            )));
        }
        if let Some(i) = kernel.iter().position(|t| !t.is_finite()) {
            return Err(ResampleError::FilterDesign(format!(
                "kernel tap {} is not finite",
                i
            )));
        }

        log::debug!(
            "Resampler ratio {} with {} taps ({} per phase)",
            ratio,
            total_taps,
            taps_per_phase
        );

        Ok(Self {
            ratio,
            taps_per_phase,
            kernel,
            history: HistoryBuffer::new(total_taps),
        })
    }

    /// Decimate high-rate samples into `output`
    ///
    /// One output sample is produced after every `ratio`-th input sample of
    /// this call, so the output count is always `input.len() / ratio`. Any
    /// remainder still enters the history and affects later outputs, but the
    /// count restarts on the next call; feed whole multiples of `ratio` for a
    /// seamless stream.
    ///
    /// # Errors
    /// Returns `ResampleError::OutputTooSmall` without consuming any input if
    /// `output` cannot hold `input.len() / ratio` samples.
    pub fn decimate(&mut self, input: &[f32], output: &mut [f32]) -> Result<usize> {
        let needed = self.decimated_len(input.len());
        check_capacity(needed, output.len())?;

        let mut produced = 0;
        for (i, &sample) in input.iter().enumerate() {
            self.history.push(sample as f64);

            if (i + 1) % self.ratio == 0 {
                output[produced] = self.history.convolve(&self.kernel) as f32;
                produced += 1;
            }
        }

        debug_assert_eq!(produced, needed);
        Ok(produced)
    }

    /// Interpolate low-rate samples into `output`
    ///
    /// Each input sample becomes `ratio` output samples: the sample scaled by
    /// `ratio` followed by `ratio - 1` zeros, each filtered through the kernel.
    /// The scaling restores the amplitude lost to zero-stuffing.
    ///
    /// # Errors
    /// Returns `ResampleError::OutputTooSmall` without consuming any input if
    /// `output` cannot hold `input.len() * ratio` samples.
    pub fn interpolate(&mut self, input: &[f32], output: &mut [f32]) -> Result<usize> {
        let needed = self.required_interpolated_len(input.len())?;
        check_capacity(needed, output.len())?;

        let gain = self.ratio as f64;
        let mut produced = 0;
        for &sample in input {
            for phase in 0..self.ratio {
                let stuffed = if phase == 0 { sample as f64 * gain } else { 0.0 };
                self.history.push(stuffed);

                output[produced] = self.history.convolve(&self.kernel) as f32;
                produced += 1;
            }
        }

        Ok(produced)
    }

    /// Decimate into a newly allocated buffer (not for real-time use)
    pub fn decimate_to_vec(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        let mut output = vec![0.0; self.decimated_len(input.len())];
        self.decimate(input, &mut output)?;
        Ok(output)
    }

    /// Interpolate into a newly allocated buffer (not for real-time use)
    pub fn interpolate_to_vec(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        let len = self.required_interpolated_len(input.len())?;
        let mut output = vec![0.0; len];
        self.interpolate(input, &mut output)?;
        Ok(output)
    }

    /// Discard filter memory, keeping the kernel and ratio
    ///
    /// Call when the stream restarts (channel change, device glitch) so stale
    /// history does not leak into the new stream as a transient.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Configured integer ratio
    pub fn ratio(&self) -> usize {
        self.ratio
    }

    pub fn taps_per_phase(&self) -> usize {
        self.taps_per_phase
    }

    /// Kernel length (`ratio * taps_per_phase`)
    pub fn total_taps(&self) -> usize {
        self.kernel.len()
    }

    /// Get access to the kernel taps
    pub fn kernel(&self) -> &[f64] {
        &self.kernel
    }

    /// Number of samples `decimate` produces for `input_len` inputs
    pub fn decimated_len(&self, input_len: usize) -> usize {
        input_len / self.ratio
    }

    /// Number of samples `interpolate` produces for `input_len` inputs
    ///
    /// `None` if the count overflows `usize`.
    pub fn interpolated_len(&self, input_len: usize) -> Option<usize> {
        input_len.checked_mul(self.ratio)
    }

    fn required_interpolated_len(&self, input_len: usize) -> Result<usize> {
        self.interpolated_len(input_len).ok_or_else(|| {
            ResampleError::Config(format!(
                "interpolating {} samples by {} overflows",
                input_len, self.ratio
            ))
        })
    }

    /// Group delay of the kernel in high-rate samples (linear phase)
    pub fn group_delay_samples(&self) -> f32 {
        (self.kernel.len() - 1) as f32 / 2.0
    }

    /// Delay of a decimate-then-interpolate chain through two fresh instances
    ///
    /// Measured in high-rate samples. The decimator reports output `k` for
    /// input position `ratio * k + ratio - 1`, so its delay relative to the
    /// `ratio * k` grid is the group delay less `ratio - 1`. The interpolator
    /// adds one full group delay.
    pub fn round_trip_delay_samples(&self) -> usize {
        self.kernel.len() - self.ratio
    }

    #[cfg(test)]
    fn history_cursor(&self) -> usize {
        self.history.cursor()
    }
}

fn check_capacity(needed: usize, available: usize) -> Result<()> {
    if available < needed {
        return Err(ResampleError::OutputTooSmall { needed, available });
    }
    Ok(())
}
