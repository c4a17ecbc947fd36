use crate::config::ResamplerConfig;
use crate::error::{ResampleError, Result};
use crate::signal_processing::Resampler;

/// Narrowband side of the bridge
///
/// Receives one block of decimated samples and fills the transmit block of
/// the same length. Runs on the audio thread, so implementations must not
/// block or allocate.
pub trait NarrowbandProcessor {
    fn process(&mut self, rx: &[f32], tx: &mut [f32]);
}

/// Sends received narrowband audio straight back out
pub struct Loopback;

impl NarrowbandProcessor for Loopback {
    fn process(&mut self, rx: &[f32], tx: &mut [f32]) {
        tx.copy_from_slice(rx);
    }
}

/// Transmits silence regardless of input
pub struct Silence;

impl NarrowbandProcessor for Silence {
    fn process(&mut self, _rx: &[f32], tx: &mut [f32]) {
        tx.fill(0.0);
    }
}

/// Full-duplex bridge between a wideband device and a narrowband chain
///
/// Each device callback hands over one block of received samples and a
/// transmit block of the same length. The receive direction is decimated,
/// passed through a [`NarrowbandProcessor`], and the processor's output is
/// interpolated back into the transmit block. The two directions use
/// separate resamplers so their histories never mix.
///
/// All scratch space is sized at construction for `max_block` wideband
/// samples; [`process`](Self::process) never allocates.
pub struct RateBridge {
    rx_resampler: Resampler,
    tx_resampler: Resampler,
    rx_narrow: Vec<f32>,
    tx_narrow: Vec<f32>,
    max_block: usize,
}

impl RateBridge {
    /// Create a bridge for wideband blocks of up to `max_block` samples
    ///
    /// # Errors
    /// Returns `ResampleError::Config` if the resampler dimensions are invalid
    /// or `max_block` is not a positive multiple of the ratio
    pub fn new(config: &ResamplerConfig, max_block: usize) -> Result<Self> {
        let rx_resampler = Resampler::from_config(config)?;
        let tx_resampler = Resampler::from_config(config)?;
        let ratio = rx_resampler.ratio();

        if max_block == 0 || max_block % ratio != 0 {
            return Err(ResampleError::Config(format!(
                "block size {} must be a positive multiple of ratio {}",
                max_block, ratio
            )));
        }

        let narrow_len = max_block / ratio;
        log::debug!(
            "Rate bridge: {} wideband / {} narrowband samples per block",
            max_block,
            narrow_len
        );

        Ok(Self {
            rx_resampler,
            tx_resampler,
            rx_narrow: vec![0.0; narrow_len],
            tx_narrow: vec![0.0; narrow_len],
            max_block,
        })
    }

    /// Run one device callback's worth of audio through the bridge
    ///
    /// Returns the number of narrowband samples handed to the processor.
    ///
    /// # Errors
    /// - `ResampleError::Config` if `rx` and `tx` differ in length or the
    ///   block is not a multiple of the ratio
    /// - `ResampleError::OutputTooSmall` if the block exceeds `max_block`
    pub fn process<P>(&mut self, rx: &[f32], tx: &mut [f32], processor: &mut P) -> Result<usize>
    where
        P: NarrowbandProcessor + ?Sized,
    {
        if rx.len() != tx.len() {
            return Err(ResampleError::Config(format!(
                "rx block has {} samples but tx block has {}",
                rx.len(),
                tx.len()
            )));
        }
        let narrow_len = self.check_block(rx.len())?;

        let rx_narrow = &mut self.rx_narrow[..narrow_len];
        let tx_narrow = &mut self.tx_narrow[..narrow_len];

        self.rx_resampler.decimate(rx, rx_narrow)?;
        processor.process(rx_narrow, tx_narrow);
        self.tx_resampler.interpolate(tx_narrow, tx)?;

        Ok(narrow_len)
    }

    /// Receive-only path: decimate `rx` and return the narrowband block
    pub fn process_rx(&mut self, rx: &[f32]) -> Result<&[f32]> {
        let narrow_len = self.check_block(rx.len())?;
        let rx_narrow = &mut self.rx_narrow[..narrow_len];
        self.rx_resampler.decimate(rx, rx_narrow)?;
        Ok(&self.rx_narrow[..narrow_len])
    }

    /// Clear the history of both directions
    pub fn reset(&mut self) {
        self.rx_resampler.reset();
        self.tx_resampler.reset();
    }

    pub fn ratio(&self) -> usize {
        self.rx_resampler.ratio()
    }

    pub fn max_block(&self) -> usize {
        self.max_block
    }

    /// Delay from `rx` to `tx` in wideband samples when looping back
    pub fn loopback_delay_samples(&self) -> usize {
        self.rx_resampler.round_trip_delay_samples()
    }

    fn check_block(&self, len: usize) -> Result<usize> {
        if len > self.max_block {
            return Err(ResampleError::OutputTooSmall {
                needed: len / self.ratio(),
                available: self.rx_narrow.len(),
            });
        }
        if len % self.ratio() != 0 {
            return Err(ResampleError::Config(format!(
                "block size {} is not a multiple of ratio {}",
                len,
                self.ratio()
            )));
        }
        Ok(len / self.ratio())
    }
}
