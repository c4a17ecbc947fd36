/// Circular sample history shared by the decimation and interpolation paths
///
/// Holds the most recent high-rate samples. The cursor always points at the
/// next slot to be written, which is also the oldest sample in the buffer.
pub struct HistoryBuffer {
    samples: Vec<f64>,
    cursor: usize,
}

impl HistoryBuffer {
    /// Create a zeroed history of `len` samples
    pub fn new(len: usize) -> Self {
        Self {
            samples: vec![0.0; len],
            cursor: 0,
        }
    }

    /// Write a sample at the cursor and advance it
    pub fn push(&mut self, sample: f64) {
        self.samples[self.cursor] = sample;
        self.cursor += 1;
        if self.cursor == self.samples.len() {
            self.cursor = 0;
        }
    }

    /// Inner product of `kernel` with the history read oldest-first
    ///
    /// Tap `i` multiplies slot `(cursor + i) % len`. The wrap is handled as two
    /// contiguous ranges so the inner loop carries no modulo arithmetic.
    pub fn convolve(&self, kernel: &[f64]) -> f64 {
        debug_assert_eq!(kernel.len(), self.samples.len());

        let split = self.samples.len() - self.cursor;
        let (head_taps, tail_taps) = kernel.split_at(split);

        let head: f64 = head_taps
            .iter()
            .zip(&self.samples[self.cursor..])
            .map(|(t, s)| t * s)
            .sum();
        let tail: f64 = tail_taps
            .iter()
            .zip(&self.samples[..self.cursor])
            .map(|(t, s)| t * s)
            .sum();
        head + tail
    }

    /// Zero every slot and rewind the cursor
    pub fn clear(&mut self) {
        self.samples.fill(0.0);
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Raw slot contents in storage order
    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }
}
