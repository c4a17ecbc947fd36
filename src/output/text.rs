use super::{Formatter, LevelReport};
use crate::signal_processing::to_dbfs;

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, report: &LevelReport) -> String {
        if self.verbose {
            format!(
                "Wideband: {:>6.1} dBFS  Narrowband: {:>6.1} dBFS (peak {:>6.1} dBFS) [blocks: {}, samples: {}]",
                to_dbfs(report.wideband_rms),
                to_dbfs(report.narrowband_rms),
                to_dbfs(report.narrowband_peak),
                report.blocks,
                report.samples
            )
        } else {
            format!(
                "Narrowband: {:>6.1} dBFS (peak {:>6.1} dBFS)",
                to_dbfs(report.narrowband_rms),
                to_dbfs(report.narrowband_peak)
            )
        }
    }
}
