use super::{Formatter, LevelReport, iso8601_timestamp};

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, report: &LevelReport) -> String {
        format!(
            "{},{:.5},{:.5},{:.5},{},{}",
            iso8601_timestamp(),
            report.wideband_rms,
            report.narrowband_rms,
            report.narrowband_peak,
            report.blocks,
            report.samples
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some("ts,wideband_rms,narrowband_rms,narrowband_peak,blocks,samples")
    }
}
