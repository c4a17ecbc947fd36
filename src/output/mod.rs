mod csv;
mod json;
mod text;

use chrono::Utc;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Signal levels observed over one report interval
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct LevelReport {
    /// RMS of the wideband input
    pub wideband_rms: f32,
    /// RMS of the decimated output
    pub narrowband_rms: f32,
    /// Largest decimated sample magnitude
    pub narrowband_peak: f32,
    /// Device blocks processed in the interval
    pub blocks: usize,
    /// Narrowband samples produced in the interval
    pub samples: usize,
}

pub trait Formatter: Send {
    fn format(&self, report: &LevelReport) -> String;

    fn header(&self) -> Option<&'static str> {
        None
    }
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> LevelReport {
        LevelReport {
            wideband_rms: 0.5,
            narrowband_rms: 0.25,
            narrowband_peak: 0.75,
            blocks: 50,
            samples: 8000,
        }
    }

    #[test]
    fn test_text_format() {
        let line = TextFormatter::new(false).format(&report());
        assert!(line.contains("-12.0 dBFS"), "{}", line);

        let verbose = TextFormatter::new(true).format(&report());
        assert!(verbose.contains("blocks: 50"), "{}", verbose);
    }

    #[test]
    fn test_csv_format_matches_header() {
        let formatter = CsvFormatter;
        let columns = formatter.header().unwrap().split(',').count();
        assert_eq!(formatter.format(&report()).split(',').count(), columns);
    }

    #[test]
    fn test_json_format_parses() {
        let line = JsonFormatter.format(&report());
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["blocks"], 50);
        assert_eq!(value["samples"], 8000);
        assert!(value["ts"].is_string());
    }
}
