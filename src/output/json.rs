use super::{Formatter, LevelReport, iso8601_timestamp};

pub struct JsonFormatter;

#[derive(serde::Serialize)]
struct Line<'a> {
    ts: String,
    #[serde(flatten)]
    report: &'a LevelReport,
}

fn error_line(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

impl Formatter for JsonFormatter {
    fn format(&self, report: &LevelReport) -> String {
        let line = Line {
            ts: iso8601_timestamp(),
            report,
        };
        serde_json::to_string(&line).unwrap_or_else(|e| error_line(&e.to_string()))
    }
}
