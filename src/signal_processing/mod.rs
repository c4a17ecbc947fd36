pub mod filter_design;
pub mod history;
pub mod math;
pub mod resampler;

pub use filter_design::{frequency_response, windowed_sinc_lowpass};
pub use history::HistoryBuffer;
pub use math::{max_abs_error, peak, rms, to_dbfs, tone_magnitude};
pub use resampler::Resampler;
