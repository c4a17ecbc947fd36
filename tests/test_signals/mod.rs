pub mod generate;

pub use generate::{generate_sine, measure_frequency_power};
