pub mod capture;
pub mod source;

pub use capture::{AudioCapture, list_input_devices};
pub use source::{AudioSource, DeviceSource, WavFileSource};
