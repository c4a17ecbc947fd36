use crate::config::AudioConfig;
use crate::error::{ResampleError, Result};
use audio_thread_priority::RtPriorityHandle;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::Sender;

/// Names of the input devices offered by the default host
pub fn list_input_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();
    let devices = host
        .input_devices()
        .map_err(|e| ResampleError::AudioDevice(format!("{}", e)))?;

    #[allow(deprecated)]
    let names = devices.filter_map(|d| d.name().ok()).collect();
    Ok(names)
}

fn find_input_device(host: &cpal::Host, name: Option<&str>) -> Result<cpal::Device> {
    let Some(name) = name else {
        return host
            .default_input_device()
            .ok_or_else(|| ResampleError::AudioDevice("No input device found".into()));
    };

    let mut devices = host
        .input_devices()
        .map_err(|e| ResampleError::AudioDevice(format!("{}", e)))?;

    #[allow(deprecated)]
    let device = devices.find(|d| d.name().map(|n| n == name).unwrap_or(false));
    device.ok_or_else(|| ResampleError::AudioDevice(format!("Input device not found: {}", name)))
}

/// Wideband capture stream
///
/// Delivers interleaved device buffers at the configured sample rate over a
/// channel. Resampling happens on the receiving thread.
pub struct AudioCapture {
    stream: cpal::Stream,
    _rt_handle: Option<RtPriorityHandle>,
}

impl AudioCapture {
    /// Open the named input device (or the default) and start streaming
    pub fn new(
        config: &AudioConfig,
        tx: Sender<Vec<f32>>,
        device_name: Option<&str>,
    ) -> Result<Self> {
        let host = cpal::default_host();
        let device = find_input_device(&host, device_name)?;

        match device.description() {
            Ok(desc) => log::info!("Input device: {:?}", desc),
            Err(_) => log::info!("Input device: Unknown"),
        }

        let stream_config = cpal::StreamConfig {
            channels: config.channels,
            sample_rate: config.sample_rate,
            buffer_size: cpal::BufferSize::Fixed(config.buffer_size as u32),
        };

        let stream = device
            .build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if tx.try_send(data.to_vec()).is_err() {
                        log::warn!("Capture buffer dropped");
                    }
                },
                |err| log::error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| ResampleError::AudioStream(format!("{}", e)))?;

        let rt_handle = audio_thread_priority::promote_current_thread_to_real_time(
            config.buffer_size as u32,
            config.sample_rate,
        );

        let rt_handle = match rt_handle {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("Could not set real-time priority: {}", e);
                None
            }
        };

        stream
            .play()
            .map_err(|e| ResampleError::AudioStream(format!("{}", e)))?;

        Ok(Self {
            stream,
            _rt_handle: rt_handle,
        })
    }
}

impl Drop for AudioCapture {
    fn drop(&mut self) {
        let _ = self.stream.pause();
    }
}
